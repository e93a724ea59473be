//! # Event listeners for the coordinator.
//!
//! This module provides the [`Subscribe`] trait, the function-backed [`ListenerFn`],
//! and the per-coordinator [`Listeners`] registry.
//!
//! ## Architecture
//! ```text
//! Coordinator ── emit(Event) ──► Listeners::dispatch(&Event)
//!                                    │
//!                         listeners[event.kind]
//!                       ┌────────┬───┴─────┬──────────┐
//!                       ▼        ▼         ▼          ▼
//!                   LogWriter  Relay   Metrics     Custom ...
//! ```
//!
//! ## Listener types
//! - **Relay listeners** - forward [`EventKind::ChildMessage`](crate::EventKind::ChildMessage)
//!   payloads to the host application
//! - **Passive listeners** - observe lifecycle and failure events (logging, metrics, alerts)

#[cfg(feature = "logging")]
mod embedded;
mod listener_fn;
mod listeners;
mod subscriber;

#[cfg(feature = "logging")]
pub use embedded::LogWriter;
pub use listener_fn::{ListenerFn, ListenerRef};
pub use listeners::{ListenerId, Listeners};
pub use subscriber::Subscribe;
