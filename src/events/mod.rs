//! Coordinator events: types only.
//!
//! This module groups the event **data model** emitted by the coordinator.
//! Delivery is handled by [`Listeners`](crate::Listeners) in `subscribers`.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//!
//! ## Quick reference
//! - **Publisher**: `Coordinator` (lifecycle, breaker, relay of application messages).
//! - **Consumers**: any [`Subscribe`](crate::Subscribe) registered per [`EventKind`].

mod event;

pub use event::{Event, EventKind};
