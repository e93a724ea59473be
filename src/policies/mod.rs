//! Child termination policies.
//!
//! This module groups the knobs that control **when** a misbehaving child is stopped.
//!
//! ## Contents
//! - [`BreakerPolicy`] error threshold and window length
//! - [`ErrorWindow`]   per-child counter fed by error notifications
//! - [`Verdict`]       outcome of recording one error
//!
//! ## Quick wiring
//! ```text
//! Config { error_window_count_threshold, error_window }
//!      └─► Config::breaker() → BreakerPolicy
//!           └─► Coordinator: ErrorWindow::record(now, &policy) on every error notification
//!                 └─► Verdict::Tripped → stop(id)
//! ```
//!
//! ## Defaults
//! - `threshold = 10`, `window = 30s`.
//! - Tripped children are stopped, never restarted.

mod breaker;

pub use breaker::{BreakerPolicy, ErrorWindow, Verdict};
