//! # Event subscriber trait.
//!
//! Provides [`Subscribe`], the extension point for plugging custom event handlers into a
//! coordinator.
//!
//! ## Rules
//! - Listeners are invoked synchronously on the coordinator's thread, in registration order.
//! - A listener must not block; hand heavy work off to a channel.
//! - Panics are caught per listener and logged; remaining listeners still run.
//! - Listeners cannot borrow the coordinator. To stop a child from inside a listener,
//!   capture a [`CoordinatorHandle`](crate::CoordinatorHandle).
//!
//! ## Example
//! ```rust
//! use hostvisor::{Event, EventKind, Subscribe};
//!
//! struct Metrics;
//!
//! impl Subscribe for Metrics {
//!     fn on_event(&self, ev: &Event) {
//!         if matches!(ev.kind, EventKind::BreakerTripped) {
//!             // export a metric, etc.
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "metrics" }
//! }
//! ```

use crate::events::Event;

/// Event listener for coordinator observability and message relay.
pub trait Subscribe: Send + Sync + 'static {
    /// Processes a single event.
    fn on_event(&self, event: &Event);

    /// Returns the listener name used in logs.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
