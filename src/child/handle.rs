//! # Child transport abstraction.
//!
//! [`ChildHandle`] is the opaque bidirectional channel to one isolated child context
//! (a background worker, an embedded frame). The coordinator owns one boxed handle per
//! managed child; a [`Spawner`] creates them.
//!
//! ## Contract
//! - `listen` attaches a sink for one [`Channel`]; the handle pushes traffic into it.
//! - `unlisten` detaches it; no notifications may be pushed for that channel afterwards.
//! - `terminate` is final: the child context is torn down and never restarted.
//!
//! # Example
//! ```
//! use serde_json::Value;
//! use hostvisor::{Channel, ChildError, ChildHandle, NotificationSink};
//!
//! #[derive(Default)]
//! struct Loopback {
//!     sink: Option<NotificationSink>,
//! }
//!
//! impl ChildHandle for Loopback {
//!     fn send(&mut self, payload: Value) -> Result<(), ChildError> {
//!         match &self.sink {
//!             Some(sink) => { sink.message(payload); Ok(()) }
//!             None => Err(ChildError::Terminated),
//!         }
//!     }
//!     fn listen(&mut self, channel: Channel, sink: NotificationSink) {
//!         if channel == Channel::Message { self.sink = Some(sink); }
//!     }
//!     fn unlisten(&mut self, channel: Channel) {
//!         if channel == Channel::Message { self.sink = None; }
//!     }
//!     fn terminate(&mut self) {}
//! }
//! ```

use serde_json::Value;

use crate::child::{Channel, ChildId, NotificationSink};
use crate::error::ChildError;

/// Opaque bidirectional channel to one child context.
pub trait ChildHandle: Send + 'static {
    /// Posts a structured payload to the child.
    fn send(&mut self, payload: Value) -> Result<(), ChildError>;

    /// Attaches a notification sink for `channel`.
    fn listen(&mut self, channel: Channel, sink: NotificationSink);

    /// Detaches the sink for `channel`.
    fn unlisten(&mut self, channel: Channel);

    /// Tears the child context down immediately.
    fn terminate(&mut self);
}

/// Factory for child handles.
///
/// Called once per `start`; the child learns its address later, during bootstrap.
pub trait Spawner: Send + 'static {
    /// Creates the transport for a freshly allocated child.
    fn spawn(&mut self, id: &ChildId) -> Box<dyn ChildHandle>;
}

impl<F> Spawner for F
where
    F: FnMut(&ChildId) -> Box<dyn ChildHandle> + Send + 'static,
{
    fn spawn(&mut self, id: &ChildId) -> Box<dyn ChildHandle> {
        self(id)
    }
}
