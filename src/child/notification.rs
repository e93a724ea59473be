//! # Notifications from a child back to the coordinator.
//!
//! A child transport never calls into the coordinator directly. Instead it receives a
//! [`NotificationSink`] per tracked [`Channel`] and pushes inbound traffic into it.
//! The sink stamps every [`Notification`] with the child's id; that stamp is the
//! origin identity the coordinator uses to look the child up.
//!
//! ```text
//! child transport ── sink.message(payload) ──► [unbounded queue] ──► Coordinator::drain()/run()
//!                 └─ sink.error(err)       ──┘
//! ```
//!
//! Notifications from one sink are delivered in FIFO order.

use serde_json::Value;
use tokio::sync::mpsc;

use crate::child::ChildId;
use crate::error::ChildError;

/// Notification channels a coordinator tracks on every child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Structured messages posted by the child.
    Message,
    /// Runtime errors raised by the child.
    Error,
}

impl Channel {
    /// Every channel subscribed on `start` and unsubscribed on `stop`.
    pub const TRACKED: [Channel; 2] = [Channel::Message, Channel::Error];
}

/// Inbound notification payload.
#[derive(Debug, Clone)]
pub enum NotificationKind {
    /// A structured message (raw, not yet decoded).
    Message(Value),
    /// An error raised by the child.
    Error(ChildError),
}

/// A notification stamped with its origin.
#[derive(Debug, Clone)]
pub struct Notification {
    /// Id of the child the sink was created for.
    pub origin: ChildId,
    /// What happened.
    pub kind: NotificationKind,
}

/// Items queued for the coordinator loop.
#[derive(Debug)]
pub(crate) enum Signal {
    Notify(Notification),
    Stop(ChildId),
}

/// Write side of a child's notification queue.
///
/// Cloneable; sending never blocks. Once the coordinator is dropped, sends return `false`.
#[derive(Clone, Debug)]
pub struct NotificationSink {
    origin: ChildId,
    channel: Channel,
    tx: mpsc::UnboundedSender<Signal>,
}

impl NotificationSink {
    pub(crate) fn new(origin: ChildId, channel: Channel, tx: mpsc::UnboundedSender<Signal>) -> Self {
        Self {
            origin,
            channel,
            tx,
        }
    }

    /// Id stamped on every notification pushed through this sink.
    pub fn origin(&self) -> &ChildId {
        &self.origin
    }

    /// Channel this sink was attached to.
    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Pushes a structured message. Returns `false` if the coordinator is gone.
    pub fn message(&self, payload: Value) -> bool {
        self.push(NotificationKind::Message(payload))
    }

    /// Pushes an error. Returns `false` if the coordinator is gone.
    pub fn error(&self, error: ChildError) -> bool {
        self.push(NotificationKind::Error(error))
    }

    fn push(&self, kind: NotificationKind) -> bool {
        self.tx
            .send(Signal::Notify(Notification {
                origin: self.origin.clone(),
                kind,
            }))
            .is_ok()
    }
}
