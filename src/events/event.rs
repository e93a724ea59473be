//! # Events emitted by the coordinator.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Lifecycle events**: child bootstrap flow (started, loaded, bootstrap sent, running)
//! - **Failure events**: bootstrap failure, error notifications, breaker trips, rejected messages
//! - **Relay events**: application messages re-emitted for the host ([`EventKind::ChildMessage`])
//!
//! The [`Event`] struct carries additional metadata such as timestamps, child id,
//! reasons, error counts and payloads.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use serde_json::json;
//! use hostvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::ChildMessage)
//!     .with_reason("toastRequest")
//!     .with_payload(json!({"msgType": "toastRequest"}));
//!
//! assert_eq!(ev.kind, EventKind::ChildMessage);
//! assert_eq!(ev.reason.as_deref(), Some("toastRequest"));
//! assert!(ev.child.is_none());
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

use serde_json::Value;

use crate::child::ChildId;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of coordinator events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    // === Lifecycle events ===
    /// Child handle created and registered in `Loading`.
    ///
    /// Sets:
    /// - `child`: child id
    /// - `reason`: assigned address
    ChildStarted,

    /// Child reported `loaded`.
    ///
    /// Sets:
    /// - `child`: child id
    ChildLoaded,

    /// `bootstrap` command delivered to the child.
    ///
    /// Sets:
    /// - `child`: child id
    /// - `reason`: assigned address
    BootstrapSent,

    /// Child reported `bootstrapped`.
    ///
    /// Sets:
    /// - `child`: child id
    ChildRunning,

    /// Child removed from the registry and terminated.
    ///
    /// Sets:
    /// - `child`: child id
    ChildStopped,

    // === Failure events ===
    /// Child reported `bootstrap_failure`; it is stopped right after.
    ///
    /// Sets:
    /// - `child`: child id
    /// - `payload`: failure detail (`msg.error`)
    BootstrapFailed,

    /// Error notification counted against the breaker.
    ///
    /// Sets:
    /// - `child`: child id
    /// - `reason`: error message
    /// - `error_count`: errors in the current window
    ChildErrored,

    /// Error rate exceeded; the child is stopped right after.
    ///
    /// Sets:
    /// - `child`: child id
    /// - `reason`: last error message
    /// - `error_count`: errors in the window
    /// - `window_ms`: time since the window opened (ms)
    BreakerTripped,

    /// Inbound message dropped (malformed, or unknown origin).
    ///
    /// Sets:
    /// - `child`: origin id as stamped on the notification
    /// - `reason`: rejection label
    MessageRejected,

    // === Relay events ===
    /// Unrecognized (application) message from a child.
    ///
    /// Sets:
    /// - `child`: child id
    /// - `reason`: the `msgType` tag
    /// - `payload`: the message, `protocol` stripped
    ChildMessage,
}

/// Coordinator event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Child the event is about, if applicable.
    pub child: Option<ChildId>,
    /// Human-readable reason (addresses, labels, error messages, tags).
    pub reason: Option<Arc<str>>,
    /// Errors counted in the current window.
    pub error_count: Option<u32>,
    /// Elapsed error window in milliseconds (compact).
    pub window_ms: Option<u32>,
    /// Structured payload (relayed messages, failure details).
    pub payload: Option<Arc<Value>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            child: None,
            reason: None,
            error_count: None,
            window_ms: None,
            payload: None,
        }
    }

    /// Attaches a child id.
    #[inline]
    pub fn with_child(mut self, id: &ChildId) -> Self {
        self.child = Some(id.clone());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches the error count of the current window.
    #[inline]
    pub fn with_error_count(mut self, n: u32) -> Self {
        self.error_count = Some(n);
        self
    }

    /// Attaches the elapsed error window (stored as milliseconds).
    #[inline]
    pub fn with_window(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.window_ms = Some(ms);
        self
    }

    /// Attaches a structured payload.
    #[inline]
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(Arc::new(payload));
        self
    }

    #[inline]
    pub fn is_child_message(&self) -> bool {
        matches!(self.kind, EventKind::ChildMessage)
    }
}
