//! Error types used by the coordinator, the router and child transports.
//!
//! This module defines two enums:
//!
//! - [`ChildError`]: failures reported by (or about) a child transport.
//! - [`MessageError`]: reasons an inbound message was rejected.
//!
//! None of these are returned from `start`, `change_route` or `publish_generic_message`:
//! anomalies are handled locally (logged, child stopped where applicable) and surface
//! through events. Both types provide `as_label` / `as_message` for logs and events.

use thiserror::Error;

/// # Errors produced by a child transport.
///
/// Implementations of [`ChildHandle`](crate::ChildHandle) and [`Frame`](crate::Frame)
/// return these from `send`, and report [`ChildError::Runtime`] through their error channel.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChildError {
    /// The payload could not be delivered to the child.
    #[error("send failed: {reason}")]
    SendFailed {
        /// Transport-specific reason.
        reason: String,
    },

    /// The child was already terminated.
    #[error("child terminated")]
    Terminated,

    /// The child raised an error while running.
    #[error("runtime error: {error}")]
    Runtime {
        /// The underlying error message.
        error: String,
    },
}

impl ChildError {
    /// Shorthand for [`ChildError::Runtime`].
    pub fn runtime(error: impl Into<String>) -> Self {
        ChildError::Runtime {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/events.
    ///
    /// # Example
    /// ```
    /// use hostvisor::ChildError;
    ///
    /// assert_eq!(ChildError::Terminated.as_label(), "child_terminated");
    /// assert_eq!(ChildError::runtime("boom").as_label(), "child_runtime_error");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ChildError::SendFailed { .. } => "child_send_failed",
            ChildError::Terminated => "child_terminated",
            ChildError::Runtime { .. } => "child_runtime_error",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ChildError::SendFailed { reason } => format!("send failed: {reason}"),
            ChildError::Terminated => "child terminated".to_string(),
            ChildError::Runtime { error } => format!("error: {error}"),
        }
    }
}

/// # Reasons an inbound message is rejected.
///
/// Rejected messages cause no state change; the coordinator reports them as
/// [`EventKind::MessageRejected`](crate::EventKind::MessageRejected).
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MessageError {
    /// Payload is not a JSON object.
    #[error("message is not an object")]
    NotAnObject,

    /// Payload has no string `msgType` property.
    #[error("no msgType property provided")]
    MissingType,

    /// Payload carries a `protocol` tag that is not ours.
    #[error("unexpected protocol {found:?}")]
    ProtocolMismatch {
        /// The protocol tag found on the message.
        found: String,
    },

    /// Message came from a child that is not (or no longer) registered.
    #[error("message from unknown child {origin}")]
    UnknownOrigin {
        /// Rendered id stamped on the notification.
        origin: String,
    },
}

impl MessageError {
    /// Returns a short stable label (snake_case) for use in logs/events.
    ///
    /// # Example
    /// ```
    /// use hostvisor::MessageError;
    ///
    /// assert_eq!(MessageError::MissingType.as_label(), "message_missing_type");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            MessageError::NotAnObject => "message_not_object",
            MessageError::MissingType => "message_missing_type",
            MessageError::ProtocolMismatch { .. } => "message_protocol_mismatch",
            MessageError::UnknownOrigin { .. } => "message_unknown_origin",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        self.to_string()
    }
}
