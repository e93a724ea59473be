//! # Child → host envelope decoding.
//!
//! Raw payloads decode into [`Inbound`], a closed set of lifecycle variants plus a
//! catch-all for application messages. Anything that cannot be classified is a
//! [`MessageError`] and must be dropped without touching state.
//!
//! ## Envelope
//! ```text
//! { "msgType": "<tag>", "msg": <payload>?, "protocol": "<PROTOCOL_NAME>"? }
//! ```
//!
//! ## Protocol tag
//! An absent `protocol` is accepted. A present one must equal [`PROTOCOL_NAME`];
//! application messages are re-emitted with the tag stripped.

use serde_json::{Map, Value};

use crate::error::MessageError;
use crate::protocol::{PROTOCOL_NAME, tags};

/// Decoded inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    /// Child script loaded; waiting for the bootstrap command.
    Loaded,
    /// Child could not bootstrap; `detail` is `msg.error` (or `null`).
    BootstrapFailure { detail: Value },
    /// Child finished bootstrapping.
    Bootstrapped,
    /// Any other tag: an application message for the host.
    Other {
        /// The `msgType` tag.
        msg_type: String,
        /// The full envelope minus `protocol`.
        payload: Value,
    },
}

impl Inbound {
    /// Classifies a raw payload.
    ///
    /// # Example
    /// ```
    /// use serde_json::json;
    /// use hostvisor::{Inbound, MessageError};
    ///
    /// assert_eq!(Inbound::decode(&json!({"msgType": "loaded"})), Ok(Inbound::Loaded));
    /// assert_eq!(Inbound::decode(&json!({"msg": {}})), Err(MessageError::MissingType));
    /// ```
    pub fn decode(raw: &Value) -> Result<Self, MessageError> {
        let obj = raw.as_object().ok_or(MessageError::NotAnObject)?;
        check_protocol(obj)?;

        let msg_type = obj
            .get("msgType")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .ok_or(MessageError::MissingType)?;

        let decoded = match msg_type {
            tags::LOADED => Inbound::Loaded,
            tags::BOOTSTRAPPED => Inbound::Bootstrapped,
            tags::BOOTSTRAP_FAILURE => Inbound::BootstrapFailure {
                detail: obj
                    .get("msg")
                    .and_then(|m| m.get("error"))
                    .cloned()
                    .unwrap_or(Value::Null),
            },
            other => {
                let mut payload = obj.clone();
                payload.remove("protocol");
                Inbound::Other {
                    msg_type: other.to_string(),
                    payload: Value::Object(payload),
                }
            }
        };
        Ok(decoded)
    }

    /// Returns the wire tag of this message.
    pub fn msg_type(&self) -> &str {
        match self {
            Inbound::Loaded => tags::LOADED,
            Inbound::BootstrapFailure { .. } => tags::BOOTSTRAP_FAILURE,
            Inbound::Bootstrapped => tags::BOOTSTRAPPED,
            Inbound::Other { msg_type, .. } => msg_type,
        }
    }
}

fn check_protocol(obj: &Map<String, Value>) -> Result<(), MessageError> {
    match obj.get("protocol") {
        None => Ok(()),
        Some(Value::String(p)) if p == PROTOCOL_NAME => Ok(()),
        Some(Value::String(p)) => Err(MessageError::ProtocolMismatch { found: p.clone() }),
        Some(other) => Err(MessageError::ProtocolMismatch {
            found: other.to_string(),
        }),
    }
}
