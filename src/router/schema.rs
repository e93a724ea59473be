//! # Message schemas.
//!
//! The router treats validation as a black box: a [`Validate`] implementation either
//! returns a typed [`LabeledMessage`] or rejects the payload. Closures work too.
//!
//! Built-in schemas:
//! - [`ClientToHost`]: inbound (child → host)
//! - [`HostToClient`]: outbound (host → child)
//!
//! Both require an object with a non-empty string `msgType`; a `publish` message must
//! also carry a string `msg.topic`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::protocol::tags;

/// A validated message envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabeledMessage {
    /// Wire tag.
    pub msg_type: String,
    /// Payload.
    #[serde(default)]
    pub msg: Value,
    /// Protocol tag, if the sender set one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
}

impl LabeledMessage {
    /// True for `publish` messages.
    #[inline]
    pub fn is_publish(&self) -> bool {
        self.msg_type == tags::PUBLISH
    }

    /// `msg.topic`, if present.
    pub fn topic(&self) -> Option<&str> {
        self.msg.get("topic").and_then(Value::as_str)
    }

    fn well_formed(self) -> Option<Self> {
        if self.msg_type.is_empty() || (self.is_publish() && self.topic().is_none()) {
            None
        } else {
            Some(self)
        }
    }
}

/// Black-box schema check.
pub trait Validate<T>: Send + 'static {
    /// Returns the validated message, or `None` to reject.
    fn validate(&self, raw: &Value) -> Option<T>;
}

impl<T, F> Validate<T> for F
where
    F: Fn(&Value) -> Option<T> + Send + 'static,
{
    fn validate(&self, raw: &Value) -> Option<T> {
        self(raw)
    }
}

/// Default inbound schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientToHost;

impl Validate<LabeledMessage> for ClientToHost {
    fn validate(&self, raw: &Value) -> Option<LabeledMessage> {
        LabeledMessage::deserialize(raw).ok()?.well_formed()
    }
}

/// Default outbound schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostToClient;

impl Validate<LabeledMessage> for HostToClient {
    fn validate(&self, raw: &Value) -> Option<LabeledMessage> {
        LabeledMessage::deserialize(raw).ok()?.well_formed()
    }
}
