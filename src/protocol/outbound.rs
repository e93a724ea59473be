//! # Host → child envelope construction.

use serde_json::{Map, Value};

use crate::protocol::{PROTOCOL_NAME, tags};

/// Outbound command envelope.
///
/// Base fields are written first; `protocol` and `msgType` are applied last and
/// override base fields of the same name.
#[derive(Debug, Clone)]
pub struct Outbound {
    msg_type: String,
    base: Map<String, Value>,
}

impl Outbound {
    /// Creates an envelope with no base fields.
    pub fn new(msg_type: impl Into<String>) -> Self {
        Self {
            msg_type: msg_type.into(),
            base: Map::new(),
        }
    }

    /// The `bootstrap` command carrying the child's assigned address.
    ///
    /// # Example
    /// ```
    /// use serde_json::json;
    /// use hostvisor::{Outbound, PROTOCOL_NAME};
    ///
    /// let v = Outbound::bootstrap("https://a.example/worker.js").into_value();
    /// assert_eq!(v, json!({
    ///     "protocol": PROTOCOL_NAME,
    ///     "msgType": "bootstrap",
    ///     "corsWorkerUri": "https://a.example/worker.js",
    /// }));
    /// ```
    pub fn bootstrap(address: &str) -> Self {
        Self::new(tags::BOOTSTRAP).with_field("corsWorkerUri", Value::from(address))
    }

    /// Adds a base field.
    #[inline]
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.base.insert(key.into(), value);
        self
    }

    /// Returns the wire tag.
    pub fn msg_type(&self) -> &str {
        &self.msg_type
    }

    /// Renders the envelope.
    pub fn into_value(self) -> Value {
        let mut full = self.base;
        full.insert("protocol".into(), Value::from(PROTOCOL_NAME));
        full.insert("msgType".into(), Value::from(self.msg_type));
        Value::Object(full)
    }
}
