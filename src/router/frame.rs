//! # Routed frame abstraction.
//!
//! A [`Frame`] is the single visual container the router renders children into.
//! Building the container is the host's business; the router only points it at an
//! address, posts payloads into it and listens for what the hosted child posts back.

use serde_json::Value;
use tokio::sync::mpsc;

use crate::error::ChildError;

/// Container hosting the currently routed child.
pub trait Frame: Send + 'static {
    /// Redirects the container to `address`; the previous content is replaced.
    fn navigate(&mut self, address: &str);

    /// Posts a payload to the hosted child.
    fn send(&mut self, payload: Value) -> Result<(), ChildError>;

    /// Attaches the sink for messages posted by the hosted child.
    fn listen(&mut self, sink: FrameSink);
}

/// Write side of the router's inbound queue.
#[derive(Clone, Debug)]
pub struct FrameSink {
    tx: mpsc::UnboundedSender<Value>,
}

impl FrameSink {
    pub(crate) fn new(tx: mpsc::UnboundedSender<Value>) -> Self {
        Self { tx }
    }

    /// Queues a raw payload for validation. Returns `false` if the router is gone.
    pub fn post(&self, payload: Value) -> bool {
        self.tx.send(payload).is_ok()
    }
}
