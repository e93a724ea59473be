//! In-memory fakes for the external seams (child transports and frames).

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::child::{Channel, ChildHandle, ChildId, NotificationSink, Spawner};
use crate::error::ChildError;
use crate::router::{Frame, FrameSink};

#[derive(Default)]
struct ChildState {
    sent: Vec<Value>,
    sinks: HashMap<Channel, NotificationSink>,
    terminated: bool,
    fail_send: bool,
}

/// Test-side view of one fake child.
#[derive(Clone, Default)]
pub(crate) struct Probe(Arc<Mutex<ChildState>>);

impl Probe {
    /// Posts a message as the child would. Returns `false` if nobody listens.
    pub fn message(&self, payload: Value) -> bool {
        let st = self.0.lock().unwrap();
        st.sinks
            .get(&Channel::Message)
            .is_some_and(|s| s.message(payload))
    }

    /// Raises an error as the child would.
    pub fn error(&self, msg: &str) -> bool {
        let st = self.0.lock().unwrap();
        st.sinks
            .get(&Channel::Error)
            .is_some_and(|s| s.error(ChildError::runtime(msg)))
    }

    pub fn sent(&self) -> Vec<Value> {
        self.0.lock().unwrap().sent.clone()
    }

    pub fn listening(&self) -> usize {
        self.0.lock().unwrap().sinks.len()
    }

    pub fn is_terminated(&self) -> bool {
        self.0.lock().unwrap().terminated
    }

    pub fn fail_sends(&self) {
        self.0.lock().unwrap().fail_send = true;
    }
}

struct FakeChild(Probe);

impl ChildHandle for FakeChild {
    fn send(&mut self, payload: Value) -> Result<(), ChildError> {
        let mut st = (self.0).0.lock().unwrap();
        if st.terminated {
            return Err(ChildError::Terminated);
        }
        if st.fail_send {
            return Err(ChildError::SendFailed {
                reason: "fake".into(),
            });
        }
        st.sent.push(payload);
        Ok(())
    }

    fn listen(&mut self, channel: Channel, sink: NotificationSink) {
        (self.0).0.lock().unwrap().sinks.insert(channel, sink);
    }

    fn unlisten(&mut self, channel: Channel) {
        (self.0).0.lock().unwrap().sinks.remove(&channel);
    }

    fn terminate(&mut self) {
        (self.0).0.lock().unwrap().terminated = true;
    }
}

/// Spawner that keeps a probe for every child it creates.
#[derive(Clone, Default)]
pub(crate) struct Fleet(Arc<Mutex<HashMap<ChildId, Probe>>>);

impl Fleet {
    pub fn probe(&self, id: &ChildId) -> Probe {
        self.0.lock().unwrap()[id].clone()
    }

    pub fn spawner(&self) -> impl Spawner {
        let fleet = self.clone();
        move |id: &ChildId| -> Box<dyn ChildHandle> {
            let probe = Probe::default();
            fleet.0.lock().unwrap().insert(id.clone(), probe.clone());
            Box::new(FakeChild(probe))
        }
    }
}

#[derive(Default)]
struct FrameState {
    address: Option<String>,
    sent: Vec<Value>,
    sink: Option<FrameSink>,
    fail_send: bool,
}

/// Test-side view of a fake frame.
#[derive(Clone, Default)]
pub(crate) struct FrameProbe(Arc<Mutex<FrameState>>);

impl FrameProbe {
    pub fn frame(&self) -> Box<dyn Frame> {
        Box::new(FakeFrame(self.clone()))
    }

    pub fn post(&self, payload: Value) -> bool {
        let st = self.0.lock().unwrap();
        st.sink.as_ref().is_some_and(|s| s.post(payload))
    }

    pub fn address(&self) -> Option<String> {
        self.0.lock().unwrap().address.clone()
    }

    pub fn sent(&self) -> Vec<Value> {
        self.0.lock().unwrap().sent.clone()
    }

    pub fn fail_sends(&self) {
        self.0.lock().unwrap().fail_send = true;
    }
}

struct FakeFrame(FrameProbe);

impl Frame for FakeFrame {
    fn navigate(&mut self, address: &str) {
        (self.0).0.lock().unwrap().address = Some(address.to_string());
    }

    fn send(&mut self, payload: Value) -> Result<(), ChildError> {
        let mut st = (self.0).0.lock().unwrap();
        if st.fail_send {
            return Err(ChildError::SendFailed {
                reason: "fake".into(),
            });
        }
        st.sent.push(payload);
        Ok(())
    }

    fn listen(&mut self, sink: FrameSink) {
        (self.0).0.lock().unwrap().sink = Some(sink);
    }
}
