//! # Example: Host
//!
//! Runs both halves of hostvisor against in-memory children:
//! - a well-behaved worker that completes the bootstrap handshake and publishes a message;
//! - a noisy worker that keeps raising errors until the breaker stops it;
//! - a router that switches between two clients and filters published topics.
//!
//! Run with: `RUST_LOG=debug cargo run --example host --features logging`

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use hostvisor::{
    Channel, ChildError, ChildHandle, ChildId, Config, Coordinator, Event, EventKind, Frame,
    FrameSink, LabeledMessage, ListenerFn, LogWriter, NotificationSink, RouteTable, Router, tags,
};

/// In-memory worker. Answers `bootstrap` with `bootstrapped` and a greeting.
struct EchoWorker {
    id: ChildId,
    messages: Option<NotificationSink>,
    errors: Option<NotificationSink>,
    noisy: bool,
}

impl ChildHandle for EchoWorker {
    fn send(&mut self, payload: Value) -> Result<(), ChildError> {
        let Some(sink) = &self.messages else {
            return Err(ChildError::SendFailed {
                reason: "not listening".into(),
            });
        };
        if payload["msgType"] == tags::BOOTSTRAP {
            sink.message(json!({"msgType": tags::BOOTSTRAPPED}));
            sink.message(json!({"msgType": "greeting", "msg": {"from": self.id.to_string()}}));
        }
        if self.noisy {
            if let Some(errors) = &self.errors {
                for n in 0..12 {
                    errors.error(ChildError::runtime(format!("tick {n} failed")));
                }
            }
        }
        Ok(())
    }

    fn listen(&mut self, channel: Channel, sink: NotificationSink) {
        match channel {
            Channel::Message => {
                sink.message(json!({"msgType": tags::LOADED}));
                self.messages = Some(sink);
            }
            Channel::Error => self.errors = Some(sink),
        }
    }

    fn unlisten(&mut self, channel: Channel) {
        match channel {
            Channel::Message => self.messages = None,
            Channel::Error => self.errors = None,
        }
    }

    fn terminate(&mut self) {
        println!("[{}] terminated", self.id);
    }
}

/// Headless frame: remembers where it points and echoes publishes back to the host.
#[derive(Default)]
struct EchoFrame {
    address: String,
    sink: Option<FrameSink>,
}

impl Frame for EchoFrame {
    fn navigate(&mut self, address: &str) {
        println!("[frame] -> {address}");
        self.address = address.to_string();
    }

    fn send(&mut self, payload: Value) -> Result<(), ChildError> {
        match &self.sink {
            Some(sink) if sink.post(payload) => Ok(()),
            _ => Err(ChildError::Terminated),
        }
    }

    fn listen(&mut self, sink: FrameSink) {
        self.sink = Some(sink);
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // ---- Lifecycle ----

    let cfg = Config::from_json(r#"{"errorWindowCountThreshold": 5, "errorWindowMillis": 1000}"#)?;
    let noisy_next = Arc::new(Mutex::new(false));
    let flag = noisy_next.clone();
    let mut coordinator = Coordinator::new(cfg, move |id: &ChildId| -> Box<dyn ChildHandle> {
        Box::new(EchoWorker {
            id: id.clone(),
            messages: None,
            errors: None,
            noisy: *flag.lock().unwrap(),
        })
    });

    let writer = Arc::new(LogWriter::new());
    for kind in LogWriter::KINDS {
        coordinator.add_listener(kind, writer.clone());
    }
    coordinator.add_listener(
        EventKind::ChildMessage,
        ListenerFn::arc("relay", |ev: &Event| {
            if let Some(payload) = &ev.payload {
                println!("[relay] {payload}");
            }
        }),
    );

    coordinator.start("https://workers.example/quiet.js");
    *noisy_next.lock().unwrap() = true;
    coordinator.start("https://workers.example/noisy.js");

    let token = CancellationToken::new();
    let task = tokio::spawn({
        let token = token.clone();
        async move {
            coordinator.run(token).await;
            coordinator
        }
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    token.cancel();
    let coordinator = task.await?;
    println!("[host] children left: {}", coordinator.len());

    // ---- Routing ----

    let routes = RouteTable::from_json(
        r#"{
            "inbox":    {"url": "https://inbox.example/#/",    "assignedRoute": "inbox"},
            "calendar": {"url": "https://calendar.example/",   "assignedRoute": "calendar"}
        }"#,
    )?;
    let mut router = Router::new(Box::new(EchoFrame::default()), routes);
    router.on_send_to_host(|m: &LabeledMessage| println!("[host] got {} {}", m.msg_type, m.msg));
    router.subscribe_to_messages("mail");

    router.change_route("inbox");
    router.publish_generic_message(&json!({"msgType": "publish", "msg": {"topic": "mail", "n": 1}}));
    router.publish_generic_message(&json!({"msgType": "publish", "msg": {"topic": "chat", "n": 2}}));
    router.drain();

    router.change_route("settings");
    println!("[host] active: {}", router.active_address());
    Ok(())
}
