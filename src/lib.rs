//! # hostvisor
//!
//! **Hostvisor** is a host-side coordinator for isolated child contexts (background
//! workers, embedded frames).
//!
//! It provides two independent components:
//! - a lifecycle coordinator that spawns children, drives a bootstrap handshake with
//!   them and stops misbehaving ones with an error-rate circuit breaker;
//! - a message router that shows one routed child at a time and exchanges
//!   topic-filtered messages with it.
//!
//! ## Architecture
//! ### Lifecycle
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │ ChildHandle  │   │ ChildHandle  │   │ ChildHandle  │
//!     │  (child #1)  │   │  (child #2)  │   │  (child #3)  │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            │ NotificationSink (message / error, stamped with ChildId)
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                  unbounded queue (Signal)                         │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Coordinator (drain / run)                                        │
//! │  - Registry (ChildId → ManagedChild { phase, handle, errors })    │
//! │  - ErrorWindow per child (circuit breaker)                        │
//! │  - Listeners (per EventKind, panic-isolated)                      │
//! └──────┬──────────────────┬──────────────────┬──────────────────────┘
//!        ▼                  ▼                  ▼
//!   ChildStarted       ChildMessage       BreakerTripped ...
//!   ChildRunning       MessageRejected    ChildStopped
//! ```
//!
//! ### Bootstrap
//! ```text
//! start ──► Loading ──loaded──► Loaded (bootstrap sent) ──bootstrapped──► Running
//!                                   └──bootstrap_failure──► stopped
//! any phase ──error × (threshold + 1) within window──► stopped
//! ```
//!
//! ### Routing
//! ```text
//! change_route(name) ──► RouteTable ──► Frame::navigate(url | about:blank)
//! Frame ──post──► Validate ──► topic filter ──► host handlers
//! publish_generic_message ──► Validate ──► Frame::send
//! ```
//!
//! ## Features
//! | Area            | Description                                             | Key types / traits                          |
//! |-----------------|---------------------------------------------------------|---------------------------------------------|
//! | **Lifecycle**   | Start, stop, bootstrap and break children.              | [`Coordinator`], [`Phase`], [`ChildInfo`]   |
//! | **Transport**   | Plug in the actual child runtime.                       | [`ChildHandle`], [`Spawner`]                |
//! | **Listeners**   | Observe lifecycle events and relayed messages.          | [`Subscribe`], [`ListenerFn`], [`Event`]    |
//! | **Policies**    | Error-rate circuit breaker.                             | [`BreakerPolicy`], [`ErrorWindow`]          |
//! | **Routing**     | Single routed frame with topic pub/sub.                 | [`Router`], [`RouteTable`], [`Frame`]       |
//! | **Errors**      | Typed child and message errors.                         | [`ChildError`], [`MessageError`]            |
//! | **Configuration** | Thresholds and id prefix.                             | [`Config`]                                  |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use hostvisor::{
//!     Channel, ChildError, ChildHandle, ChildId, Config, Coordinator, EventKind, ListenerFn,
//!     NotificationSink, Phase,
//! };
//! use serde_json::{json, Value};
//!
//! // A child whose message sink is kept so the test can play the child's side.
//! #[derive(Clone, Default)]
//! struct Remote(Arc<Mutex<Option<NotificationSink>>>);
//!
//! struct Handle(Remote);
//! impl ChildHandle for Handle {
//!     fn send(&mut self, _payload: Value) -> Result<(), ChildError> { Ok(()) }
//!     fn listen(&mut self, channel: Channel, sink: NotificationSink) {
//!         if channel == Channel::Message {
//!             *(self.0).0.lock().unwrap() = Some(sink);
//!         }
//!     }
//!     fn unlisten(&mut self, _channel: Channel) {}
//!     fn terminate(&mut self) {}
//! }
//!
//! let remote = Remote::default();
//! let spawned = remote.clone();
//! let mut coordinator = Coordinator::new(Config::default(), move |_id: &ChildId| -> Box<dyn ChildHandle> {
//!     Box::new(Handle(spawned.clone()))
//! });
//!
//! let relayed = Arc::new(Mutex::new(Vec::new()));
//! let sink = relayed.clone();
//! coordinator.add_listener(
//!     EventKind::ChildMessage,
//!     ListenerFn::arc("relay", move |ev: &hostvisor::Event| {
//!         if let Some(p) = &ev.payload {
//!             sink.lock().unwrap().push((**p).clone());
//!         }
//!     }),
//! );
//!
//! let id = coordinator.start("https://a.example/worker.js");
//! let child = remote.0.lock().unwrap().clone().unwrap();
//! child.message(json!({"msgType": "loaded"}));
//! child.message(json!({"msgType": "bootstrapped"}));
//! child.message(json!({"msgType": "hello", "msg": 1}));
//! coordinator.drain();
//!
//! assert_eq!(coordinator.phase(&id), Some(Phase::Running));
//! assert_eq!(*relayed.lock().unwrap(), vec![json!({"msgType": "hello", "msg": 1})]);
//! ```
mod child;
mod core;
mod error;
mod events;
mod policies;
mod protocol;
mod router;
mod subscribers;

#[cfg(test)]
mod testing;

// ---- Public re-exports ----

pub use child::{Channel, ChildHandle, ChildId, Notification, NotificationKind, NotificationSink, Spawner};
pub use core::{ChildInfo, Config, Coordinator, CoordinatorHandle, Phase};
pub use error::{ChildError, MessageError};
pub use events::{Event, EventKind};
pub use policies::{BreakerPolicy, ErrorWindow, Verdict};
pub use protocol::{Inbound, Outbound, PROTOCOL_NAME, tags};
pub use router::{
    BLANK, ClientRegistration, ClientToHost, Frame, FrameSink, HostHandler, HostToClient,
    LabeledMessage, RouteEntry, RouteTable, Router, Validate,
};
pub use subscribers::{ListenerFn, ListenerId, ListenerRef, Listeners, Subscribe};

// Optional: expose a simple built-in logger listener (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
