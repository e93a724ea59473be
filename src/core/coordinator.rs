//! # Coordinator: child lifecycle, bootstrap handshake and circuit breaking.
//!
//! The [`Coordinator`] owns the registry of managed children, a [`Spawner`] for new
//! handles, and its own [`Listeners`]. Children report back through
//! [`NotificationSink`](crate::NotificationSink)s that feed one unbounded queue; the
//! queue is processed by [`Coordinator::drain`] or [`Coordinator::run`].
//!
//! ## Bootstrap handshake
//! ```text
//! start(address) ──► spawn handle, listen(Message, Error) ──► Loading
//!
//! child: {msgType:"loaded"}        ──► Loaded
//!                                       └─► send {protocol, msgType:"bootstrap", corsWorkerUri}
//!                                           (bootstrap in flight)
//! child: {msgType:"bootstrapped"}  ──► Running
//! child: {msgType:"bootstrap_failure"} ──► stop(id)           (no retry)
//! child: {msgType:<anything else>} ──► emit ChildMessage      (protocol stripped)
//! ```
//!
//! ## Error notifications
//! ```text
//! error ──► ErrorWindow::record(now, policy)
//!             ├─ Opened / Restarted / Counted ─► emit ChildErrored
//!             └─ Tripped                      ─► emit ChildErrored, BreakerTripped; stop(id)
//! ```
//!
//! ## Rules
//! - Anomalies never reach the caller: they are logged and surfaced as events.
//! - `stop` is immediate and final; restarting means a fresh `start` with a new id.
//! - No bootstrap timeout: only the breaker can force a silent child out.
//! - Listeners cannot borrow the coordinator; they stop children through a
//!   [`CoordinatorHandle`], processed after the current dispatch.
//!
//! ## Example
//! ```rust
//! use hostvisor::{Channel, ChildError, ChildHandle, ChildId, Config, Coordinator, NotificationSink, Phase};
//!
//! struct Silent;
//! impl ChildHandle for Silent {
//!     fn send(&mut self, _payload: serde_json::Value) -> Result<(), ChildError> { Ok(()) }
//!     fn listen(&mut self, _channel: Channel, _sink: NotificationSink) {}
//!     fn unlisten(&mut self, _channel: Channel) {}
//!     fn terminate(&mut self) {}
//! }
//!
//! let mut coordinator = Coordinator::new(Config::default(), |_id: &ChildId| -> Box<dyn ChildHandle> {
//!     Box::new(Silent)
//! });
//! let id = coordinator.start("https://a.example/worker.js");
//! assert_eq!(coordinator.phase(&id), Some(Phase::Loading));
//!
//! assert!(coordinator.stop(&id));
//! assert!(!coordinator.stop(&id));
//! assert!(coordinator.is_empty());
//! ```

use serde_json::Value;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::child::{
    Channel, ChildId, Notification, NotificationKind, NotificationSink, Signal, Spawner,
};
use crate::core::config::Config;
use crate::core::registry::{ChildInfo, ManagedChild, Phase, Registry};
use crate::error::{ChildError, MessageError};
use crate::events::{Event, EventKind};
use crate::policies::{BreakerPolicy, Verdict};
use crate::protocol::{Inbound, Outbound};
use crate::subscribers::{ListenerId, ListenerRef, Listeners};

/// Cloneable handle for requesting stops from outside the coordinator
/// (listeners, other tasks).
#[derive(Clone, Debug)]
pub struct CoordinatorHandle {
    tx: mpsc::UnboundedSender<Signal>,
}

impl CoordinatorHandle {
    /// Queues a stop request. Returns `false` if the coordinator is gone.
    ///
    /// Unknown ids are ignored when the request is processed.
    pub fn stop(&self, id: &ChildId) -> bool {
        self.tx.send(Signal::Stop(id.clone())).is_ok()
    }
}

/// Lifecycle coordinator for isolated child contexts.
pub struct Coordinator {
    cfg: Config,
    policy: BreakerPolicy,
    registry: Registry,
    spawner: Box<dyn Spawner>,
    listeners: Listeners,
    tx: mpsc::UnboundedSender<Signal>,
    rx: mpsc::UnboundedReceiver<Signal>,
}

impl Coordinator {
    /// Creates a coordinator with the given config and spawner.
    pub fn new(cfg: Config, spawner: impl Spawner) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            policy: cfg.breaker(),
            registry: Registry::new(&cfg.id_prefix),
            cfg,
            spawner: Box::new(spawner),
            listeners: Listeners::new(),
            tx,
            rx,
        }
    }

    /// Returns the configuration this coordinator was built with.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Returns a handle for queueing stop requests.
    pub fn handle(&self) -> CoordinatorHandle {
        CoordinatorHandle {
            tx: self.tx.clone(),
        }
    }

    // ---------------------------
    // Lifecycle
    // ---------------------------

    /// Spawns and registers a child in `Loading`; returns its id immediately.
    ///
    /// Bootstrap continues asynchronously through notifications. A bad address is not
    /// detected here; it surfaces later as an error notification.
    pub fn start(&mut self, address: impl Into<String>) -> ChildId {
        let address = address.into();
        let id = self.registry.next_id();

        let mut handle = self.spawner.spawn(&id);
        for channel in Channel::TRACKED {
            handle.listen(
                channel,
                NotificationSink::new(id.clone(), channel, self.tx.clone()),
            );
        }
        self.registry
            .insert(ManagedChild::new(id.clone(), address.clone(), handle));

        debug!(child = %id, %address, "child started");
        self.emit(
            Event::new(EventKind::ChildStarted)
                .with_child(&id)
                .with_reason(address),
        );
        id
    }

    /// Unlistens, terminates and removes a child.
    ///
    /// No-op (returns `false`) if the id is unknown or already stopped.
    pub fn stop(&mut self, id: &ChildId) -> bool {
        match self.registry.remove(id) {
            Some(info) => {
                debug!(child = %id, phase = ?info.phase, "child stopped");
                self.emit(Event::new(EventKind::ChildStopped).with_child(id));
                true
            }
            None => false,
        }
    }

    /// Stops every child in issuance order; returns how many were stopped.
    pub fn shutdown(&mut self) -> usize {
        let mut stopped = 0;
        for id in self.registry.ids() {
            if self.stop(&id) {
                stopped += 1;
            }
        }
        stopped
    }

    // ---------------------------
    // Notification processing
    // ---------------------------

    /// Processes every queued notification and stop request; returns how many were handled.
    pub fn drain(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(signal) = self.rx.try_recv() {
            self.handle_signal(signal);
            handled += 1;
        }
        handled
    }

    /// Processes notifications as they arrive until `token` is cancelled, then stops
    /// every remaining child.
    pub async fn run(&mut self, token: CancellationToken) {
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                signal = self.rx.recv() => match signal {
                    Some(signal) => self.handle_signal(signal),
                    None => break,
                },
            }
        }
        let stopped = self.shutdown();
        debug!(stopped, "coordinator loop exited");
    }

    /// Processes a single notification.
    pub fn handle_notification(&mut self, notification: Notification) {
        let Notification { origin, kind } = notification;
        match kind {
            NotificationKind::Message(raw) => self.on_message(&origin, &raw),
            NotificationKind::Error(err) => self.on_error(&origin, err),
        }
    }

    fn handle_signal(&mut self, signal: Signal) {
        match signal {
            Signal::Notify(n) => self.handle_notification(n),
            Signal::Stop(id) => {
                self.stop(&id);
            }
        }
    }

    fn on_message(&mut self, origin: &ChildId, raw: &Value) {
        let inbound = match Inbound::decode(raw) {
            Ok(inbound) => inbound,
            Err(err) => return self.reject(origin, err),
        };
        if self.registry.get(origin).is_none() {
            return self.reject(
                origin,
                MessageError::UnknownOrigin {
                    origin: origin.to_string(),
                },
            );
        }

        match inbound {
            Inbound::Loaded => self.on_loaded(origin),
            Inbound::BootstrapFailure { detail } => {
                warn!(child = %origin, error = %detail, "failed to bootstrap the child; stopping it");
                self.emit(
                    Event::new(EventKind::BootstrapFailed)
                        .with_child(origin)
                        .with_payload(detail),
                );
                self.stop(origin);
            }
            Inbound::Bootstrapped => {
                if let Some(child) = self.registry.get_mut(origin) {
                    child.phase = Phase::Running;
                    child.bootstrap_in_flight = false;
                }
                self.emit(Event::new(EventKind::ChildRunning).with_child(origin));
            }
            Inbound::Other { msg_type, payload } => {
                self.emit(
                    Event::new(EventKind::ChildMessage)
                        .with_child(origin)
                        .with_reason(msg_type)
                        .with_payload(payload),
                );
            }
        }
    }

    fn on_loaded(&mut self, origin: &ChildId) {
        let Some(child) = self.registry.get_mut(origin) else {
            return;
        };
        if child.phase != Phase::Loading {
            debug!(child = %origin, phase = ?child.phase, "loaded reported outside Loading");
        }
        child.phase = Phase::Loaded;
        let address = child.address.clone();
        let sent = child
            .handle
            .send(Outbound::bootstrap(&address).into_value());
        child.bootstrap_in_flight = sent.is_ok();

        self.emit(Event::new(EventKind::ChildLoaded).with_child(origin));
        match sent {
            Ok(()) => self.emit(
                Event::new(EventKind::BootstrapSent)
                    .with_child(origin)
                    .with_reason(address),
            ),
            Err(err) => {
                warn!(child = %origin, error = %err, "bootstrap command not delivered");
                self.on_error(origin, err);
            }
        }
    }

    fn on_error(&mut self, origin: &ChildId, err: ChildError) {
        let now = Instant::now();
        let policy = self.policy;
        let Some(child) = self.registry.get_mut(origin) else {
            debug!(child = %origin, error = %err, "error from unknown child ignored");
            return;
        };

        let verdict = child.errors.record(now, &policy);
        let count = child.errors.count();
        self.emit(
            Event::new(EventKind::ChildErrored)
                .with_child(origin)
                .with_reason(err.as_message())
                .with_error_count(count),
        );

        if let Verdict::Tripped { count, elapsed } = verdict {
            if let Some(child) = self.registry.get(origin) {
                error!(
                    child = %origin,
                    address = %child.address,
                    phase = ?child.phase,
                    error_window_count = count,
                    error_window_start = ?child.errors.started(),
                    error_window_duration_ms = elapsed.as_millis() as u64,
                    error = %err,
                    "error rate exceeded; stopping the child"
                );
            }
            self.emit(
                Event::new(EventKind::BreakerTripped)
                    .with_child(origin)
                    .with_reason(err.as_message())
                    .with_error_count(count)
                    .with_window(elapsed),
            );
            self.stop(origin);
        }
    }

    fn reject(&self, origin: &ChildId, err: MessageError) {
        warn!(child = %origin, reason = err.as_label(), "{err}");
        self.emit(
            Event::new(EventKind::MessageRejected)
                .with_child(origin)
                .with_reason(err.as_label()),
        );
    }

    fn emit(&self, event: Event) {
        self.listeners.dispatch(&event);
    }

    // ---------------------------
    // Event surface
    // ---------------------------

    /// Registers a listener for `kind`.
    pub fn add_listener(&mut self, kind: EventKind, listener: ListenerRef) -> ListenerId {
        self.listeners.add(kind, listener)
    }

    /// Removes a listener. Returns `false` if it was not registered for `kind`.
    pub fn remove_listener(&mut self, kind: EventKind, id: ListenerId) -> bool {
        self.listeners.remove(kind, id)
    }

    /// Delivers an arbitrary event to this coordinator's listeners.
    ///
    /// Returns `true` if at least one listener was invoked.
    pub fn dispatch_event(&self, event: &Event) -> bool {
        self.listeners.dispatch(event)
    }

    // ---------------------------
    // Introspection
    // ---------------------------

    /// Current phase of a child.
    pub fn phase(&self, id: &ChildId) -> Option<Phase> {
        self.registry.get(id).map(|c| c.phase)
    }

    /// Snapshot of a child.
    pub fn info(&self, id: &ChildId) -> Option<ChildInfo> {
        self.registry.get(id).map(ManagedChild::info)
    }

    /// Ids of managed children, in issuance order.
    pub fn ids(&self) -> Vec<ChildId> {
        self.registry.ids()
    }

    /// Number of managed children.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// True if no child is managed.
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::protocol::PROTOCOL_NAME;
    use crate::subscribers::ListenerFn;
    use crate::testing::Fleet;

    fn coordinator(threshold: u32, window_ms: u64) -> (Coordinator, Fleet) {
        let fleet = Fleet::default();
        let cfg = Config {
            error_window_count_threshold: threshold,
            error_window: Duration::from_millis(window_ms),
            id_prefix: "w-".into(),
        };
        (Coordinator::new(cfg, fleet.spawner()), fleet)
    }

    fn record(c: &mut Coordinator, kind: EventKind) -> Arc<Mutex<Vec<Event>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        c.add_listener(
            kind,
            ListenerFn::arc("record", move |ev: &Event| {
                sink.lock().unwrap().push(ev.clone())
            }),
        );
        seen
    }

    #[test]
    fn test_start_registers_loading_child_with_subscriptions() {
        let (mut c, fleet) = coordinator(10, 30_000);
        let started = record(&mut c, EventKind::ChildStarted);

        let id = c.start("https://a.example/w.js");

        assert_eq!(id.to_string(), "w-1");
        assert_eq!(c.phase(&id), Some(Phase::Loading));
        assert_eq!(fleet.probe(&id).listening(), 2);
        let started = started.lock().unwrap();
        assert_eq!(started.len(), 1);
        assert_eq!(started[0].reason.as_deref(), Some("https://a.example/w.js"));
    }

    #[test]
    fn test_ids_unique_and_increasing() {
        let (mut c, _fleet) = coordinator(10, 30_000);
        let ids: Vec<ChildId> = (0..20).map(|i| c.start(format!("u{i}"))).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(c.ids(), ids);
    }

    #[test]
    fn test_stop_unknown_is_noop() {
        let (mut c, _fleet) = coordinator(10, 30_000);
        let id = c.start("a");
        let stranger = ChildId::new("w-".into(), 99);

        assert!(!c.stop(&stranger));
        assert_eq!(c.len(), 1);
        assert!(c.stop(&id));
        assert!(!c.stop(&id));
        assert!(c.is_empty());
    }

    #[test]
    fn test_stop_unsubscribes_and_terminates() {
        let (mut c, fleet) = coordinator(10, 30_000);
        let stopped = record(&mut c, EventKind::ChildStopped);
        let id = c.start("a");
        let probe = fleet.probe(&id);

        c.stop(&id);

        assert!(probe.is_terminated());
        assert_eq!(probe.listening(), 0);
        assert!(!probe.message(json!({"msgType": "loaded"})));
        assert_eq!(stopped.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_handshake_drives_phases() {
        let (mut c, fleet) = coordinator(10, 30_000);
        let id = c.start("https://a.example/w.js");
        let probe = fleet.probe(&id);

        probe.message(json!({"msgType": "loaded"}));
        assert_eq!(c.drain(), 1);
        assert_eq!(c.phase(&id), Some(Phase::Loaded));
        assert!(c.info(&id).unwrap().is_bootstrapping());
        assert_eq!(
            probe.sent(),
            vec![json!({
                "protocol": PROTOCOL_NAME,
                "msgType": "bootstrap",
                "corsWorkerUri": "https://a.example/w.js",
            })]
        );

        probe.message(json!({"msgType": "bootstrapped"}));
        c.drain();
        assert_eq!(c.phase(&id), Some(Phase::Running));
        assert!(!c.info(&id).unwrap().is_bootstrapping());
        assert_eq!(probe.sent().len(), 1);
    }

    #[test]
    fn test_bootstrap_failure_stops_child() {
        for phase_msgs in [vec![], vec!["loaded"], vec!["loaded", "bootstrapped"]] {
            let (mut c, fleet) = coordinator(10, 30_000);
            let failed = record(&mut c, EventKind::BootstrapFailed);
            let id = c.start("a");
            let probe = fleet.probe(&id);
            for tag in phase_msgs {
                probe.message(json!({ "msgType": tag }));
            }
            probe.message(json!({"msgType": "bootstrap_failure", "msg": {"error": "cors"}}));
            c.drain();

            assert!(c.is_empty());
            assert!(probe.is_terminated());
            let failed = failed.lock().unwrap();
            assert_eq!(failed[0].payload.as_deref(), Some(&json!("cors")));
        }
    }

    #[test]
    fn test_unrecognized_message_is_relayed_without_protocol() {
        let (mut c, fleet) = coordinator(10, 30_000);
        let relayed = record(&mut c, EventKind::ChildMessage);
        let id = c.start("a");

        fleet.probe(&id).message(json!({
            "msgType": "navRequest",
            "msg": {"url": "/x"},
            "protocol": PROTOCOL_NAME,
        }));
        c.drain();

        let relayed = relayed.lock().unwrap();
        assert_eq!(relayed.len(), 1);
        assert_eq!(relayed[0].child.as_ref(), Some(&id));
        assert_eq!(relayed[0].reason.as_deref(), Some("navRequest"));
        assert_eq!(
            relayed[0].payload.as_deref(),
            Some(&json!({"msgType": "navRequest", "msg": {"url": "/x"}}))
        );
        assert_eq!(c.phase(&id), Some(Phase::Loading));
    }

    #[test]
    fn test_malformed_message_changes_nothing() {
        let (mut c, fleet) = coordinator(10, 30_000);
        let relayed = record(&mut c, EventKind::ChildMessage);
        let rejected = record(&mut c, EventKind::MessageRejected);
        let id = c.start("a");
        let probe = fleet.probe(&id);

        probe.message(json!({"msg": {"error": "x"}}));
        probe.message(json!(["loaded"]));
        probe.message(json!({"msgType": "loaded", "protocol": "someone-else"}));
        c.drain();

        assert_eq!(c.phase(&id), Some(Phase::Loading));
        assert!(probe.sent().is_empty());
        assert!(relayed.lock().unwrap().is_empty());
        let labels: Vec<String> = rejected
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| e.reason.as_deref().map(str::to_string))
            .collect();
        assert_eq!(
            labels,
            vec![
                "message_missing_type",
                "message_not_object",
                "message_protocol_mismatch"
            ]
        );
    }

    #[test]
    fn test_queued_message_from_stopped_child_is_rejected() {
        let (mut c, fleet) = coordinator(10, 30_000);
        let rejected = record(&mut c, EventKind::MessageRejected);
        let id = c.start("a");

        fleet.probe(&id).message(json!({"msgType": "loaded"}));
        c.stop(&id);
        c.drain();

        assert!(fleet.probe(&id).sent().is_empty());
        let rejected = rejected.lock().unwrap();
        assert_eq!(rejected[0].reason.as_deref(), Some("message_unknown_origin"));
    }

    #[test]
    fn test_failed_bootstrap_send_counts_as_error() {
        let (mut c, fleet) = coordinator(10, 30_000);
        let errored = record(&mut c, EventKind::ChildErrored);
        let id = c.start("a");
        let probe = fleet.probe(&id);
        probe.fail_sends();

        probe.message(json!({"msgType": "loaded"}));
        c.drain();

        assert_eq!(c.phase(&id), Some(Phase::Loaded));
        assert!(!c.info(&id).unwrap().bootstrap_in_flight);
        assert_eq!(c.info(&id).unwrap().error_count, 1);
        assert_eq!(errored.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_breaker_trips_inside_window() {
        let (mut c, fleet) = coordinator(2, 1000);
        let tripped = record(&mut c, EventKind::BreakerTripped);
        let id = c.start("a");
        let probe = fleet.probe(&id);

        probe.error("e1");
        c.drain();
        tokio::time::advance(Duration::from_millis(100)).await;
        probe.error("e2");
        c.drain();
        assert_eq!(c.len(), 1);
        assert_eq!(c.info(&id).unwrap().error_count, 2);

        tokio::time::advance(Duration::from_millis(100)).await;
        probe.error("e3");
        c.drain();

        assert!(c.is_empty());
        assert!(probe.is_terminated());
        let tripped = tripped.lock().unwrap();
        assert_eq!(tripped.len(), 1);
        assert_eq!(tripped[0].error_count, Some(3));
        assert_eq!(tripped[0].window_ms, Some(200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_breaker_window_expiry_resets_count() {
        let (mut c, fleet) = coordinator(2, 1000);
        let id = c.start("a");
        let probe = fleet.probe(&id);

        probe.error("e1");
        c.drain();
        tokio::time::advance(Duration::from_millis(100)).await;
        probe.error("e2");
        c.drain();
        tokio::time::advance(Duration::from_millis(1400)).await;
        probe.error("e3");
        c.drain();

        let info = c.info(&id).expect("child must survive an expired window");
        assert_eq!(info.error_count, 1);
        assert!(!probe.is_terminated());
    }

    #[test]
    fn test_exactly_threshold_errors_tolerated() {
        let (mut c, fleet) = coordinator(3, 30_000);
        let id = c.start("a");
        let probe = fleet.probe(&id);

        for i in 0..3 {
            probe.error(&format!("e{i}"));
        }
        c.drain();
        assert_eq!(c.len(), 1);

        probe.error("e3");
        c.drain();
        assert!(c.is_empty());
    }

    #[test]
    fn test_listener_can_stop_child_through_handle() {
        let (mut c, fleet) = coordinator(10, 30_000);
        let handle = c.handle();
        c.add_listener(
            EventKind::ChildMessage,
            ListenerFn::arc("kill-on-message", move |ev: &Event| {
                if let Some(id) = &ev.child {
                    handle.stop(id);
                }
            }),
        );
        let a = c.start("a");
        let b = c.start("b");

        fleet.probe(&a).message(json!({"msgType": "closeRequest"}));
        assert_eq!(c.drain(), 2);

        assert_eq!(c.ids(), vec![b]);
        assert!(fleet.probe(&a).is_terminated());
    }

    #[test]
    fn test_remove_listener_stops_delivery() {
        let (mut c, fleet) = coordinator(10, 30_000);
        let seen = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&seen);
        let lid = c.add_listener(
            EventKind::ChildMessage,
            ListenerFn::arc("count", move |_ev: &Event| *counter.lock().unwrap() += 1),
        );
        let id = c.start("a");
        let probe = fleet.probe(&id);

        probe.message(json!({"msgType": "x"}));
        c.drain();
        assert!(c.remove_listener(EventKind::ChildMessage, lid));
        probe.message(json!({"msgType": "x"}));
        c.drain();

        assert_eq!(*seen.lock().unwrap(), 1);
    }

    #[test]
    fn test_listeners_are_per_instance() {
        let (mut a, _fa) = coordinator(10, 30_000);
        let (b, _fb) = coordinator(10, 30_000);
        let seen = record(&mut a, EventKind::ChildMessage);

        assert!(!b.dispatch_event(&Event::new(EventKind::ChildMessage)));
        assert!(a.dispatch_event(&Event::new(EventKind::ChildMessage)));
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_shutdown_stops_everything() {
        let (mut c, fleet) = coordinator(10, 30_000);
        let ids: Vec<ChildId> = (0..3).map(|i| c.start(format!("u{i}"))).collect();

        assert_eq!(c.shutdown(), 3);
        assert!(c.is_empty());
        assert!(ids.iter().all(|id| fleet.probe(id).is_terminated()));
    }

    #[tokio::test]
    async fn test_run_processes_until_cancelled() {
        let (mut c, fleet) = coordinator(10, 30_000);
        let (tx, mut rx) = mpsc::unbounded_channel::<Value>();
        c.add_listener(
            EventKind::ChildMessage,
            ListenerFn::arc("relay", move |ev: &Event| {
                if let Some(p) = &ev.payload {
                    let _ = tx.send(Value::clone(p));
                }
            }),
        );
        let id = c.start("a");
        let probe = fleet.probe(&id);

        let token = CancellationToken::new();
        let loop_token = token.clone();
        let join = tokio::spawn(async move {
            c.run(loop_token).await;
            c
        });

        probe.message(json!({"msgType": "loaded"}));
        probe.message(json!({"msgType": "ping"}));
        let relayed = rx.recv().await.unwrap();
        assert_eq!(relayed, json!({"msgType": "ping"}));

        token.cancel();
        let c = join.await.unwrap();
        assert!(c.is_empty());
        assert!(probe.is_terminated());
        assert_eq!(probe.sent().len(), 1);
    }
}
