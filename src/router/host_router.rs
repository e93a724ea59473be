//! # Router: one routed frame, topic-filtered message exchange.
//!
//! The [`Router`] owns a single [`Frame`], a static [`RouteTable`], the host's topic
//! interest set and an ordered list of host handlers.
//!
//! ```text
//! change_route(name) ──► RouteTable::address_for(name) ──► frame.navigate(address)
//!
//! frame ──post──► queue ──► inbound schema ──► topic filter ──► handlers (in order)
//!                             └─ invalid: debug log, drop
//!
//! publish_generic_message(payload) ──► outbound schema ──► frame.send(payload)
//! ```
//!
//! ## Rules
//! - `publish` messages reach the handlers only when `msg.topic` is in the interest set.
//! - Every other message type passes unconditionally.
//! - The interest set survives route changes.
//! - Nothing is raised to the caller; failures are logged.

use std::collections::HashSet;

use serde_json::Value;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::frame::{Frame, FrameSink};
use super::routes::{BLANK, RouteTable};
use super::schema::{ClientToHost, HostToClient, LabeledMessage, Validate};

/// Host-side handler for messages coming from the routed child.
pub type HostHandler = Box<dyn Fn(&LabeledMessage) + Send>;

/// Frame router with topic-filtered pub/sub.
///
/// # Example
/// ```rust
/// use hostvisor::{ChildError, Frame, FrameSink, RouteTable, Router, BLANK};
/// use serde_json::{json, Value};
///
/// struct Headless;
/// impl Frame for Headless {
///     fn navigate(&mut self, _address: &str) {}
///     fn send(&mut self, _payload: Value) -> Result<(), ChildError> { Ok(()) }
///     fn listen(&mut self, _sink: FrameSink) {}
/// }
///
/// let routes = RouteTable::new().with_route("app1", "https://app1.example/", "app1");
/// let mut router = Router::new(Box::new(Headless), routes);
/// assert_eq!(router.active_address(), BLANK);
///
/// assert_eq!(router.change_route("app1"), "https://app1.example/");
/// assert!(router.publish_generic_message(&json!({"msgType": "publish", "msg": {"topic": "t"}})));
/// assert!(!router.publish_generic_message(&json!({"msg": {}})));
/// ```
pub struct Router {
    routes: RouteTable,
    frame: Box<dyn Frame>,
    address: String,
    topics: HashSet<String>,
    handlers: Vec<HostHandler>,
    inbound: Box<dyn Validate<LabeledMessage>>,
    outbound: Box<dyn Validate<LabeledMessage>>,
    rx: mpsc::UnboundedReceiver<Value>,
}

impl Router {
    /// Creates a router with the built-in [`ClientToHost`]/[`HostToClient`] schemas.
    pub fn new(frame: Box<dyn Frame>, routes: RouteTable) -> Self {
        Self::with_schemas(frame, routes, ClientToHost, HostToClient)
    }

    /// Creates a router with custom schemas.
    ///
    /// The frame is pointed at [`BLANK`] and its inbound sink is attached.
    pub fn with_schemas(
        mut frame: Box<dyn Frame>,
        routes: RouteTable,
        inbound: impl Validate<LabeledMessage>,
        outbound: impl Validate<LabeledMessage>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        frame.navigate(BLANK);
        frame.listen(FrameSink::new(tx));

        Self {
            routes,
            frame,
            address: BLANK.to_string(),
            topics: HashSet::new(),
            handlers: Vec::new(),
            inbound: Box::new(inbound),
            outbound: Box::new(outbound),
            rx,
        }
    }

    // ---------------------------
    // Topic interest
    // ---------------------------

    /// Adds `topic` to the interest set. Returns `false` if it was already there.
    pub fn subscribe_to_messages(&mut self, topic: impl Into<String>) -> bool {
        self.topics.insert(topic.into())
    }

    /// Removes `topic` from the interest set. Returns `false` if it was absent.
    pub fn unsubscribe_to_messages(&mut self, topic: &str) -> bool {
        self.topics.remove(topic)
    }

    #[inline]
    pub fn is_subscribed(&self, topic: &str) -> bool {
        self.topics.contains(topic)
    }

    /// Registers a host handler; handlers run in registration order.
    pub fn on_send_to_host<F>(&mut self, handler: F)
    where
        F: Fn(&LabeledMessage) + Send + 'static,
    {
        self.handlers.push(Box::new(handler));
    }

    // ---------------------------
    // Outbound
    // ---------------------------

    /// Forwards `payload` verbatim to the routed child if it passes the outbound schema.
    ///
    /// Returns `false` when the payload is invalid or the frame refused it.
    pub fn publish_generic_message(&mut self, payload: &Value) -> bool {
        let Some(msg) = self.outbound.validate(payload) else {
            debug!(address = %self.address, "outbound message rejected by schema");
            return false;
        };
        match self.frame.send(payload.clone()) {
            Ok(()) => true,
            Err(err) => {
                warn!(address = %self.address, msg_type = %msg.msg_type, error = %err, "publish to frame failed");
                false
            }
        }
    }

    // ---------------------------
    // Routing
    // ---------------------------

    /// Redirects the frame to the first entry assigned to `route` (or [`BLANK`]).
    /// Returns the chosen address.
    pub fn change_route(&mut self, route: &str) -> &str {
        let address = self.routes.address_for(route).to_string();
        if address == BLANK {
            debug!(route, "no client assigned to route");
        }
        self.frame.navigate(&address);
        self.address = address;
        &self.address
    }

    /// Address the frame currently shows.
    #[inline]
    pub fn active_address(&self) -> &str {
        &self.address
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    // ---------------------------
    // Inbound
    // ---------------------------

    /// Processes every queued inbound payload; returns how many were handled.
    pub fn drain(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(payload) = self.rx.try_recv() {
            self.handle_inbound(&payload);
            handled += 1;
        }
        handled
    }

    /// Processes inbound payloads as they arrive until `token` is cancelled.
    pub async fn run(&mut self, token: CancellationToken) {
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                payload = self.rx.recv() => match payload {
                    Some(payload) => {
                        self.handle_inbound(&payload);
                    }
                    None => break,
                },
            }
        }
        debug!(address = %self.address, "router loop exited");
    }

    /// Validates and filters one payload. Returns `true` if handlers were invoked.
    pub fn handle_inbound(&self, payload: &Value) -> bool {
        let Some(msg) = self.inbound.validate(payload) else {
            debug!(address = %self.address, "inbound message rejected by schema");
            return false;
        };
        if !self.wants(&msg) {
            return false;
        }
        for handler in &self.handlers {
            handler(&msg);
        }
        true
    }

    fn wants(&self, msg: &LabeledMessage) -> bool {
        if !msg.is_publish() {
            return true;
        }
        msg.topic().is_some_and(|t| self.topics.contains(t))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::json;

    use super::*;
    use crate::testing::FrameProbe;

    fn table() -> RouteTable {
        RouteTable::new()
            .with_route("app1", "https://app1.example/#/", "app1")
            .with_route("app2", "https://app2.example/", "app2")
            .with_route("app2-old", "https://legacy.example/", "app2")
    }

    fn recording(router: &mut Router, tag: &'static str) -> Arc<Mutex<Vec<String>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        router.on_send_to_host(move |m: &LabeledMessage| {
            sink.lock().unwrap().push(format!("{tag}:{}", m.msg_type));
        });
        seen
    }

    #[test]
    fn test_starts_blank_with_sink_attached() {
        let probe = FrameProbe::default();
        let router = Router::new(probe.frame(), table());
        assert_eq!(router.active_address(), BLANK);
        assert_eq!(probe.address().as_deref(), Some(BLANK));
        assert!(probe.post(json!({"msgType": "hello"})));
    }

    #[test]
    fn test_publish_filtered_by_topic() {
        let probe = FrameProbe::default();
        let mut router = Router::new(probe.frame(), table());
        let seen = recording(&mut router, "h");
        router.subscribe_to_messages("a");

        probe.post(json!({"msgType": "publish", "msg": {"topic": "a", "payload": 1}}));
        probe.post(json!({"msgType": "publish", "msg": {"topic": "b", "payload": 2}}));
        assert_eq!(router.drain(), 2);

        assert_eq!(*seen.lock().unwrap(), vec!["h:publish"]);
    }

    #[test]
    fn test_non_publish_always_passes() {
        let probe = FrameProbe::default();
        let mut router = Router::new(probe.frame(), table());
        let seen = recording(&mut router, "h");

        assert!(router.handle_inbound(&json!({"msgType": "navigate", "msg": {"to": "x"}})));
        assert_eq!(*seen.lock().unwrap(), vec!["h:navigate"]);
    }

    #[test]
    fn test_handlers_run_in_registration_order() {
        let probe = FrameProbe::default();
        let mut router = Router::new(probe.frame(), table());
        let order = Arc::new(Mutex::new(Vec::new()));
        for tag in ["first", "second", "third"] {
            let order = order.clone();
            router.on_send_to_host(move |_m: &LabeledMessage| order.lock().unwrap().push(tag));
        }

        router.handle_inbound(&json!({"msgType": "ping"}));
        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let probe = FrameProbe::default();
        let mut router = Router::new(probe.frame(), table());
        let seen = recording(&mut router, "h");
        let publish = json!({"msgType": "publish", "msg": {"topic": "a"}});

        assert!(router.subscribe_to_messages("a"));
        assert!(!router.subscribe_to_messages("a"));
        assert!(router.handle_inbound(&publish));

        assert!(router.unsubscribe_to_messages("a"));
        assert!(!router.unsubscribe_to_messages("a"));
        assert!(!router.handle_inbound(&publish));

        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_change_route_resolves_first_match_or_blank() {
        let probe = FrameProbe::default();
        let mut router = Router::new(probe.frame(), table());

        assert_eq!(router.change_route("app2"), "https://app2.example/");
        assert_eq!(probe.address().as_deref(), Some("https://app2.example/"));

        assert_eq!(router.change_route("missing"), BLANK);
        assert_eq!(router.active_address(), BLANK);
        assert_eq!(probe.address().as_deref(), Some(BLANK));
    }

    #[test]
    fn test_interest_set_survives_route_change() {
        let probe = FrameProbe::default();
        let mut router = Router::new(probe.frame(), table());
        let seen = recording(&mut router, "h");
        router.subscribe_to_messages("a");

        router.change_route("app1");
        router.change_route("app2");
        assert!(router.is_subscribed("a"));
        assert!(router.handle_inbound(&json!({"msgType": "publish", "msg": {"topic": "a"}})));
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_publish_forwards_valid_payload_verbatim() {
        let probe = FrameProbe::default();
        let mut router = Router::new(probe.frame(), table());
        let payload = json!({"msgType": "publish", "msg": {"topic": "t", "payload": [1, 2]}, "extra": true});

        assert!(router.publish_generic_message(&payload));
        assert!(!router.publish_generic_message(&json!({"msgType": "publish", "msg": {}})));
        assert!(!router.publish_generic_message(&json!(42)));

        assert_eq!(probe.sent(), vec![payload]);
    }

    #[test]
    fn test_publish_reports_frame_failure() {
        let probe = FrameProbe::default();
        let mut router = Router::new(probe.frame(), table());
        probe.fail_sends();

        assert!(!router.publish_generic_message(&json!({"msgType": "ping"})));
        assert!(probe.sent().is_empty());
    }

    #[test]
    fn test_malformed_inbound_never_reaches_handlers() {
        let probe = FrameProbe::default();
        let mut router = Router::new(probe.frame(), table());
        let seen = recording(&mut router, "h");
        router.subscribe_to_messages("a");

        probe.post(json!("not an object"));
        probe.post(json!({"msg": {"topic": "a"}}));
        probe.post(json!({"msgType": "publish"}));
        probe.post(json!({"msgType": 7}));
        assert_eq!(router.drain(), 4);

        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_custom_schema() {
        let probe = FrameProbe::default();
        let pings_only = |raw: &Value| -> Option<LabeledMessage> {
            let msg: LabeledMessage = serde_json::from_value(raw.clone()).ok()?;
            (msg.msg_type == "ping").then_some(msg)
        };
        let mut router = Router::with_schemas(probe.frame(), table(), pings_only, HostToClient);
        let seen = recording(&mut router, "h");

        assert!(router.handle_inbound(&json!({"msgType": "ping"})));
        assert!(!router.handle_inbound(&json!({"msgType": "pong"})));
        assert_eq!(*seen.lock().unwrap(), vec!["h:ping"]);
    }

    #[tokio::test]
    async fn test_run_delivers_until_cancelled() {
        let probe = FrameProbe::default();
        let mut router = Router::new(probe.frame(), table());
        let seen = recording(&mut router, "h");
        let token = CancellationToken::new();

        let task = tokio::spawn({
            let token = token.clone();
            async move {
                router.run(token).await;
                router
            }
        });

        probe.post(json!({"msgType": "one"}));
        probe.post(json!({"msgType": "two"}));
        for _ in 0..100 {
            if seen.lock().unwrap().len() == 2 {
                break;
            }
            tokio::task::yield_now().await;
        }
        token.cancel();
        let router = task.await.unwrap();

        assert_eq!(*seen.lock().unwrap(), vec!["h:one", "h:two"]);
        assert_eq!(router.active_address(), BLANK);
    }
}
