//! # LogWriter: event tracer
//!
//! A minimal subscriber that writes incoming [`Event`]s through `tracing`.
//! Register it for the kinds you want to see (or all of [`LogWriter::KINDS`]).
//!
//! ## Example output
//! ```text
//! INFO  [started] child=hostvisorChild-1 address="https://a.example/w.js"
//! INFO  [bootstrap-sent] child=hostvisorChild-1
//! INFO  [running] child=hostvisorChild-1
//! WARN  [errored] child=hostvisorChild-1 count=3 err="boom"
//! ERROR [breaker-tripped] child=hostvisorChild-1 count=11 window_ms=420
//! INFO  [stopped] child=hostvisorChild-1
//! ```

use tracing::{debug, error, info, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Every event kind, for registering one writer on all of them.
    pub const KINDS: [EventKind; 10] = [
        EventKind::ChildStarted,
        EventKind::ChildLoaded,
        EventKind::BootstrapSent,
        EventKind::ChildRunning,
        EventKind::ChildStopped,
        EventKind::BootstrapFailed,
        EventKind::ChildErrored,
        EventKind::BreakerTripped,
        EventKind::MessageRejected,
        EventKind::ChildMessage,
    ];

    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Subscribe for LogWriter {
    fn on_event(&self, e: &Event) {
        let child = e.child.as_ref().map(ToString::to_string).unwrap_or_default();
        let reason = e.reason.as_deref().unwrap_or("");
        match e.kind {
            EventKind::ChildStarted => info!(%child, address = reason, "[started]"),
            EventKind::ChildLoaded => info!(%child, "[loaded]"),
            EventKind::BootstrapSent => info!(%child, address = reason, "[bootstrap-sent]"),
            EventKind::ChildRunning => info!(%child, "[running]"),
            EventKind::ChildStopped => info!(%child, "[stopped]"),
            EventKind::BootstrapFailed => {
                warn!(%child, detail = ?e.payload, "[bootstrap-failed]")
            }
            EventKind::ChildErrored => {
                warn!(%child, count = ?e.error_count, err = reason, "[errored]")
            }
            EventKind::BreakerTripped => error!(
                %child,
                count = ?e.error_count,
                window_ms = ?e.window_ms,
                err = reason,
                "[breaker-tripped]"
            ),
            EventKind::MessageRejected => warn!(%child, reason, "[message-rejected]"),
            EventKind::ChildMessage => debug!(%child, msg_type = reason, "[child-message]"),
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
