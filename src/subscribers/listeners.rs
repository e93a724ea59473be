//! # Per-coordinator listener registry.
//!
//! Provides [`Listeners`], an ordered list of listeners per [`EventKind`], owned by a
//! single coordinator (no process-wide sharing).
//!
//! ## Architecture
//! ```text
//! dispatch(event)
//!     │
//!     ├─► snapshot listeners[event.kind]   (Vec<Arc<dyn Subscribe>>)
//!     │
//!     ├──► listener 1.on_event()  ── panic → caught, logged
//!     ├──► listener 2.on_event()
//!     └──► listener N.on_event()
//! ```
//!
//! ## Rules
//! - **Registration order**: listeners of one kind run in the order they were added.
//! - **Snapshot**: the list is cloned before invoking, so registry changes never
//!   invalidate an in-flight dispatch.
//! - **Isolation**: a panicking listener doesn't stop the remaining ones.
//!
//! **Warning**: `AssertUnwindSafe` is used, which can leave shared state inconsistent
//! if a listener uses `Arc<Mutex<T>>` and panics while holding the lock.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};

use tracing::warn;

use crate::events::{Event, EventKind};
use crate::subscribers::ListenerRef;

/// Token returned by [`Listeners::add`], used to remove the listener again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Ordered listener lists keyed by event kind.
#[derive(Default)]
pub struct Listeners {
    next: u64,
    by_kind: HashMap<EventKind, Vec<(ListenerId, ListenerRef)>>,
}

impl Listeners {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a listener for `kind`.
    pub fn add(&mut self, kind: EventKind, listener: ListenerRef) -> ListenerId {
        self.next += 1;
        let id = ListenerId(self.next);
        self.by_kind.entry(kind).or_default().push((id, listener));
        id
    }

    /// Removes a listener. Returns `false` if it was not registered for `kind`.
    pub fn remove(&mut self, kind: EventKind, id: ListenerId) -> bool {
        let Some(list) = self.by_kind.get_mut(&kind) else {
            return false;
        };
        let before = list.len();
        list.retain(|(lid, _)| *lid != id);
        let removed = list.len() != before;
        if list.is_empty() {
            self.by_kind.remove(&kind);
        }
        removed
    }

    /// Number of listeners registered for `kind`.
    pub fn count(&self, kind: EventKind) -> usize {
        self.by_kind.get(&kind).map_or(0, Vec::len)
    }

    /// Delivers `event` to every listener of its kind.
    ///
    /// Returns `true` if at least one listener was invoked.
    pub fn dispatch(&self, event: &Event) -> bool {
        let snapshot: Vec<ListenerRef> = match self.by_kind.get(&event.kind) {
            Some(list) => list.iter().map(|(_, l)| ListenerRef::clone(l)).collect(),
            None => return false,
        };

        for listener in &snapshot {
            let res = panic::catch_unwind(AssertUnwindSafe(|| listener.on_event(event)));
            if let Err(panic_err) = res {
                let info = if let Some(msg) = panic_err.downcast_ref::<&'static str>() {
                    (*msg).to_string()
                } else if let Some(msg) = panic_err.downcast_ref::<String>() {
                    msg.clone()
                } else {
                    "unknown panic".to_string()
                };
                warn!(
                    listener = listener.name(),
                    kind = ?event.kind,
                    info = %info,
                    "listener panicked"
                );
            }
        }
        !snapshot.is_empty()
    }
}
