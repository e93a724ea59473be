//! # Child registry - owner of managed children.
//!
//! The registry holds every live [`ManagedChild`] in issuance order and issues ids.
//!
//! ## Rules
//! - Ids are `<prefix><counter>`; the counter only grows, ids are never reused.
//! - Every entry has `Message` and `Error` sinks attached (done by the coordinator
//!   before [`Registry::insert`]).
//! - [`Registry::remove`] detaches every tracked channel, terminates the handle and drops
//!   the entry in one step: no orphaned subscriptions, no terminated-but-tracked entries.
//! - Lookups are index-based after a linear search, so a removal issued while handling
//!   one child's notification never invalidates an iteration.

use std::fmt;
use std::sync::Arc;

use tokio::time::Instant;

use crate::child::{Channel, ChildHandle, ChildId};
use crate::policies::ErrorWindow;

/// Bootstrap progress of a managed child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Handle created; waiting for the child to report `loaded`.
    Loading,
    /// Child loaded; the bootstrap command is (or is about to be) in flight.
    Loaded,
    /// Child reported `bootstrapped`.
    Running,
}

/// A child owned by the registry.
pub(crate) struct ManagedChild {
    pub id: ChildId,
    pub address: String,
    pub phase: Phase,
    /// `bootstrap` sent, `bootstrapped` not yet received.
    pub bootstrap_in_flight: bool,
    pub handle: Box<dyn ChildHandle>,
    pub errors: ErrorWindow,
}

impl ManagedChild {
    pub fn new(id: ChildId, address: String, handle: Box<dyn ChildHandle>) -> Self {
        Self {
            id,
            address,
            phase: Phase::Loading,
            bootstrap_in_flight: false,
            handle,
            errors: ErrorWindow::default(),
        }
    }

    pub fn info(&self) -> ChildInfo {
        ChildInfo {
            id: self.id.clone(),
            address: self.address.clone(),
            phase: self.phase,
            bootstrap_in_flight: self.bootstrap_in_flight,
            error_count: self.errors.count(),
            error_window_started: self.errors.started(),
        }
    }
}

impl fmt::Debug for ManagedChild {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagedChild")
            .field("id", &self.id)
            .field("address", &self.address)
            .field("phase", &self.phase)
            .field("bootstrap_in_flight", &self.bootstrap_in_flight)
            .field("errors", &self.errors)
            .finish_non_exhaustive()
    }
}

/// Point-in-time snapshot of a managed child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildInfo {
    /// Child id.
    pub id: ChildId,
    /// Address given to `start`.
    pub address: String,
    /// Current phase.
    pub phase: Phase,
    /// `bootstrap` sent and not yet acknowledged.
    pub bootstrap_in_flight: bool,
    /// Errors in the current window.
    pub error_count: u32,
    /// Start of the current error window, `None` until the first error.
    pub error_window_started: Option<Instant>,
}

impl ChildInfo {
    /// True between sending `bootstrap` and receiving `bootstrapped`.
    #[inline]
    pub fn is_bootstrapping(&self) -> bool {
        self.phase == Phase::Loaded && self.bootstrap_in_flight
    }
}

/// Ordered set of managed children.
pub(crate) struct Registry {
    prefix: Arc<str>,
    next_seq: u64,
    children: Vec<ManagedChild>,
}

impl Registry {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.into(),
            next_seq: 0,
            children: Vec::new(),
        }
    }

    /// Issues the next id.
    pub fn next_id(&mut self) -> ChildId {
        self.next_seq += 1;
        ChildId::new(Arc::clone(&self.prefix), self.next_seq)
    }

    pub fn insert(&mut self, child: ManagedChild) {
        self.children.push(child);
    }

    pub fn get(&self, id: &ChildId) -> Option<&ManagedChild> {
        self.children.iter().find(|c| &c.id == id)
    }

    pub fn get_mut(&mut self, id: &ChildId) -> Option<&mut ManagedChild> {
        self.children.iter_mut().find(|c| &c.id == id)
    }

    /// Detaches, terminates and drops a child. `None` if the id is unknown.
    pub fn remove(&mut self, id: &ChildId) -> Option<ChildInfo> {
        let index = self.children.iter().position(|c| &c.id == id)?;
        let mut child = self.children.remove(index);
        for channel in Channel::TRACKED {
            child.handle.unlisten(channel);
        }
        child.handle.terminate();
        Some(child.info())
    }

    /// Ids in issuance order.
    pub fn ids(&self) -> Vec<ChildId> {
        self.children.iter().map(|c| c.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}
