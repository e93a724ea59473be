//! # Function-backed listener (`ListenerFn`)
//!
//! [`ListenerFn`] wraps a closure `F: Fn(&Event)` so it can be registered wherever a
//! [`Subscribe`] is expected.
//!
//! ## Example
//! ```rust
//! use hostvisor::{Event, ListenerFn, ListenerRef, Subscribe};
//!
//! let l: ListenerRef = ListenerFn::arc("relay", |ev: &Event| {
//!     println!("child message: {:?}", ev.payload);
//! });
//! assert_eq!(l.name(), "relay");
//! ```

use std::sync::Arc;

use crate::events::Event;
use crate::subscribers::Subscribe;

/// Shared listener handle.
pub type ListenerRef = Arc<dyn Subscribe>;

/// Function-backed listener implementation.
#[derive(Debug)]
pub struct ListenerFn<F> {
    name: &'static str,
    f: F,
}

impl<F> ListenerFn<F>
where
    F: Fn(&Event) + Send + Sync + 'static,
{
    /// Creates a new function-backed listener.
    ///
    /// Prefer [`ListenerFn::arc`] when you immediately need a [`ListenerRef`].
    pub fn new(name: &'static str, f: F) -> Self {
        Self { name, f }
    }

    /// Creates the listener and returns it as a shared handle.
    pub fn arc(name: &'static str, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<F> Subscribe for ListenerFn<F>
where
    F: Fn(&Event) + Send + Sync + 'static,
{
    fn on_event(&self, event: &Event) {
        (self.f)(event)
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
