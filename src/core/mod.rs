//! Runtime core: child lifecycle and circuit breaking.
//!
//! This module contains the lifecycle half of hostvisor. The public API from this
//! module is [`Coordinator`] (plus its [`Config`], [`CoordinatorHandle`] and the
//! [`Phase`]/[`ChildInfo`] snapshots).
//!
//! Internal modules:
//! - [`coordinator`]: start/stop, bootstrap handshake, breaker, event emission;
//! - [`registry`]: owns managed children and issues ids;
//! - [`config`]: thresholds and id prefix.

mod config;
mod coordinator;
mod registry;

pub use config::Config;
pub use coordinator::{Coordinator, CoordinatorHandle};
pub use registry::{ChildInfo, Phase};
