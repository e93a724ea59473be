//! Wire envelopes exchanged with child contexts.
//!
//! ## Contents
//! - [`Inbound`] decoded child → host message (tagged union)
//! - [`Outbound`] host → child command envelope
//! - [`tags`] the recognized `msgType` values
//! - [`PROTOCOL_NAME`] the fixed protocol tag stamped on outbound commands

mod inbound;
mod outbound;

pub use inbound::Inbound;
pub use outbound::Outbound;

/// Protocol tag stamped on every outbound command.
pub const PROTOCOL_NAME: &str = "hostvisor.worker";

/// Recognized `msgType` values.
pub mod tags {
    /// Child → host: script loaded, ready for bootstrap.
    pub const LOADED: &str = "loaded";
    /// Host → child: bootstrap command.
    pub const BOOTSTRAP: &str = "bootstrap";
    /// Child → host: bootstrap failed.
    pub const BOOTSTRAP_FAILURE: &str = "bootstrap_failure";
    /// Child → host: bootstrap complete.
    pub const BOOTSTRAPPED: &str = "bootstrapped";
    /// Child → host: topic publication.
    pub const PUBLISH: &str = "publish";
}
