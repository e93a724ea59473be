//! Message routing: one routed frame, a static route table and topic-filtered pub/sub.
//!
//! - [`Router`] owns the frame, the interest set and the host handlers;
//! - [`RouteTable`] maps route names to [`ClientRegistration`]s;
//! - [`Validate`] is the schema seam ([`ClientToHost`], [`HostToClient`] by default);
//! - [`Frame`] is what the host implements to actually render a child.

mod frame;
mod host_router;
mod routes;
mod schema;

pub use frame::{Frame, FrameSink};
pub use host_router::{HostHandler, Router};
pub use routes::{BLANK, ClientRegistration, RouteEntry, RouteTable};
pub use schema::{ClientToHost, HostToClient, LabeledMessage, Validate};
