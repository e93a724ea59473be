//! # Child contexts: ids, transports and notifications.
//!
//! - [`ChildId`] unique, monotonically issued identifier
//! - [`ChildHandle`] / [`Spawner`] the external transport seam
//! - [`NotificationSink`] / [`Notification`] the way children report back

mod handle;
mod id;
mod notification;

pub use handle::{ChildHandle, Spawner};
pub use id::ChildId;
pub(crate) use notification::Signal;
pub use notification::{Channel, Notification, NotificationKind, NotificationSink};
