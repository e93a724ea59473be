//! # Built-in subscribers
//!
//! - [`LogWriter`]: writes events through `tracing` (demo/debug).

mod log;

pub use log::LogWriter;
