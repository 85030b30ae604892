//! # Built-in subscribers
//!
//! - [`LogWriter`]: logs each record through `tracing`.
//! - [`TraceHistory`]: keeps the most recent records for tooling and tests.

mod history;
mod log;

pub use history::TraceHistory;
pub use log::LogWriter;
