//! # Trace subscribers.
//!
//! Tooling plugs into the trace stream through the [`Subscribe`] trait. The
//! [`Hub`](crate::Hub) forwards every [`TraceRecord`](crate::TraceRecord) from its
//! [`TraceBus`](crate::TraceBus) into a [`SubscriberSet`], which gives each subscriber
//! its own bounded queue and worker.
//!
//! ## Architecture
//! ```text
//! raise() ── pre_raise ──► TraceBus ──► hub forwarder ──► SubscriberSet
//!                                                             │
//!                                          ┌──────────────────┼─────────────┐
//!                                          ▼                  ▼             ▼
//!                                      LogWriter        TraceHistory     Custom
//! ```
//!
//! ## Implementing custom subscribers
//! ```no_run
//! use eventscope::{Subscribe, TraceRecord};
//! use async_trait::async_trait;
//!
//! struct SlowRaises;
//!
//! #[async_trait]
//! impl Subscribe for SlowRaises {
//!     async fn on_record(&self, rec: &TraceRecord) {
//!         if rec.listener_count() > 10 {
//!             // flag a crowded channel
//!         }
//!     }
//! }
//! ```

mod embedded;
mod set;
mod subscribe;

pub use embedded::{LogWriter, TraceHistory};
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
