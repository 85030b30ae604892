//! Raise records: identity, payload snapshot and broadcast bus.
//!
//! This module groups the trace **data model** and the **bus** that carries
//! records from the debug watcher to tooling consumers.
//!
//! ## Contents
//! - [`ChannelKind`] channel kind identity (registry key)
//! - [`TraceRecord`] immutable snapshot of one raise
//! - [`TraceBus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publisher**: [`DebugWatcher::pre_raise`](crate::DebugWatcher::pre_raise), once per
//!   logical raise on a channel with debug enabled.
//! - **Consumers**: `Hub` forwarder (fans out to `SubscriberSet`) and any receiver obtained
//!   from [`Hub::subscribe`](crate::Hub::subscribe).

mod bus;
mod kind;
mod record;

pub use bus::TraceBus;
pub use kind::ChannelKind;
pub use record::TraceRecord;
