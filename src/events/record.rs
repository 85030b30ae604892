//! # Trace records emitted once per raise.
//!
//! A [`TraceRecord`] is an immutable snapshot of a single raise on a channel that has
//! debug tracing enabled. It carries the raise timestamp, the channel kind and origin,
//! a textual rendering of the payload, the call site, and a copy of the channel's
//! listener set at the moment of the raise.
//!
//! ## Ordering guarantees
//! Each record has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when records are consumed out of order.
//!
//! ## Example
//! ```rust
//! use eventscope::{ChannelKind, TraceRecord};
//!
//! let rec = TraceRecord::new(ChannelKind::named("Score"))
//!     .with_origin("assets/events/Score.asset")
//!     .with_value("42");
//!
//! assert_eq!(rec.name(), "Score");
//! assert_eq!(rec.value(), Some("42"));
//! assert_eq!(rec.listener_count(), 0);
//! ```

use std::backtrace::Backtrace;
use std::panic::Location;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::channels::ListenerRef;
use crate::events::ChannelKind;

/// Global sequence counter for record ordering.
static TRACE_SEQ: AtomicU64 = AtomicU64::new(0);

/// Immutable record of one raise occurrence.
///
/// Cheap to clone: every heavy field is behind an `Arc`.
#[derive(Clone, Debug)]
pub struct TraceRecord {
    seq: u64,
    at: SystemTime,
    kind: ChannelKind,
    origin: Option<Arc<str>>,
    value: Option<Arc<str>>,
    caller: &'static Location<'static>,
    backtrace: Option<Arc<Backtrace>>,
    listeners: Arc<[ListenerRef]>,
}

impl TraceRecord {
    /// Creates a record for `kind` stamped with the current time, the next sequence
    /// number and the caller's location.
    #[track_caller]
    pub fn new(kind: ChannelKind) -> Self {
        Self {
            seq: TRACE_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            origin: None,
            value: None,
            caller: Location::caller(),
            backtrace: None,
            listeners: Arc::from(Vec::new()),
        }
    }

    /// Attaches the origin identifier (asset path or similar).
    #[inline]
    pub fn with_origin(mut self, origin: impl Into<Arc<str>>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Attaches the textual payload.
    #[inline]
    pub fn with_value(mut self, value: impl Into<Arc<str>>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Overrides the call site.
    #[inline]
    pub fn with_caller(mut self, caller: &'static Location<'static>) -> Self {
        self.caller = caller;
        self
    }

    /// Attaches a captured backtrace.
    #[inline]
    pub fn with_backtrace(mut self, backtrace: Backtrace) -> Self {
        self.backtrace = Some(Arc::new(backtrace));
        self
    }

    /// Attaches the listener snapshot.
    #[inline]
    pub fn with_listeners(mut self, listeners: Vec<ListenerRef>) -> Self {
        self.listeners = Arc::from(listeners);
        self
    }

    /// Globally unique, monotonically increasing sequence number.
    #[inline]
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Wall-clock time of the raise.
    #[inline]
    pub fn at(&self) -> SystemTime {
        self.at
    }

    /// Kind of the raising channel.
    #[inline]
    pub fn kind(&self) -> &ChannelKind {
        &self.kind
    }

    /// Origin identifier; `None` for runtime-only channels.
    #[inline]
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    /// Textual payload; `None` for untyped raises.
    #[inline]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Source location of the `raise` call.
    #[inline]
    pub fn caller(&self) -> &'static Location<'static> {
        self.caller
    }

    /// Full backtrace, when capture is enabled.
    #[inline]
    pub fn backtrace(&self) -> Option<&Backtrace> {
        self.backtrace.as_deref()
    }

    /// Listeners registered on the channel when it was raised.
    #[inline]
    pub fn listeners(&self) -> &[ListenerRef] {
        &self.listeners
    }

    #[inline]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    #[inline]
    pub fn is_runtime_instance(&self) -> bool {
        self.origin.as_deref().is_none_or(str::is_empty)
    }

    /// Display name: the origin's file stem, or the kind's short name for runtime instances.
    pub fn name(&self) -> &str {
        match self.origin.as_deref() {
            Some(origin) if !origin.is_empty() => Path::new(origin)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or(origin),
            _ => self.kind.short_name(),
        }
    }
}
