//! # Debug watcher: raise tracing, breakpoints and listener bookkeeping.
//!
//! Every channel holds an `Arc<DebugWatcher>` and calls it from exactly one place per
//! logical raise:
//!
//! ```text
//! raise(value?)
//!   ├─► pre_raise(channel, value?)   debug_enabled? → TraceRecord → TraceBus
//!   │                                Before/BeforeOnce? → BreakHook (Once resets first)
//!   ├─► handlers (base, then typed)
//!   ├─► replay buffer push (typed only)
//!   └─► post_raise(channel)          After/AfterOnce? → BreakHook (Once resets first)
//! ```
//!
//! A typed channel never calls the untyped raise path, so a typed raise produces one
//! record, not two.

use std::backtrace::Backtrace;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

use crate::channels::{Breakpoint, ListenerRef};
use crate::events::{ChannelKind, TraceBus, TraceRecord};

use super::hook::{BreakContext, BreakHook, LogBreak, Phase};
use super::registry::ListenerRegistry;

/// What the watcher needs to know about a channel.
///
/// Implemented by [`EventChannelBase`](crate::EventChannelBase) and
/// [`EventChannel`](crate::EventChannel).
pub trait Traced {
    fn kind(&self) -> &ChannelKind;
    fn origin(&self) -> Option<Arc<str>>;
    fn debug_enabled(&self) -> bool;
    fn breakpoint(&self) -> &Breakpoint;
    /// Copy of the channel's listener set.
    fn listener_snapshot(&self) -> Vec<ListenerRef>;
}

/// Cross-cutting instrumentation shared by all channels of a hub.
pub struct DebugWatcher {
    bus: TraceBus,
    registry: Arc<ListenerRegistry>,
    hook: Arc<dyn BreakHook>,
    capture_backtrace: bool,
}

impl DebugWatcher {
    /// Creates a watcher publishing to `bus` and recording listeners in `registry`.
    pub fn new(bus: TraceBus, registry: Arc<ListenerRegistry>, hook: Arc<dyn BreakHook>) -> Self {
        Self {
            bus,
            registry,
            hook,
            capture_backtrace: false,
        }
    }

    /// Watcher with its own bus (capacity 64), registry and [`LogBreak`] hook.
    ///
    /// Handy for channels used outside a [`Hub`](crate::Hub).
    pub fn standalone() -> Arc<Self> {
        Arc::new(Self::new(
            TraceBus::new(64),
            Arc::new(ListenerRegistry::new()),
            Arc::new(LogBreak),
        ))
    }

    /// Enables full backtrace capture per record.
    #[must_use]
    pub fn with_backtraces(mut self, enabled: bool) -> Self {
        self.capture_backtrace = enabled;
        self
    }

    #[inline]
    pub fn bus(&self) -> &TraceBus {
        &self.bus
    }

    #[inline]
    pub fn registry(&self) -> &Arc<ListenerRegistry> {
        &self.registry
    }

    /// Pre-raise step: trace (if enabled) then evaluate the "before" breakpoint.
    pub fn pre_raise(
        &self,
        channel: &dyn Traced,
        value: Option<&dyn fmt::Debug>,
        caller: &'static Location<'static>,
    ) {
        if channel.debug_enabled() {
            self.track(channel, value, caller);
        }
        self.check_break(channel, Phase::Before);
    }

    /// Post-raise step: evaluate the "after" breakpoint.
    pub fn post_raise(&self, channel: &dyn Traced) {
        self.check_break(channel, Phase::After);
    }

    /// Adds `listener` to the registry bucket of the channel's kind.
    pub fn listener_registered(&self, channel: &dyn Traced, listener: ListenerRef) {
        tracing::trace!(kind = %channel.kind(), listener = listener.name(), owner = listener.owner(), "listener registered");
        self.registry.register(channel.kind(), listener);
    }

    /// Removes `listener` from the registry bucket; warns and does nothing on a miss.
    pub fn listener_unregistered(&self, channel: &dyn Traced, listener: &ListenerRef) {
        if self.registry.unregister(channel.kind(), listener) {
            tracing::trace!(kind = %channel.kind(), listener = listener.name(), "listener unregistered");
        }
    }

    /// Clears the registry bucket of the channel's kind; warns if there is none.
    pub fn listener_unregister_all(&self, channel: &dyn Traced) {
        self.registry.clear(channel.kind());
    }

    fn track(
        &self,
        channel: &dyn Traced,
        value: Option<&dyn fmt::Debug>,
        caller: &'static Location<'static>,
    ) {
        let mut rec = TraceRecord::new(channel.kind().clone())
            .with_caller(caller)
            .with_listeners(channel.listener_snapshot());
        if let Some(origin) = channel.origin() {
            rec = rec.with_origin(origin);
        }
        if let Some(value) = value {
            rec = rec.with_value(format!("{value:?}"));
        }
        if self.capture_backtrace {
            rec = rec.with_backtrace(Backtrace::force_capture());
        }

        tracing::trace!(
            seq = rec.seq(),
            kind = %rec.kind(),
            value = rec.value().unwrap_or(""),
            listeners = rec.listener_count(),
            "raise traced"
        );
        self.bus.publish(rec);
    }

    fn check_break(&self, channel: &dyn Traced, phase: Phase) {
        if let Some(mode) = channel.breakpoint().trip(phase) {
            let ctx = BreakContext {
                kind: channel.kind().clone(),
                origin: channel.origin(),
                phase,
                mode,
            };
            self.hook.on_break(&ctx);
        }
    }
}

impl fmt::Debug for DebugWatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebugWatcher")
            .field("bus", &self.bus)
            .field("capture_backtrace", &self.capture_backtrace)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::BreakpointMode;
    use std::sync::Mutex;

    struct Fake {
        kind: ChannelKind,
        debug: bool,
        breakpoint: Breakpoint,
        listeners: Vec<ListenerRef>,
    }

    impl Traced for Fake {
        fn kind(&self) -> &ChannelKind {
            &self.kind
        }
        fn origin(&self) -> Option<Arc<str>> {
            Some(Arc::from("assets/Fake.asset"))
        }
        fn debug_enabled(&self) -> bool {
            self.debug
        }
        fn breakpoint(&self) -> &Breakpoint {
            &self.breakpoint
        }
        fn listener_snapshot(&self) -> Vec<ListenerRef> {
            self.listeners.clone()
        }
    }

    fn fake(debug: bool, mode: BreakpointMode) -> Fake {
        Fake {
            kind: ChannelKind::named("Fake"),
            debug,
            breakpoint: Breakpoint::new(mode),
            listeners: vec![ListenerRef::from_parts(1, "L", "o")],
        }
    }

    #[test]
    fn test_pre_raise_publishes_snapshot() {
        let watcher = DebugWatcher::standalone();
        let mut rx = watcher.bus().subscribe();
        let ch = fake(true, BreakpointMode::None);

        watcher.pre_raise(&ch, Some(&7_u8), Location::caller());

        let rec = rx.try_recv().unwrap();
        assert_eq!(rec.value(), Some("7"));
        assert_eq!(rec.name(), "Fake");
        assert_eq!(rec.listener_count(), 1);
        assert!(rec.backtrace().is_none());
    }

    #[test]
    fn test_debug_off_still_breaks() {
        let hits = Arc::new(Mutex::new(Vec::new()));
        let h = Arc::clone(&hits);
        let watcher = DebugWatcher::new(
            TraceBus::new(4),
            Arc::new(ListenerRegistry::new()),
            Arc::new(move |ctx: &BreakContext| h.lock().unwrap().push(ctx.phase)),
        );
        let mut rx = watcher.bus().subscribe();
        let ch = fake(false, BreakpointMode::BreakBefore);

        watcher.pre_raise(&ch, None, Location::caller());
        watcher.post_raise(&ch);

        assert!(rx.try_recv().is_err());
        assert_eq!(*hits.lock().unwrap(), vec![Phase::Before]);
    }

    #[test]
    fn test_backtrace_capture() {
        let watcher = DebugWatcher::new(
            TraceBus::new(4),
            Arc::new(ListenerRegistry::new()),
            Arc::new(LogBreak),
        )
        .with_backtraces(true);
        let mut rx = watcher.bus().subscribe();

        watcher.pre_raise(&fake(true, BreakpointMode::None), None, Location::caller());
        assert!(rx.try_recv().unwrap().backtrace().is_some());
    }

    #[test]
    fn test_listener_bookkeeping() {
        let watcher = DebugWatcher::standalone();
        let ch = fake(true, BreakpointMode::None);
        let l = ListenerRef::from_parts(9, "L", "o");

        watcher.listener_registered(&ch, l.clone());
        assert_eq!(watcher.registry().count(ch.kind()), 1);

        watcher.listener_unregistered(&ch, &l);
        watcher.listener_unregistered(&ch, &l);
        assert_eq!(watcher.registry().count(ch.kind()), 0);

        watcher.listener_registered(&ch, l);
        watcher.listener_unregister_all(&ch);
        assert!(watcher.registry().listeners(ch.kind()).is_empty());
    }
}
