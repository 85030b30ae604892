//! # Typed event channel with replay.
//!
//! [`EventChannel<T>`] delivers a payload of type `T` to its handlers in registration
//! order and remembers the last few payloads in a [`ReplayBuffer`] so late subscribers
//! can be caught up at registration time.
//!
//! ## Raise sequence
//! ```text
//! raise(v)
//!   ├─► watcher.pre_raise(self, Some(&v))   one trace record, "before" breakpoint
//!   ├─► untyped handlers of the embedded base
//!   ├─► typed handlers, registration order  panics isolated per handler
//!   ├─► replay.push(v)                       oldest evicted at capacity
//!   └─► watcher.post_raise(self)             "after" breakpoint
//! ```
//!
//! The embedded base's own `raise()` is never called here, which is what keeps a
//! typed raise down to a single trace record.
//!
//! ## Replay rules
//! - Replay happens **only** inside `register*` calls, and only to the handler being
//!   registered, using the buffer as it is at that instant (oldest first).
//! - Nothing is replayed when capacity is 0, the buffer is empty, or the caller passes
//!   [`Replay::Skip`].
//! - Already-registered handlers never receive replays.

use std::fmt;
use std::panic::Location;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::DeliveryError;
use crate::events::ChannelKind;
use crate::watch::{DebugWatcher, Traced};

use super::base::EventChannelBase;
use super::breakpoint::{Breakpoint, BreakpointMode};
use super::handler::{self, Handler};
use super::listener::{self, Listener, ListenerRef, ListenerSlot};
use super::replay::ReplayBuffer;

/// Whether a registration receives the buffered payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Replay {
    /// Deliver the current replay buffer to the new handler (default).
    #[default]
    Deliver,
    /// Register without catching up.
    Skip,
}

struct TypedState<T> {
    handlers: Vec<Handler<T>>,
    listeners: Vec<ListenerSlot<T>>,
    replay: ReplayBuffer<T>,
    inspector: Option<T>,
}

impl<T: Clone> TypedState<T> {
    fn backlog(&self, replay: Replay) -> Vec<T> {
        if replay == Replay::Skip || self.replay.capacity() == 0 {
            return Vec::new();
        }
        self.replay.snapshot()
    }
}

/// Typed pub/sub channel.
///
/// ## Example
/// ```rust
/// use std::sync::{Arc, Mutex};
/// use eventscope::{ChannelKind, DebugWatcher, EventChannel, Handler};
///
/// let score = EventChannel::<i32>::new(ChannelKind::named("Score"), DebugWatcher::standalone())
///     .with_replay_capacity(3);
/// for v in 1..=4 {
///     score.raise(v).unwrap();
/// }
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let s = Arc::clone(&seen);
/// score.register(Handler::new(move |v: &i32| s.lock().unwrap().push(*v))).unwrap();
/// assert_eq!(*seen.lock().unwrap(), vec![2, 3, 4]);
/// ```
pub struct EventChannel<T> {
    base: EventChannelBase,
    state: Mutex<TypedState<T>>,
}

impl<T> EventChannel<T>
where
    T: Clone + fmt::Debug + Send + 'static,
{
    /// Default replay capacity of a channel created with [`EventChannel::new`].
    pub const DEFAULT_REPLAY_CAPACITY: usize = 1;

    /// Creates a runtime channel of `kind` with replay capacity 1 and debug enabled.
    pub fn new(kind: ChannelKind, watcher: Arc<DebugWatcher>) -> Self {
        Self {
            base: EventChannelBase::new(kind, watcher),
            state: Mutex::new(TypedState {
                handlers: Vec::new(),
                listeners: Vec::new(),
                replay: ReplayBuffer::new(Self::DEFAULT_REPLAY_CAPACITY),
                inspector: None,
            }),
        }
    }

    /// Creates a channel whose kind is named after `T`.
    pub fn of_type(watcher: Arc<DebugWatcher>) -> Self {
        Self::new(ChannelKind::of::<T>(), watcher)
    }

    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<Arc<str>>) -> Self {
        self.base = self.base.with_origin(origin);
        self
    }

    #[must_use]
    pub fn with_debug(self, enabled: bool) -> Self {
        self.base.set_debug_enabled(enabled);
        self
    }

    #[must_use]
    pub fn with_replay_capacity(self, capacity: usize) -> Self {
        self.set_replay_capacity(capacity);
        self
    }

    /// The embedded untyped channel. Its handlers also run on every typed raise.
    #[inline]
    pub fn base(&self) -> &EventChannelBase {
        &self.base
    }

    #[inline]
    pub fn kind(&self) -> &ChannelKind {
        self.base.kind()
    }

    #[inline]
    pub fn origin(&self) -> Option<&str> {
        self.base.origin()
    }

    #[inline]
    pub fn debug_enabled(&self) -> bool {
        self.base.debug_enabled()
    }

    pub fn set_debug_enabled(&self, enabled: bool) {
        self.base.set_debug_enabled(enabled);
    }

    #[inline]
    pub fn breakpoint_mode(&self) -> BreakpointMode {
        self.base.breakpoint_mode()
    }

    pub fn set_breakpoint_mode(&self, mode: BreakpointMode) {
        self.base.set_breakpoint_mode(mode);
    }

    /// Raises `value` to every handler, then stores it in the replay buffer.
    ///
    /// Handler panics are isolated: the remaining handlers, the replay push and the
    /// "after" breakpoint still run, then the failures are returned together.
    #[track_caller]
    pub fn raise(&self, value: T) -> Result<(), DeliveryError> {
        let caller = Location::caller();
        let watcher = self.base.watcher();
        watcher.pre_raise(self, Some(&value as &dyn fmt::Debug), caller);

        let mut failures = Vec::new();
        let offset = self.base.deliver(&mut failures);
        let handlers = self.state.lock().handlers.clone();
        handler::deliver(&handlers, &value, offset, &mut failures);
        self.state.lock().replay.push(value);

        watcher.post_raise(self);
        DeliveryError::check(self.kind(), failures)
    }

    /// Registers `handler` and replays the buffer to it.
    pub fn register(&self, handler: Handler<T>) -> Result<(), DeliveryError> {
        self.register_with(handler, Replay::Deliver)
    }

    /// Registers `handler`, replaying the buffer only for [`Replay::Deliver`].
    ///
    /// A replay panic is reported with the index of the replayed payload; the handler
    /// stays registered.
    pub fn register_with(&self, handler: Handler<T>, replay: Replay) -> Result<(), DeliveryError> {
        let backlog = {
            let mut state = self.state.lock();
            state.handlers.push(handler.clone());
            state.backlog(replay)
        };
        self.replay_to(&handler, backlog)
    }

    /// Removes the first registration of `handler`; unknown handlers are ignored.
    pub fn unregister(&self, handler: &Handler<T>) -> bool {
        let removed = handler::remove_first(&mut self.state.lock().handlers, handler);
        if !removed {
            tracing::debug!(kind = %self.kind(), "unregister of unknown handler ignored");
        }
        removed
    }

    /// Registers a listener object, records it in the registry and optionally replays.
    pub fn register_listener(
        &self,
        listener: Arc<dyn Listener<T>>,
        replay: Replay,
    ) -> Result<(), DeliveryError> {
        let slot = ListenerSlot::new(listener);
        let info = slot.info.clone();
        let handler = slot.handler.clone();
        let backlog = {
            let mut state = self.state.lock();
            state.handlers.push(slot.handler.clone());
            state.listeners.push(slot);
            state.backlog(replay)
        };
        self.base.watcher().listener_registered(self, info);
        self.replay_to(&handler, backlog)
    }

    /// Removes the first registration of `listener` here and, if it was found, in the registry.
    pub fn unregister_listener(&self, listener: &Arc<dyn Listener<T>>) -> bool {
        let info = ListenerRef::of(listener);
        let removed = {
            let mut state = self.state.lock();
            match listener::take_slot(&mut state.listeners, &info) {
                Some(slot) => handler::remove_first(&mut state.handlers, &slot.handler),
                None => false,
            }
        };
        if removed {
            self.base.watcher().listener_unregistered(self, &info);
        } else {
            tracing::debug!(
                kind = %self.kind(),
                listener = info.name(),
                "listener is not registered on this channel"
            );
        }
        removed
    }

    /// Drops every handler and listener (typed and untyped) and clears the registry
    /// bucket of this kind. The replay buffer is kept.
    pub fn unregister_all(&self) {
        {
            let mut state = self.state.lock();
            state.handlers.clear();
            state.listeners.clear();
        }
        self.base.clear_local();
        self.base.watcher().listener_unregister_all(self);
    }

    /// Number of typed handlers, listener handlers included.
    pub fn handler_count(&self) -> usize {
        self.state.lock().handlers.len()
    }

    /// Typed listeners followed by untyped listeners.
    pub fn listeners(&self) -> Vec<ListenerRef> {
        let mut out: Vec<ListenerRef> = self
            .state
            .lock()
            .listeners
            .iter()
            .map(|s| s.info.clone())
            .collect();
        out.extend(self.base.listeners());
        out
    }

    #[inline]
    pub fn replay_capacity(&self) -> usize {
        self.state.lock().replay.capacity()
    }

    /// Sets the replay capacity (clamped to 10); shrinking evicts the oldest payloads.
    pub fn set_replay_capacity(&self, capacity: usize) {
        self.state.lock().replay.set_capacity(capacity);
    }

    /// Copy of the replay buffer, oldest first.
    pub fn replay_buffer(&self) -> Vec<T> {
        self.state.lock().replay.snapshot()
    }

    /// Stores the value used by [`raise_inspector_value`](Self::raise_inspector_value).
    pub fn set_inspector_value(&self, value: T) {
        self.state.lock().inspector = Some(value);
    }

    pub fn inspector_value(&self) -> Option<T> {
        self.state.lock().inspector.clone()
    }

    /// Raises the stored inspector value; does nothing when none is set.
    #[track_caller]
    pub fn raise_inspector_value(&self) -> Result<(), DeliveryError> {
        match self.inspector_value() {
            Some(value) => self.raise(value),
            None => {
                tracing::debug!(kind = %self.kind(), "no inspector value to raise");
                Ok(())
            }
        }
    }

    fn replay_to(&self, handler: &Handler<T>, backlog: Vec<T>) -> Result<(), DeliveryError> {
        let mut failures = Vec::new();
        for (i, value) in backlog.iter().enumerate() {
            handler::deliver(std::slice::from_ref(handler), value, i, &mut failures);
        }
        DeliveryError::check(self.kind(), failures)
    }
}

impl<T> Traced for EventChannel<T>
where
    T: Clone + fmt::Debug + Send + 'static,
{
    fn kind(&self) -> &ChannelKind {
        self.base.kind()
    }

    fn origin(&self) -> Option<Arc<str>> {
        Traced::origin(&self.base)
    }

    fn debug_enabled(&self) -> bool {
        self.base.debug_enabled()
    }

    fn breakpoint(&self) -> &Breakpoint {
        Traced::breakpoint(&self.base)
    }

    fn listener_snapshot(&self) -> Vec<ListenerRef> {
        self.listeners()
    }
}

impl<T> fmt::Debug for EventChannel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventChannel")
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{TraceBus, TraceRecord};
    use crate::watch::{BreakContext, ListenerRegistry, Phase};
    use std::sync::Mutex as StdMutex;
    use tokio::sync::broadcast;

    type Log<T> = Arc<StdMutex<Vec<T>>>;

    fn log<T>() -> Log<T> {
        Arc::new(StdMutex::new(Vec::new()))
    }

    fn recorder(log: &Log<i32>) -> Handler<i32> {
        let log = Arc::clone(log);
        Handler::new(move |v: &i32| log.lock().unwrap().push(*v))
    }

    fn setup() -> (Arc<DebugWatcher>, broadcast::Receiver<TraceRecord>, Log<(Phase, BreakpointMode)>) {
        let bus = TraceBus::new(64);
        let rx = bus.subscribe();
        let breaks = log();
        let b = Arc::clone(&breaks);
        let watcher = Arc::new(DebugWatcher::new(
            bus,
            Arc::new(ListenerRegistry::new()),
            Arc::new(move |ctx: &BreakContext| b.lock().unwrap().push((ctx.phase, ctx.mode))),
        ));
        (watcher, rx, breaks)
    }

    fn drain(rx: &mut broadcast::Receiver<TraceRecord>) -> Vec<TraceRecord> {
        let mut out = Vec::new();
        while let Ok(rec) = rx.try_recv() {
            out.push(rec);
        }
        out
    }

    struct Tally {
        seen: Log<i32>,
    }

    impl Listener<i32> for Tally {
        fn on_event(&self, value: &i32) {
            self.seen.lock().unwrap().push(*value);
        }
        fn name(&self) -> &str {
            "Tally"
        }
        fn owner(&self) -> &str {
            "hud"
        }
    }

    #[test]
    fn test_replay_scenario() {
        let (watcher, _rx, _) = setup();
        let ch = EventChannel::<i32>::new(ChannelKind::named("C"), watcher).with_replay_capacity(3);
        for v in 1..=4 {
            ch.raise(v).unwrap();
        }
        assert_eq!(ch.replay_buffer(), vec![2, 3, 4]);

        let seen = log();
        ch.register(recorder(&seen)).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![2, 3, 4]);

        ch.raise(5).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![2, 3, 4, 5]);
        assert_eq!(ch.replay_buffer(), vec![3, 4, 5]);
    }

    #[test]
    fn test_replay_delivers_min_of_capacity_and_raises() {
        for (k, n) in [(0usize, 5i32), (2, 1), (2, 5), (10, 12)] {
            let (watcher, _rx, _) = setup();
            let ch = EventChannel::<i32>::new(ChannelKind::named("C"), watcher).with_replay_capacity(k);
            for v in 1..=n {
                ch.raise(v).unwrap();
            }
            let seen = log();
            ch.register(recorder(&seen)).unwrap();

            let got = seen.lock().unwrap().clone();
            let take = k.min(n as usize) as i32;
            let expected: Vec<i32> = (n - take + 1..=n).collect();
            assert_eq!(got, expected, "capacity={k} raises={n}");
        }
    }

    #[test]
    fn test_replay_is_never_retroactive() {
        let (watcher, _rx, _) = setup();
        let ch = EventChannel::<i32>::new(ChannelKind::named("C"), watcher).with_replay_capacity(2);
        let early = log();
        ch.register(recorder(&early)).unwrap();
        ch.raise(1).unwrap();

        let late = log();
        ch.register(recorder(&late)).unwrap();

        assert_eq!(*early.lock().unwrap(), vec![1]);
        assert_eq!(*late.lock().unwrap(), vec![1]);
    }

    #[test]
    fn test_replay_skip() {
        let (watcher, _rx, _) = setup();
        let ch = EventChannel::<i32>::new(ChannelKind::named("C"), watcher);
        ch.raise(1).unwrap();

        let seen = log();
        ch.register_with(recorder(&seen), Replay::Skip).unwrap();
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_two_handlers_run_once_in_order() {
        let (watcher, _rx, _) = setup();
        let ch = EventChannel::<i32>::new(ChannelKind::named("C"), watcher).with_replay_capacity(0);
        let order = log();
        let a = Arc::clone(&order);
        let b = Arc::clone(&order);
        ch.register(Handler::new(move |v: &i32| a.lock().unwrap().push(("a", *v)))).unwrap();
        ch.register(Handler::new(move |v: &i32| b.lock().unwrap().push(("b", *v)))).unwrap();

        ch.raise(7).unwrap();
        assert_eq!(*order.lock().unwrap(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn test_duplicate_registration_and_unknown_unregister() {
        let (watcher, _rx, _) = setup();
        let ch = EventChannel::<i32>::new(ChannelKind::named("C"), watcher).with_replay_capacity(0);
        let seen = log();
        let h = recorder(&seen);
        ch.register(h.clone()).unwrap();
        ch.register(h.clone()).unwrap();

        assert!(!ch.unregister(&recorder(&seen)));
        assert_eq!(ch.handler_count(), 2);

        ch.raise(1).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![1, 1]);

        assert!(ch.unregister(&h));
        ch.raise(2).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![1, 1, 2]);
    }

    #[test]
    fn test_shrinking_capacity_truncates() {
        let (watcher, _rx, _) = setup();
        let ch = EventChannel::<i32>::new(ChannelKind::named("C"), watcher).with_replay_capacity(5);
        for v in 1..=5 {
            ch.raise(v).unwrap();
        }
        ch.set_replay_capacity(2);
        assert_eq!(ch.replay_capacity(), 2);
        assert_eq!(ch.replay_buffer(), vec![4, 5]);
    }

    #[test]
    fn test_panicking_handler_is_isolated() {
        let (watcher, _rx, breaks) = setup();
        let ch = EventChannel::<i32>::new(ChannelKind::named("C"), watcher);
        ch.set_breakpoint_mode(BreakpointMode::BreakAfter);
        let seen = log();
        ch.register(Handler::new(|_: &i32| panic!("first"))).unwrap();
        ch.register(recorder(&seen)).unwrap();

        let err = ch.raise(9).unwrap_err();
        assert_eq!(err.failures().len(), 1);
        assert_eq!(err.failures()[0].index, 0);
        assert_eq!(err.failures()[0].message, "first");
        assert_eq!(*seen.lock().unwrap(), vec![9]);
        assert_eq!(ch.replay_buffer(), vec![9]);
        assert_eq!(*breaks.lock().unwrap(), vec![(Phase::After, BreakpointMode::BreakAfter)]);
    }

    #[test]
    fn test_replay_panic_reports_payload_index() {
        let (watcher, _rx, _) = setup();
        let ch = EventChannel::<i32>::new(ChannelKind::named("C"), watcher).with_replay_capacity(3);
        for v in 1..=3 {
            ch.raise(v).unwrap();
        }

        let seen = log();
        let s = Arc::clone(&seen);
        let err = ch
            .register(Handler::new(move |v: &i32| {
                if *v % 2 == 0 {
                    panic!("even {v}");
                }
                s.lock().unwrap().push(*v);
            }))
            .unwrap_err();

        let indices: Vec<usize> = err.failures().iter().map(|f| f.index).collect();
        assert_eq!(indices, vec![1]);
        assert_eq!(err.failures()[0].message, "even 2");
        assert_eq!(*seen.lock().unwrap(), vec![1, 3]);

        assert_eq!(ch.handler_count(), 1);
        ch.raise(5).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![1, 3, 5]);
    }

    #[test]
    fn test_single_trace_record_per_typed_raise() {
        let (watcher, mut rx, _) = setup();
        let ch = EventChannel::<String>::new(ChannelKind::named("Chat"), watcher)
            .with_origin("assets/events/Chat.asset");
        ch.base().register(Handler::unit(|| {}));

        ch.raise("hi".to_string()).unwrap();

        let recs = drain(&mut rx);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].value(), Some("\"hi\""));
        assert_eq!(recs[0].name(), "Chat");
        assert_eq!(recs[0].origin(), Some("assets/events/Chat.asset"));
        assert_eq!(recs[0].caller().file(), file!());
    }

    #[test]
    fn test_base_handlers_run_before_typed() {
        let (watcher, _rx, _) = setup();
        let ch = EventChannel::<i32>::new(ChannelKind::named("C"), watcher);
        let order = log();
        let a = Arc::clone(&order);
        let b = Arc::clone(&order);
        ch.register(Handler::new(move |_: &i32| a.lock().unwrap().push("typed"))).unwrap();
        ch.base().register(Handler::unit(move || b.lock().unwrap().push("base")));

        ch.raise(1).unwrap();
        assert_eq!(*order.lock().unwrap(), vec!["base", "typed"]);
    }

    #[test]
    fn test_break_before_once() {
        let (watcher, _rx, breaks) = setup();
        let ch = EventChannel::<i32>::new(ChannelKind::named("C"), watcher);
        ch.set_breakpoint_mode(BreakpointMode::BreakBeforeOnce);

        ch.raise(1).unwrap();
        assert_eq!(ch.breakpoint_mode(), BreakpointMode::None);
        ch.raise(2).unwrap();

        assert_eq!(
            *breaks.lock().unwrap(),
            vec![(Phase::Before, BreakpointMode::BreakBeforeOnce)]
        );
    }

    #[test]
    fn test_break_before_happens_before_handlers() {
        let bus = TraceBus::new(4);
        let order = log();
        let o = Arc::clone(&order);
        let watcher = Arc::new(DebugWatcher::new(
            bus,
            Arc::new(ListenerRegistry::new()),
            Arc::new(move |ctx: &BreakContext| o.lock().unwrap().push(format!("{:?}", ctx.phase))),
        ));
        let ch = EventChannel::<i32>::new(ChannelKind::named("C"), watcher);
        let h = Arc::clone(&order);
        ch.register(Handler::new(move |_: &i32| h.lock().unwrap().push("handler".into()))).unwrap();

        ch.set_breakpoint_mode(BreakpointMode::BreakBefore);
        ch.raise(1).unwrap();
        ch.set_breakpoint_mode(BreakpointMode::BreakAfterOnce);
        ch.raise(2).unwrap();

        assert_eq!(*order.lock().unwrap(), vec!["Before", "handler", "handler", "After"]);
    }

    #[test]
    fn test_listener_snapshot_in_record_and_registry() {
        let (watcher, mut rx, _) = setup();
        let registry = Arc::clone(watcher.registry());
        let ch = EventChannel::<i32>::new(ChannelKind::named("C"), watcher).with_replay_capacity(2);
        ch.raise(1).unwrap();

        let seen = log();
        let tally: Arc<dyn Listener<i32>> = Arc::new(Tally { seen: Arc::clone(&seen) });
        ch.register_listener(Arc::clone(&tally), Replay::Deliver).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![1]);
        assert_eq!(registry.count(ch.kind()), 1);

        ch.raise(2).unwrap();
        let recs = drain(&mut rx);
        let last = recs.last().unwrap();
        assert_eq!(last.listener_count(), 1);
        assert_eq!(last.listeners()[0].name(), "Tally");
        assert_eq!(last.listeners()[0].owner(), "hud");

        assert!(ch.unregister_listener(&tally));
        assert_eq!(registry.count(ch.kind()), 0);
        ch.raise(3).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_unregister_from_sibling_channel_keeps_registry_entry() {
        let (watcher, _rx, _) = setup();
        let registry = Arc::clone(watcher.registry());
        let a = EventChannel::<i32>::new(ChannelKind::named("Score"), Arc::clone(&watcher));
        let b = EventChannel::<i32>::new(ChannelKind::named("Score"), watcher);

        let seen = log();
        let tally: Arc<dyn Listener<i32>> = Arc::new(Tally { seen: Arc::clone(&seen) });
        a.register_listener(Arc::clone(&tally), Replay::Skip).unwrap();

        assert!(!b.unregister_listener(&tally));
        assert_eq!(registry.count(a.kind()), 1);
        a.raise(7).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![7]);

        assert!(a.unregister_listener(&tally));
        assert_eq!(registry.count(a.kind()), 0);
    }

    #[test]
    fn test_unregister_all_keeps_replay() {
        let (watcher, _rx, _) = setup();
        let ch = EventChannel::<i32>::new(ChannelKind::named("C"), watcher);
        let seen = log();
        ch.register(recorder(&seen)).unwrap();
        ch.base().register(Handler::unit(|| {}));
        ch.raise(1).unwrap();

        ch.unregister_all();
        assert_eq!(ch.handler_count(), 0);
        assert_eq!(ch.base().handler_count(), 0);
        assert_eq!(ch.replay_buffer(), vec![1]);
    }

    #[test]
    fn test_inspector_value() {
        let (watcher, _rx, _) = setup();
        let ch = EventChannel::<i32>::new(ChannelKind::named("C"), watcher);
        let seen = log();
        ch.register(recorder(&seen)).unwrap();

        ch.raise_inspector_value().unwrap();
        assert!(seen.lock().unwrap().is_empty());

        ch.set_inspector_value(11);
        assert_eq!(ch.inspector_value(), Some(11));
        ch.raise_inspector_value().unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![11]);
    }

    #[test]
    fn test_debug_toggle() {
        let (watcher, mut rx, _) = setup();
        let ch = EventChannel::<i32>::new(ChannelKind::named("C"), watcher).with_debug(false);
        ch.raise(1).unwrap();
        assert!(drain(&mut rx).is_empty());

        ch.set_debug_enabled(true);
        ch.raise(2).unwrap();
        assert_eq!(drain(&mut rx).len(), 1);
    }

    #[test]
    fn test_concurrent_raises_keep_buffer_bounded() {
        let (watcher, _rx, _) = setup();
        let ch = Arc::new(
            EventChannel::<i32>::new(ChannelKind::named("C"), watcher)
                .with_debug(false)
                .with_replay_capacity(4),
        );
        let threads: Vec<_> = (0..4)
            .map(|t| {
                let ch = Arc::clone(&ch);
                std::thread::spawn(move || {
                    for v in 0..100 {
                        ch.raise(t * 100 + v).unwrap();
                        let _ = ch.register_with(Handler::new(|_: &i32| {}), Replay::Skip);
                    }
                })
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }
        assert_eq!(ch.replay_buffer().len(), 4);
        assert_eq!(ch.handler_count(), 400);
    }
}
