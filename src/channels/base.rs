//! # Untyped channel.
//!
//! [`EventChannelBase`] is a payload-less channel: handlers take no arguments and
//! there is no replay buffer. It also carries the state every channel shares (kind,
//! origin, debug flag, breakpoint, watcher) and is embedded in each typed
//! [`EventChannel`](super::EventChannel).
//!
//! ## Raise sequence
//! ```text
//! raise()
//!   ├─► watcher.pre_raise(self, None)    trace + "before" breakpoint
//!   ├─► handlers, registration order     panics isolated per handler
//!   └─► watcher.post_raise(self)         "after" breakpoint
//! ```
//!
//! ## Locking
//! Handler and listener lists sit behind one mutex. Handlers are always called on a
//! snapshot taken outside the lock, so a handler may register, unregister or raise on
//! the same channel.

use std::panic::Location;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::error::{DeliveryError, HandlerFailure};
use crate::events::ChannelKind;
use crate::watch::{DebugWatcher, Traced};

use super::breakpoint::{Breakpoint, BreakpointMode};
use super::handler::{self, Handler};
use super::listener::{self, Listener, ListenerRef, ListenerSlot};

#[derive(Default)]
struct BaseState {
    handlers: Vec<Handler>,
    listeners: Vec<ListenerSlot<()>>,
}

/// Payload-less event channel.
///
/// ## Example
/// ```rust
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use eventscope::{ChannelKind, DebugWatcher, EventChannelBase, Handler};
///
/// let clicked = EventChannelBase::new(ChannelKind::named("Clicked"), DebugWatcher::standalone());
/// let count = Arc::new(AtomicUsize::new(0));
/// let c = Arc::clone(&count);
///
/// clicked.register(Handler::unit(move || { c.fetch_add(1, Ordering::SeqCst); }));
/// clicked.raise().unwrap();
/// assert_eq!(count.load(Ordering::SeqCst), 1);
/// ```
pub struct EventChannelBase {
    kind: ChannelKind,
    origin: Option<Arc<str>>,
    debug_enabled: AtomicBool,
    breakpoint: Breakpoint,
    watcher: Arc<DebugWatcher>,
    state: Mutex<BaseState>,
}

impl EventChannelBase {
    /// Creates a runtime channel of `kind` (no origin, debug enabled, no breakpoint).
    pub fn new(kind: ChannelKind, watcher: Arc<DebugWatcher>) -> Self {
        watcher.registry().declare(&kind);
        Self {
            kind,
            origin: None,
            debug_enabled: AtomicBool::new(true),
            breakpoint: Breakpoint::default(),
            watcher,
            state: Mutex::new(BaseState::default()),
        }
    }

    /// Sets the origin identifier reported in trace records.
    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<Arc<str>>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Sets the initial debug flag.
    #[must_use]
    pub fn with_debug(self, enabled: bool) -> Self {
        self.set_debug_enabled(enabled);
        self
    }

    #[inline]
    pub fn kind(&self) -> &ChannelKind {
        &self.kind
    }

    #[inline]
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    #[inline]
    pub fn debug_enabled(&self) -> bool {
        self.debug_enabled.load(Ordering::Relaxed)
    }

    pub fn set_debug_enabled(&self, enabled: bool) {
        self.debug_enabled.store(enabled, Ordering::Relaxed);
    }

    #[inline]
    pub fn breakpoint_mode(&self) -> BreakpointMode {
        self.breakpoint.mode()
    }

    pub fn set_breakpoint_mode(&self, mode: BreakpointMode) {
        self.breakpoint.set(mode);
    }

    #[inline]
    pub fn watcher(&self) -> &Arc<DebugWatcher> {
        &self.watcher
    }

    /// Raises the channel: trace, "before" breakpoint, handlers, "after" breakpoint.
    ///
    /// Returns [`DeliveryError`] if any handler panicked; every handler has still run.
    #[track_caller]
    pub fn raise(&self) -> Result<(), DeliveryError> {
        let caller = Location::caller();
        self.watcher.pre_raise(self, None, caller);

        let mut failures = Vec::new();
        self.deliver(&mut failures);

        self.watcher.post_raise(self);
        DeliveryError::check(&self.kind, failures)
    }

    /// Calls the untyped handlers; returns how many were called.
    pub(crate) fn deliver(&self, failures: &mut Vec<HandlerFailure>) -> usize {
        let handlers = self.state.lock().handlers.clone();
        handler::deliver(&handlers, &(), 0, failures);
        handlers.len()
    }

    /// Appends `handler`. The same handler may be registered more than once.
    pub fn register(&self, handler: Handler) {
        self.state.lock().handlers.push(handler);
    }

    /// Removes the first registration of `handler`; unknown handlers are ignored.
    pub fn unregister(&self, handler: &Handler) -> bool {
        let removed = handler::remove_first(&mut self.state.lock().handlers, handler);
        if !removed {
            tracing::debug!(kind = %self.kind, "unregister of unknown handler ignored");
        }
        removed
    }

    /// Registers a listener object and records it in the listener registry.
    pub fn register_listener(&self, listener: Arc<dyn Listener<()>>) -> ListenerRef {
        let slot = ListenerSlot::new(listener);
        let info = slot.info.clone();
        {
            let mut state = self.state.lock();
            state.handlers.push(slot.handler.clone());
            state.listeners.push(slot);
        }
        self.watcher.listener_registered(self, info.clone());
        info
    }

    /// Removes the first registration of `listener` here and, if it was found, in the registry.
    pub fn unregister_listener(&self, listener: &Arc<dyn Listener<()>>) -> bool {
        let info = ListenerRef::of(listener);
        let removed = {
            let mut state = self.state.lock();
            match listener::take_slot(&mut state.listeners, &info) {
                Some(slot) => handler::remove_first(&mut state.handlers, &slot.handler),
                None => false,
            }
        };
        if removed {
            self.watcher.listener_unregistered(self, &info);
        } else {
            tracing::debug!(
                kind = %self.kind(),
                listener = info.name(),
                "listener is not registered on this channel"
            );
        }
        removed
    }

    /// Drops every handler and listener and clears the registry bucket of this kind.
    pub fn unregister_all(&self) {
        self.clear_local();
        self.watcher.listener_unregister_all(self);
    }

    pub(crate) fn clear_local(&self) {
        let mut state = self.state.lock();
        state.handlers.clear();
        state.listeners.clear();
    }

    /// Number of registered handlers, listener handlers included.
    pub fn handler_count(&self) -> usize {
        self.state.lock().handlers.len()
    }

    /// Listeners registered on this channel, in registration order.
    pub fn listeners(&self) -> Vec<ListenerRef> {
        self.state
            .lock()
            .listeners
            .iter()
            .map(|s| s.info.clone())
            .collect()
    }
}

impl Traced for EventChannelBase {
    fn kind(&self) -> &ChannelKind {
        &self.kind
    }

    fn origin(&self) -> Option<Arc<str>> {
        self.origin.clone()
    }

    fn debug_enabled(&self) -> bool {
        EventChannelBase::debug_enabled(self)
    }

    fn breakpoint(&self) -> &Breakpoint {
        &self.breakpoint
    }

    fn listener_snapshot(&self) -> Vec<ListenerRef> {
        self.listeners()
    }
}

impl std::fmt::Debug for EventChannelBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventChannelBase")
            .field("kind", &self.kind)
            .field("origin", &self.origin)
            .field("debug_enabled", &self.debug_enabled())
            .field("breakpoint", &self.breakpoint_mode())
            .finish_non_exhaustive()
    }
}
