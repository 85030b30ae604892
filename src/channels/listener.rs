//! # Listener capabilities.
//!
//! A [`Listener`] is an object that reacts to a channel *and* can describe itself:
//! a display name and an owner identity. Channels deliver through the listener's
//! `on_event`, and publish a [`ListenerRef`] to the registry and to trace records so
//! tooling can show "who is listening" without knowing the concrete type.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use eventscope::{Listener, ListenerRef};
//!
//! struct HealthBar;
//!
//! impl Listener<i32> for HealthBar {
//!     fn on_event(&self, value: &i32) { let _ = value; }
//!     fn owner(&self) -> &str { "hud/player" }
//! }
//!
//! let bar: Arc<dyn Listener<i32>> = Arc::new(HealthBar);
//! let r = ListenerRef::of(&bar);
//! assert_eq!(r.owner(), "hud/player");
//! assert!(r.name().ends_with("HealthBar"));
//! ```

use std::fmt;
use std::sync::Arc;

use super::handler::Handler;

/// Callback contract with self-description, tracked separately from raw handlers.
pub trait Listener<T: ?Sized>: Send + Sync + 'static {
    /// Reacts to one payload.
    fn on_event(&self, value: &T);

    /// Display name (defaults to the implementing type's name).
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Identity of whatever owns this listener (an entity, a scene path, a service).
    fn owner(&self) -> &str;
}

/// Opaque identity of a registered listener object.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ListenerKey(usize);

/// Descriptive reference to a listener: identity, name and owner.
///
/// Equality uses the identity only.
#[derive(Clone)]
pub struct ListenerRef {
    key: ListenerKey,
    name: Arc<str>,
    owner: Arc<str>,
}

impl ListenerRef {
    /// Describes `listener`. Refs built from clones of the same `Arc` compare equal.
    pub fn of<T: ?Sized + 'static>(listener: &Arc<dyn Listener<T>>) -> Self {
        Self {
            key: ListenerKey(Arc::as_ptr(listener) as *const () as usize),
            name: Arc::from(listener.name()),
            owner: Arc::from(listener.owner()),
        }
    }

    #[cfg(test)]
    pub(crate) fn from_parts(key: usize, name: &str, owner: &str) -> Self {
        Self {
            key: ListenerKey(key),
            name: Arc::from(name),
            owner: Arc::from(owner),
        }
    }

    #[inline]
    pub fn key(&self) -> ListenerKey {
        self.key
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn owner(&self) -> &str {
        &self.owner
    }
}

impl PartialEq for ListenerRef {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for ListenerRef {}

impl fmt::Debug for ListenerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRef")
            .field("name", &self.name)
            .field("owner", &self.owner)
            .finish()
    }
}

/// A registered listener together with the handler delivering to it.
///
/// The listener `Arc` is kept alive here so its [`ListenerKey`] stays unique.
pub(crate) struct ListenerSlot<T: ?Sized> {
    _listener: Arc<dyn Listener<T>>,
    pub(crate) handler: Handler<T>,
    pub(crate) info: ListenerRef,
}

impl<T: ?Sized + 'static> ListenerSlot<T> {
    pub(crate) fn new(listener: Arc<dyn Listener<T>>) -> Self {
        let info = ListenerRef::of(&listener);
        let target = Arc::clone(&listener);
        let handler = Handler::new(move |value: &T| target.on_event(value));
        Self {
            _listener: listener,
            handler,
            info,
        }
    }
}

/// Removes the first slot for `listener`, returning it.
pub(crate) fn take_slot<T: ?Sized>(
    slots: &mut Vec<ListenerSlot<T>>,
    listener: &ListenerRef,
) -> Option<ListenerSlot<T>> {
    let pos = slots.iter().position(|s| &s.info == listener)?;
    Some(slots.remove(pos))
}
