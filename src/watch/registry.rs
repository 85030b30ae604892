//! # Listener registry - per-kind introspection of active listeners.
//!
//! The registry answers "who is listening to this kind of channel?" for tooling.
//! It is **not** used for delivery: channels deliver from their own handler lists.
//!
//! ## Architecture
//! ```text
//! EventChannel::register_listener ──► DebugWatcher::listener_registered ──► register(kind, ref)
//! EventChannel::unregister_listener ► DebugWatcher::listener_unregistered ► unregister(kind, ref)
//! EventChannel::unregister_all ─────► DebugWatcher::listener_unregister_all ► clear(kind)
//!
//! tooling ──► listeners(kind) / count(kind) / kinds()
//! ```
//!
//! ## Rules
//! - Buckets are keyed by [`ChannelKind`]; every channel instance of a kind shares one bucket.
//! - A bucket is created on first registration and survives being cleared.
//! - Misses (unknown kind, unknown entry) are logged and skipped, never errors.
//! - `raise` never touches the registry.

use std::collections::{BTreeSet, HashMap};

use parking_lot::RwLock;

use crate::channels::ListenerRef;
use crate::events::ChannelKind;

/// Per-kind collection of active listener references.
#[derive(Default)]
pub struct ListenerRegistry {
    buckets: RwLock<HashMap<ChannelKind, Vec<ListenerRef>>>,
    kinds: RwLock<BTreeSet<ChannelKind>>,
}

impl ListenerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that a channel of `kind` exists, so tooling can list it.
    pub(crate) fn declare(&self, kind: &ChannelKind) {
        let mut kinds = self.kinds.write();
        if !kinds.contains(kind) {
            kinds.insert(kind.clone());
        }
    }

    /// Appends a listener to the bucket of `kind`, creating the bucket if needed.
    pub(crate) fn register(&self, kind: &ChannelKind, listener: ListenerRef) {
        self.declare(kind);
        self.buckets
            .write()
            .entry(kind.clone())
            .or_default()
            .push(listener);
    }

    /// Removes the first entry equal to `listener`.
    ///
    /// Returns `false` (and warns) if the kind has no bucket or the listener is absent.
    pub(crate) fn unregister(&self, kind: &ChannelKind, listener: &ListenerRef) -> bool {
        let mut buckets = self.buckets.write();
        let Some(bucket) = buckets.get_mut(kind) else {
            tracing::warn!(kind = %kind, listener = listener.name(), "listener is not registered: unknown kind");
            return false;
        };
        match bucket.iter().position(|l| l == listener) {
            Some(pos) => {
                bucket.remove(pos);
                true
            }
            None => {
                tracing::warn!(kind = %kind, listener = listener.name(), "listener is not registered");
                false
            }
        }
    }

    /// Clears the bucket of `kind`.
    ///
    /// Returns `false` (and warns) if the kind has no bucket.
    pub(crate) fn clear(&self, kind: &ChannelKind) -> bool {
        match self.buckets.write().get_mut(kind) {
            Some(bucket) => {
                bucket.clear();
                true
            }
            None => {
                tracing::warn!(kind = %kind, "kind is not registered");
                false
            }
        }
    }

    /// Returns a copy of the listeners registered for `kind`, in registration order.
    ///
    /// An unknown kind yields an empty list (logged at debug level).
    pub fn listeners(&self, kind: &ChannelKind) -> Vec<ListenerRef> {
        match self.buckets.read().get(kind) {
            Some(bucket) => bucket.clone(),
            None => {
                tracing::debug!(kind = %kind, "registry lookup for unregistered kind");
                Vec::new()
            }
        }
    }

    /// Number of listeners registered for `kind` (0 for unknown kinds).
    pub fn count(&self, kind: &ChannelKind) -> usize {
        self.buckets.read().get(kind).map_or(0, Vec::len)
    }

    /// True if `kind` has a bucket (even an empty one).
    pub fn contains(&self, kind: &ChannelKind) -> bool {
        self.buckets.read().contains_key(kind)
    }

    /// Returns every declared kind, sorted by name.
    pub fn kinds(&self) -> Vec<ChannelKind> {
        self.kinds.read().iter().cloned().collect()
    }
}
