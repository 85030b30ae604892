//! # Bounded replay buffer.
//!
//! Keeps the most recent payloads of a channel so that late subscribers can be
//! caught up at registration time (like a `ReplaySubject`).
//!
//! ## Rules
//! - `len() <= capacity()` at all times.
//! - Capacity is limited to [`MAX_REPLAY_CAPACITY`]; larger requests are clamped.
//! - Pushing at capacity evicts the oldest entry; capacity 0 stores nothing.
//! - Shrinking evicts the oldest entries immediately.
//! - Never bulk-cleared implicitly.

use std::collections::VecDeque;

/// Largest supported replay capacity.
pub const MAX_REPLAY_CAPACITY: usize = 10;

/// FIFO of the most recent payloads, bounded by a mutable capacity.
#[derive(Debug, Clone)]
pub struct ReplayBuffer<T> {
    capacity: usize,
    items: VecDeque<T>,
}

impl<T> ReplayBuffer<T> {
    /// Creates an empty buffer; `capacity` is clamped to [`MAX_REPLAY_CAPACITY`].
    pub fn new(capacity: usize) -> Self {
        let capacity = clamp(capacity);
        Self {
            capacity,
            items: VecDeque::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Changes the capacity, evicting the oldest entries if it shrinks.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = clamp(capacity);
        self.evict_to(self.capacity);
    }

    /// Appends `item`, evicting the oldest entry when full. No-op at capacity 0.
    pub fn push(&mut self, item: T) {
        if self.capacity == 0 {
            return;
        }
        self.evict_to(self.capacity - 1);
        self.items.push_back(item);
    }

    /// Iterates oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    fn evict_to(&mut self, len: usize) {
        while self.items.len() > len {
            self.items.pop_front();
        }
    }
}

impl<T: Clone> ReplayBuffer<T> {
    /// Copy of the buffered payloads, oldest first.
    pub fn snapshot(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }
}

fn clamp(capacity: usize) -> usize {
    if capacity > MAX_REPLAY_CAPACITY {
        tracing::warn!(
            requested = capacity,
            max = MAX_REPLAY_CAPACITY,
            "replay capacity clamped"
        );
    }
    capacity.min(MAX_REPLAY_CAPACITY)
}
