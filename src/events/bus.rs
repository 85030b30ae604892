//! # Trace bus for broadcasting raise records.
//!
//! [`TraceBus`] is a thin wrapper around [`tokio::sync::broadcast`] that provides
//! non-blocking record publishing from any channel on any thread.
//!
//! ## Architecture
//! ```text
//! Publishers (many):                       Consumers (any number):
//!   EventChannel<A> ──┐
//!   EventChannel<B> ──┼──► DebugWatcher ──► TraceBus ──┬──► Hub forwarder ──► SubscriberSet
//!   EventChannelBase ─┘                   (broadcast)  └──► tooling receivers (Hub::subscribe)
//! ```
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never blocks and never needs a runtime.
//! - **Bounded capacity**: a single ring buffer stores recent records for all receivers.
//! - **Lag handling**: slow receivers get `RecvError::Lagged(n)` and skip `n` oldest records.
//! - **No persistence**: records are lost if there are no active receivers at send time.

use tokio::sync::broadcast;

use super::record::TraceRecord;

/// Broadcast channel for trace records.
///
/// ### Properties
/// - **Non-blocking**: `publish()` returns immediately (send clones internally).
/// - **Fire-and-forget**: no delivery or durability guarantees.
/// - **Cloneable**: cheap to clone (internally holds an `Arc`-backed sender).
#[derive(Clone, Debug)]
pub struct TraceBus {
    tx: broadcast::Sender<TraceRecord>,
}

impl TraceBus {
    /// Creates a new bus with the given ring capacity (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _rx) = broadcast::channel::<TraceRecord>(capacity);
        Self { tx }
    }

    /// Publishes a record to all active receivers.
    ///
    /// If there are no receivers the record is dropped.
    pub fn publish(&self, rec: TraceRecord) {
        let _ = self.tx.send(rec);
    }

    /// Creates a new receiver that observes subsequently published records.
    pub fn subscribe(&self) -> broadcast::Receiver<TraceRecord> {
        self.tx.subscribe()
    }

    /// Number of live receivers.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ChannelKind;

    #[test]
    fn test_publish_without_receivers_is_silent() {
        let bus = TraceBus::new(0);
        bus.publish(TraceRecord::new(ChannelKind::named("A")));
        assert_eq!(bus.receiver_count(), 0);
    }

    #[test]
    fn test_receiver_sees_records_after_subscribe() {
        let bus = TraceBus::new(4);
        bus.publish(TraceRecord::new(ChannelKind::named("before")));

        let mut rx = bus.subscribe();
        bus.publish(TraceRecord::new(ChannelKind::named("after")));

        let rec = rx.try_recv().unwrap();
        assert_eq!(rec.kind().name(), "after");
        assert!(rx.try_recv().is_err());
    }
}
