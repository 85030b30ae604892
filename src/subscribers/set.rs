//! # Non-blocking trace fan-out to multiple subscribers.
//!
//! [`SubscriberSet`] distributes each [`TraceRecord`] to multiple subscribers without
//! awaiting their processing.
//!
//! ## Architecture
//! ```text
//! emit(record)
//!     │
//!     ├──► [queue 1] ──► worker 1 ──► subscriber1.on_record()
//!     │    (bounded)         └──────► panic → error! log
//!     ├──► [queue 2] ──► worker 2 ──► subscriber2.on_record()
//!     │    (bounded)
//!     └──► [queue N] ──► worker N ──► subscriberN.on_record()
//!          (bounded)
//! ```
//!
//! ## Rules
//! - **No cross-subscriber ordering**: A may process record N while B processes N+5
//! - **Overflow**: record dropped for that subscriber only (warn)
//! - **Non-blocking**: `emit()` returns immediately (uses `try_send`)
//! - **Per-subscriber FIFO**: each subscriber sees records in bus order
//!
//! **Warning**: `AssertUnwindSafe` is used, which can leave shared state inconsistent
//! if a subscriber panics while holding a lock.

use std::sync::Arc;

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::error::HandlerFailure;
use crate::events::TraceRecord;

use super::Subscribe;

/// Per-subscriber channel metadata.
struct SubscriberChannel {
    name: &'static str,
    sender: mpsc::Sender<Arc<TraceRecord>>,
}

/// Fan-out coordinator for trace subscribers.
pub struct SubscriberSet {
    channels: Vec<SubscriberChannel>,
    workers: Vec<JoinHandle<()>>,
}

impl SubscriberSet {
    /// Creates a new set and spawns one worker task per subscriber.
    ///
    /// Must be called inside a tokio runtime. Minimum queue capacity is 1.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>) -> Self {
        let mut channels = Vec::with_capacity(subs.len());
        let mut workers = Vec::with_capacity(subs.len());

        for sub in subs {
            let cap = sub.queue_capacity().max(1);
            let name = sub.name();
            let (tx, mut rx) = mpsc::channel::<Arc<TraceRecord>>(cap);
            let s = Arc::clone(&sub);

            let handle = tokio::spawn(async move {
                while let Some(rec) = rx.recv().await {
                    let fut = s.on_record(rec.as_ref());
                    if let Err(panic_err) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                        let failure = HandlerFailure::from_panic(0, panic_err);
                        tracing::error!(
                            subscriber = s.name(),
                            seq = rec.seq(),
                            panic = %failure.message,
                            "subscriber panicked"
                        );
                    }
                }
            });
            channels.push(SubscriberChannel { name, sender: tx });
            workers.push(handle);
        }
        Self { channels, workers }
    }

    /// Emits a record to all subscribers (clones it once into an `Arc`).
    pub fn emit(&self, record: &TraceRecord) {
        self.emit_arc(Arc::new(record.clone()));
    }

    /// Emits a shared record to all subscribers.
    ///
    /// A full or closed queue drops the record for that subscriber and logs a warning.
    pub fn emit_arc(&self, record: Arc<TraceRecord>) {
        for channel in &self.channels {
            match channel.sender.try_send(Arc::clone(&record)) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    tracing::warn!(subscriber = channel.name, seq = record.seq(), "record dropped: queue full");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    tracing::warn!(subscriber = channel.name, seq = record.seq(), "record dropped: worker closed");
                }
            }
        }
    }

    /// Gracefully shuts down all subscriber workers.
    ///
    /// 1. Drops all channel senders (workers see channel closed)
    /// 2. Awaits all worker tasks to finish
    pub async fn shutdown(self) {
        drop(self.channels);
        for h in self.workers {
            let _ = h.await;
        }
    }

    /// True if there are no subscribers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Number of subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.channels.len()
    }
}
