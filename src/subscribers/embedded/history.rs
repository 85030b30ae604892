//! # Bounded history of recent trace records.
//!
//! Keeps the last `limit` records for tooling (an event tracker window, a test
//! assertion). Records are kept in `seq` order; a record that arrives with a `seq`
//! lower than the newest one is inserted at its place.
//!
//! ## Architecture
//! ```text
//! TraceBus ──► SubscriberSet ──► TraceHistory::on_record()
//!                                        │
//!                                        ▼
//!                              VecDeque<TraceRecord>  (oldest evicted at limit)
//! ```
//!
//! ## Example
//! ```rust
//! use eventscope::{ChannelKind, TraceHistory, TraceRecord};
//!
//! let history = TraceHistory::new(2);
//! for name in ["A", "B", "C"] {
//!     history.push(TraceRecord::new(ChannelKind::named(name)));
//! }
//! let names: Vec<String> = history.snapshot().iter().map(|r| r.name().to_string()).collect();
//! assert_eq!(names, vec!["B", "C"]);
//! ```

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::events::{ChannelKind, TraceRecord};
use crate::subscribers::Subscribe;

/// Thread-safe ring of the most recent trace records.
pub struct TraceHistory {
    limit: usize,
    records: RwLock<VecDeque<TraceRecord>>,
}

impl TraceHistory {
    /// Creates a history keeping at most `limit` records (min 1).
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            limit,
            records: RwLock::new(VecDeque::with_capacity(limit)),
        }
    }

    #[inline]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Stores `record`, evicting the oldest one at the limit.
    pub fn push(&self, record: TraceRecord) {
        let mut records = self.records.write();
        let pos = records.partition_point(|r| r.seq() < record.seq());
        records.insert(pos, record);
        while records.len() > self.limit {
            records.pop_front();
        }
    }

    /// Copy of the stored records, oldest first.
    pub fn snapshot(&self) -> Vec<TraceRecord> {
        self.records.read().iter().cloned().collect()
    }

    /// Stored records of one kind, oldest first.
    pub fn of_kind(&self, kind: &ChannelKind) -> Vec<TraceRecord> {
        self.records
            .read()
            .iter()
            .filter(|r| r.kind() == kind)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    pub fn clear(&self) {
        self.records.write().clear();
    }
}

#[async_trait]
impl Subscribe for TraceHistory {
    async fn on_record(&self, record: &TraceRecord) {
        self.push(record.clone());
    }

    fn name(&self) -> &'static str {
        "TraceHistory"
    }
}
