//! # LogWriter: trace records as structured log lines
//!
//! A minimal subscriber that forwards every [`TraceRecord`] to `tracing` at `info`
//! level under the `eventscope::trace` target.
//!
//! ## Example output (fmt subscriber)
//! ```text
//! INFO eventscope::trace: raise seq=12 channel="Score" kind=Score value="42" listeners=1 at=src/game.rs:88:9
//! INFO eventscope::trace: raise seq=13 channel="Respawn" kind=Respawn value="" listeners=0 at=src/game.rs:97:5
//! ```

use async_trait::async_trait;

use crate::events::TraceRecord;
use crate::subscribers::Subscribe;

/// Trace writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_record(&self, r: &TraceRecord) {
        tracing::info!(
            target: "eventscope::trace",
            seq = r.seq(),
            channel = r.name(),
            kind = %r.kind(),
            value = r.value().unwrap_or(""),
            listeners = r.listener_count(),
            at = %r.caller(),
            "raise"
        );
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
