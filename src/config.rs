//! # Global hub configuration.
//!
//! Provides [`Config`] centralized settings for the [`Hub`](crate::Hub).
//!
//! Config is used in two ways:
//! 1. **Hub creation**: `Hub::builder(config).build()` sizes the trace bus and the dispatcher.
//! 2. **Channel defaults**: `Hub::channel` seeds replay capacity and the debug flag.
//!
//! ## Sentinel values
//! - `trace_capacity = 0` → clamped to 1 by the bus
//! - `default_replay_capacity > 10` → clamped to [`MAX_REPLAY_CAPACITY`]
//! - `drain_period = 0s` → clamped to 1ms by the dispatcher driver

use std::time::Duration;

use crate::channels::MAX_REPLAY_CAPACITY;
use crate::dispatch::InitPolicy;

/// Global configuration for the event hub.
///
/// ## Field semantics
/// - `trace_capacity`: trace bus ring buffer size (min 1)
/// - `default_replay_capacity`: replay capacity of newly created channels (0..=10)
/// - `debug_by_default`: whether new channels start with tracing enabled
/// - `capture_backtrace`: attach a full backtrace to every trace record
/// - `dispatch_policy`: how the dispatcher treats `invoke` before a thread is bound
/// - `drain_period`: tick period of [`Dispatcher::run`](crate::Dispatcher::run)
#[derive(Clone, Debug)]
pub struct Config {
    /// Capacity of the trace bus broadcast ring buffer.
    ///
    /// Subscribers that lag behind more than `trace_capacity` records skip the oldest ones.
    pub trace_capacity: usize,

    /// Replay capacity given to channels created through the hub.
    pub default_replay_capacity: usize,

    /// Initial value of each new channel's `debug_enabled` flag.
    pub debug_by_default: bool,

    /// Capture a `std::backtrace::Backtrace` per trace record.
    ///
    /// The `#[track_caller]` call site is always recorded; this adds the full stack.
    pub capture_backtrace: bool,

    /// Initialization contract of the main-thread dispatcher.
    pub dispatch_policy: InitPolicy,

    /// Tick period used when the dispatcher drives itself.
    pub drain_period: Duration,
}

impl Config {
    /// Returns a trace bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn trace_capacity_clamped(&self) -> usize {
        self.trace_capacity.max(1)
    }

    /// Returns the default replay capacity clamped to `0..=MAX_REPLAY_CAPACITY`.
    #[inline]
    pub fn replay_capacity_clamped(&self) -> usize {
        self.default_replay_capacity.min(MAX_REPLAY_CAPACITY)
    }

    /// Returns the drain period clamped to a minimum of 1ms.
    #[inline]
    pub fn drain_period_clamped(&self) -> Duration {
        self.drain_period.max(Duration::from_millis(1))
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `trace_capacity = 1024`
    /// - `default_replay_capacity = 1`
    /// - `debug_by_default = true`
    /// - `capture_backtrace = false`
    /// - `dispatch_policy = InitPolicy::Deferred`
    /// - `drain_period = 16ms` (one frame at 60Hz)
    fn default() -> Self {
        Self {
            trace_capacity: 1024,
            default_replay_capacity: 1,
            debug_by_default: true,
            capture_backtrace: false,
            dispatch_policy: InitPolicy::default(),
            drain_period: Duration::from_millis(16),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamps() {
        let cfg = Config {
            trace_capacity: 0,
            default_replay_capacity: 42,
            drain_period: Duration::ZERO,
            ..Config::default()
        };
        assert_eq!(cfg.trace_capacity_clamped(), 1);
        assert_eq!(cfg.replay_capacity_clamped(), MAX_REPLAY_CAPACITY);
        assert_eq!(cfg.drain_period_clamped(), Duration::from_millis(1));
    }

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.replay_capacity_clamped(), 1);
        assert!(cfg.debug_by_default);
        assert_eq!(cfg.dispatch_policy, InitPolicy::Deferred);
    }
}
