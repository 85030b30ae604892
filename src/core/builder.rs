use std::sync::Arc;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use crate::{
    config::Config,
    dispatch::Dispatcher,
    events::TraceBus,
    subscribers::{Subscribe, SubscriberSet},
    watch::{BreakHook, DebugWatcher, ListenerRegistry, LogBreak},
};

use super::hub::Hub;

/// Builder for constructing a [`Hub`] with optional features.
pub struct HubBuilder {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
    hook: Option<Arc<dyn BreakHook>>,
}

impl HubBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
            hook: None,
        }
    }

    /// Sets trace subscribers.
    ///
    /// Subscribers receive every trace record through dedicated workers with bounded
    /// queues. They need a tokio runtime at [`build`](Self::build) time.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Sets the reaction to tripped breakpoints (default: [`LogBreak`]).
    pub fn with_break_hook(mut self, hook: Arc<dyn BreakHook>) -> Self {
        self.hook = Some(hook);
        self
    }

    /// Builds and returns the Hub instance.
    ///
    /// This consumes the builder and initializes all components:
    /// - Trace bus and listener registry shared by every channel of the hub
    /// - Debug watcher with the configured break hook
    /// - Main-thread dispatcher (unbound)
    /// - Subscriber workers and the bus forwarder, when subscribers were given
    ///
    /// Without a tokio runtime, configured subscribers are skipped with an error log.
    pub fn build(self) -> Arc<Hub> {
        let bus = TraceBus::new(self.cfg.trace_capacity_clamped());
        let registry = Arc::new(ListenerRegistry::new());
        let hook = self.hook.unwrap_or_else(|| Arc::new(LogBreak));
        let watcher = Arc::new(
            DebugWatcher::new(bus, registry, hook).with_backtraces(self.cfg.capture_backtrace),
        );
        let dispatcher = Arc::new(Dispatcher::new(self.cfg.dispatch_policy));
        let token = CancellationToken::new();

        let subs = if self.subscribers.is_empty() {
            None
        } else if tokio::runtime::Handle::try_current().is_err() {
            tracing::error!(
                subscribers = self.subscribers.len(),
                "no tokio runtime, trace subscribers disabled"
            );
            None
        } else {
            Some(Arc::new(SubscriberSet::new(self.subscribers)))
        };

        let hub = Arc::new(Hub {
            cfg: self.cfg,
            watcher,
            dispatcher,
            token,
            subs: Mutex::new(subs),
            forwarder: Mutex::new(None),
        });
        hub.spawn_forwarder();
        hub
    }
}
