//! # Hub: process-wide event service.
//!
//! The [`Hub`] owns what every channel shares: the trace bus, the listener registry,
//! the debug watcher, the break hook and the main-thread dispatcher. It replaces
//! implicit per-type statics with one explicit service that has a defined start
//! ([`Hub::builder`]) and end ([`Hub::shutdown`]).
//!
//! ## Architecture
//! ```text
//! HubBuilder::build()
//!     ├─► TraceBus (broadcast, trace_capacity)
//!     ├─► ListenerRegistry
//!     ├─► DebugWatcher (bus + registry + BreakHook)
//!     ├─► Dispatcher (dispatch_policy)
//!     └─► SubscriberSet + forwarder task (if subscribers)
//!
//! hub.channel::<T>(kind) ──► Arc<EventChannel<T>> sharing the watcher
//!
//! forwarder:  TraceBus ──recv──► SubscriberSet::emit ──► workers
//!                 └─ cancelled ─► drain what is left, stop
//! ```
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use eventscope::{ChannelKind, Config, Handler, Hub, Subscribe, TraceHistory};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let history = Arc::new(TraceHistory::new(16));
//!     let hub = Hub::builder(Config::default())
//!         .with_subscribers(vec![history.clone() as Arc<dyn Subscribe>])
//!         .build();
//!
//!     let hp = hub.channel::<i32>(ChannelKind::named("PlayerHp"));
//!     hp.register(Handler::new(|v: &i32| assert!(*v <= 100))).unwrap();
//!     hp.raise(90).unwrap();
//!
//!     hub.shutdown().await;
//!     assert_eq!(history.len(), 1);
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::channels::{EventChannel, EventChannelBase, ListenerRef};
use crate::config::Config;
use crate::dispatch::Dispatcher;
use crate::error::DispatchError;
use crate::events::{ChannelKind, TraceRecord};
use crate::subscribers::SubscriberSet;
use crate::watch::{DebugWatcher, ListenerRegistry};

use super::builder::HubBuilder;

/// Process-wide owner of shared channel infrastructure.
pub struct Hub {
    pub(super) cfg: Config,
    pub(super) watcher: Arc<DebugWatcher>,
    pub(super) dispatcher: Arc<Dispatcher>,
    pub(super) token: CancellationToken,
    pub(super) subs: Mutex<Option<Arc<SubscriberSet>>>,
    pub(super) forwarder: Mutex<Option<JoinHandle<()>>>,
}

impl Hub {
    /// Returns a builder for configuring a hub.
    pub fn builder(cfg: Config) -> HubBuilder {
        HubBuilder::new(cfg)
    }

    /// Creates a hub without subscribers.
    pub fn new(cfg: Config) -> Arc<Self> {
        HubBuilder::new(cfg).build()
    }

    /// Creates a runtime typed channel with the configured replay capacity and debug flag.
    pub fn channel<T>(&self, kind: ChannelKind) -> Arc<EventChannel<T>>
    where
        T: Clone + fmt::Debug + Send + 'static,
    {
        Arc::new(self.typed(kind))
    }

    /// Creates a typed channel bound to an origin (asset path or similar).
    pub fn channel_at<T>(&self, kind: ChannelKind, origin: impl Into<Arc<str>>) -> Arc<EventChannel<T>>
    where
        T: Clone + fmt::Debug + Send + 'static,
    {
        Arc::new(self.typed(kind).with_origin(origin))
    }

    /// Creates an untyped channel.
    pub fn base_channel(&self, kind: ChannelKind) -> Arc<EventChannelBase> {
        Arc::new(
            EventChannelBase::new(kind, Arc::clone(&self.watcher))
                .with_debug(self.cfg.debug_by_default),
        )
    }

    /// Receives every trace record published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<TraceRecord> {
        self.watcher.bus().subscribe()
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    #[inline]
    pub fn watcher(&self) -> &Arc<DebugWatcher> {
        &self.watcher
    }

    #[inline]
    pub fn registry(&self) -> &Arc<ListenerRegistry> {
        self.watcher.registry()
    }

    #[inline]
    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Listeners registered for `kind`, across every channel of that kind.
    pub fn listeners(&self, kind: &ChannelKind) -> Vec<ListenerRef> {
        self.registry().listeners(kind)
    }

    /// Every kind declared by a channel of this hub, sorted.
    pub fn kinds(&self) -> Vec<ChannelKind> {
        self.registry().kinds()
    }

    /// Drives the dispatcher on the current thread every `drain_period` until
    /// [`shutdown`](Self::shutdown).
    pub async fn run_dispatcher(&self) -> Result<(), DispatchError> {
        self.dispatcher
            .run(self.cfg.drain_period_clamped(), self.token.child_token())
            .await
    }

    /// Stops the forwarder (after it drained the bus) and the subscriber workers.
    ///
    /// Channels keep working afterwards; their records just reach no subscriber.
    pub async fn shutdown(&self) {
        self.token.cancel();

        let forwarder = self.forwarder.lock().take();
        if let Some(handle) = forwarder {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "trace forwarder failed");
            }
        }

        let subs = self.subs.lock().take();
        if let Some(subs) = subs {
            match Arc::try_unwrap(subs) {
                Ok(set) => set.shutdown().await,
                Err(_) => tracing::warn!("subscriber set still shared, workers left running"),
            }
        }
        tracing::debug!("hub shut down");
    }

    fn typed<T>(&self, kind: ChannelKind) -> EventChannel<T>
    where
        T: Clone + fmt::Debug + Send + 'static,
    {
        EventChannel::new(kind, Arc::clone(&self.watcher))
            .with_replay_capacity(self.cfg.replay_capacity_clamped())
            .with_debug(self.cfg.debug_by_default)
    }

    /// Subscribes to the bus and forwards records to the subscriber set.
    pub(super) fn spawn_forwarder(&self) {
        let Some(set) = self.subs.lock().clone() else {
            return;
        };
        let mut rx = self.watcher.bus().subscribe();
        let token = self.token.clone();

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    msg = rx.recv() => match msg {
                        Ok(rec) => set.emit(&rec),
                        Err(broadcast::error::RecvError::Lagged(n)) => {
                            tracing::warn!(skipped = n, "trace forwarder lagged");
                        }
                        Err(broadcast::error::RecvError::Closed) => return,
                    }
                }
            }
            while let Ok(rec) = rx.try_recv() {
                set.emit(&rec);
            }
        });
        *self.forwarder.lock() = Some(handle);
    }
}

impl fmt::Debug for Hub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hub")
            .field("cfg", &self.cfg)
            .field("watcher", &self.watcher)
            .field("dispatcher", &self.dispatcher)
            .field("shut_down", &self.token.is_cancelled())
            .finish_non_exhaustive()
    }
}
