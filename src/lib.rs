//! # eventscope
//!
//! **eventscope** provides typed in-process event channels with a replay buffer, plus
//! the instrumentation needed to debug them: one trace record per raise, per-channel
//! breakpoints, a listener registry for "who is listening" queries, and a
//! main-thread dispatcher for work that must run on one designated thread.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────────┐   ┌──────────────────┐   ┌──────────────────┐
//!     │ EventChannel<T>  │   │ EventChannel<U>  │   │ EventChannelBase │
//!     │ handlers, replay │   │ handlers, replay │   │ handlers         │
//!     └────────┬─────────┘   └────────┬─────────┘   └────────┬─────────┘
//!              │ pre_raise / post_raise / listener_*          │
//!              ▼                      ▼                       ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Hub (process-wide service)                                       │
//! │  - DebugWatcher (trace records, breakpoints → BreakHook)          │
//! │  - ListenerRegistry (kind → listener refs, kind catalog)          │
//! │  - TraceBus (broadcast of TraceRecord)                            │
//! │  - Dispatcher (main-thread queue)                                 │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//!                       ┌────────────────────────┐
//!                       │   forwarder (in Hub)   │
//!                       └───────────┬────────────┘
//!                                   ▼
//!                             SubscriberSet
//!                          (per-sub queues)
//!                        ┌──────────┼──────────┐
//!                        ▼          ▼          ▼
//!                    LogWriter  TraceHistory  custom
//! ```
//!
//! ### Raise
//! ```text
//! channel.raise(v)                        (calling thread, synchronous)
//!   ├─► debug_enabled? ─► TraceRecord{kind, origin, value, caller, listeners} ─► TraceBus
//!   ├─► BreakBefore / BreakBeforeOnce? ─► BreakHook      (Once resets to None first)
//!   ├─► base handlers, then typed handlers, in registration order
//!   │       └─ panic ─► caught, remaining handlers still run
//!   ├─► replay.push(v)                    (oldest evicted at capacity)
//!   ├─► BreakAfter / BreakAfterOnce? ─► BreakHook
//!   └─► Err(DeliveryError) if any handler panicked
//! ```
//!
//! ## Features
//! | Area              | Description                                                   | Key types / traits                         |
//! |-------------------|---------------------------------------------------------------|--------------------------------------------|
//! | **Channels**      | Typed and untyped pub/sub with replay to late registrations.  | [`EventChannel`], [`EventChannelBase`]     |
//! | **Callbacks**     | Comparable closures and self-describing listener objects.     | [`Handler`], [`Listener`], [`ListenerRef`] |
//! | **Debugging**     | Trace records, breakpoints, listener registry.                | [`DebugWatcher`], [`BreakHook`], [`ListenerRegistry`] |
//! | **Subscriber API**| Consume trace records asynchronously.                         | [`Subscribe`], [`TraceHistory`], [`LogWriter`] |
//! | **Dispatch**      | Run closures on one designated thread.                        | [`Dispatcher`], [`InitPolicy`]             |
//! | **Errors**        | Typed errors for delivery and dispatch.                       | [`DeliveryError`], [`DispatchError`]       |
//! | **Configuration** | Centralize hub settings.                                      | [`Config`]                                 |
//!
//! ## Example
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use eventscope::{BreakpointMode, ChannelKind, Config, Handler, Hub};
//!
//! let hub = Hub::new(Config { default_replay_capacity: 3, ..Config::default() });
//! let mut trace = hub.subscribe();
//!
//! let score = hub.channel::<u32>(ChannelKind::named("Score"));
//! for v in [10, 20, 30, 40] {
//!     score.raise(v).unwrap();
//! }
//!
//! // Late registration is caught up with the last three payloads.
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let s = Arc::clone(&seen);
//! score.register(Handler::new(move |v: &u32| s.lock().unwrap().push(*v))).unwrap();
//! assert_eq!(*seen.lock().unwrap(), vec![20, 30, 40]);
//!
//! // One trace record per raise.
//! let mut records = 0;
//! while trace.try_recv().is_ok() {
//!     records += 1;
//! }
//! assert_eq!(records, 4);
//!
//! score.set_breakpoint_mode(BreakpointMode::BreakBeforeOnce);
//! score.raise(50).unwrap();
//! assert_eq!(score.breakpoint_mode(), BreakpointMode::None);
//! ```
mod channels;
mod config;
mod core;
mod dispatch;
mod error;
mod events;
mod subscribers;
mod watch;

// ---- Public re-exports ----

pub use channels::{
    Breakpoint, BreakpointMode, EventChannel, EventChannelBase, Handler, Listener, ListenerKey,
    ListenerRef, MAX_REPLAY_CAPACITY, Observation, Replay, ReplayBuffer,
};
pub use config::Config;
pub use core::{Hub, HubBuilder};
pub use dispatch::{Dispatcher, InitPolicy};
pub use error::{DeliveryError, DispatchError, HandlerFailure};
pub use events::{ChannelKind, TraceBus, TraceRecord};
pub use subscribers::{LogWriter, Subscribe, SubscriberSet, TraceHistory};
pub use watch::{BreakContext, BreakHook, DebugWatcher, ListenerRegistry, LogBreak, Phase, Traced};
