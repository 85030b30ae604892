//! # Event channels.
//!
//! A channel is a pub/sub endpoint for one event kind. Handlers run synchronously on the
//! raising thread, in registration order; a panicking handler is isolated and reported
//! after the others ran.
//!
//! - [`EventChannelBase`] untyped channel: `raise()` with no payload.
//! - [`EventChannel<T>`] typed channel with a bounded [`ReplayBuffer`] delivered to late
//!   registrations. It embeds a base whose handlers also fire on every typed raise.
//! - [`Handler`] comparable callback; [`Listener`] self-describing callback object
//!   tracked by the [`ListenerRegistry`](crate::ListenerRegistry).
//! - [`Breakpoint`] atomic [`BreakpointMode`] consulted before and after handlers run.
//! - [`Observation`] async receiver created by [`EventChannel::observe`].
//!
//! ```text
//! producer ──raise(v)──► EventChannel<T>
//!                          │ pre_raise ──► DebugWatcher ──► TraceBus
//!                          │ base handlers ─► typed handlers
//!                          │ replay.push(v)
//!                          └ post_raise ─► DebugWatcher
//! ```

mod base;
mod breakpoint;
mod channel;
mod handler;
mod listener;
mod observe;
mod replay;

pub use base::EventChannelBase;
pub use breakpoint::{Breakpoint, BreakpointMode};
pub use channel::{EventChannel, Replay};
pub use handler::Handler;
pub use listener::{Listener, ListenerKey, ListenerRef};
pub use observe::Observation;
pub use replay::{MAX_REPLAY_CAPACITY, ReplayBuffer};
