//! # Instrumentation layer.
//!
//! Cross-cutting debug support injected into every raise path.
//!
//! ## Contents
//! - [`DebugWatcher`] produces [`TraceRecord`](crate::TraceRecord)s, evaluates breakpoints,
//!   and forwards listener (un)registrations to the registry
//! - [`Traced`] the channel-side view the watcher works against
//! - [`ListenerRegistry`] per-kind listener lists for introspection (never used for delivery)
//! - [`BreakHook`] host reaction to a tripped breakpoint; [`LogBreak`] is the default
//!
//! ## Breakpoint state machine
//! ```text
//!   None ──set──► BreakBefore ───── raise ──► break before, stays
//!        ──set──► BreakBeforeOnce ─ raise ──► reset to None, then break before
//!        ──set──► BreakAfter ────── raise ──► break after, stays
//!        ──set──► BreakAfterOnce ── raise ──► reset to None, then break after
//! ```
//! The reset and the trip are one atomic step, so a `*Once` mode trips exactly once
//! even under concurrent raises.

mod hook;
mod registry;
mod watcher;

pub use hook::{BreakContext, BreakHook, LogBreak, Phase};
pub use registry::ListenerRegistry;
pub use watcher::{DebugWatcher, Traced};
