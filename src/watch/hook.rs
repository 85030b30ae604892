//! # Break hooks.
//!
//! "Breaking" pauses the host for inspection. This crate does not own that concept;
//! it calls a [`BreakHook`] at the moment a breakpoint trips and lets the host decide
//! what a break means (pause a game loop, trap into a debugger, record it, log it).
//!
//! The default [`LogBreak`] emits a `tracing` warning and returns.

use std::sync::Arc;

use crate::channels::BreakpointMode;
use crate::events::ChannelKind;

/// Raise phase at which a breakpoint was evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// After tracing, before any handler runs.
    Before,
    /// After every handler ran and the replay buffer was updated.
    After,
}

/// Everything a hook gets to know about a tripped breakpoint.
#[derive(Debug, Clone)]
pub struct BreakContext {
    /// Kind of the channel that tripped.
    pub kind: ChannelKind,
    /// Origin of the channel, if any.
    pub origin: Option<Arc<str>>,
    /// Phase at which the breakpoint tripped.
    pub phase: Phase,
    /// Mode that tripped. For `*Once` modes the channel already reads back `None`.
    pub mode: BreakpointMode,
}

/// Host-defined reaction to a tripped breakpoint.
///
/// Called synchronously on the raising thread, outside every channel lock.
pub trait BreakHook: Send + Sync + 'static {
    fn on_break(&self, ctx: &BreakContext);
}

/// Default hook: logs the break and continues.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogBreak;

impl BreakHook for LogBreak {
    fn on_break(&self, ctx: &BreakContext) {
        tracing::warn!(
            kind = %ctx.kind,
            origin = ctx.origin.as_deref().unwrap_or(""),
            phase = ?ctx.phase,
            mode = ?ctx.mode,
            "breakpoint hit"
        );
    }
}

impl<F> BreakHook for F
where
    F: Fn(&BreakContext) + Send + Sync + 'static,
{
    fn on_break(&self, ctx: &BreakContext) {
        self(ctx)
    }
}
