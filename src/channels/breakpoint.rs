//! # Breakpoint modes.
//!
//! [`BreakpointMode`] decides whether a raise "breaks" before or after its handlers,
//! once or every time. [`Breakpoint`] stores the mode atomically and performs the
//! trip-and-reset step used by the watcher.

use std::sync::atomic::{AtomicU8, Ordering};

use crate::watch::Phase;

/// When a raise should break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum BreakpointMode {
    /// Never break (default).
    #[default]
    None = 0,
    /// Break before the next raise only, then reset to `None`.
    BreakBeforeOnce = 1,
    /// Break before every raise.
    BreakBefore = 2,
    /// Break after the next raise only, then reset to `None`.
    BreakAfterOnce = 3,
    /// Break after every raise.
    BreakAfter = 4,
}

impl BreakpointMode {
    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Self::BreakBeforeOnce,
            2 => Self::BreakBefore,
            3 => Self::BreakAfterOnce,
            4 => Self::BreakAfter,
            _ => Self::None,
        }
    }

    /// Phase this mode breaks at; `None` for [`BreakpointMode::None`].
    pub fn phase(self) -> Option<Phase> {
        match self {
            Self::None => None,
            Self::BreakBeforeOnce | Self::BreakBefore => Some(Phase::Before),
            Self::BreakAfterOnce | Self::BreakAfter => Some(Phase::After),
        }
    }

    #[inline]
    pub fn is_once(self) -> bool {
        matches!(self, Self::BreakBeforeOnce | Self::BreakAfterOnce)
    }
}

/// Atomic holder of a channel's [`BreakpointMode`].
#[derive(Debug, Default)]
pub struct Breakpoint {
    mode: AtomicU8,
}

impl Breakpoint {
    pub fn new(mode: BreakpointMode) -> Self {
        Self {
            mode: AtomicU8::new(mode as u8),
        }
    }

    #[inline]
    pub fn mode(&self) -> BreakpointMode {
        BreakpointMode::from_u8(self.mode.load(Ordering::Acquire))
    }

    #[inline]
    pub fn set(&self, mode: BreakpointMode) {
        self.mode.store(mode as u8, Ordering::Release);
    }

    /// Evaluates the breakpoint for `phase`.
    ///
    /// Returns the mode that tripped, or `None`. A `*Once` mode is reset to
    /// [`BreakpointMode::None`] in the same atomic step that trips it.
    pub fn trip(&self, phase: Phase) -> Option<BreakpointMode> {
        let mut tripped = None;
        let _ = self
            .mode
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |raw| {
                let mode = BreakpointMode::from_u8(raw);
                if mode.phase() != Some(phase) {
                    tripped = None;
                    return None;
                }
                tripped = Some(mode);
                if mode.is_once() {
                    Some(BreakpointMode::None as u8)
                } else {
                    None
                }
            });
        tripped
    }
}
