//! Error types used by event channels and the dispatcher.
//!
//! This module defines two main error enums:
//!
//! - [`DeliveryError`] — one or more handlers panicked while a payload was delivered.
//! - [`DispatchError`] — the main-thread dispatcher was used outside its contract.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging.
//! Registry misses and unknown unregistrations are **not** errors: they are logged
//! and skipped at the point where they happen.

use std::any::Any;

use thiserror::Error;

use crate::events::ChannelKind;

/// A single handler that panicked during delivery.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HandlerFailure {
    /// Position of the handler in delivery order (base handlers first, then typed).
    pub index: usize,
    /// Panic payload rendered as text.
    pub message: String,
}

impl HandlerFailure {
    pub(crate) fn from_panic(index: usize, payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(msg) = payload.downcast_ref::<&'static str>() {
            (*msg).to_string()
        } else if let Some(msg) = payload.downcast_ref::<String>() {
            msg.clone()
        } else {
            "unknown panic".to_string()
        };
        Self { index, message }
    }
}

/// # Errors produced while delivering a payload to handlers.
///
/// Failures are isolated per handler: every handler still runs, and the error is
/// returned to the caller only after the whole raise (or replay) has completed.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum DeliveryError {
    /// One or more handlers panicked.
    #[error("{} handler(s) panicked on channel {kind}", failures.len())]
    HandlersPanicked {
        /// Kind of the channel that was delivering.
        kind: ChannelKind,
        /// Every failed handler, in delivery order.
        failures: Vec<HandlerFailure>,
    },
}

impl DeliveryError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use eventscope::{ChannelKind, DeliveryError};
    ///
    /// let err = DeliveryError::HandlersPanicked { kind: ChannelKind::named("Score"), failures: vec![] };
    /// assert_eq!(err.as_label(), "delivery_handlers_panicked");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            DeliveryError::HandlersPanicked { .. } => "delivery_handlers_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            DeliveryError::HandlersPanicked { kind, failures } => {
                let detail: Vec<String> = failures
                    .iter()
                    .map(|f| format!("#{}: {}", f.index, f.message))
                    .collect();
                format!("channel={kind} failures=[{}]", detail.join("; "))
            }
        }
    }

    /// Returns the failed handlers.
    pub fn failures(&self) -> &[HandlerFailure] {
        match self {
            DeliveryError::HandlersPanicked { failures, .. } => failures,
        }
    }

    pub(crate) fn check(kind: &ChannelKind, failures: Vec<HandlerFailure>) -> Result<(), Self> {
        if failures.is_empty() {
            Ok(())
        } else {
            Err(DeliveryError::HandlersPanicked {
                kind: kind.clone(),
                failures,
            })
        }
    }
}

/// # Errors produced by the main-thread dispatcher.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchError {
    /// No designated thread yet and the dispatcher runs with `InitPolicy::Strict`,
    /// or a drain step was attempted before binding.
    #[error("dispatcher is not bound to a thread")]
    NotBound,

    /// The dispatcher is already bound to a different thread.
    #[error("dispatcher is already bound to another thread")]
    AlreadyBound,

    /// A drain step was attempted from a thread other than the designated one.
    #[error("drain attempted off the designated thread")]
    WrongThread,
}

impl DispatchError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use eventscope::DispatchError;
    ///
    /// assert_eq!(DispatchError::NotBound.as_label(), "dispatch_not_bound");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            DispatchError::NotBound => "dispatch_not_bound",
            DispatchError::AlreadyBound => "dispatch_already_bound",
            DispatchError::WrongThread => "dispatch_wrong_thread",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        self.to_string()
    }
}
