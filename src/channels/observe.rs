//! # Async observation of a typed channel.
//!
//! [`EventChannel::observe`] bridges the synchronous handler world to async code: a
//! handler forwards every payload into an unbounded tokio channel, and the returned
//! [`Observation`] is the receiving end. Dropping the observation unregisters the
//! forwarding handler.

use std::fmt;
use std::pin::Pin;
use std::sync::{Arc, Weak};
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;

use super::channel::{EventChannel, Replay};
use super::handler::Handler;

/// Receiving end of [`EventChannel::observe`].
///
/// Also a [`Stream`] of payloads.
pub struct Observation<T: Clone + fmt::Debug + Send + 'static> {
    channel: Weak<EventChannel<T>>,
    handler: Handler<T>,
    rx: mpsc::UnboundedReceiver<T>,
}

impl<T> Observation<T>
where
    T: Clone + fmt::Debug + Send + 'static,
{
    /// Waits for the next payload.
    pub async fn recv(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    /// Takes a queued payload without waiting.
    pub fn try_recv(&mut self) -> Option<T> {
        self.rx.try_recv().ok()
    }
}

impl<T> EventChannel<T>
where
    T: Clone + fmt::Debug + Send + 'static,
{
    /// Observes every later payload, starting with the current replay buffer.
    ///
    /// ## Example
    /// ```rust
    /// use std::sync::Arc;
    /// use eventscope::{ChannelKind, DebugWatcher, EventChannel};
    ///
    /// let ch = Arc::new(EventChannel::<u32>::new(ChannelKind::named("Tick"), DebugWatcher::standalone()));
    /// ch.raise(1).unwrap();
    ///
    /// let mut obs = ch.observe();
    /// ch.raise(2).unwrap();
    /// assert_eq!(obs.try_recv(), Some(1));
    /// assert_eq!(obs.try_recv(), Some(2));
    /// ```
    pub fn observe(self: &Arc<Self>) -> Observation<T> {
        let (tx, rx) = mpsc::unbounded_channel();
        let handler = Handler::new(move |value: &T| {
            let _ = tx.send(value.clone());
        });
        if let Err(e) = self.register_with(handler.clone(), Replay::Deliver) {
            tracing::error!(kind = %self.kind(), error = %e, "observation replay failed");
        }
        Observation {
            channel: Arc::downgrade(self),
            handler,
            rx,
        }
    }
}

impl<T> Stream for Observation<T>
where
    T: Clone + fmt::Debug + Send + 'static,
{
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        self.rx.poll_recv(cx)
    }
}

impl<T> Drop for Observation<T>
where
    T: Clone + fmt::Debug + Send + 'static,
{
    fn drop(&mut self) {
        if let Some(channel) = self.channel.upgrade() {
            channel.unregister(&self.handler);
        }
    }
}

impl<T> fmt::Debug for Observation<T>
where
    T: Clone + fmt::Debug + Send + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observation")
            .field("handler", &self.handler)
            .field("alive", &(self.channel.strong_count() > 0))
            .finish()
    }
}
