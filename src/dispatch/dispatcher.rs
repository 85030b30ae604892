//! # Main-thread dispatcher.
//!
//! Marshals closures onto one designated thread. Other threads enqueue; the designated
//! thread drains the queue one action per tick.
//!
//! ## Architecture
//! ```text
//! any thread ──invoke(f)──► on designated thread? ──yes──► f() inline
//!                                    │ no
//!                                    ▼
//!                        Mutex<VecDeque<Action>>  (FIFO, unbounded)
//!                                    │
//! designated thread ──tick()──► pop one (lock released) ──► f()  panics logged
//! ```
//!
//! ## Rules
//! - `invoke` never blocks on the designated thread; it only takes the queue lock.
//! - `tick` runs **at most one** action and releases the lock before running it, so the
//!   action may call `invoke` again.
//! - Before a thread is bound, [`InitPolicy`] decides: `Deferred` queues the action,
//!   `Strict` rejects it with [`DispatchError::NotBound`].
//! - Every queued action runs exactly once, as long as someone keeps ticking.

use std::collections::VecDeque;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::thread::{self, ThreadId};
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;

use crate::error::{DispatchError, HandlerFailure};

type Action = Box<dyn FnOnce() + Send + 'static>;

/// What [`Dispatcher::invoke`] does while no thread is designated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitPolicy {
    /// Queue the action; it runs after binding, one per tick.
    #[default]
    Deferred,
    /// Reject the action with [`DispatchError::NotBound`].
    Strict,
}

/// FIFO of deferred actions executed on one designated thread.
pub struct Dispatcher {
    owner: RwLock<Option<ThreadId>>,
    queue: Mutex<VecDeque<Action>>,
    policy: InitPolicy,
}

impl Dispatcher {
    pub fn new(policy: InitPolicy) -> Self {
        Self {
            owner: RwLock::new(None),
            queue: Mutex::new(VecDeque::new()),
            policy,
        }
    }

    #[inline]
    pub fn policy(&self) -> InitPolicy {
        self.policy
    }

    /// Designates the calling thread. Binding the same thread twice is a no-op.
    pub fn bind_current_thread(&self) -> Result<(), DispatchError> {
        let me = thread::current().id();
        let mut owner = self.owner.write();
        match *owner {
            Some(id) if id != me => Err(DispatchError::AlreadyBound),
            Some(_) => Ok(()),
            None => {
                *owner = Some(me);
                tracing::debug!(thread = ?me, pending = self.pending(), "dispatcher bound");
                Ok(())
            }
        }
    }

    /// Releases the designated thread. Queued actions stay queued.
    pub fn unbind(&self) {
        if let Some(id) = self.owner.write().take() {
            tracing::debug!(thread = ?id, "dispatcher unbound");
        }
    }

    pub fn is_bound(&self) -> bool {
        self.owner.read().is_some()
    }

    pub fn is_designated_thread(&self) -> bool {
        *self.owner.read() == Some(thread::current().id())
    }

    /// Runs `action` inline on the designated thread, otherwise queues it.
    pub fn invoke<F>(&self, action: F) -> Result<(), DispatchError>
    where
        F: FnOnce() + Send + 'static,
    {
        let owner = *self.owner.read();
        match owner {
            Some(id) if id == thread::current().id() => {
                action();
                Ok(())
            }
            Some(_) => {
                self.enqueue(Box::new(action));
                Ok(())
            }
            None => match self.policy {
                InitPolicy::Deferred => {
                    self.enqueue(Box::new(action));
                    Ok(())
                }
                InitPolicy::Strict => {
                    tracing::warn!("invoke before a thread was designated");
                    Err(DispatchError::NotBound)
                }
            },
        }
    }

    /// One drain step: runs the oldest queued action, if any.
    ///
    /// Returns `Ok(true)` when an action ran. Must be called on the designated thread.
    pub fn tick(&self) -> Result<bool, DispatchError> {
        match *self.owner.read() {
            None => return Err(DispatchError::NotBound),
            Some(id) if id != thread::current().id() => return Err(DispatchError::WrongThread),
            Some(_) => {}
        }

        let Some(action) = self.queue.lock().pop_front() else {
            return Ok(false);
        };
        if let Err(payload) = catch_unwind(AssertUnwindSafe(action)) {
            let failure = HandlerFailure::from_panic(0, payload);
            tracing::error!(panic = %failure.message, "dispatched action panicked");
        }
        Ok(true)
    }

    /// Number of queued actions.
    pub fn pending(&self) -> usize {
        self.queue.lock().len()
    }

    /// Binds the current thread and ticks every `period` until `token` is cancelled,
    /// then unbinds.
    ///
    /// The future must stay on one thread: drive it with a current-thread runtime or a
    /// `LocalSet`.
    pub async fn run(&self, period: Duration, token: CancellationToken) -> Result<(), DispatchError> {
        self.bind_current_thread()?;
        let mut ticker = tokio::time::interval(period.max(Duration::from_millis(1)));
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        let res = loop {
            tokio::select! {
                _ = token.cancelled() => break Ok(()),
                _ = ticker.tick() => {
                    if let Err(e) = self.tick() {
                        break Err(e);
                    }
                }
            }
        };
        self.unbind();
        res
    }

    fn enqueue(&self, action: Action) {
        let mut queue = self.queue.lock();
        queue.push_back(action);
        tracing::trace!(pending = queue.len(), "action queued");
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(InitPolicy::default())
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("owner", &*self.owner.read())
            .field("pending", &self.pending())
            .field("policy", &self.policy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> Arc<AtomicUsize> {
        Arc::new(AtomicUsize::new(0))
    }

    #[test]
    fn test_cross_thread_invoke_runs_on_designated_thread_at_next_tick() {
        let d = Arc::new(Dispatcher::default());
        d.bind_current_thread().unwrap();
        let main = thread::current().id();
        let ran_on = Arc::new(StdMutex::new(Vec::new()));

        let worker = {
            let d = Arc::clone(&d);
            let ran_on = Arc::clone(&ran_on);
            thread::spawn(move || {
                d.invoke(move || ran_on.lock().unwrap().push(thread::current().id()))
                    .unwrap();
            })
        };
        worker.join().unwrap();

        assert!(ran_on.lock().unwrap().is_empty());
        assert_eq!(d.pending(), 1);

        assert!(d.tick().unwrap());
        assert_eq!(*ran_on.lock().unwrap(), vec![main]);
        assert!(!d.tick().unwrap());
    }

    #[test]
    fn test_invoke_on_designated_thread_is_inline() {
        let d = Dispatcher::default();
        d.bind_current_thread().unwrap();
        let hits = counter();
        let h = Arc::clone(&hits);
        d.invoke(move || {
            h.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(d.pending(), 0);
    }

    #[test]
    fn test_one_action_per_tick_in_fifo_order() {
        let d = Dispatcher::default();
        let order = Arc::new(StdMutex::new(Vec::new()));
        for i in 0..3 {
            let o = Arc::clone(&order);
            d.invoke(move || o.lock().unwrap().push(i)).unwrap();
        }
        d.bind_current_thread().unwrap();

        assert!(d.tick().unwrap());
        assert_eq!(*order.lock().unwrap(), vec![0]);
        assert!(d.tick().unwrap());
        assert!(d.tick().unwrap());
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
        assert!(!d.tick().unwrap());
    }

    #[test]
    fn test_many_producers_keep_per_producer_order() {
        const PRODUCERS: usize = 4;
        const PER_PRODUCER: usize = 25;

        let d = Arc::new(Dispatcher::default());
        d.bind_current_thread().unwrap();
        let order = Arc::new(StdMutex::new(Vec::new()));

        let producers: Vec<_> = (0..PRODUCERS)
            .map(|p| {
                let d = Arc::clone(&d);
                let order = Arc::clone(&order);
                std::thread::spawn(move || {
                    for i in 0..PER_PRODUCER {
                        let o = Arc::clone(&order);
                        d.invoke(move || o.lock().unwrap().push((p, i))).unwrap();
                    }
                })
            })
            .collect();
        for h in producers {
            h.join().unwrap();
        }
        assert_eq!(d.pending(), PRODUCERS * PER_PRODUCER);
        assert!(order.lock().unwrap().is_empty());

        for n in 1..=PRODUCERS * PER_PRODUCER {
            assert!(d.tick().unwrap());
            assert_eq!(order.lock().unwrap().len(), n);
        }
        assert!(!d.tick().unwrap());

        let order = order.lock().unwrap();
        for p in 0..PRODUCERS {
            let seq: Vec<usize> = order.iter().filter(|(q, _)| *q == p).map(|(_, i)| *i).collect();
            assert_eq!(seq, (0..PER_PRODUCER).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_strict_rejects_before_binding() {
        let d = Dispatcher::new(InitPolicy::Strict);
        assert_eq!(d.invoke(|| {}), Err(DispatchError::NotBound));
        assert_eq!(d.pending(), 0);

        d.bind_current_thread().unwrap();
        assert!(d.invoke(|| {}).is_ok());
    }

    #[test]
    fn test_tick_contract() {
        let d = Arc::new(Dispatcher::default());
        assert_eq!(d.tick(), Err(DispatchError::NotBound));

        d.bind_current_thread().unwrap();
        assert!(d.bind_current_thread().is_ok());

        let other = Arc::clone(&d);
        let res = thread::spawn(move || (other.tick(), other.bind_current_thread()))
            .join()
            .unwrap();
        assert_eq!(res, (Err(DispatchError::WrongThread), Err(DispatchError::AlreadyBound)));

        d.unbind();
        assert!(!d.is_bound());
    }

    #[test]
    fn test_action_may_reenter_and_panics_are_contained() {
        let d = Arc::new(Dispatcher::default());
        let hits = counter();

        d.invoke(|| panic!("bad action")).unwrap();
        {
            let inner = Arc::clone(&d);
            let h = Arc::clone(&hits);
            d.invoke(move || {
                let h2 = Arc::clone(&h);
                inner
                    .invoke(move || {
                        h2.fetch_add(1, Ordering::SeqCst);
                    })
                    .unwrap();
                h.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        }
        d.bind_current_thread().unwrap();

        assert!(d.tick().unwrap());
        assert!(d.tick().unwrap());
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_run_drains_until_cancelled() {
        let d = Arc::new(Dispatcher::default());
        let hits = counter();
        for _ in 0..3 {
            let h = Arc::clone(&hits);
            d.invoke(move || {
                h.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        }

        let token = CancellationToken::new();
        let task = {
            let d = Arc::clone(&d);
            let token = token.clone();
            tokio::spawn(async move { d.run(Duration::from_millis(1), token).await })
        };

        while hits.load(Ordering::SeqCst) < 3 {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        token.cancel();
        task.await.unwrap().unwrap();
        assert!(!d.is_bound());
        assert_eq!(d.pending(), 0);
    }
}
