//! # Raw handler callbacks.
//!
//! A [`Handler`] is a shared callback with **identity**: clones compare equal, two
//! separately created handlers never do, even if they wrap the same code. That is what
//! makes `unregister(&handler)` meaningful for closures.

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use crate::error::HandlerFailure;

type Callback<T> = dyn Fn(&T) + Send + Sync + 'static;

/// Shared, comparable callback receiving `&T`.
///
/// ## Example
/// ```rust
/// use eventscope::Handler;
///
/// let h = Handler::new(|v: &i32| assert!(*v > 0));
/// let same = h.clone();
/// let other = Handler::new(|v: &i32| assert!(*v > 0));
///
/// assert_eq!(h, same);
/// assert_ne!(h, other);
/// h.call(&1);
/// ```
pub struct Handler<T: ?Sized = ()> {
    f: Arc<Callback<T>>,
}

impl<T: ?Sized> Handler<T> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        Self { f: Arc::new(f) }
    }

    #[inline]
    pub fn call(&self, value: &T) {
        (self.f)(value)
    }

    #[inline]
    fn addr(&self) -> *const () {
        Arc::as_ptr(&self.f) as *const ()
    }
}

impl Handler<()> {
    /// Creates a payload-less handler for untyped channels.
    pub fn unit<F>(f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self::new(move |_: &()| f())
    }
}

impl<T: ?Sized> Clone for Handler<T> {
    fn clone(&self) -> Self {
        Self {
            f: Arc::clone(&self.f),
        }
    }
}

impl<T: ?Sized> PartialEq for Handler<T> {
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl<T: ?Sized> Eq for Handler<T> {}

impl<T: ?Sized> fmt::Debug for Handler<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handler({:p})", self.addr())
    }
}

/// Calls every handler with `value`, isolating panics.
///
/// Failures are appended to `failures` with `offset + position` as index.
pub(crate) fn deliver<T: ?Sized>(
    handlers: &[Handler<T>],
    value: &T,
    offset: usize,
    failures: &mut Vec<HandlerFailure>,
) {
    for (i, handler) in handlers.iter().enumerate() {
        if let Err(payload) = catch_unwind(AssertUnwindSafe(|| handler.call(value))) {
            let failure = HandlerFailure::from_panic(offset + i, payload);
            tracing::error!(index = failure.index, panic = %failure.message, "handler panicked");
            failures.push(failure);
        }
    }
}

/// Removes the first handler equal to `handler`; returns whether one was found.
pub(crate) fn remove_first<T: ?Sized>(handlers: &mut Vec<Handler<T>>, handler: &Handler<T>) -> bool {
    match handlers.iter().position(|h| h == handler) {
        Some(pos) => {
            handlers.remove(pos);
            true
        }
        None => false,
    }
}
