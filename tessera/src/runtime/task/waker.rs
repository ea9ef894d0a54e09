use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::task::Waker;

/// Completion signal shared between a task's producer and its handle.
///
/// It records whether the producer is gone (value delivered or task
/// abandoned) and keeps the wakers of async pollers waiting on the
/// handle.
pub(crate) struct Completion {
    /// Set once the producer has been dropped.
    done: AtomicBool,

    /// Wakers registered by pending polls of the handle.
    waiters: Mutex<Vec<Waker>>,
}

impl Completion {
    pub(crate) fn new() -> Self {
        Self {
            done: AtomicBool::new(false),
            waiters: Mutex::new(Vec::new()),
        }
    }

    fn waiters(&self) -> MutexGuard<'_, Vec<Waker>> {
        self.waiters.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns `true` once the producer has finished.
    pub(crate) fn is_done(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }

    /// Registers `waker` to be woken on completion.
    ///
    /// A waker that would wake the same task as an already registered one
    /// is not stored twice.
    pub(crate) fn register(&self, waker: &Waker) {
        let mut waiters = self.waiters();

        if !waiters.iter().any(|w| w.will_wake(waker)) {
            waiters.push(waker.clone());
        }
    }

    /// Marks the producer as finished and wakes every registered waiter.
    pub(crate) fn finish(&self) {
        self.done.store(true, Ordering::Release);

        let waiters = std::mem::take(&mut *self.waiters());
        for waker in waiters {
            waker.wake();
        }
    }
}
