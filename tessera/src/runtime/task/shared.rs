use super::{JoinHandle, TaskId};
use super::waker::Completion;
use crate::error::{Error, Result};
use crate::runtime::context;

use std::fmt;
use std::sync::{Arc, Mutex, OnceLock, PoisonError, TryLockError};
use std::thread;
use std::time::Duration;

/// A cloneable handle that broadcasts one task's outcome to every waiter.
///
/// The first caller to receive from the underlying [`JoinHandle`] caches
/// the outcome; every caller receives a clone of it. Like
/// [`JoinHandle::join`], a wait from a pool worker keeps the worker running
/// queued tasks, whichever caller ends up receiving.
///
/// Created with [`JoinHandle::shared`].
///
/// # Examples
///
/// ```rust
/// use tessera::task::run_task;
///
/// let shared = run_task(|| String::from("hello")).shared();
/// let other = shared.clone();
///
/// assert_eq!(shared.wait().unwrap(), "hello");
/// assert_eq!(other.wait().unwrap(), "hello");
/// ```
pub struct SharedHandle<T> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    id: TaskId,
    completion: Arc<Completion>,

    /// Taken by the first waiter.
    handle: Mutex<Option<JoinHandle<T>>>,

    outcome: OnceLock<Result<T>>,
}

impl<T: Clone> SharedHandle<T> {
    pub(crate) fn new(handle: JoinHandle<T>) -> Self {
        Self {
            inner: Arc::new(Inner {
                id: handle.id(),
                completion: handle.completion(),
                handle: Mutex::new(Some(handle)),
                outcome: OnceLock::new(),
            }),
        }
    }

    /// Returns the id of the task behind this handle.
    pub fn id(&self) -> TaskId {
        self.inner.id
    }

    /// Returns `true` once the task has finished, successfully or not.
    pub fn is_finished(&self) -> bool {
        self.inner.outcome.get().is_some() || self.inner.completion.is_done()
    }

    /// Blocks until the task has finished and returns a clone of its
    /// outcome.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Abandoned`] if the task terminated without
    /// producing a value.
    pub fn wait(&self) -> Result<T> {
        context::wait_until(|timeout| self.poll_outcome(timeout)).clone()
    }

    /// Returns the cached outcome, receiving it first if this caller gets
    /// the handle within `timeout`.
    ///
    /// The handle is only locked for the length of one receive, so a
    /// worker waiting here can go back to running tasks between polls.
    fn poll_outcome(&self, timeout: Option<Duration>) -> Option<&Result<T>> {
        if let Some(outcome) = self.inner.outcome.get() {
            return Some(outcome);
        }

        let mut slot = match timeout {
            None => self
                .inner
                .handle
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
            Some(timeout) => match self.inner.handle.try_lock() {
                Ok(slot) => slot,
                Err(TryLockError::Poisoned(err)) => err.into_inner(),
                Err(TryLockError::WouldBlock) => {
                    // Another waiter is receiving.
                    thread::sleep(timeout);
                    return self.inner.outcome.get();
                }
            },
        };

        if let Some(outcome) = self.inner.outcome.get() {
            return Some(outcome);
        }

        let outcome = match slot.as_ref() {
            Some(handle) => handle.recv_within(timeout)?,
            None => Err(Error::Abandoned { id: self.inner.id }),
        };

        // Cached while the slot is still held, so the next holder sees it.
        slot.take();
        let _ = self.inner.outcome.set(outcome);

        self.inner.outcome.get()
    }
}

impl<T> Clone for SharedHandle<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> fmt::Debug for SharedHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedHandle")
            .field("id", &self.inner.id)
            .field("cached", &self.inner.outcome.get().is_some())
            .finish()
    }
}
