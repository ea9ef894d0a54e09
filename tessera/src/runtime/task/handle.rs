use super::TaskId;
use super::shared::SharedHandle;
use super::waker::Completion;
use crate::error::{Error, Result};
use crate::runtime::context;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError};

use std::fmt;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

/// Creates the two halves of a task's single-slot transport.
pub(crate) fn channel<T>(id: TaskId) -> (Completer<T>, JoinHandle<T>) {
    let (sender, receiver) = crossbeam_channel::bounded(1);
    let completion = Arc::new(Completion::new());

    let completer = Completer {
        sender: Some(sender),
        completion: completion.clone(),
    };

    let handle = JoinHandle {
        id,
        receiver,
        completion,
    };

    (completer, handle)
}

/// Producing half of a task's transport.
///
/// The value is written at most once. Dropping the completer closes the
/// channel and wakes async waiters, whether or not a value was written.
pub(crate) struct Completer<T> {
    sender: Option<Sender<T>>,
    completion: Arc<Completion>,
}

impl<T> Completer<T> {
    /// Delivers the task's value and closes the transport.
    pub(crate) fn complete(mut self, value: T) {
        if let Some(sender) = self.sender.take() {
            // The handle may already be gone; the value is simply dropped.
            let _ = sender.send(value);
        }
    }
}

impl<T> Drop for Completer<T> {
    fn drop(&mut self) {
        // Close the channel before waking, so woken pollers observe it.
        drop(self.sender.take());
        self.completion.finish();
    }
}

/// A handle to the value of a spawned task.
///
/// A `JoinHandle` owns the receiving end of a single-slot channel that the
/// task writes exactly once. The value can be:
/// - waited for, blocking the current thread ([`wait`](Self::wait),
///   [`join`](Self::join)),
/// - checked without blocking ([`is_finished`](Self::is_finished),
///   [`try_wait`](Self::try_wait)),
/// - awaited from async code, since `JoinHandle` implements [`Future`],
/// - multiplexed with other handles through [`channel`](Self::channel).
///
/// Handles are single-consumer: waiting consumes the handle. To let
/// several threads observe the same value, convert it with
/// [`shared`](Self::shared).
///
/// Dropping the handle does **not** cancel the task; it only discards the
/// ability to observe its result.
pub struct JoinHandle<T> {
    id: TaskId,
    receiver: Receiver<T>,
    completion: Arc<Completion>,
}

impl<T> JoinHandle<T> {
    /// Returns a handle that already holds `value`.
    pub(crate) fn ready(value: T) -> Self {
        let (completer, handle) = channel(TaskId::next());
        completer.complete(value);

        handle
    }

    /// Returns the id of the task behind this handle.
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Returns `true` once the task has finished, successfully or not.
    ///
    /// This never blocks. When it returns `true`, [`wait`](Self::wait) and
    /// [`join`](Self::join) return without blocking.
    pub fn is_finished(&self) -> bool {
        self.completion.is_done()
    }

    /// Exposes the raw transport.
    ///
    /// The channel yields the task's value once, then reports
    /// disconnection. It is meant for multiplexed waits across many
    /// handles, e.g. with [`crossbeam_channel::Select`]. Receiving from it
    /// consumes the value: later waits on this handle report
    /// [`Error::Abandoned`].
    pub fn channel(&self) -> &Receiver<T> {
        &self.receiver
    }

    /// Blocks until the task delivers its value and returns it.
    ///
    /// When called from a pool worker, the worker keeps running queued
    /// tasks while it waits, so a task waiting on another task cannot
    /// starve a small pool.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Abandoned`] if the task terminated without
    /// producing a value.
    pub fn join(self) -> Result<T> {
        context::wait_until(|timeout| self.recv_within(timeout))
    }

    /// Blocks until the task delivers its value and returns it.
    ///
    /// # Panics
    ///
    /// Panics if the task terminated without producing a value, which
    /// happens when a plain task panics.
    pub fn wait(self) -> T {
        self.join().unwrap_or_else(|err| panic!("{err}"))
    }

    /// Takes the value if the task has finished, without blocking.
    ///
    /// Returns the handle back when the task is still running.
    pub fn try_wait(self) -> std::result::Result<Result<T>, Self> {
        match self.try_recv() {
            Some(outcome) => Ok(outcome),
            None => Err(self),
        }
    }

    /// Converts this handle into one that can be cloned and waited on by
    /// many threads.
    pub fn shared(self) -> SharedHandle<T>
    where
        T: Clone,
    {
        SharedHandle::new(self)
    }

    pub(crate) fn completion(&self) -> Arc<Completion> {
        self.completion.clone()
    }

    /// Receives the outcome, blocking for at most `timeout` (`None` blocks
    /// until the producer is gone).
    ///
    /// Returns `None` if nothing arrived in time.
    pub(crate) fn recv_within(&self, timeout: Option<Duration>) -> Option<Result<T>> {
        let Some(timeout) = timeout else {
            return Some(self.receiver.recv().map_err(|_| Error::Abandoned { id: self.id }));
        };

        match self.receiver.recv_timeout(timeout) {
            Ok(value) => Some(Ok(value)),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(Err(Error::Abandoned { id: self.id })),
        }
    }

    fn try_recv(&self) -> Option<Result<T>> {
        match self.receiver.try_recv() {
            Ok(value) => Some(Ok(value)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(Error::Abandoned { id: self.id })),
        }
    }
}

impl<T> Future for JoinHandle<T> {
    /// The task's value, or [`Error::Abandoned`].
    type Output = Result<T>;

    /// Polls the join handle.
    ///
    /// If the task has already finished, its outcome is returned
    /// immediately. Otherwise, the current waker is registered and
    /// the future returns `Poll::Pending`.
    ///
    /// The waker is registered **before** re-checking the channel to avoid
    /// missed wake-ups.
    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<T>> {
        if let Some(outcome) = self.try_recv() {
            return Poll::Ready(outcome);
        }

        self.completion.register(cx.waker());

        if let Some(outcome) = self.try_recv() {
            return Poll::Ready(outcome);
        }

        Poll::Pending
    }
}

impl<T> fmt::Debug for JoinHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JoinHandle")
            .field("id", &self.id)
            .field("finished", &self.is_finished())
            .finish()
    }
}
