use crate::runtime::task::Task;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Shared handle to the global task injector.
pub(crate) type InjectorHandle = Arc<Injector>;

/// Upper bound on how long an idle worker sleeps before looking again.
///
/// Pushes into local queues do not always reach a parked worker, so
/// parking is bounded.
pub(crate) const PARK_TIMEOUT: Duration = Duration::from_millis(1);

/// Global task injector for the work-stealing scheduler.
///
/// Jobs submitted from outside the pool land here before being picked up
/// by a worker. The injector also owns the condition variable idle
/// workers park on, and the pool's shutdown flag.
pub(crate) struct Injector {
    /// Queue holding globally injected tasks.
    queue: Mutex<VecDeque<Task>>,

    /// Wakes parked workers.
    condvar: Condvar,

    /// Set once the owning pool starts shutting down.
    shutdown: AtomicBool,
}

impl Injector {
    /// Creates a new empty injector.
    pub(crate) fn new() -> Self {
        Injector {
            queue: Mutex::new(VecDeque::new()),
            condvar: Condvar::new(),
            shutdown: AtomicBool::new(false),
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Task>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Signals shutdown and wakes all parked workers.
    ///
    /// Workers keep draining queued tasks and exit once no work is left.
    pub(crate) fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
        let _queue = self.lock();
        self.condvar.notify_all();
    }

    /// Returns `true` once [`shutdown`](Self::shutdown) has been called.
    pub(crate) fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    /// Pushes a new task into the global queue and wakes one worker.
    pub(crate) fn push(&self, task: Task) {
        self.lock().push_back(task);
        self.condvar.notify_one();
    }

    /// Wakes one parked worker without queueing anything.
    ///
    /// Used after a push into a local queue so that an idle worker can
    /// come and steal it.
    pub(crate) fn notify(&self) {
        self.condvar.notify_one();
    }

    /// Parks the current worker until work arrives, shutdown is
    /// signalled, or [`PARK_TIMEOUT`] elapses.
    pub(crate) fn park(&self) {
        let queue = self.lock();

        if !queue.is_empty() || self.is_shutdown() {
            return;
        }

        let _ = self
            .condvar
            .wait_timeout(queue, PARK_TIMEOUT)
            .unwrap_or_else(PoisonError::into_inner);
    }

    /// Takes the oldest task from the global queue.
    pub(crate) fn steal(&self) -> Option<Task> {
        self.lock().pop_front()
    }
}
