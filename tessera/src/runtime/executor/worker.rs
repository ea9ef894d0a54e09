use crate::error::Error;
use crate::runtime::context::enter_worker;
use crate::runtime::task::Task;
use crate::runtime::work_stealing::injector::InjectorHandle;
use crate::runtime::work_stealing::queue::LocalQueue;

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// A worker thread in the pool.
///
/// A `Worker` executes tasks using a work-stealing strategy. Each worker
/// owns a local queue and cooperates with the other workers to balance
/// load.
///
/// The lookup order is:
/// 1. Pop from the local queue
/// 2. Steal from the global injector
/// 3. Steal from other workers
/// 4. Park if no work is available
pub(crate) struct Worker {
    /// Index of the worker, also the index of its local queue.
    id: usize,

    /// All local queues (one per worker).
    locals: Arc<Vec<LocalQueue>>,

    /// Handle to the global injector queue.
    injector: InjectorHandle,
}

impl Worker {
    pub(crate) fn new(id: usize, locals: Arc<Vec<LocalQueue>>, injector: InjectorHandle) -> Self {
        Self {
            id,
            locals,
            injector,
        }
    }

    pub(crate) fn injector(&self) -> &InjectorHandle {
        &self.injector
    }

    /// Returns `true` if this worker belongs to the pool behind `injector`.
    pub(crate) fn belongs_to(&self, injector: &InjectorHandle) -> bool {
        Arc::ptr_eq(&self.injector, injector)
    }

    /// Pushes a task onto this worker's local queue.
    pub(crate) fn push_local(&self, task: Task) {
        match self.locals.get(self.id) {
            Some(local) => local.push(task),
            None => self.injector.push(task),
        }
    }

    /// Runs the worker loop until the pool shuts down.
    ///
    /// Queued work is drained before exiting: the shutdown flag is only
    /// checked once no task can be found.
    pub(crate) fn run(self: Arc<Self>) {
        let id = self.id;
        tracing::trace!(worker = id, "worker started");

        enter_worker(self.clone(), || {
            loop {
                if let Some(task) = self.find_task() {
                    self.execute(task);
                    continue;
                }

                if self.injector.is_shutdown() {
                    break;
                }

                self.injector.park();
            }
        });

        tracing::trace!(worker = id, "worker exiting");
    }

    /// Finds the next task to run, if any.
    pub(crate) fn find_task(&self) -> Option<Task> {
        self.locals
            .get(self.id)
            .and_then(LocalQueue::pop)
            .or_else(|| self.injector.steal())
            .or_else(|| self.try_steal())
    }

    /// Runs `task`, containing any panic it raises.
    ///
    /// The task's handle is abandoned when its body panics; the worker
    /// itself keeps going.
    pub(crate) fn execute(&self, task: Task) {
        let task_id = task.id();

        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| task.run())) {
            let err = Error::from_panic(payload);
            tracing::error!(
                worker = self.id,
                task = %task_id,
                error = %err,
                "task panicked without producing a value"
            );
        }
    }

    /// Attempts to steal a task from another worker's local queue.
    ///
    /// Victims are visited round-robin, starting after this worker.
    fn try_steal(&self) -> Option<Task> {
        let len = self.locals.len();

        if len <= 1 {
            return None;
        }

        (1..len)
            .map(|offset| (self.id + offset) % len)
            .find_map(|victim| self.locals.get(victim).and_then(LocalQueue::steal))
            .inspect(|task| {
                tracing::trace!(worker = self.id, task = %task.id(), "stole task");
            })
    }
}
