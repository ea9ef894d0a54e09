use crate::runtime::task::Task;

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A per-worker local task queue.
///
/// Tasks are normally pushed and popped from the back of the queue
/// (LIFO), so a task spawned by the running job is picked up next while
/// its captures are still warm.
///
/// Other workers steal from the front of the queue (FIFO).
pub(crate) struct LocalQueue {
    inner: Mutex<VecDeque<Task>>,
}

impl LocalQueue {
    /// Creates an empty local task queue.
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(VecDeque::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Task>> {
        // Tasks run outside the lock, so a poisoned queue is still consistent.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Pushes a task to the back of the queue.
    pub(crate) fn push(&self, task: Task) {
        self.lock().push_back(task);
    }

    /// Pops the most recently pushed task.
    pub(crate) fn pop(&self) -> Option<Task> {
        self.lock().pop_back()
    }

    /// Steals the oldest task. Used by other workers.
    pub(crate) fn steal(&self) -> Option<Task> {
        self.lock().pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::task::TaskId;

    use std::sync::{Arc, Mutex};

    fn recording(id: usize, log: &Arc<Mutex<Vec<usize>>>) -> Task {
        let log = log.clone();
        Task::new(TaskId::next(), move || log.lock().unwrap().push(id))
    }

    #[test]
    fn pop_is_lifo_and_steal_is_fifo() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let queue = LocalQueue::new();

        for id in 0..3 {
            queue.push(recording(id, &log));
        }

        queue.pop().unwrap().run();
        queue.steal().unwrap().run();
        queue.pop().unwrap().run();

        assert_eq!(*log.lock().unwrap(), vec![2, 0, 1]);
        assert!(queue.pop().is_none());
        assert!(queue.steal().is_none());
    }
}
