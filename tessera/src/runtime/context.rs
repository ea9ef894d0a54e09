use crate::runtime::Pool;
use crate::runtime::executor::worker::Worker;
use crate::runtime::task::Task;
use crate::runtime::work_stealing::injector::{InjectorHandle, PARK_TIMEOUT};

use std::cell::RefCell;
use std::sync::Arc;
use std::time::Duration;

thread_local! {
    /// The worker running on the current thread, if any.
    ///
    /// Set for the lifetime of every pool thread. It lets spawns from
    /// inside a task reach the local queue, and lets blocking waits keep
    /// the worker busy.
    static CURRENT_WORKER: RefCell<Option<Arc<Worker>>> = const { RefCell::new(None) };
}

/// Installs `worker` as the current thread's worker for the duration of
/// `f`, restoring the previous value afterwards.
pub(crate) fn enter_worker<R>(worker: Arc<Worker>, f: impl FnOnce() -> R) -> R {
    let prev = CURRENT_WORKER.with(|cell| cell.replace(Some(worker)));

    let out = f();

    CURRENT_WORKER.with(|cell| cell.replace(prev));

    out
}

/// Returns the worker running on the current thread.
pub(crate) fn current_worker() -> Option<Arc<Worker>> {
    CURRENT_WORKER.with(|cell| cell.borrow().clone())
}

/// Returns the injector free-standing spawns should target: the current
/// worker's pool, or the global pool outside of any worker.
pub(crate) fn target_injector() -> InjectorHandle {
    match current_worker() {
        Some(worker) => worker.injector().clone(),
        None => Pool::global().injector().clone(),
    }
}

/// Queues `task` on the pool behind `injector`.
///
/// Tasks spawned from a worker of that same pool go to the worker's local
/// queue; everything else goes through the injector.
pub(crate) fn schedule(injector: &InjectorHandle, task: Task) {
    match current_worker() {
        Some(worker) if worker.belongs_to(injector) => {
            worker.push_local(task);
            injector.notify();
        }
        _ => injector.push(task),
    }
}

/// Blocks until `poll` produces a value.
///
/// `poll` receives the longest time it may block: `None` means it may
/// block indefinitely, `Some(timeout)` means it must give up after
/// `timeout` and return `None` if nothing is ready.
///
/// On a pool worker the wait never blocks indefinitely: between short
/// polls the worker runs queued tasks, so the task it waits on gets a
/// chance to run even when every worker is waiting.
pub(crate) fn wait_until<R>(mut poll: impl FnMut(Option<Duration>) -> Option<R>) -> R {
    let Some(worker) = current_worker() else {
        loop {
            if let Some(out) = poll(None) {
                return out;
            }
        }
    };

    loop {
        if let Some(out) = poll(Some(Duration::ZERO)) {
            return out;
        }

        match worker.find_task() {
            Some(task) => worker.execute(task),
            None => {
                if let Some(out) = poll(Some(PARK_TIMEOUT)) {
                    return out;
                }
            }
        }
    }
}
