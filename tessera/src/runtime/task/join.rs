use super::JoinHandle;
use super::core::spawn_on;
use crate::error::{Error, Result};
use crate::runtime::context;
use crate::runtime::work_stealing::injector::InjectorHandle;

use crossbeam_channel::{Select, TryRecvError};

/// Waits for every handle and returns their values in input order.
///
/// `result[i]` is the value of the `i`-th handle, whatever order the tasks
/// finish in. The wait is a blocking multi-wait over all pending handles;
/// an empty input returns an empty vector immediately.
///
/// # Panics
///
/// Panics if any task terminated without producing a value. Use
/// [`try_await_all`] to get an error instead.
///
/// # Examples
///
/// ```rust
/// use tessera::task::{await_all, run_task_with};
///
/// let add = |(lhs, rhs): (i32, i32)| lhs + rhs;
/// let handles = vec![
///     run_task_with(add, (10, 20)),
///     run_task_with(add, (15, 2)),
///     run_task_with(add, (1, 20)),
/// ];
///
/// assert_eq!(await_all(handles), vec![30, 17, 21]);
/// ```
pub fn await_all<T, I>(handles: I) -> Vec<T>
where
    I: IntoIterator<Item = JoinHandle<T>>,
{
    try_await_all(handles).unwrap_or_else(|err| panic!("{err}"))
}

/// Waits for every handle and returns their values in input order.
///
/// # Errors
///
/// Returns [`Error::Abandoned`] for the first handle, in input order, whose
/// task terminated without producing a value. All handles are settled
/// before returning.
pub fn try_await_all<T, I>(handles: I) -> Result<Vec<T>>
where
    I: IntoIterator<Item = JoinHandle<T>>,
{
    let handles: Vec<JoinHandle<T>> = handles.into_iter().collect();
    let mut outcomes: Vec<Option<Result<T>>> = handles.iter().map(|_| None).collect();

    let mut select = Select::new();
    for handle in &handles {
        // Operation indices match positions in `handles`.
        select.recv(handle.channel());
    }

    let mut remaining = handles.len();

    while remaining > 0 {
        let index = context::wait_until(|timeout| match timeout {
            None => Some(select.ready()),
            Some(timeout) => select.ready_timeout(timeout).ok(),
        });

        let Some(handle) = handles.get(index) else {
            continue;
        };

        let outcome = match handle.channel().try_recv() {
            Ok(value) => Ok(value),
            Err(TryRecvError::Disconnected) => Err(Error::Abandoned { id: handle.id() }),
            // Readiness can be reported spuriously.
            Err(TryRecvError::Empty) => continue,
        };

        if let Some(slot) = outcomes.get_mut(index) {
            *slot = Some(outcome);
        }

        select.remove(index);
        remaining -= 1;
    }

    tracing::trace!(count = handles.len(), "all handles settled");

    outcomes.into_iter().flatten().collect()
}

/// Runs [`await_all`] on a pool worker and returns a handle to the
/// aggregate.
///
/// The caller decides when to block. If any constituent task is abandoned,
/// the aggregate handle is abandoned too. An empty input yields a handle
/// that is already finished.
///
/// # Examples
///
/// ```rust
/// use tessera::task::{join_all, run_task};
///
/// let handles: Vec<_> = (0..4).map(|i| run_task(move || i * i)).collect();
/// let all = join_all(handles);
///
/// assert_eq!(all.wait(), vec![0, 1, 4, 9]);
/// ```
pub fn join_all<T, I>(handles: I) -> JoinHandle<Vec<T>>
where
    I: IntoIterator<Item = JoinHandle<T>>,
    T: Send + 'static,
{
    join_all_on(&context::target_injector(), handles)
}

pub(crate) fn join_all_on<T, I>(injector: &InjectorHandle, handles: I) -> JoinHandle<Vec<T>>
where
    I: IntoIterator<Item = JoinHandle<T>>,
    T: Send + 'static,
{
    let handles: Vec<JoinHandle<T>> = handles.into_iter().collect();

    if handles.is_empty() {
        return JoinHandle::ready(Vec::new());
    }

    spawn_on(injector, move || await_all(handles))
}
