use super::JoinHandle;
use super::handle;
use crate::error::{Error, Result};
use crate::runtime::context;
use crate::runtime::work_stealing::injector::InjectorHandle;

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifier of a spawned task.
///
/// Ids are unique within the process and increase with spawn order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(u64);

impl TaskId {
    /// Allocates the next identifier.
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);

        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw numeric value of the id.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A unit of work queued on the pool.
///
/// A `Task` owns the type-erased job body. The body is responsible for
/// delivering its own value: it captures the producing half of the
/// handle's channel, so running the task is all a worker has to do.
pub(crate) struct Task {
    id: TaskId,
    body: Box<dyn FnOnce() + Send + 'static>,
}

impl Task {
    pub(crate) fn new<F>(id: TaskId, body: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            id,
            body: Box::new(body),
        }
    }

    pub(crate) fn id(&self) -> TaskId {
        self.id
    }

    /// Runs the task body on the current thread.
    ///
    /// A panic in the body unwinds out of this call. The captured
    /// producer is dropped during unwinding, which marks the handle as
    /// abandoned.
    pub(crate) fn run(self) {
        (self.body)()
    }
}

/// Spawns `f` on the pool behind `injector`.
pub(crate) fn spawn_on<F, T>(injector: &InjectorHandle, f: F) -> JoinHandle<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let id = TaskId::next();
    let (completer, handle) = handle::channel(id);

    tracing::trace!(task = %id, "spawning task");

    context::schedule(injector, Task::new(id, move || completer.complete(f())));

    handle
}

/// Spawns `f` on the pool behind `injector`, converting panics into errors.
pub(crate) fn spawn_panicable_on<F, T>(injector: &InjectorHandle, f: F) -> JoinHandle<Result<T>>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    spawn_on(injector, move || run_guarded(f))
}

/// Runs `f`, turning a panic into [`Error::Panicked`].
fn run_guarded<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| {
        let err = Error::from_panic(payload);
        tracing::warn!(error = %err, "intercepted panic in task");
        Err(err)
    })
}

/// Runs `f` on a pool worker and returns a handle to its value.
///
/// When called from inside a worker, the task is queued on that worker's
/// pool. Otherwise it goes to the [global pool](crate::Pool::global).
///
/// A panic inside `f` does not reach the caller: the worker survives, and
/// the handle reports [`Error::Abandoned`]. Use [`run_panicable_task`] to
/// receive the panic as an error value instead.
///
/// # Examples
///
/// ```rust
/// use tessera::task::run_task;
///
/// let handle = run_task(|| 1 + 2);
/// assert_eq!(handle.wait(), 3);
/// ```
pub fn run_task<F, T>(f: F) -> JoinHandle<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    spawn_on(&context::target_injector(), f)
}

/// Runs `f(args)` on a pool worker and returns a handle to its value.
///
/// # Examples
///
/// ```rust
/// use tessera::task::run_task_with;
///
/// let handle = run_task_with(|(lhs, rhs)| lhs + rhs, (10, 20));
/// assert_eq!(handle.wait(), 30);
/// ```
pub fn run_task_with<F, A, T>(f: F, args: A) -> JoinHandle<T>
where
    F: FnOnce(A) -> T + Send + 'static,
    A: Send + 'static,
    T: Send + 'static,
{
    run_task(move || f(args))
}

/// Runs a fallible `f` on a pool worker, intercepting panics.
///
/// The returned handle always resolves to a [`Result`]: the value `f`
/// returned, or [`Error::Panicked`] carrying the panic message if `f`
/// panicked.
///
/// # Examples
///
/// ```rust
/// use tessera::task::run_panicable_task;
///
/// let handle = run_panicable_task(|| -> tessera::Result<i32> { panic!("lhs is 1") });
/// let err = handle.wait().unwrap_err();
///
/// assert_eq!(err.to_string(), "panic recover: lhs is 1");
/// ```
pub fn run_panicable_task<F, T>(f: F) -> JoinHandle<Result<T>>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    spawn_panicable_on(&context::target_injector(), f)
}

/// Runs a fallible `f(args)` on a pool worker, intercepting panics.
pub fn run_panicable_task_with<F, A, T>(f: F, args: A) -> JoinHandle<Result<T>>
where
    F: FnOnce(A) -> Result<T> + Send + 'static,
    A: Send + 'static,
    T: Send + 'static,
{
    run_panicable_task(move || f(args))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_increase() {
        let first = TaskId::next();
        let second = TaskId::next();

        assert!(second > first);
        assert_eq!(format!("{first}"), format!("#{}", first.as_u64()));
    }

    #[test]
    fn guarded_run_passes_values_through() {
        assert_eq!(run_guarded(|| Ok(3)).unwrap(), 3);

        let err = run_guarded(|| -> Result<()> { Err(Error::msg("logical")) }).unwrap_err();
        assert_eq!(err.to_string(), "logical");
    }

    #[test]
    fn guarded_run_catches_panics() {
        let err = run_guarded(|| -> Result<()> { panic!("boom") }).unwrap_err();

        assert!(err.is_panic());
        assert_eq!(err.to_string(), "panic recover: boom");
    }
}
