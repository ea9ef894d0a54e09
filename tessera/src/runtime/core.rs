use super::builder::PoolBuilder;
use super::executor::core::Executor;
use crate::error::Result;
use crate::runtime::task::{self, JoinHandle};
use crate::runtime::work_stealing::injector::InjectorHandle;

use std::fmt;
use std::io;
use std::sync::OnceLock;

/// A bounded pool of worker threads running spawned tasks.
///
/// `Pool` is responsible for:
/// - spawning tasks and handing back [`JoinHandle`]s,
/// - running them on a fixed set of work-stealing worker threads,
/// - converting panics into errors for panicable tasks.
///
/// Dropping the pool shuts it down: queued tasks are still run, then the
/// worker threads are joined.
pub struct Pool {
    /// Worker threads and their queues.
    executor: Executor,

    /// Number of worker threads.
    worker_threads: usize,
}

static GLOBAL: OnceLock<Pool> = OnceLock::new();

impl Pool {
    /// Creates a new pool with `worker_threads` workers.
    pub(crate) fn new(worker_threads: usize, thread_name: &str) -> io::Result<Self> {
        let executor = Executor::new(worker_threads, thread_name)?;

        tracing::debug!(workers = worker_threads, name = thread_name, "pool started");

        Ok(Self {
            executor,
            worker_threads,
        })
    }

    /// Returns a builder for configuring a new pool.
    pub fn builder() -> PoolBuilder {
        PoolBuilder::new()
    }

    /// Returns the process-wide pool used by the free spawning functions.
    ///
    /// It is built on first use with [`PoolBuilder::new`]'s defaults and is
    /// never shut down.
    ///
    /// # Panics
    ///
    /// Panics if the pool's worker threads cannot be spawned.
    pub fn global() -> &'static Pool {
        GLOBAL.get_or_init(|| {
            PoolBuilder::new()
                .thread_name("tessera-global")
                .build()
                .expect("failed to start the global tessera pool")
        })
    }

    pub(crate) fn injector(&self) -> &InjectorHandle {
        self.executor.injector()
    }

    /// Returns the number of worker threads.
    pub fn worker_threads(&self) -> usize {
        self.worker_threads
    }

    /// Runs `f` on this pool and returns a handle to its value.
    ///
    /// See [`task::run_task`] for panic behavior.
    pub fn spawn<F, T>(&self, f: F) -> JoinHandle<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        task::spawn_on(self.injector(), f)
    }

    /// Runs `f(args)` on this pool and returns a handle to its value.
    pub fn spawn_with<F, A, T>(&self, f: F, args: A) -> JoinHandle<T>
    where
        F: FnOnce(A) -> T + Send + 'static,
        A: Send + 'static,
        T: Send + 'static,
    {
        self.spawn(move || f(args))
    }

    /// Runs a fallible `f` on this pool, intercepting panics.
    ///
    /// See [`task::run_panicable_task`].
    pub fn spawn_panicable<F, T>(&self, f: F) -> JoinHandle<Result<T>>
    where
        F: FnOnce() -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        task::spawn_panicable_on(self.injector(), f)
    }

    /// Runs a fallible `f(args)` on this pool, intercepting panics.
    pub fn spawn_panicable_with<F, A, T>(&self, f: F, args: A) -> JoinHandle<Result<T>>
    where
        F: FnOnce(A) -> Result<T> + Send + 'static,
        A: Send + 'static,
        T: Send + 'static,
    {
        self.spawn_panicable(move || f(args))
    }

    /// Aggregates `handles` on this pool.
    ///
    /// See [`task::join_all`].
    pub fn join_all<T, I>(&self, handles: I) -> JoinHandle<Vec<T>>
    where
        I: IntoIterator<Item = JoinHandle<T>>,
        T: Send + 'static,
    {
        task::join_all_on(self.injector(), handles)
    }

    /// Shuts the pool down, running every queued task first.
    ///
    /// Equivalent to dropping the pool.
    pub fn shutdown(self) {
        drop(self);
    }
}

impl Drop for Pool {
    /// Shuts down the pool.
    ///
    /// This performs the following steps:
    /// 1. Signals the workers to exit once the queues are empty
    /// 2. Joins all worker threads
    fn drop(&mut self) {
        self.executor.shutdown();
        self.executor.join();

        tracing::debug!(workers = self.worker_threads, "pool shut down");
    }
}

impl fmt::Debug for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("worker_threads", &self.worker_threads)
            .finish()
    }
}
