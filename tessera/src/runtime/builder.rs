use super::Pool;

use std::env;
use std::io;
use std::thread;

/// Environment variable overriding the default number of worker threads.
pub const WORKER_THREADS_ENV: &str = "TESSERA_WORKER_THREADS";

const DEFAULT_THREAD_NAME: &str = "tessera-worker";

/// Builder for configuring and creating a [`Pool`].
///
/// # Examples
///
/// ```rust
/// use tessera::PoolBuilder;
///
/// let pool = PoolBuilder::new()
///     .worker_threads(2)
///     .thread_name("compute")
///     .build()
///     .unwrap();
///
/// assert_eq!(pool.spawn(|| 6 * 7).wait(), 42);
/// ```
#[derive(Debug, Clone)]
pub struct PoolBuilder {
    /// Number of worker threads in the pool.
    worker_threads: usize,

    /// Prefix of the worker thread names.
    thread_name: String,
}

impl PoolBuilder {
    /// Creates a new `PoolBuilder` with default configuration.
    ///
    /// The number of worker threads is read from the
    /// `TESSERA_WORKER_THREADS` environment variable when it holds a
    /// positive integer. Otherwise it is the number of available logical
    /// CPUs, falling back to `1` if unavailable.
    pub fn new() -> Self {
        let worker_threads = env::var(WORKER_THREADS_ENV)
            .ok()
            .and_then(|value| parse_worker_threads(&value))
            .unwrap_or_else(|| thread::available_parallelism().map_or(1, |n| n.get()));

        Self {
            worker_threads,
            thread_name: DEFAULT_THREAD_NAME.to_owned(),
        }
    }

    /// Sets the number of worker threads used by the pool.
    ///
    /// # Panics
    ///
    /// Panics if `n == 0`.
    pub fn worker_threads(mut self, n: usize) -> Self {
        assert!(n > 0, "worker_threads must be > 0");

        self.worker_threads = n;
        self
    }

    /// Sets the prefix of worker thread names.
    ///
    /// Workers are named `<prefix>-<index>`. Defaults to `tessera-worker`.
    pub fn thread_name(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name = prefix.into();
        self
    }

    /// Builds the pool and starts its worker threads.
    ///
    /// # Errors
    ///
    /// Returns the OS error if a worker thread cannot be spawned.
    pub fn build(self) -> io::Result<Pool> {
        Pool::new(self.worker_threads, &self.thread_name)
    }
}

impl Default for PoolBuilder {
    /// Creates a default `PoolBuilder`.
    fn default() -> Self {
        Self::new()
    }
}

fn parse_worker_threads(value: &str) -> Option<usize> {
    value.trim().parse::<usize>().ok().filter(|&n| n > 0)
}
