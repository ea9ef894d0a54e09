//! # Tessera
//!
//! **Tessera** is a small task library for running blocking work on a pool
//! of threads and collecting the results.
//!
//! It provides only a handful of primitives:
//!
//! - **Spawn**: [`task::run_task`] runs a closure on a worker and returns a
//!   [`JoinHandle`](task::JoinHandle) to its value
//! - **Await**: [`JoinHandle::wait`](task::JoinHandle::wait) blocks until the
//!   value arrives; handles can also be `.await`ed from async code
//! - **Join many**: [`task::await_all`] and [`task::join_all`] collect many
//!   handles into one ordered result
//! - **Panic to error**: [`task::run_panicable_task`] converts a panic inside
//!   the task into an [`Error`] value
//!
//! Tasks run on a bounded, work-stealing [`Pool`]. The free functions use a
//! lazily started global pool; [`PoolBuilder`] configures dedicated ones.
//!
//! ## Quick Start
//!
//! ```rust
//! use tessera::task::{await_all, run_panicable_task, run_task_with};
//!
//! let add = |(lhs, rhs): (i32, i32)| lhs + rhs;
//! let sums = await_all(vec![
//!     run_task_with(add, (10, 20)),
//!     run_task_with(add, (15, 2)),
//!     run_task_with(add, (1, 20)),
//! ]);
//! assert_eq!(sums, vec![30, 17, 21]);
//!
//! let outcome = run_panicable_task(|| -> tessera::Result<i32> {
//!     panic!("lhs is 1");
//! })
//! .wait();
//! assert_eq!(outcome.unwrap_err().to_string(), "panic recover: lhs is 1");
//! ```
//!
//! ## Modules
//!
//! - [`task`]: spawning, handles and aggregation
//!
//! ## Getting Started
//!
//! Add Tessera to your `Cargo.toml` as a path dependency:
//!
//! ```toml
//! [dependencies]
//! tessera = { path = "../tessera" }
//! ```

mod error;
mod runtime;

pub use error::{Error, Result};
pub use runtime::Pool;
pub use runtime::builder::{PoolBuilder, WORKER_THREADS_ENV};
pub use runtime::task;

/// Waits on a fixed list of handles and returns their values as a tuple.
///
/// The handles may have different value types. Every argument expression
/// is evaluated first, then each handle is waited on in argument order.
/// With a single argument the value is returned directly, and `join!()`
/// evaluates to `()`.
///
/// # Panics
///
/// Panics if a task terminated without producing a value, like
/// [`JoinHandle::wait`](task::JoinHandle::wait).
///
/// # Examples
///
/// ```rust
/// use tessera::task::run_task;
///
/// let (n, s) = tessera::join!(run_task(|| 1 + 1), run_task(|| "two"));
/// assert_eq!((n, s), (2, "two"));
/// ```
pub use tessera_macros::join;
