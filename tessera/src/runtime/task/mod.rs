//! Task primitives.
//!
//! This module defines how work is handed to the pool and how its value
//! comes back.
//!
//! It includes:
//! - spawning functions ([`run_task`], [`run_panicable_task`] and their
//!   `_with` variants taking an argument value),
//! - [`JoinHandle`], the single-consumer handle to a task's value,
//! - [`SharedHandle`], its broadcasting counterpart,
//! - order-preserving aggregation ([`await_all`], [`try_await_all`],
//!   [`join_all`]).
//!
//! Free functions spawn onto the pool of the current worker when called
//! from inside one, and onto the [global pool](crate::Pool::global)
//! otherwise.

mod handle;
mod join;
mod shared;
mod waker;

pub(crate) mod core;

pub(crate) use self::core::Task;
pub(crate) use self::core::{spawn_on, spawn_panicable_on};
pub(crate) use join::join_all_on;

pub use self::core::{TaskId, run_panicable_task, run_panicable_task_with, run_task, run_task_with};
pub use handle::JoinHandle;
pub use join::{await_all, join_all, try_await_all};
pub use shared::SharedHandle;
