//! Pool runtime components.
//!
//! This module contains the building blocks of the worker pool:
//! - the executor and its worker threads,
//! - the work-stealing queues they share,
//! - the thread-local worker context used by spawns and blocking waits,
//! - the task primitives exposed through [`task`].

mod core;
mod executor;
mod work_stealing;

pub(crate) mod builder;
pub(crate) mod context;

pub mod task;

pub use self::core::Pool;
