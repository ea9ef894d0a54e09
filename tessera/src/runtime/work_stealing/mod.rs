//! Work-stealing scheduler components.
//!
//! This module implements the queues the pool uses to distribute jobs
//! across worker threads.
//!
//! It consists of:
//! - [`injector`]: a global queue for jobs submitted from outside the pool,
//!   which also parks idle workers,
//! - [`queue`]: per-worker local queues fed by jobs spawned from inside a
//!   worker, and raided by idle workers.

pub(crate) mod injector;
pub(crate) mod queue;
