//! Task executor implementation.
//!
//! It is composed of:
//! - [`core`]: thread management and lifecycle of the pool's workers,
//! - [`worker`]: the per-thread loop that runs tasks using work stealing.

pub(crate) mod core;
pub(crate) mod worker;
