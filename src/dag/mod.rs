// src/dag/mod.rs

//! Tasks and their dependency graph.
//!
//! - [`task`] is the per-task state machine and readiness check.
//! - [`cycle`] rejects dependency edges that would close a loop.
//! - [`graph`] derives an execution order for a set of tasks.

pub(crate) mod cycle;
pub mod graph;
pub mod task;

pub use graph::execution_order;
pub use task::{Condition, Task, WorkFn};
