// src/exec/mod.rs

//! Task execution layer.
//!
//! - [`backend`] provides the `ExecutorBackend` trait and the default
//!   `BlockingExecutor` that the queue uses in production, and which tests
//!   can wrap or replace.

pub mod backend;

pub use backend::{BlockingExecutor, ExecutorBackend};
