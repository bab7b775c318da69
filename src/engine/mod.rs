// src/engine/mod.rs

//! Queue and dispatch engine.
//!
//! - [`core`] is the synchronous bookkeeping (pending list, in-flight count,
//!   capacity, readiness scan). No Tokio types.
//! - [`queue`] is the shared, cloneable [`Queue`] handle around the core.
//! - [`runtime`] is the async dispatch loop that launches ready tasks on an
//!   [`ExecutorBackend`](crate::exec::ExecutorBackend).

use std::time::Duration;

/// Default interval between re-scans when nothing wakes the dispatch loop.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Options used to build a [`Queue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueOptions {
    /// Maximum concurrently running tasks; `0` means unlimited.
    pub run_capacity: usize,
    /// How long the dispatch loop sleeps when idle before scanning again.
    ///
    /// Submissions, completions, capacity changes and `stop()` wake it
    /// earlier; gating conditions can change without any event, so it
    /// still needs a periodic re-scan.
    pub poll_interval: Duration,
}

impl Default for QueueOptions {
    fn default() -> Self {
        Self {
            run_capacity: 0,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

pub mod core;
pub mod queue;
pub mod runtime;

pub use self::core::QueueCore;
pub use self::queue::Queue;
