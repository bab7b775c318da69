// src/exec/backend.rs

//! Pluggable executor backend abstraction.
//!
//! The queue hands every dispatched task to an `ExecutorBackend`, which runs
//! it as an independent unit of execution and resolves once the task's work
//! function has returned. The queue does its completion bookkeeping after
//! that future resolves.
//!
//! - `BlockingExecutor` is the default. Work functions are plain synchronous
//!   closures that may block, so each one runs on Tokio's blocking pool.
//! - Tests can wrap or replace it, e.g. to record dispatch order or peak
//!   concurrency.

use std::any::Any;
use std::future::Future;
use std::pin::Pin;

use tracing::{debug, warn};

use crate::dag::Task;

/// Trait abstracting how a dispatched task is executed.
pub trait ExecutorBackend: Send + Sync {
    /// Run `task` (normally via [`Task::run`]) to completion.
    ///
    /// The returned future must not resolve before the work function has
    /// returned; the queue frees the task's concurrency slot when it does.
    fn execute(&self, task: Task) -> Pin<Box<dyn Future<Output = ()> + Send + '_>>;
}

/// Runs each task on `tokio::task::spawn_blocking`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BlockingExecutor;

impl BlockingExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl ExecutorBackend for BlockingExecutor {
    fn execute(&self, task: Task) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(async move {
            let runner = task.clone();
            match tokio::task::spawn_blocking(move || runner.run()).await {
                Ok(true) => {
                    debug!(task = %task.label(), state = %task.state(), "task finished");
                }
                Ok(false) => {
                    // Canceled between the readiness scan and launch.
                    debug!(
                        task = %task.label(),
                        state = %task.state(),
                        "task not runnable at launch"
                    );
                }
                Err(err) if err.is_panic() => {
                    task.fail_after_panic(&panic_message(&*err.into_panic()));
                }
                Err(err) => {
                    warn!(task = %task.label(), error = %err, "blocking task did not complete");
                    task.fail_after_panic(&err.to_string());
                }
            }
        })
    }
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
