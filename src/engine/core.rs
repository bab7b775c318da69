// src/engine/core.rs

//! Pure queue bookkeeping.
//!
//! `QueueCore` holds the pending list, the list of every submitted task, the
//! in-flight counter, the capacity and the stop flag. It is synchronous and
//! performs no IO; the async shell in [`super::runtime`] wraps it in a lock
//! and decides when to call it.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::dag::Task;
use crate::errors::TaskError;
use crate::types::TaskState;

#[derive(Debug, Default)]
pub struct QueueCore {
    /// Submitted tasks whose work has not finished yet, in submission order.
    pending: Vec<Task>,
    /// Every task ever submitted. Append-only.
    all_tasks: Vec<Task>,
    /// Ids claimed by `next_ready` and not yet finished. A claimed task
    /// stays `Pending` until its execution unit calls `run`, so scans skip it.
    in_flight: HashSet<String>,
    run_count: usize,
    /// `0` means unlimited.
    run_capacity: usize,
    stopped: bool,
}

impl QueueCore {
    pub fn new(run_capacity: usize) -> Self {
        Self {
            run_capacity,
            ..Self::default()
        }
    }

    /// Submit a task that has never been queued, moving it to `Pending`.
    pub fn add_task(&mut self, task: &Task) -> Result<(), TaskError> {
        if task.state() != TaskState::NotSet {
            return Err(TaskError::AlreadyQueued {
                task: task.label().to_string(),
            });
        }

        // Another queue may have claimed it since the check above.
        if task.pending().is_err() {
            return Err(TaskError::AlreadyQueued {
                task: task.label().to_string(),
            });
        }

        self.pending.push(task.clone());
        self.all_tasks.push(task.clone());
        debug!(task = %task.label(), queue_size = self.pending.len(), "task queued");
        Ok(())
    }

    /// Whether another task may start right now.
    pub fn has_capacity(&self) -> bool {
        self.run_capacity == 0 || self.run_count < self.run_capacity
    }

    /// Claim the first pending task (in submission order) that can run.
    ///
    /// At most one task is claimed per call. The in-flight counter is bumped
    /// before returning, so the caller must later call [`QueueCore::finish`].
    pub fn next_ready(&mut self) -> Option<Task> {
        if !self.has_capacity() {
            trace!(
                run_count = self.run_count,
                run_capacity = self.run_capacity,
                "at capacity; skipping scan"
            );
            return None;
        }

        let task = self
            .pending
            .iter()
            .find(|t| !self.in_flight.contains(t.id()) && t.can_run())?
            .clone();
        self.in_flight.insert(task.id().to_string());
        self.run_count += 1;
        Some(task)
    }

    /// Completion bookkeeping for a task returned by `next_ready`: release
    /// its slot and drop it from the pending list (matched by id).
    ///
    /// Returns whether the task was in flight. A second call for the same
    /// task is a no-op.
    pub fn finish(&mut self, task: &Task) -> bool {
        if !self.in_flight.remove(task.id()) {
            return false;
        }
        self.run_count = self.run_count.saturating_sub(1);

        match self.pending.iter().position(|t| t.id() == task.id()) {
            Some(index) => {
                self.pending.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn task_list(&self) -> Vec<Task> {
        self.all_tasks.clone()
    }

    pub fn queue_size(&self) -> usize {
        self.pending.len()
    }

    pub fn running(&self) -> usize {
        self.run_count
    }

    pub fn run_capacity(&self) -> usize {
        self.run_capacity
    }

    pub fn set_run_capacity(&mut self, capacity: usize) {
        self.run_capacity = capacity;
    }

    pub fn stop(&mut self) {
        self.stopped = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}
