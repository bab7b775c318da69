// src/types.rs

use std::fmt;

/// Lifecycle state of a [`Task`](crate::dag::Task).
///
/// ```text
/// NotSet  --pending()-->   Pending
/// Pending --cancel()-->    Canceled   (terminal)
/// Pending --dispatch-->    Running
/// Running --failed()-->    Failed     (terminal)
/// Running --success()-->   Success    (terminal)
/// Running --work returns-> Complete   (terminal)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TaskState {
    /// Not queued and never ran.
    #[default]
    NotSet,
    /// In a queue, waiting to be dispatched.
    Pending,
    /// Canceled before it was dispatched.
    Canceled,
    /// Work function is currently executing.
    Running,
    /// Ran and was explicitly marked as failed.
    Failed,
    /// Ran and was explicitly marked as successful.
    Success,
    /// Ran without an explicit success or failure.
    Complete,
}

impl TaskState {
    /// No transition leaves a terminal state.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TaskState::Canceled | TaskState::Failed | TaskState::Success | TaskState::Complete
        )
    }

    /// Whether a dependent may treat this state as satisfied.
    pub fn is_done(self) -> bool {
        matches!(self, TaskState::Success | TaskState::Complete)
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskState::NotSet => "notset",
            TaskState::Pending => "pending",
            TaskState::Canceled => "canceled",
            TaskState::Running => "running",
            TaskState::Failed => "failed",
            TaskState::Success => "success",
            TaskState::Complete => "complete",
        };
        f.write_str(s)
    }
}
