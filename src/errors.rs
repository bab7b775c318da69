// src/errors.rs

//! Crate-wide error types.
//!
//! [`TaskError`] is what task and queue operations return; it is `Clone` so
//! the same value can be both returned to the caller and kept in the task's
//! error log. [`FlowError`] wraps it together with config/IO failures.

use std::time::Duration;

use thiserror::Error;

use crate::types::TaskState;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    #[error("task {task}: cannot {action} while {state}")]
    InvalidTransition {
        task: String,
        state: TaskState,
        action: &'static str,
    },

    #[error("task {task}: cannot add requirements to a queued task")]
    RequirementOnQueuedTask { task: String },

    #[error("task {task}: dependency cycle would prevent task from running due to loop on self")]
    SelfCycle { task: String },

    #[error(
        "task {task}: dependency cycle would prevent task from running due to branch {branch} in tree"
    )]
    BranchCycle { task: String, branch: String },

    #[error("task {task}: can not add a task already in a queue")]
    AlreadyQueued { task: String },

    #[error("{0}")]
    Message(String),
}

impl TaskError {
    /// True for both self-loops and cycles found deeper in the branch.
    pub fn is_cycle(&self) -> bool {
        matches!(self, TaskError::SelfCycle { .. } | TaskError::BranchCycle { .. })
    }
}

#[derive(Error, Debug)]
pub enum FlowError {
    #[error(transparent)]
    Task(#[from] TaskError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("queue did not drain within {0:?}")]
    WaitTimeout(Duration),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, FlowError>;
