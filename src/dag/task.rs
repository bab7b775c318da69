// src/dag/task.rs

//! The task state machine.
//!
//! A [`Task`] is a cheap, cloneable handle around shared state. Clones refer
//! to the same task, and equality is identity (same id).

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use tracing::{debug, trace, warn};
use uuid::Uuid;

use crate::dag::cycle;
use crate::errors::TaskError;
use crate::exec::backend::panic_message;
use crate::lock;
use crate::types::TaskState;

/// Work executed when a task is dispatched. Receives the task itself so it
/// can call [`Task::success`], [`Task::failed`] or [`Task::record_error`].
pub type WorkFn = Box<dyn Fn(&Task) + Send + Sync>;

/// Gating predicate; opaque to the scheduler.
pub type Condition = Box<dyn Fn() -> bool + Send + Sync>;

/// Serialises dependency-edge insertion across all tasks, so two concurrent
/// `requires_task` calls can never close a cycle between them.
static GRAPH_EDIT: Mutex<()> = Mutex::new(());

struct TaskInner {
    id: OnceLock<String>,
    name: Option<String>,
    work: WorkFn,
    core: Mutex<TaskCore>,
    errors: Mutex<Vec<TaskError>>,
}

#[derive(Default)]
struct TaskCore {
    state: TaskState,
    required_tasks: Vec<Task>,
    required_conditions: Vec<Condition>,
    /// Once readiness passed it is never re-evaluated.
    run_approved: bool,
    /// A condition panicked; the task can never become ready.
    condition_panicked: bool,
}

#[derive(Clone)]
pub struct Task {
    inner: Arc<TaskInner>,
}

impl Task {
    pub fn new<F>(work: F) -> Self
    where
        F: Fn(&Task) + Send + Sync + 'static,
    {
        Self::build(None, Box::new(work))
    }

    /// Like [`Task::new`], with a label used in log lines and diagnostics.
    pub fn named<F>(name: impl Into<String>, work: F) -> Self
    where
        F: Fn(&Task) + Send + Sync + 'static,
    {
        Self::build(Some(name.into()), Box::new(work))
    }

    fn build(name: Option<String>, work: WorkFn) -> Self {
        Self {
            inner: Arc::new(TaskInner {
                id: OnceLock::new(),
                name,
                work,
                core: Mutex::new(TaskCore::default()),
                errors: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Unique id, generated on first access and stable afterwards.
    pub fn id(&self) -> &str {
        self.inner.id.get_or_init(|| Uuid::new_v4().to_string())
    }

    pub fn name(&self) -> Option<&str> {
        self.inner.name.as_deref()
    }

    /// The name if one was given, otherwise the id.
    pub fn label(&self) -> &str {
        match self.name() {
            Some(name) => name,
            None => self.id(),
        }
    }

    pub fn state(&self) -> TaskState {
        self.core().state
    }

    /// Snapshot of the direct requirements, in insertion order.
    pub fn required_tasks(&self) -> Vec<Task> {
        self.core().required_tasks.clone()
    }

    /// Snapshot of the error log.
    pub fn errors(&self) -> Vec<TaskError> {
        lock(&self.inner.errors).clone()
    }

    /// Append `message` to the error log and hand the error back, so the
    /// caller can record and propagate in one step.
    pub fn record_error(&self, message: impl Into<String>) -> TaskError {
        self.record(TaskError::Message(message.into()))
    }

    /// Require `other` to reach success/complete before this task may run.
    ///
    /// Only allowed before the task is queued. Rejects the edge if it would
    /// make the dependency graph cyclic.
    pub fn requires_task(&self, other: &Task) -> Result<(), TaskError> {
        let _edit = lock(&GRAPH_EDIT);

        self.ensure_unqueued()?;

        // Walk without holding our own lock; the walk never locks `self`
        // because it fails as soon as it reaches it.
        if let Err(err) = cycle::check_edge(self, other) {
            debug!(
                task = %self.label(),
                requires = %other.label(),
                error = %err,
                "rejected dependency edge"
            );
            return Err(self.record(err));
        }

        let mut core = self.core();
        if core.state != TaskState::NotSet {
            drop(core);
            return Err(self.record(TaskError::RequirementOnQueuedTask {
                task: self.label().to_string(),
            }));
        }
        core.required_tasks.push(other.clone());
        debug!(task = %self.label(), requires = %other.label(), "added required task");
        Ok(())
    }

    /// Add a gating predicate. Only allowed before the task is queued.
    pub fn requires_condition<F>(&self, condition: F) -> Result<(), TaskError>
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        let mut core = self.core();
        if core.state != TaskState::NotSet {
            drop(core);
            return Err(self.record(TaskError::RequirementOnQueuedTask {
                task: self.label().to_string(),
            }));
        }
        core.required_conditions.push(Box::new(condition));
        Ok(())
    }

    /// NotSet -> Pending. Normally called by the queue on submission.
    pub fn pending(&self) -> Result<(), TaskError> {
        self.transition(TaskState::NotSet, TaskState::Pending, "mark pending")
    }

    /// Pending -> Canceled.
    pub fn cancel(&self) -> Result<(), TaskError> {
        self.transition(TaskState::Pending, TaskState::Canceled, "cancel")
    }

    /// Running -> Failed.
    pub fn failed(&self) -> Result<(), TaskError> {
        self.transition(TaskState::Running, TaskState::Failed, "mark failed")
    }

    /// Running -> Success.
    pub fn success(&self) -> Result<(), TaskError> {
        self.transition(TaskState::Running, TaskState::Success, "mark success")
    }

    /// Whether the task is pending and all conditions and required tasks are
    /// satisfied. A positive answer is sticky for as long as the task stays
    /// pending.
    pub fn can_run(&self) -> bool {
        let mut core = self.core();
        self.ready(&mut core)
    }

    /// Run the work function if the task is ready.
    ///
    /// The readiness check and the switch to `Running` happen under one lock,
    /// so a concurrent `cancel()` is never overwritten. Returns whether the
    /// work function was invoked.
    pub fn run(&self) -> bool {
        {
            let mut core = self.core();
            if !self.ready(&mut core) {
                trace!(task = %self.label(), state = %core.state, "run skipped; task not ready");
                return false;
            }
            core.state = TaskState::Running;
        }

        debug!(task = %self.label(), "running work function");
        (self.inner.work)(self);

        let mut core = self.core();
        if core.state == TaskState::Running {
            core.state = TaskState::Complete;
        }
        debug!(task = %self.label(), state = %core.state, "work function returned");
        true
    }

    /// Mark a task whose work function panicked as failed.
    pub(crate) fn fail_after_panic(&self, reason: &str) {
        {
            let mut core = self.core();
            if core.state == TaskState::Running {
                core.state = TaskState::Failed;
            }
        }
        warn!(task = %self.label(), reason, "work function panicked");
        self.record_error(format!("work function panicked: {reason}"));
    }

    fn ready(&self, core: &mut TaskCore) -> bool {
        if core.state != TaskState::Pending || core.condition_panicked {
            return false;
        }
        if core.run_approved {
            return true;
        }

        let conditions = &core.required_conditions;
        match catch_unwind(AssertUnwindSafe(|| conditions.iter().all(|condition| condition()))) {
            Ok(true) => {}
            Ok(false) => return false,
            Err(payload) => {
                let reason = panic_message(&*payload);
                core.condition_panicked = true;
                warn!(task = %self.label(), %reason, "condition panicked; task stays pending");
                self.record_error(format!("condition panicked: {reason}"));
                return false;
            }
        }

        if !core.required_tasks.iter().all(|task| task.state().is_done()) {
            return false;
        }
        core.run_approved = true;
        true
    }

    fn ensure_unqueued(&self) -> Result<(), TaskError> {
        if self.state() == TaskState::NotSet {
            return Ok(());
        }
        Err(self.record(TaskError::RequirementOnQueuedTask {
            task: self.label().to_string(),
        }))
    }

    fn transition(
        &self,
        from: TaskState,
        to: TaskState,
        action: &'static str,
    ) -> Result<(), TaskError> {
        let mut core = self.core();
        if core.state != from {
            let state = core.state;
            drop(core);
            return Err(self.record(TaskError::InvalidTransition {
                task: self.label().to_string(),
                state,
                action,
            }));
        }
        core.state = to;
        debug!(task = %self.label(), %from, %to, "task state changed");
        Ok(())
    }

    fn record(&self, err: TaskError) -> TaskError {
        lock(&self.inner.errors).push(err.clone());
        err
    }

    fn core(&self) -> MutexGuard<'_, TaskCore> {
        lock(&self.inner.core)
    }
}

impl PartialEq for Task {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner) || self.id() == other.id()
    }
}

impl Eq for Task {}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("id", &self.id())
            .field("name", &self.name())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
