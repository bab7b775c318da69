// src/engine/queue.rs

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::Notify;
use tracing::{debug, info};

use crate::dag::Task;
use crate::errors::{FlowError, Result, TaskError};
use crate::exec::{BlockingExecutor, ExecutorBackend};
use crate::lock;

use super::QueueOptions;
use super::core::QueueCore;

/// State shared between queue handles, the dispatch loop and running tasks.
pub(crate) struct Shared {
    core: Mutex<QueueCore>,
    /// Wakes the dispatch loop (submission, completion, capacity, stop).
    pub(crate) dispatch: Notify,
    /// Wakes `waiter()` callers after a task leaves the pending list.
    drained: Notify,
    pub(crate) poll_interval: Duration,
    pub(crate) executor: Arc<dyn ExecutorBackend>,
}

impl Shared {
    pub(crate) fn core(&self) -> MutexGuard<'_, QueueCore> {
        lock(&self.core)
    }

    /// Bookkeeping once a dispatched task's execution unit is done.
    pub(crate) fn complete(&self, task: &Task) {
        let (removed, queue_size, running) = {
            let mut core = self.core();
            let removed = core.finish(task);
            (removed, core.queue_size(), core.running())
        };

        debug!(
            task = %task.label(),
            state = %task.state(),
            removed,
            queue_size,
            running,
            "task left the queue"
        );

        self.dispatch.notify_waiters();
        self.drained.notify_waiters();
    }
}

/// A queue of tasks executed concurrently once their requirements are met.
///
/// `Queue` is a cheap handle; clones share the same queue. Run the dispatch
/// loop with [`Queue::start`] (or [`Queue::spawn`]), wait for the pending
/// list to drain with [`Queue::waiter`], then call [`Queue::stop`].
#[derive(Clone)]
pub struct Queue {
    pub(crate) shared: Arc<Shared>,
}

impl Queue {
    /// An empty queue with unlimited capacity.
    pub fn new() -> Self {
        Self::with_options(QueueOptions::default())
    }

    pub fn with_options(options: QueueOptions) -> Self {
        Self::with_executor(options, Arc::new(BlockingExecutor::new()))
    }

    pub fn with_executor(options: QueueOptions, executor: Arc<dyn ExecutorBackend>) -> Self {
        Self {
            shared: Arc::new(Shared {
                core: Mutex::new(QueueCore::new(options.run_capacity)),
                dispatch: Notify::new(),
                drained: Notify::new(),
                poll_interval: options.poll_interval,
                executor,
            }),
        }
    }

    /// Submit a task. Fails if the task was already submitted to any queue.
    pub fn add_task(&self, task: &Task) -> std::result::Result<(), TaskError> {
        self.shared.core().add_task(task)?;
        self.shared.dispatch.notify_waiters();
        Ok(())
    }

    /// Every task ever submitted, in submission order.
    pub fn task_list(&self) -> Vec<Task> {
        self.shared.core().task_list()
    }

    /// Number of submitted tasks that have not finished yet.
    pub fn queue_size(&self) -> usize {
        self.shared.core().queue_size()
    }

    /// Number of tasks currently executing.
    pub fn running(&self) -> usize {
        self.shared.core().running()
    }

    pub fn run_capacity(&self) -> usize {
        self.shared.core().run_capacity()
    }

    /// Set the maximum number of concurrently running tasks (`0` = unlimited).
    ///
    /// Values that are not a valid capacity, such as negative integers, are
    /// ignored.
    pub fn set_run_capacity<C>(&self, capacity: C)
    where
        C: TryInto<usize>,
    {
        let Ok(capacity) = TryInto::<usize>::try_into(capacity) else {
            debug!("ignoring invalid run capacity");
            return;
        };
        self.shared.core().set_run_capacity(capacity);
        debug!(run_capacity = capacity, "run capacity updated");
        self.shared.dispatch.notify_waiters();
    }

    /// Stop dispatching. Tasks already running are not interrupted.
    pub fn stop(&self) {
        self.shared.core().stop();
        info!("queue stop requested");
        self.shared.dispatch.notify_waiters();
    }

    pub fn is_stopped(&self) -> bool {
        self.shared.core().is_stopped()
    }

    /// Wait until the pending list is empty.
    ///
    /// Returns immediately for an empty queue. Does not stop the dispatch
    /// loop. Tasks blocked by a failed or canceled requirement never leave
    /// the pending list, so this can wait forever; see
    /// [`Queue::wait_timeout`].
    pub async fn waiter(&self) {
        loop {
            let drained = self.shared.drained.notified();
            tokio::pin!(drained);
            drained.as_mut().enable();

            if self.queue_size() == 0 {
                return;
            }
            drained.await;
        }
    }

    /// [`Queue::waiter`] bounded by `timeout`.
    pub async fn wait_timeout(&self, timeout: Duration) -> Result<()> {
        tokio::time::timeout(timeout, self.waiter())
            .await
            .map_err(|_| FlowError::WaitTimeout(timeout))
    }
}

impl Default for Queue {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Queue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Queue")
            .field("core", &*self.shared.core())
            .field("poll_interval", &self.shared.poll_interval)
            .finish_non_exhaustive()
    }
}
