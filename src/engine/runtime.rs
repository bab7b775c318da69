// src/engine/runtime.rs

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::dag::Task;

use super::queue::Queue;

impl Queue {
    /// Dispatch loop. Returns once [`Queue::stop`] has been observed.
    ///
    /// Each iteration claims at most one ready task (first match in
    /// submission order, subject to the run capacity) and launches it on the
    /// executor backend outside the queue lock. When nothing was claimed the
    /// loop sleeps until it is woken or `poll_interval` elapses.
    pub async fn start(&self) {
        info!(
            run_capacity = self.run_capacity(),
            queue_size = self.queue_size(),
            "queue dispatch loop started"
        );

        loop {
            // Register for wake-ups before looking at state, so a
            // notification sent during the scan is not lost.
            let wake = self.shared.dispatch.notified();
            tokio::pin!(wake);
            wake.as_mut().enable();

            if self.is_stopped() {
                break;
            }

            let next = self.shared.core().next_ready();
            match next {
                Some(task) => {
                    self.launch(task);
                    tokio::task::yield_now().await;
                }
                None => {
                    tokio::select! {
                        _ = &mut wake => {}
                        _ = tokio::time::sleep(self.shared.poll_interval) => {}
                    }
                }
            }
        }

        info!(queue_size = self.queue_size(), "queue dispatch loop stopped");
    }

    /// Run [`Queue::start`] on its own Tokio task.
    pub fn spawn(&self) -> JoinHandle<()> {
        let queue = self.clone();
        tokio::spawn(async move { queue.start().await })
    }

    fn launch(&self, task: Task) {
        info!(task = %task.label(), running = self.running(), "dispatching task");

        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            shared.executor.execute(task.clone()).await;
            debug!(task = %task.label(), "execution unit finished");
            shared.complete(&task);
        });
    }
}
