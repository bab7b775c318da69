use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use taskflow::Task;
use taskflow::exec::{BlockingExecutor, ExecutorBackend};

/// Wraps [`BlockingExecutor`] and records:
/// - the order in which tasks were launched
/// - how many tasks were executing at the same time (current and peak)
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    inner: BlockingExecutor,
    launched: Mutex<Vec<String>>,
    active: AtomicUsize,
    peak: AtomicUsize,
}

impl RecordingExecutor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn launched(&self) -> Vec<String> {
        self.launched.lock().unwrap().clone()
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }
}

impl ExecutorBackend for RecordingExecutor {
    fn execute(&self, task: Task) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(async move {
            self.launched.lock().unwrap().push(task.label().to_string());
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);

            self.inner.execute(task).await;

            self.active.fetch_sub(1, Ordering::SeqCst);
        })
    }
}
