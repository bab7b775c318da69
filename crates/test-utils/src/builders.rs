#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use taskflow::Task;

/// Shared, ordered log of task names, appended to by work functions.
#[derive(Debug, Clone, Default)]
pub struct RunLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl RunLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, name: &str) {
        self.entries.lock().unwrap().push(name.to_string());
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }

    /// Position of `name` in the log. Panics if it never ran.
    pub fn position(&self, name: &str) -> usize {
        self.entries()
            .iter()
            .position(|n| n == name)
            .unwrap_or_else(|| panic!("{name} never ran; log = {:?}", self.entries()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries().iter().any(|n| n == name)
    }
}

/// Builder for test tasks whose work functions record into a [`RunLog`].
pub struct TaskBuilder {
    name: String,
    log: Option<RunLog>,
    sleep: Option<Duration>,
    outcome: Outcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Implicit,
    Success,
    Failed,
    Panic,
}

impl TaskBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            log: None,
            sleep: None,
            outcome: Outcome::Implicit,
        }
    }

    /// Append the task name to `log` when the work function finishes.
    pub fn logging_to(mut self, log: &RunLog) -> Self {
        self.log = Some(log.clone());
        self
    }

    /// Block the work function for `duration` before it finishes.
    pub fn sleeping(mut self, duration: Duration) -> Self {
        self.sleep = Some(duration);
        self
    }

    /// Work function calls `success()` on itself.
    pub fn succeeds(mut self) -> Self {
        self.outcome = Outcome::Success;
        self
    }

    /// Work function calls `failed()` on itself.
    pub fn fails(mut self) -> Self {
        self.outcome = Outcome::Failed;
        self
    }

    /// Work function panics.
    pub fn panics(mut self) -> Self {
        self.outcome = Outcome::Panic;
        self
    }

    pub fn build(self) -> Task {
        let TaskBuilder {
            name,
            log,
            sleep,
            outcome,
        } = self;

        Task::named(name.clone(), move |task: &Task| {
            if let Some(d) = sleep {
                std::thread::sleep(d);
            }
            match outcome {
                Outcome::Implicit => {}
                Outcome::Success => task.success().unwrap(),
                Outcome::Failed => task.failed().unwrap(),
                Outcome::Panic => panic!("{name} exploded"),
            }
            if let Some(log) = &log {
                log.push(&name);
            }
        })
    }
}

/// A task that only records its name into `log`.
pub fn recording_task(name: &str, log: &RunLog) -> Task {
    TaskBuilder::new(name).logging_to(log).build()
}
