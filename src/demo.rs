// src/demo.rs

//! The demonstration graph run by the `taskflow` binary.
//!
//! ```text
//! task1 -> task2 -> task3 -> task5 -> task6
//!                -> task4 ----------> task6
//! ```
//!
//! An arrow reads "requires". Tests reuse it as an end-to-end fixture.

use crate::dag::Task;
use crate::errors::TaskError;

pub const DEMO_TASK_NAMES: [&str; 6] = ["task1", "task2", "task3", "task4", "task5", "task6"];

/// Build the six demo tasks, returned as `[task1, ..., task6]`.
///
/// `work_for` is called once per task name and supplies its work function.
pub fn six_task_graph<F, W>(mut work_for: F) -> Result<Vec<Task>, TaskError>
where
    F: FnMut(&'static str) -> W,
    W: Fn(&Task) + Send + Sync + 'static,
{
    let tasks: Vec<Task> = DEMO_TASK_NAMES
        .iter()
        .map(|&name| Task::named(name, work_for(name)))
        .collect();

    let [t1, t2, t3, t4, t5, t6] = [
        &tasks[0], &tasks[1], &tasks[2], &tasks[3], &tasks[4], &tasks[5],
    ];
    t1.requires_task(t2)?;
    t2.requires_task(t4)?;
    t2.requires_task(t3)?;
    t3.requires_task(t5)?;
    t4.requires_task(t6)?;
    t5.requires_task(t6)?;

    Ok(tasks)
}
