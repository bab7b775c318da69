// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod demo;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod types;

use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::load_or_default;
use crate::dag::execution_order;

pub use crate::dag::Task;
pub use crate::engine::{Queue, QueueOptions};
pub use crate::errors::{FlowError, TaskError};
pub use crate::types::TaskState;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the demonstration task graph
/// - the queue and its dispatch loop
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_or_default(args.config.as_deref().map(Path::new))?;

    let mut options = cfg.queue_options();
    if let Some(capacity) = args.run_capacity {
        options.run_capacity = capacity;
    }

    let tasks = demo::six_task_graph(|name| {
        move |task: &Task| {
            info!(task = %task.label(), id = %task.id(), "hello from {name}");
        }
    })?;

    if args.dry_run {
        print_dry_run(&tasks, &options)?;
        return Ok(());
    }

    let queue = Queue::with_options(options);
    for task in &tasks {
        queue.add_task(task)?;
    }

    let dispatcher = queue.spawn();
    queue.waiter().await;
    queue.stop();
    dispatcher.await?;

    for task in queue.task_list() {
        let state = task.state();
        if state.is_done() {
            info!(task = %task.label(), %state, "final state");
        } else {
            warn!(task = %task.label(), %state, errors = ?task.errors(), "task did not finish");
        }
    }

    Ok(())
}

/// Simple dry-run output: print tasks, requirements and execution order.
fn print_dry_run(tasks: &[Task], options: &QueueOptions) -> Result<()> {
    println!("taskflow dry-run");
    println!("  queue.run_capacity = {}", options.run_capacity);
    println!("  queue.poll_interval = {:?}", options.poll_interval);
    println!();

    println!("tasks ({}):", tasks.len());
    for task in tasks {
        println!("  - {}", task.label());
        let required: Vec<String> = task
            .required_tasks()
            .iter()
            .map(|t| t.label().to_string())
            .collect();
        if !required.is_empty() {
            println!("      requires: {:?}", required);
        }
    }
    println!();

    let order: Vec<String> = execution_order(tasks)?
        .iter()
        .map(|t| t.label().to_string())
        .collect();
    println!("execution order: {}", order.join(" -> "));

    debug!("dry-run complete (no execution)");
    Ok(())
}

/// Lock a mutex, recovering the data if a holder panicked. Every guarded
/// value here stays consistent between statements.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
