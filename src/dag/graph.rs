// src/dag/graph.rs

use std::collections::HashMap;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::dag::Task;
use crate::errors::TaskError;

/// Order `tasks` so that every task comes after the tasks it requires.
///
/// Only edges between members of `tasks` are considered; requirements on
/// tasks outside the slice are ignored.
pub fn execution_order(tasks: &[Task]) -> Result<Vec<Task>, TaskError> {
    let by_id: HashMap<&str, &Task> = tasks.iter().map(|t| (t.id(), t)).collect();

    // Edge direction: requirement -> dependent.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();
    for task in tasks {
        graph.add_node(task.id());
    }
    for task in tasks {
        for required in task.required_tasks() {
            if let Some((&dep_id, _)) = by_id.get_key_value(required.id()) {
                graph.add_edge(dep_id, task.id(), ());
            }
        }
    }

    match toposort(&graph, None) {
        Ok(order) => Ok(order
            .into_iter()
            .filter_map(|id| by_id.get(id).map(|t| (*t).clone()))
            .collect()),
        Err(cycle) => {
            let label = by_id
                .get(cycle.node_id())
                .map(|t| t.label().to_string())
                .unwrap_or_else(|| cycle.node_id().to_string());
            Err(TaskError::BranchCycle {
                task: label.clone(),
                branch: label,
            })
        }
    }
}
