// tests/property_cycles.rs

use std::collections::{BTreeSet, HashSet};

use proptest::prelude::*;
use taskflow::Task;
use taskflow::dag::execution_order;

// Strategy for an acyclic edge list over `num_tasks` nodes.
// Acyclic by construction: task i may only require tasks 0..i.
fn dag_strategy(max_tasks: usize) -> impl Strategy<Value = (usize, Vec<BTreeSet<usize>>)> {
    (1..=max_tasks).prop_flat_map(|num_tasks| {
        let raw = proptest::collection::vec(
            proptest::collection::vec(any::<usize>(), 0..4),
            num_tasks,
        );
        raw.prop_map(move |raw_deps| {
            let deps = raw_deps
                .into_iter()
                .enumerate()
                .map(|(i, picks)| {
                    if i == 0 {
                        BTreeSet::new()
                    } else {
                        picks.into_iter().map(|p| p % i).collect()
                    }
                })
                .collect();
            (num_tasks, deps)
        })
    })
}

fn build(num_tasks: usize, deps: &[BTreeSet<usize>]) -> Vec<Task> {
    let tasks: Vec<Task> = (0..num_tasks)
        .map(|i| Task::named(format!("t{i}"), |_| {}))
        .collect();
    for (i, required) in deps.iter().enumerate() {
        for &j in required {
            tasks[i].requires_task(&tasks[j]).unwrap();
        }
    }
    tasks
}

// Whether `from` reaches `to` by following requirement edges.
fn reaches(deps: &[BTreeSet<usize>], from: usize, to: usize) -> bool {
    let mut seen = HashSet::new();
    let mut stack = vec![from];
    while let Some(node) = stack.pop() {
        if node == to {
            return true;
        }
        if seen.insert(node) {
            stack.extend(deps[node].iter().copied());
        }
    }
    false
}

proptest! {
    #[test]
    fn forward_edges_are_always_accepted((num_tasks, deps) in dag_strategy(12)) {
        let tasks = build(num_tasks, &deps);
        for (task, required) in tasks.iter().zip(&deps) {
            prop_assert_eq!(task.required_tasks().len(), required.len());
            prop_assert!(task.errors().is_empty());
        }
    }

    #[test]
    fn extra_edge_rejected_exactly_when_it_closes_a_loop(
        (num_tasks, deps) in dag_strategy(12),
        x in any::<usize>(),
        y in any::<usize>(),
    ) {
        let tasks = build(num_tasks, &deps);
        let (x, y) = (x % num_tasks, y % num_tasks);
        let before = tasks[x].required_tasks();

        let result = tasks[x].requires_task(&tasks[y]);

        if x == y || reaches(&deps, y, x) {
            let err = result.unwrap_err();
            prop_assert!(err.is_cycle());
            prop_assert_eq!(tasks[x].required_tasks(), before);
        } else {
            prop_assert!(result.is_ok());
            prop_assert_eq!(tasks[x].required_tasks().len(), before.len() + 1);
        }
    }

    #[test]
    fn execution_order_puts_requirements_first((num_tasks, deps) in dag_strategy(12)) {
        let tasks = build(num_tasks, &deps);
        let order = execution_order(&tasks).unwrap();
        prop_assert_eq!(order.len(), num_tasks);

        let pos = |task: &Task| order.iter().position(|t| t == task).unwrap();
        for (i, required) in deps.iter().enumerate() {
            for &j in required {
                prop_assert!(pos(&tasks[j]) < pos(&tasks[i]));
            }
        }
    }
}
