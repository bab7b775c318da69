// tests/cycle_detection.rs

use taskflow::dag::execution_order;
use taskflow::{Task, TaskError};

fn noop(name: &str) -> Task {
    Task::named(name, |_| {})
}

fn labels(tasks: &[Task]) -> Vec<String> {
    tasks.iter().map(|t| t.label().to_string()).collect()
}

#[test]
fn self_requirement_is_rejected() {
    let a = noop("A");

    let err = a.requires_task(&a).unwrap_err();

    assert_eq!(err, TaskError::SelfCycle { task: "A".to_string() });
    assert!(err.is_cycle());
    assert!(a.required_tasks().is_empty());
    assert_eq!(a.errors(), vec![err]);
}

#[test]
fn two_node_cycle_is_rejected() {
    let a = noop("A");
    let b = noop("B");

    a.requires_task(&b).unwrap();
    let err = b.requires_task(&a).unwrap_err();

    assert!(err.is_cycle());
    assert!(err.to_string().contains("loop on self"));
    assert!(b.required_tasks().is_empty(), "B's requirements unchanged");
    assert_eq!(labels(&a.required_tasks()), vec!["B"]);
}

#[test]
fn transitive_cycle_is_rejected() {
    let a = noop("A");
    let b = noop("B");
    let c = noop("C");
    let d = noop("D");
    a.requires_task(&b).unwrap();
    b.requires_task(&c).unwrap();
    c.requires_task(&d).unwrap();

    assert!(d.requires_task(&a).unwrap_err().is_cycle());
    assert!(c.requires_task(&a).unwrap_err().is_cycle());
    assert!(d.required_tasks().is_empty());
    assert_eq!(labels(&c.required_tasks()), vec!["D"]);
}

#[test]
fn diamonds_are_not_cycles() {
    // A requires B and C, both require D. D is reached twice but never on
    // the same path.
    let a = noop("A");
    let b = noop("B");
    let c = noop("C");
    let d = noop("D");
    b.requires_task(&d).unwrap();
    c.requires_task(&d).unwrap();
    a.requires_task(&b).unwrap();
    a.requires_task(&c).unwrap();
    a.requires_task(&d).unwrap();

    assert_eq!(labels(&a.required_tasks()), vec!["B", "C", "D"]);
}

#[test]
fn deep_chain_does_not_overflow() {
    let tasks: Vec<Task> = (0..20_000).map(|i| noop(&format!("t{i}"))).collect();
    for pair in tasks.windows(2) {
        pair[0].requires_task(&pair[1]).unwrap();
    }

    let last = tasks.last().unwrap();
    let first = tasks.first().unwrap();
    assert!(last.requires_task(first).unwrap_err().is_cycle());
}

#[test]
fn execution_order_respects_requirements() {
    let tasks = taskflow::demo::six_task_graph(|_| |_: &Task| {}).unwrap();

    let order = labels(&execution_order(&tasks).unwrap());
    let pos = |name: &str| order.iter().position(|n| n == name).unwrap();

    assert_eq!(order.len(), 6);
    assert!(pos("task6") < pos("task4"));
    assert!(pos("task6") < pos("task5"));
    assert!(pos("task5") < pos("task3"));
    assert!(pos("task3") < pos("task2"));
    assert!(pos("task4") < pos("task2"));
    assert!(pos("task2") < pos("task1"));
}

#[test]
fn execution_order_ignores_tasks_outside_the_set() {
    let a = noop("A");
    let outside = noop("outside");
    a.requires_task(&outside).unwrap();

    let order = execution_order(std::slice::from_ref(&a)).unwrap();
    assert_eq!(labels(&order), vec!["A"]);
}
