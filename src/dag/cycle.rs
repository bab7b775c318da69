// src/dag/cycle.rs

//! Cycle detection for new dependency edges.
//!
//! Before `owner` gains the requirement `candidate`, walk everything
//! reachable from `candidate` depth-first. Reaching `owner` means the new
//! edge would close a loop; reaching a node that is already on the current
//! path means the branch itself is cyclic. The walk is iterative with an
//! explicit frame stack so deep graphs cannot overflow the call stack, and it
//! visits nodes in the same order a recursive walk would, failing on the
//! first problem found.
//!
//! Nothing is memoised: graphs are wired once before submission.

use std::collections::HashSet;

use crate::dag::Task;
use crate::errors::TaskError;

struct Frame {
    children: Vec<Task>,
    next: usize,
}

/// Ok if `owner -> candidate` keeps the graph acyclic.
pub(crate) fn check_edge(owner: &Task, candidate: &Task) -> Result<(), TaskError> {
    let mut path: HashSet<String> = HashSet::new();
    let mut frames: Vec<(String, Frame)> = Vec::new();

    enter(owner, candidate, &mut path, &mut frames)?;

    while let Some((_, frame)) = frames.last_mut() {
        if frame.next < frame.children.len() {
            let branch = frame.children[frame.next].clone();
            frame.next += 1;
            enter(owner, &branch, &mut path, &mut frames)?;
        } else if let Some((id, _)) = frames.pop() {
            path.remove(&id);
        }
    }

    Ok(())
}

fn enter(
    owner: &Task,
    branch: &Task,
    path: &mut HashSet<String>,
    frames: &mut Vec<(String, Frame)>,
) -> Result<(), TaskError> {
    if branch.id() == owner.id() {
        return Err(TaskError::SelfCycle {
            task: owner.label().to_string(),
        });
    }

    if path.contains(branch.id()) {
        return Err(TaskError::BranchCycle {
            task: owner.label().to_string(),
            branch: branch.label().to_string(),
        });
    }

    path.insert(branch.id().to_string());
    frames.push((
        branch.id().to_string(),
        Frame {
            children: branch.required_tasks(),
            next: 0,
        },
    ));
    Ok(())
}
