//! Simulation state: the ordered task collection for one run.
//!
//! Declaration order is semantic (the sequential and pipeline policies
//! derive eligibility from it), so tasks live in a `Vec` in the order the
//! caller supplied them, with an id index for lookup.
//!
//! # Critical Invariants
//!
//! 1. **Id uniqueness**: each task id appears exactly once (validated at
//!    engine construction)
//! 2. **Exclusive ownership**: one `SimulationState` per engine instance per
//!    run; nothing is shared across concurrent runs

use crate::models::task::{Task, TaskSpec, TaskState};
use std::collections::HashMap;

/// All tasks for one simulation run, in declaration order.
///
/// # Example
/// ```
/// use sched_sim_core_rs::{SimulationState, TaskKind, TaskSpec};
///
/// let state = SimulationState::new(&[
///     TaskSpec::new("a".to_string(), TaskKind::Network, 100),
///     TaskSpec::new("b".to_string(), TaskKind::Compute, 200),
/// ]);
/// assert_eq!(state.len(), 2);
/// assert!(state.get("b").is_some());
/// ```
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// Tasks in declaration order
    tasks: Vec<Task>,

    /// Task id → index into `tasks`
    index: HashMap<String, usize>,
}

impl SimulationState {
    /// Create a state with every task `Idle`.
    pub fn new(specs: &[TaskSpec]) -> Self {
        let tasks: Vec<Task> = specs.iter().map(Task::from_spec).collect();
        let index = Self::build_index(&tasks);
        Self { tasks, index }
    }

    /// Rebuild state from checkpointed tasks.
    pub(crate) fn from_tasks(tasks: Vec<Task>) -> Self {
        let index = Self::build_index(&tasks);
        Self { tasks, index }
    }

    fn build_index(tasks: &[Task]) -> HashMap<String, usize> {
        tasks
            .iter()
            .enumerate()
            .map(|(i, t)| (t.id().to_string(), i))
            .collect()
    }

    /// Tasks in declaration order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Get a task by id.
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.index.get(id).map(|&i| &self.tasks[i])
    }

    /// Get a mutable task by id.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Task> {
        let i = *self.index.get(id)?;
        Some(&mut self.tasks[i])
    }

    /// Get a mutable task by declaration index.
    pub fn task_at_mut(&mut self, index: usize) -> &mut Task {
        &mut self.tasks[index]
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Number of tasks currently in `state`.
    pub fn count_in(&self, state: TaskState) -> usize {
        self.tasks.iter().filter(|t| t.state() == state).count()
    }

    /// True once every task is `Completed` or `Failed`.
    pub fn all_terminal(&self) -> bool {
        self.tasks.iter().all(|t| t.is_terminal())
    }

    /// True if any task is `Running`.
    pub fn any_running(&self) -> bool {
        self.tasks.iter().any(|t| t.state() == TaskState::Running)
    }

    /// Ids of running tasks that block simulated user input.
    pub fn running_blocking_ids(&self) -> Vec<String> {
        self.tasks
            .iter()
            .filter(|t| t.state() == TaskState::Running && t.is_blocking())
            .map(|t| t.id().to_string())
            .collect()
    }

    /// Ids of tasks not yet in a terminal state.
    pub fn non_terminal_ids(&self) -> Vec<String> {
        self.tasks
            .iter()
            .filter(|t| !t.is_terminal())
            .map(|t| t.id().to_string())
            .collect()
    }
}
