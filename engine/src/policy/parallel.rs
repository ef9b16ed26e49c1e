//! Parallel policy: every task eligible immediately.
//!
//! "Parallel" is a scheduling rule, not a thread pool: the model simply
//! lets any number of tasks be running at once. Total run time is the
//! longest single duration (the critical path is the longest task).
//!
//! An optional bootstrap task gates the rest: when configured, every other
//! task becomes eligible only once the bootstrap's duration has elapsed.
//! This models a shared shell/bundle that feature modules depend on.

use super::SchedulingPolicy;
use crate::models::task::Task;

/// Everything-at-once scheduling with an optional bootstrap gate.
pub struct ParallelPolicy {
    bootstrap_task_id: Option<String>,
}

impl ParallelPolicy {
    pub fn new(bootstrap_task_id: Option<String>) -> Self {
        Self { bootstrap_task_id }
    }

    /// Duration of the configured bootstrap task, if present in the set.
    fn bootstrap_duration(&self, tasks: &[Task]) -> Option<u64> {
        let id = self.bootstrap_task_id.as_deref()?;
        tasks.iter().find(|t| t.id() == id).map(|t| t.duration_ms())
    }
}

impl SchedulingPolicy for ParallelPolicy {
    fn name(&self) -> &'static str {
        "parallel"
    }

    fn eligible_start_ms(&self, tasks: &[Task], index: usize) -> Option<u64> {
        match self.bootstrap_duration(tasks) {
            Some(gate) if Some(tasks[index].id()) != self.bootstrap_task_id.as_deref() => {
                Some(gate)
            }
            _ => Some(0),
        }
    }

    fn predicted_total_ms(&self, tasks: &[Task]) -> u64 {
        match self.bootstrap_duration(tasks) {
            Some(gate) => {
                let longest_dependent = tasks
                    .iter()
                    .filter(|t| Some(t.id()) != self.bootstrap_task_id.as_deref())
                    .map(|t| t.duration_ms())
                    .max()
                    .unwrap_or(0);
                gate + longest_dependent
            }
            None => tasks.iter().map(|t| t.duration_ms()).max().unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::{TaskKind, TaskSpec};

    fn task(id: &str, duration_ms: u64) -> Task {
        Task::from_spec(&TaskSpec::new(id.to_string(), TaskKind::Network, duration_ms))
    }

    #[test]
    fn test_all_eligible_at_zero_without_bootstrap() {
        let tasks = vec![task("a", 100), task("b", 500), task("c", 50)];
        let policy = ParallelPolicy::new(None);

        for i in 0..tasks.len() {
            assert_eq!(policy.eligible_start_ms(&tasks, i), Some(0));
        }
        assert_eq!(policy.predicted_total_ms(&tasks), 500);
    }

    #[test]
    fn test_bootstrap_gates_everything_else() {
        let tasks = vec![task("shell", 80), task("cart", 300), task("search", 120)];
        let policy = ParallelPolicy::new(Some("shell".to_string()));

        assert_eq!(policy.eligible_start_ms(&tasks, 0), Some(0));
        assert_eq!(policy.eligible_start_ms(&tasks, 1), Some(80));
        assert_eq!(policy.eligible_start_ms(&tasks, 2), Some(80));
        assert_eq!(policy.predicted_total_ms(&tasks), 380);
    }

    #[test]
    fn test_single_task_total() {
        let tasks = vec![task("only", 42)];
        assert_eq!(ParallelPolicy::new(None).predicted_total_ms(&tasks), 42);
    }
}
