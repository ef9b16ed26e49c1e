//! Sequential policy: one task at a time, in declared order.
//!
//! Each task becomes eligible when the combined duration of every task
//! declared before it has elapsed, so at most one task is ever running
//! and total run time is the sum of all durations.

use super::SchedulingPolicy;
use crate::models::task::Task;

/// Declared-order, one-at-a-time scheduling.
///
/// # Example
///
/// ```
/// use sched_sim_core_rs::policy::{SchedulingPolicy, SequentialPolicy};
/// use sched_sim_core_rs::{Task, TaskKind, TaskSpec};
///
/// let tasks: Vec<Task> = [100, 200, 50]
///     .iter()
///     .enumerate()
///     .map(|(i, d)| Task::from_spec(&TaskSpec::new(format!("t{i}"), TaskKind::Network, *d)))
///     .collect();
///
/// let policy = SequentialPolicy;
/// assert_eq!(policy.eligible_start_ms(&tasks, 0), Some(0));
/// assert_eq!(policy.eligible_start_ms(&tasks, 2), Some(300));
/// assert_eq!(policy.predicted_total_ms(&tasks), 350);
/// ```
pub struct SequentialPolicy;

impl SchedulingPolicy for SequentialPolicy {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn eligible_start_ms(&self, tasks: &[Task], index: usize) -> Option<u64> {
        Some(tasks[..index].iter().map(|t| t.duration_ms()).sum())
    }

    fn predicted_total_ms(&self, tasks: &[Task]) -> u64 {
        tasks.iter().map(|t| t.duration_ms()).sum()
    }
}
