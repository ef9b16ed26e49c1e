//! Priority-tiered policy: critical, then high, then low.
//!
//! Tasks are bucketed by priority tier. A tier becomes eligible once all
//! strictly higher tiers have had time to complete; because a tier runs
//! internally in parallel, that gate is the longest duration found in any
//! higher tier. Within a tier, tasks behave exactly as under the parallel
//! policy.

use super::SchedulingPolicy;
use crate::models::task::{Priority, Task};

/// Urgency-tiered scheduling, parallel within a tier.
///
/// # Example
///
/// ```
/// use sched_sim_core_rs::policy::{PriorityPolicy, SchedulingPolicy};
/// use sched_sim_core_rs::{Priority, Task, TaskKind, TaskSpec};
///
/// let tasks: Vec<Task> = vec![
///     Task::from_spec(
///         &TaskSpec::new("core".to_string(), TaskKind::Network, 120)
///             .with_priority(Priority::Critical),
///     ),
///     Task::from_spec(
///         &TaskSpec::new("widget".to_string(), TaskKind::Network, 400)
///             .with_priority(Priority::Low),
///     ),
/// ];
///
/// let policy = PriorityPolicy;
/// assert_eq!(policy.eligible_start_ms(&tasks, 0), Some(0));
/// assert_eq!(policy.eligible_start_ms(&tasks, 1), Some(120));
/// ```
pub struct PriorityPolicy;

impl PriorityPolicy {
    /// Longest duration among tasks in tiers strictly more urgent than `tier`.
    fn higher_tier_gate_ms(tasks: &[Task], tier: Priority) -> u64 {
        tasks
            .iter()
            .filter(|t| t.priority().outranks(tier))
            .map(|t| t.duration_ms())
            .max()
            .unwrap_or(0)
    }
}

impl SchedulingPolicy for PriorityPolicy {
    fn name(&self) -> &'static str {
        "priority"
    }

    fn eligible_start_ms(&self, tasks: &[Task], index: usize) -> Option<u64> {
        Some(Self::higher_tier_gate_ms(tasks, tasks[index].priority()))
    }

    fn predicted_total_ms(&self, tasks: &[Task]) -> u64 {
        tasks
            .iter()
            .map(|t| Self::higher_tier_gate_ms(tasks, t.priority()) + t.duration_ms())
            .max()
            .unwrap_or(0)
    }

    /// The critical tier is eligible at 0, so its predicted completion is
    /// its longest duration, the "first paint" figure.
    fn predicted_critical_done_ms(&self, tasks: &[Task]) -> Option<u64> {
        tasks
            .iter()
            .filter(|t| t.priority() == Priority::Critical)
            .map(|t| t.duration_ms())
            .max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::{TaskKind, TaskSpec};

    fn task(id: &str, duration_ms: u64, priority: Priority) -> Task {
        Task::from_spec(
            &TaskSpec::new(id.to_string(), TaskKind::Network, duration_ms).with_priority(priority),
        )
    }

    /// The 6-task scenario used by the loading-orchestrator widget.
    fn scenario() -> Vec<Task> {
        vec![
            task("t0", 50, Priority::Critical),
            task("t1", 120, Priority::Critical),
            task("t2", 200, Priority::High),
            task("t3", 350, Priority::High),
            task("t4", 800, Priority::Low),
            task("t5", 400, Priority::Low),
        ]
    }

    #[test]
    fn test_critical_tier_eligible_at_zero() {
        let tasks = scenario();
        let policy = PriorityPolicy;
        assert_eq!(policy.eligible_start_ms(&tasks, 0), Some(0));
        assert_eq!(policy.eligible_start_ms(&tasks, 1), Some(0));
    }

    #[test]
    fn test_high_tier_gated_on_longest_critical() {
        let tasks = scenario();
        let policy = PriorityPolicy;
        assert_eq!(policy.eligible_start_ms(&tasks, 2), Some(120));
        assert_eq!(policy.eligible_start_ms(&tasks, 3), Some(120));
    }

    #[test]
    fn test_low_tier_gated_on_longest_higher_task() {
        let tasks = scenario();
        let policy = PriorityPolicy;
        assert_eq!(policy.eligible_start_ms(&tasks, 4), Some(350));
        assert_eq!(policy.eligible_start_ms(&tasks, 5), Some(350));
    }

    #[test]
    fn test_predicted_totals_match_scenario_labels() {
        let tasks = scenario();
        let policy = PriorityPolicy;

        // Critical done at 120, full completion at 350 + 800.
        assert_eq!(policy.predicted_critical_done_ms(&tasks), Some(120));
        assert_eq!(policy.predicted_total_ms(&tasks), 1150);
        assert!(policy.predicted_total_ms(&tasks) >= 1000);
    }

    #[test]
    fn test_no_critical_tasks_means_no_first_paint_figure() {
        let tasks = vec![task("a", 100, Priority::High), task("b", 50, Priority::Low)];
        assert_eq!(PriorityPolicy.predicted_critical_done_ms(&tasks), None);
    }
}
