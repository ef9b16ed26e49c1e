//! Immutable per-tick snapshots: the observer contract.
//!
//! A new `Snapshot` is produced by every `step()` (and at construction).
//! It is the only view UI widgets bind to: ordered task views for bars and
//! badges, aggregate metrics for timers and labels. Snapshots are plain
//! serde data, so the boundary to the rendering layer is a JSON value, not
//! engine internals.

use crate::models::task::{Priority, Task, TaskKind, TaskState};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Read-only view of one task at one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskView {
    pub id: String,
    pub kind: TaskKind,
    pub priority: Priority,
    pub duration_ms: u64,
    pub state: TaskState,
    pub started_at_ms: Option<u64>,
    pub completed_at_ms: Option<u64>,

    /// Earliest simulated time the active policy allows this task to start.
    /// `None` while the policy cannot determine it yet (a pipeline stage
    /// whose predecessor has not completed).
    pub eligible_start_ms: Option<u64>,

    /// Sub-progress within the task's duration, `0.0..=1.0`
    pub progress: f64,

    /// Whether a running instance blocks simulated user input
    pub blocking: bool,

    /// Non-terminal after a safety stop or cascade halt
    pub stuck: bool,
}

impl TaskView {
    /// Build a view of `task` at `elapsed_ms`.
    pub fn of(task: &Task, elapsed_ms: u64, eligible_start_ms: Option<u64>, stuck: bool) -> Self {
        Self {
            id: task.id().to_string(),
            kind: task.kind(),
            priority: task.priority(),
            duration_ms: task.duration_ms(),
            state: task.state(),
            started_at_ms: task.started_at_ms(),
            completed_at_ms: task.completed_at_ms(),
            eligible_start_ms,
            progress: task.progress(elapsed_ms),
            blocking: task.is_blocking(),
            stuck,
        }
    }
}

/// Aggregate figures derived from the task set at one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMetrics {
    pub idle: usize,
    pub running: usize,
    pub completed: usize,
    pub failed: usize,

    /// Total run time the active policy predicts from the task durations
    pub predicted_total_ms: u64,

    /// Predicted completion time of the critical tier (priority policy only)
    pub predicted_critical_done_ms: Option<u64>,

    /// Every task terminal, or the run otherwise over
    pub is_complete: bool,

    /// Safety bound fired with non-terminal tasks remaining
    pub safety_stopped: bool,

    /// A cascading fault halted the run
    pub cascaded: bool,
}

/// Immutable per-tick view of the whole simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Identity of the run this snapshot belongs to
    pub run_id: Uuid,

    /// Step ordinal (0 for the initial snapshot)
    pub tick: u64,

    /// Simulated milliseconds elapsed
    pub elapsed_ms: u64,

    /// Name of the active policy (`sequential`, `parallel`, ...)
    pub policy: String,

    /// Task views in declaration order
    pub tasks: Vec<TaskView>,

    /// Aggregate metrics
    pub metrics: SnapshotMetrics,
}

impl Snapshot {
    /// Look up a task view by id.
    pub fn task(&self, id: &str) -> Option<&TaskView> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Ids of tasks in the given state.
    pub fn ids_in(&self, state: TaskState) -> Vec<&str> {
        self.tasks
            .iter()
            .filter(|t| t.state == state)
            .map(|t| t.id.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::TaskSpec;

    #[test]
    fn test_task_view_of_running_task() {
        let mut task = Task::from_spec(&TaskSpec::new("t".to_string(), TaskKind::Compute, 200));
        task.start(100).unwrap();

        let view = TaskView::of(&task, 200, Some(100), false);
        assert_eq!(view.state, TaskState::Running);
        assert_eq!(view.progress, 0.5);
        assert!(view.blocking);
        assert_eq!(view.eligible_start_ms, Some(100));
    }

    #[test]
    fn test_snapshot_queries() {
        let mut running = Task::from_spec(&TaskSpec::new("r".to_string(), TaskKind::Network, 100));
        running.start(0).unwrap();
        let idle = Task::from_spec(&TaskSpec::new("i".to_string(), TaskKind::Network, 100));

        let snapshot = Snapshot {
            run_id: Uuid::nil(),
            tick: 1,
            elapsed_ms: 50,
            policy: "parallel".to_string(),
            tasks: vec![
                TaskView::of(&running, 50, Some(0), false),
                TaskView::of(&idle, 50, Some(0), false),
            ],
            metrics: SnapshotMetrics {
                idle: 1,
                running: 1,
                completed: 0,
                failed: 0,
                predicted_total_ms: 100,
                predicted_critical_done_ms: None,
                is_complete: false,
                safety_stopped: false,
                cascaded: false,
            },
        };

        assert!(snapshot.task("r").is_some());
        assert_eq!(snapshot.ids_in(TaskState::Idle), vec!["i"]);
    }

    #[test]
    fn test_snapshot_json_round_trip() {
        let task = Task::from_spec(&TaskSpec::new("t".to_string(), TaskKind::RenderStage, 80));
        let snapshot = Snapshot {
            run_id: Uuid::nil(),
            tick: 0,
            elapsed_ms: 0,
            policy: "pipeline".to_string(),
            tasks: vec![TaskView::of(&task, 0, Some(0), false)],
            metrics: SnapshotMetrics {
                idle: 1,
                running: 0,
                completed: 0,
                failed: 0,
                predicted_total_ms: 80,
                predicted_critical_done_ms: None,
                is_complete: false,
                safety_stopped: false,
                cascaded: false,
            },
        };

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
