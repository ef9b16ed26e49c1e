//! Task model and lifecycle state machine.
//!
//! A task is the atomic unit of simulated work:
//! - Identity (unique within a run)
//! - Kind (network, compute, render-stage, user-input)
//! - Duration in simulated milliseconds (> 0)
//! - Priority tier (critical, high, low) used by the priority policy
//! - Lifecycle state: `Idle → Running → {Completed | Failed}`
//!
//! Terminal states are absorbing: no transition leaves `Completed` or
//! `Failed`. All transition methods are guarded and return `TaskError`
//! on an illegal move; only the engine calls them during tick processing.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What a task simulates. Purely descriptive except for input blocking:
/// compute work blocks simulated user input while running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskKind {
    /// A network load (fetch, stream, module download)
    Network,

    /// CPU-bound work on the simulated main thread
    Compute,

    /// One stage of a rendering pipeline
    RenderStage,

    /// A simulated user-input handler
    UserInput,
}

impl TaskKind {
    /// Whether this kind blocks simulated user input by default.
    pub fn blocks_input(&self) -> bool {
        matches!(self, TaskKind::Compute)
    }
}

/// Priority tier for the priority-tiered policy.
///
/// Ordering is by urgency: `Critical < High < Low`, so a "higher" tier
/// compares as less than a lower one.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Must run before anything else (e.g. first-paint work)
    Critical,

    /// Default tier
    #[default]
    High,

    /// Runs once all higher tiers have had time to complete
    Low,
}

impl Priority {
    /// True if `self` is a strictly more urgent tier than `other`.
    pub fn outranks(&self, other: Priority) -> bool {
        *self < other
    }
}

/// Errors for illegal lifecycle transitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskError {
    #[error("cannot start task in state {0:?}")]
    NotIdle(TaskState),

    #[error("cannot finish task in state {0:?}")]
    NotRunning(TaskState),

    #[error("finish time {at_ms} precedes start time {started_at_ms}")]
    FinishBeforeStart { at_ms: u64, started_at_ms: u64 },
}

/// Lifecycle state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskState {
    /// Created, not yet eligible or not yet started
    Idle,

    /// Between start and finish
    Running,

    /// Finished successfully (terminal)
    Completed,

    /// Finished by fault injection or cascade (terminal)
    Failed,
}

impl TaskState {
    /// Terminal states are absorbing.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskState::Completed | TaskState::Failed)
    }
}

/// Construction input for one task, as supplied by the UI.
///
/// # Example
/// ```
/// use sched_sim_core_rs::{Priority, TaskKind, TaskSpec};
///
/// let spec = TaskSpec::new("hero-image".to_string(), TaskKind::Network, 350)
///     .with_priority(Priority::Critical);
/// assert_eq!(spec.duration_ms, 350);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSpec {
    /// Unique identifier within a run
    pub id: String,

    /// What the task simulates
    pub kind: TaskKind,

    /// Simulated duration in milliseconds (must be > 0)
    pub duration_ms: u64,

    /// Priority tier (priority policy only; other policies ignore it)
    #[serde(default)]
    pub priority: Priority,

    /// Explicit input-blocking override. `None` defers to the kind.
    #[serde(default)]
    pub blocking: Option<bool>,
}

impl TaskSpec {
    /// Create a spec with default priority and kind-derived blocking.
    pub fn new(id: String, kind: TaskKind, duration_ms: u64) -> Self {
        Self {
            id,
            kind,
            duration_ms,
            priority: Priority::default(),
            blocking: None,
        }
    }

    /// Set the priority tier.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Override whether the task blocks simulated user input.
    pub fn with_blocking(mut self, blocking: bool) -> Self {
        self.blocking = Some(blocking);
        self
    }
}

/// A task inside a running simulation.
///
/// Created from a [`TaskSpec`] at engine construction with state `Idle`;
/// mutated only by the engine during tick processing; discarded on reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    spec: TaskSpec,

    /// Current lifecycle state
    state: TaskState,

    /// Simulated time the task left `Idle` (its eligibility time, which may
    /// be earlier than the tick boundary at which the transition was applied)
    started_at_ms: Option<u64>,

    /// Simulated time the task reached a terminal state
    completed_at_ms: Option<u64>,
}

impl Task {
    /// Create an idle task from its spec.
    pub fn from_spec(spec: &TaskSpec) -> Self {
        Self {
            spec: spec.clone(),
            state: TaskState::Idle,
            started_at_ms: None,
            completed_at_ms: None,
        }
    }

    /// Rebuild a task from checkpointed fields. Used only by restore.
    pub(crate) fn from_parts(
        spec: TaskSpec,
        state: TaskState,
        started_at_ms: Option<u64>,
        completed_at_ms: Option<u64>,
    ) -> Self {
        Self {
            spec,
            state,
            started_at_ms,
            completed_at_ms,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn id(&self) -> &str {
        &self.spec.id
    }

    pub fn kind(&self) -> TaskKind {
        self.spec.kind
    }

    pub fn duration_ms(&self) -> u64 {
        self.spec.duration_ms
    }

    pub fn priority(&self) -> Priority {
        self.spec.priority
    }

    pub fn spec(&self) -> &TaskSpec {
        &self.spec
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    pub fn started_at_ms(&self) -> Option<u64> {
        self.started_at_ms
    }

    pub fn completed_at_ms(&self) -> Option<u64> {
        self.completed_at_ms
    }

    /// Whether a running instance of this task blocks simulated user input.
    pub fn is_blocking(&self) -> bool {
        self.spec.blocking.unwrap_or(self.spec.kind.blocks_input())
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// The simulated time at which a running task is due to finish.
    pub fn scheduled_finish_ms(&self) -> Option<u64> {
        self.started_at_ms.map(|s| s + self.spec.duration_ms)
    }

    /// Fraction of the duration elapsed at `elapsed_ms`, in `[0.0, 1.0]`.
    ///
    /// Completed tasks report 1.0, idle and failed tasks 0.0 and their
    /// progress at failure respectively. This is the sub-progress figure the
    /// pipeline widgets render inside a stage.
    pub fn progress(&self, elapsed_ms: u64) -> f64 {
        match self.state {
            TaskState::Idle => 0.0,
            TaskState::Completed => 1.0,
            TaskState::Running | TaskState::Failed => {
                let started = self.started_at_ms.unwrap_or(elapsed_ms);
                let end = match self.state {
                    TaskState::Failed => self.completed_at_ms.unwrap_or(elapsed_ms),
                    _ => elapsed_ms,
                };
                let run = end.saturating_sub(started) as f64;
                (run / self.spec.duration_ms as f64).clamp(0.0, 1.0)
            }
        }
    }

    // ========================================================================
    // Transitions (engine-only)
    // ========================================================================

    /// `Idle → Running` at the task's eligibility time.
    pub fn start(&mut self, at_ms: u64) -> Result<(), TaskError> {
        if self.state != TaskState::Idle {
            return Err(TaskError::NotIdle(self.state));
        }
        self.state = TaskState::Running;
        self.started_at_ms = Some(at_ms);
        Ok(())
    }

    /// `Running → Completed` at the scheduled finish time.
    pub fn complete(&mut self, at_ms: u64) -> Result<(), TaskError> {
        self.finish(at_ms, TaskState::Completed)
    }

    /// `Running → Failed` at the instant completion would otherwise occur.
    pub fn fail(&mut self, at_ms: u64) -> Result<(), TaskError> {
        self.finish(at_ms, TaskState::Failed)
    }

    fn finish(&mut self, at_ms: u64, terminal: TaskState) -> Result<(), TaskError> {
        if self.state != TaskState::Running {
            return Err(TaskError::NotRunning(self.state));
        }
        let started_at_ms = self.started_at_ms.unwrap_or(0);
        if at_ms < started_at_ms {
            return Err(TaskError::FinishBeforeStart {
                at_ms,
                started_at_ms,
            });
        }
        self.state = terminal;
        self.completed_at_ms = Some(at_ms);
        Ok(())
    }
}
