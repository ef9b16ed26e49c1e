//! Simulation engine: the per-tick orchestration loop.
//!
//! The engine owns the clock, the task set, the active policy, the optional
//! fault injector and the event log for exactly one simulation run. Each
//! `step()`:
//!
//! ```text
//! 1. Advance the clock by one tick
//! 2. Decide all transitions from the pre-tick task list plus the new
//!    elapsed time (one consistent view; iteration order cannot matter)
//! 3. Apply the batch: starts, completions, injected failures
//! 4. Propagate a cascading fault, if one fired
//! 5. Record run completion or a safety stop
//! 6. Emit an immutable snapshot
//! ```
//!
//! The engine is a pure state-transition function of (current state,
//! elapsed time): it never blocks, performs no I/O, and consumes no
//! randomness. The wall-clock interval that calls `step()` and the widgets
//! that render snapshots are external collaborators.

use crate::core::clock::SimClock;
use crate::fault::{FaultConfig, FaultInjector};
use crate::models::event::{Event, EventLog};
use crate::models::snapshot::{Snapshot, SnapshotMetrics, TaskView};
use crate::models::state::SimulationState;
use crate::models::task::{TaskError, TaskSpec, TaskState};
use crate::policy::{PolicyConfig, SchedulingPolicy};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use uuid::Uuid;

/// Safety bound against runaway or misconfigured durations: a run is
/// force-completed once this much simulated time has elapsed.
pub const DEFAULT_MAX_ELAPSED_MS: u64 = 60_000;

fn default_max_elapsed_ms() -> u64 {
    DEFAULT_MAX_ELAPSED_MS
}

// ============================================================================
// Configuration
// ============================================================================

/// Complete engine configuration for one run.
///
/// # Example
///
/// ```
/// use sched_sim_core_rs::{EngineConfig, PolicyConfig, TaskKind, TaskSpec};
///
/// let config = EngineConfig::new(
///     50,
///     PolicyConfig::Sequential,
///     vec![
///         TaskSpec::new("fetch".to_string(), TaskKind::Network, 100),
///         TaskSpec::new("parse".to_string(), TaskKind::Compute, 200),
///     ],
/// );
/// assert_eq!(config.tick_size_ms, 50);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Simulated milliseconds added per tick
    pub tick_size_ms: u64,

    /// Safety bound on total simulated time
    #[serde(default = "default_max_elapsed_ms")]
    pub max_elapsed_ms: u64,

    /// Active scheduling policy
    pub policy: PolicyConfig,

    /// Task set in declaration order
    pub tasks: Vec<TaskSpec>,

    /// Optional fault injection
    #[serde(default)]
    pub fault: Option<FaultConfig>,
}

impl EngineConfig {
    /// Create a config with the default safety bound and no fault.
    pub fn new(tick_size_ms: u64, policy: PolicyConfig, tasks: Vec<TaskSpec>) -> Self {
        Self {
            tick_size_ms,
            max_elapsed_ms: DEFAULT_MAX_ELAPSED_MS,
            policy,
            tasks,
            fault: None,
        }
    }

    /// Attach fault injection.
    pub fn with_fault(mut self, fault: FaultConfig) -> Self {
        self.fault = Some(fault);
        self
    }

    /// Override the safety bound.
    pub fn with_max_elapsed_ms(mut self, max_elapsed_ms: u64) -> Self {
        self.max_elapsed_ms = max_elapsed_ms;
        self
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Simulation error types.
///
/// Configuration errors are raised synchronously at construction and never
/// retried internally. Task failures are *not* errors; they are terminal
/// task states surfaced in snapshots.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// Configuration validation failed
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A referenced task id does not exist in the task set
    #[error("task not found: {0}")]
    TaskNotFound(String),

    /// Checkpoint was produced under a different configuration
    #[error("checkpoint config hash mismatch (expected {expected}, got {actual})")]
    CheckpointMismatch { expected: String, actual: String },

    /// State (de)serialization failed
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// Internal lifecycle violation; unreachable via the public API
    #[error("task lifecycle violation: {0}")]
    Task(#[from] TaskError),
}

/// Answer to a simulated user interaction probe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UserEventOutcome {
    /// Nothing blocking was running; the input would be handled promptly
    Handled { at_ms: u64 },

    /// At least one blocking task was running at the probed instant
    Blocked {
        at_ms: u64,
        blocking_task_ids: Vec<String>,
    },
}

impl UserEventOutcome {
    pub fn is_blocked(&self) -> bool {
        matches!(self, UserEventOutcome::Blocked { .. })
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Transition decided for one task within one tick.
enum Transition {
    Start { at_ms: u64 },
    Finish { at_ms: u64, fail: bool },
    StartAndFinish { start_ms: u64, finish_ms: u64, fail: bool },
}

/// Deterministic tick-driven simulation engine.
///
/// One instance owns one run; concurrent runs (two widgets open at once)
/// must use independent instances.
///
/// # Example
///
/// ```
/// use sched_sim_core_rs::{EngineConfig, PolicyConfig, SimulationEngine, TaskKind, TaskSpec};
///
/// let config = EngineConfig::new(
///     50,
///     PolicyConfig::Parallel { bootstrap_task_id: None },
///     vec![
///         TaskSpec::new("a".to_string(), TaskKind::Network, 100),
///         TaskSpec::new("b".to_string(), TaskKind::Network, 150),
///     ],
/// );
///
/// let mut engine = SimulationEngine::new(config).unwrap();
/// let initial = engine.snapshot();
/// assert_eq!(initial.metrics.idle, 2);
///
/// while !engine.is_complete() {
///     engine.step().unwrap();
/// }
/// assert_eq!(engine.snapshot().metrics.completed, 2);
/// ```
pub struct SimulationEngine {
    config: EngineConfig,
    clock: SimClock,
    state: SimulationState,
    policy: Box<dyn SchedulingPolicy>,
    fault: Option<FaultInjector>,
    event_log: EventLog,
    run_id: Uuid,
    tick: u64,
    halted: bool,
    safety_stopped: bool,
}

impl SimulationEngine {
    /// Create an engine with every task `Idle` and the clock at zero.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` for an empty task set, a zero duration or tick size,
    /// duplicate task ids, or a fault/bootstrap reference to a missing task.
    pub fn new(config: EngineConfig) -> Result<Self, SimulationError> {
        Self::validate_config(&config)?;

        let state = SimulationState::new(&config.tasks);
        let policy = config.policy.build();
        let fault = config.fault.clone().map(FaultInjector::new);
        let mut clock = SimClock::new(config.tick_size_ms);
        clock.start();

        Ok(Self {
            config,
            clock,
            state,
            policy,
            fault,
            event_log: EventLog::new(),
            run_id: Uuid::new_v4(),
            tick: 0,
            halted: false,
            safety_stopped: false,
        })
    }

    /// Validate a configuration without constructing an engine.
    pub fn validate_config(config: &EngineConfig) -> Result<(), SimulationError> {
        if config.tick_size_ms == 0 {
            return Err(SimulationError::InvalidConfig(
                "tick_size_ms must be > 0".to_string(),
            ));
        }

        if config.max_elapsed_ms == 0 {
            return Err(SimulationError::InvalidConfig(
                "max_elapsed_ms must be > 0".to_string(),
            ));
        }

        if config.tasks.is_empty() {
            return Err(SimulationError::InvalidConfig(
                "task set must not be empty".to_string(),
            ));
        }

        let mut ids = HashSet::new();
        for spec in &config.tasks {
            if spec.duration_ms == 0 {
                return Err(SimulationError::InvalidConfig(format!(
                    "task {} has non-positive duration",
                    spec.id
                )));
            }
            if !ids.insert(spec.id.as_str()) {
                return Err(SimulationError::InvalidConfig(format!(
                    "duplicate task id: {}",
                    spec.id
                )));
            }
        }

        if let Some(fault) = &config.fault {
            if !ids.contains(fault.target_task_id.as_str()) {
                return Err(SimulationError::InvalidConfig(format!(
                    "fault target not in task set: {}",
                    fault.target_task_id
                )));
            }
        }

        if let PolicyConfig::Parallel {
            bootstrap_task_id: Some(bootstrap),
        } = &config.policy
        {
            if !ids.contains(bootstrap.as_str()) {
                return Err(SimulationError::InvalidConfig(format!(
                    "bootstrap task not in task set: {bootstrap}"
                )));
            }
        }

        Ok(())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Step ordinal (0 before the first `step()`).
    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Simulated milliseconds elapsed.
    pub fn elapsed_ms(&self) -> u64 {
        self.clock.elapsed_ms()
    }

    /// Identity of the current run; changes on `reset()`.
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// The validated configuration this run was built from.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Read access to the task collection.
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// All events recorded this run.
    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    /// True once every task is terminal, a cascading fault has taken the
    /// run down, or the safety bound has fired.
    pub fn is_complete(&self) -> bool {
        self.state.all_terminal()
            || self.safety_stopped
            || (self.halted && !self.state.any_running())
    }

    // ========================================================================
    // Tick loop
    // ========================================================================

    /// Execute one simulation tick and return the new snapshot.
    ///
    /// A completed run is left untouched: the current snapshot is returned
    /// and the clock does not advance, so driving timers need no special
    /// stop handling.
    ///
    /// # Errors
    ///
    /// Only internal lifecycle violations, which cannot occur through the
    /// public API; callers may treat an error as a bug.
    pub fn step(&mut self) -> Result<Snapshot, SimulationError> {
        if self.is_complete() {
            return Ok(self.snapshot());
        }

        self.clock.tick();
        self.tick += 1;
        let now = self.clock.elapsed_ms();

        // Decide every transition against the same pre-tick view, so no
        // task's decision can observe another task's transition from this
        // same tick.
        let pre = self.state.tasks().to_vec();
        let mut transitions: Vec<(usize, Transition)> = Vec::new();

        for (i, task) in pre.iter().enumerate() {
            match task.state() {
                TaskState::Running => {
                    let Some(finish_ms) = task.scheduled_finish_ms() else {
                        continue;
                    };
                    if now >= finish_ms {
                        let fail = self.fault.as_ref().is_some_and(|f| f.should_fail(task));
                        transitions.push((i, Transition::Finish { at_ms: finish_ms, fail }));
                    }
                }
                TaskState::Idle if !self.halted => {
                    let Some(eligible_ms) = self.policy.eligible_start_ms(&pre, i) else {
                        continue;
                    };
                    if now >= eligible_ms {
                        // A task shorter than one tick starts and finishes
                        // within the same step; timestamps stay exact.
                        let finish_ms = eligible_ms + task.duration_ms();
                        if now >= finish_ms {
                            let fail = self.fault.as_ref().is_some_and(|f| f.should_fail(task));
                            transitions.push((
                                i,
                                Transition::StartAndFinish {
                                    start_ms: eligible_ms,
                                    finish_ms,
                                    fail,
                                },
                            ));
                        } else {
                            transitions.push((i, Transition::Start { at_ms: eligible_ms }));
                        }
                    }
                }
                _ => {}
            }
        }

        // Apply the batch in declaration order.
        let mut fault_fired: Option<(u64, String)> = None;
        for (i, transition) in transitions {
            match transition {
                Transition::Start { at_ms } => {
                    self.state.task_at_mut(i).start(at_ms)?;
                    let task_id = self.state.tasks()[i].id().to_string();
                    self.event_log.log(Event::TaskStarted {
                        tick: self.tick,
                        at_ms,
                        task_id,
                    });
                }
                Transition::Finish { at_ms, fail } => {
                    self.apply_finish(i, at_ms, fail, &mut fault_fired)?;
                }
                Transition::StartAndFinish {
                    start_ms,
                    finish_ms,
                    fail,
                } => {
                    self.state.task_at_mut(i).start(start_ms)?;
                    let task_id = self.state.tasks()[i].id().to_string();
                    self.event_log.log(Event::TaskStarted {
                        tick: self.tick,
                        at_ms: start_ms,
                        task_id,
                    });
                    self.apply_finish(i, finish_ms, fail, &mut fault_fired)?;
                }
            }
        }

        // Propagate a cascading fault: every other running task fails at
        // the same instant and no new work is admitted afterwards.
        if let Some((fault_at_ms, source_task_id)) = fault_fired {
            if self.fault.as_ref().is_some_and(|f| f.cascades()) {
                self.cascade(fault_at_ms, source_task_id)?;
            }
        }

        // Run bookkeeping.
        if self.state.all_terminal() {
            self.event_log.log(Event::RunCompleted {
                tick: self.tick,
                elapsed_ms: now,
            });
        } else if now >= self.config.max_elapsed_ms && !self.safety_stopped {
            self.safety_stopped = true;
            self.event_log.log(Event::SafetyStop {
                tick: self.tick,
                elapsed_ms: now,
                stuck_task_ids: self.state.non_terminal_ids(),
            });
        }

        Ok(self.snapshot())
    }

    /// Complete or fail `tasks[i]` at `at_ms`, recording the event.
    fn apply_finish(
        &mut self,
        i: usize,
        at_ms: u64,
        fail: bool,
        fault_fired: &mut Option<(u64, String)>,
    ) -> Result<(), SimulationError> {
        if fail {
            self.state.task_at_mut(i).fail(at_ms)?;
            let task_id = self.state.tasks()[i].id().to_string();
            *fault_fired = Some((at_ms, task_id.clone()));
            self.event_log.log(Event::TaskFailed {
                tick: self.tick,
                at_ms,
                task_id,
                injected: true,
            });
        } else {
            self.state.task_at_mut(i).complete(at_ms)?;
            let task_id = self.state.tasks()[i].id().to_string();
            self.event_log.log(Event::TaskCompleted {
                tick: self.tick,
                at_ms,
                task_id,
            });
        }
        Ok(())
    }

    /// Fail every running task at the fault instant and halt admission.
    fn cascade(&mut self, fault_at_ms: u64, source_task_id: String) -> Result<(), SimulationError> {
        let mut failed: Vec<(String, u64)> = Vec::new();

        for i in 0..self.state.len() {
            let task = self.state.task_at_mut(i);
            if task.state() == TaskState::Running {
                // A task that started later in this same tick cannot fail
                // before it started.
                let at_ms = fault_at_ms.max(task.started_at_ms().unwrap_or(fault_at_ms));
                task.fail(at_ms)?;
                failed.push((task.id().to_string(), at_ms));
            }
        }

        for (task_id, at_ms) in &failed {
            self.event_log.log(Event::TaskFailed {
                tick: self.tick,
                at_ms: *at_ms,
                task_id: task_id.clone(),
                injected: false,
            });
        }

        self.halted = true;
        self.event_log.log(Event::CascadeTriggered {
            tick: self.tick,
            at_ms: fault_at_ms,
            source_task_id,
            failed_task_ids: failed.into_iter().map(|(id, _)| id).collect(),
        });

        Ok(())
    }

    /// Drive the engine until `is_complete()`, returning every snapshot
    /// produced along the way. Termination is guaranteed by the safety
    /// bound.
    pub fn run_to_completion(&mut self) -> Result<Vec<Snapshot>, SimulationError> {
        let mut snapshots = Vec::new();
        while !self.is_complete() {
            snapshots.push(self.step()?);
        }
        Ok(snapshots)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Would a user interaction at this instant be handled or blocked?
    ///
    /// Blocked iff some blocking task (compute work, or a task explicitly
    /// marked blocking) is running. This is a pure read over current state;
    /// it mutates nothing, not even the event log.
    pub fn record_user_event(&self, at_ms: u64) -> UserEventOutcome {
        let blocking_task_ids = self.state.running_blocking_ids();
        if blocking_task_ids.is_empty() {
            UserEventOutcome::Handled { at_ms }
        } else {
            UserEventOutcome::Blocked {
                at_ms,
                blocking_task_ids,
            }
        }
    }

    /// Produce the immutable view of the current tick.
    pub fn snapshot(&self) -> Snapshot {
        let elapsed_ms = self.clock.elapsed_ms();
        let tasks = self.state.tasks();
        let stuck_run = self.safety_stopped || self.halted;

        let views: Vec<TaskView> = tasks
            .iter()
            .enumerate()
            .map(|(i, task)| {
                let eligible = self.policy.eligible_start_ms(tasks, i);
                TaskView::of(task, elapsed_ms, eligible, stuck_run && !task.is_terminal())
            })
            .collect();

        let metrics = SnapshotMetrics {
            idle: self.state.count_in(TaskState::Idle),
            running: self.state.count_in(TaskState::Running),
            completed: self.state.count_in(TaskState::Completed),
            failed: self.state.count_in(TaskState::Failed),
            predicted_total_ms: self.policy.predicted_total_ms(tasks),
            predicted_critical_done_ms: self.policy.predicted_critical_done_ms(tasks),
            is_complete: self.is_complete(),
            safety_stopped: self.safety_stopped,
            cascaded: self.halted,
        };

        Snapshot {
            run_id: self.run_id,
            tick: self.tick,
            elapsed_ms,
            policy: self.policy.name().to_string(),
            tasks: views,
            metrics,
        }
    }

    /// Return to the initial state: all tasks `Idle`, clock at zero, event
    /// log empty, fresh run id. Always safe; this is the only cancellation
    /// primitive.
    pub fn reset(&mut self) {
        self.state = SimulationState::new(&self.config.tasks);
        self.clock.reset();
        self.clock.start();
        self.tick = 0;
        self.halted = false;
        self.safety_stopped = false;
        self.event_log.clear();
        self.run_id = Uuid::new_v4();
    }

    pub(crate) fn is_halted(&self) -> bool {
        self.halted
    }

    pub(crate) fn is_safety_stopped(&self) -> bool {
        self.safety_stopped
    }

    // Restore support for checkpointing; see orchestrator::checkpoint.
    pub(crate) fn restore_parts(
        &mut self,
        state: SimulationState,
        tick: u64,
        halted: bool,
        safety_stopped: bool,
        run_id: Uuid,
    ) {
        // elapsed time is always a whole number of ticks
        self.clock.reset();
        self.clock.start();
        for _ in 0..tick {
            self.clock.tick();
        }
        self.state = state;
        self.tick = tick;
        self.halted = halted;
        self.safety_stopped = safety_stopped;
        self.run_id = run_id;
        self.event_log.clear();
    }
}

// Manual Debug implementation (policies don't implement Debug)
impl std::fmt::Debug for SimulationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationEngine")
            .field("run_id", &self.run_id)
            .field("tick", &self.tick)
            .field("elapsed_ms", &self.clock.elapsed_ms())
            .field("policy", &self.policy.name())
            .field("num_tasks", &self.state.len())
            .field("is_complete", &self.is_complete())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
