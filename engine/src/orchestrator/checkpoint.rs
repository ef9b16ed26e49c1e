//! Checkpoint: save/load engine state.
//!
//! Serializes the complete run state (clock position, task lifecycle, halt
//! flags) for pause/resume, and hashes it for determinism verification:
//! two runs of the same configuration must produce identical state hashes
//! at every tick.
//!
//! # Critical Invariants
//!
//! - **Config matching**: a checkpoint restores only against the exact
//!   configuration it was produced under (SHA-256 hash comparison)
//! - **Hash stability**: the state hash excludes the run id, so replays of
//!   the same configuration hash identically
//! - The event log is not checkpointed; history from before the restore
//!   point is not carried over

use crate::models::state::SimulationState;
use crate::models::task::{Priority, Task, TaskKind, TaskSpec, TaskState};
use crate::orchestrator::engine::{EngineConfig, SimulationEngine, SimulationError};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

// ============================================================================
// Snapshot structures
// ============================================================================

/// One task's checkpointed fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskCheckpoint {
    pub id: String,
    pub kind: TaskKind,
    pub priority: Priority,
    pub duration_ms: u64,
    pub blocking: Option<bool>,
    pub state: TaskState,
    pub started_at_ms: Option<u64>,
    pub completed_at_ms: Option<u64>,
}

impl From<&Task> for TaskCheckpoint {
    fn from(task: &Task) -> Self {
        TaskCheckpoint {
            id: task.id().to_string(),
            kind: task.kind(),
            priority: task.priority(),
            duration_ms: task.duration_ms(),
            blocking: task.spec().blocking,
            state: task.state(),
            started_at_ms: task.started_at_ms(),
            completed_at_ms: task.completed_at_ms(),
        }
    }
}

impl From<TaskCheckpoint> for Task {
    fn from(checkpoint: TaskCheckpoint) -> Self {
        let spec = TaskSpec {
            id: checkpoint.id,
            kind: checkpoint.kind,
            duration_ms: checkpoint.duration_ms,
            priority: checkpoint.priority,
            blocking: checkpoint.blocking,
        };
        Task::from_parts(
            spec,
            checkpoint.state,
            checkpoint.started_at_ms,
            checkpoint.completed_at_ms,
        )
    }
}

/// Complete engine state at one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Step ordinal at checkpoint time
    pub tick: u64,

    /// Simulated milliseconds elapsed
    pub elapsed_ms: u64,

    /// Cascade halt flag
    pub halted: bool,

    /// Safety-bound flag
    pub safety_stopped: bool,

    /// Identity of the checkpointed run
    pub run_id: Uuid,

    /// All task states in declaration order
    pub tasks: Vec<TaskCheckpoint>,

    /// SHA-256 of the originating configuration (validated on restore)
    pub config_hash: String,
}

impl StateSnapshot {
    /// Hash of the run state, excluding the run id.
    ///
    /// Two runs of the same configuration hash identically at every tick,
    /// which is how the determinism tests compare whole runs cheaply.
    pub fn state_hash(&self) -> Result<String, SimulationError> {
        #[derive(Serialize)]
        struct Hashable<'a> {
            tick: u64,
            elapsed_ms: u64,
            halted: bool,
            safety_stopped: bool,
            tasks: &'a [TaskCheckpoint],
            config_hash: &'a str,
        }

        let canonical = serde_json::to_string(&Hashable {
            tick: self.tick,
            elapsed_ms: self.elapsed_ms,
            halted: self.halted,
            safety_stopped: self.safety_stopped,
            tasks: &self.tasks,
            config_hash: &self.config_hash,
        })
        .map_err(|e| SimulationError::Serialization(e.to_string()))?;

        Ok(sha256_hex(&canonical))
    }
}

/// SHA-256 of a configuration's canonical JSON form.
pub fn config_hash(config: &EngineConfig) -> Result<String, SimulationError> {
    let canonical =
        serde_json::to_string(config).map_err(|e| SimulationError::Serialization(e.to_string()))?;
    Ok(sha256_hex(&canonical))
}

fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    format!("{:x}", hasher.finalize())
}

// ============================================================================
// Engine integration
// ============================================================================

impl SimulationEngine {
    /// Capture the complete current state.
    pub fn checkpoint(&self) -> Result<StateSnapshot, SimulationError> {
        Ok(StateSnapshot {
            tick: self.current_tick(),
            elapsed_ms: self.elapsed_ms(),
            halted: self.is_halted(),
            safety_stopped: self.is_safety_stopped(),
            run_id: self.run_id(),
            tasks: self.state().tasks().iter().map(TaskCheckpoint::from).collect(),
            config_hash: config_hash(self.config())?,
        })
    }

    /// Rebuild an engine from a checkpoint.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the configuration itself is malformed,
    /// `CheckpointMismatch` if the checkpoint was produced under a
    /// different configuration.
    pub fn restore(
        config: EngineConfig,
        snapshot: StateSnapshot,
    ) -> Result<Self, SimulationError> {
        let expected = config_hash(&config)?;
        if snapshot.config_hash != expected {
            return Err(SimulationError::CheckpointMismatch {
                expected,
                actual: snapshot.config_hash,
            });
        }

        let mut engine = SimulationEngine::new(config)?;
        let tasks: Vec<Task> = snapshot.tasks.into_iter().map(Task::from).collect();
        engine.restore_parts(
            SimulationState::from_tasks(tasks),
            snapshot.tick,
            snapshot.halted,
            snapshot.safety_stopped,
            snapshot.run_id,
        );
        Ok(engine)
    }

    /// Hash of the complete current state; see [`StateSnapshot::state_hash`].
    pub fn state_hash(&self) -> Result<String, SimulationError> {
        self.checkpoint()?.state_hash()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::TaskKind;
    use crate::policy::PolicyConfig;

    fn config() -> EngineConfig {
        EngineConfig::new(
            50,
            PolicyConfig::Sequential,
            vec![
                TaskSpec::new("a".to_string(), TaskKind::Network, 100),
                TaskSpec::new("b".to_string(), TaskKind::Compute, 100),
            ],
        )
    }

    #[test]
    fn test_checkpoint_round_trip() {
        let mut engine = SimulationEngine::new(config()).unwrap();
        engine.step().unwrap();
        engine.step().unwrap();

        let checkpoint = engine.checkpoint().unwrap();
        let restored = SimulationEngine::restore(config(), checkpoint).unwrap();

        assert_eq!(restored.current_tick(), engine.current_tick());
        assert_eq!(restored.elapsed_ms(), engine.elapsed_ms());
        assert_eq!(restored.run_id(), engine.run_id());
        assert_eq!(
            restored.state_hash().unwrap(),
            engine.state_hash().unwrap()
        );
    }

    #[test]
    fn test_restored_engine_continues_identically() {
        let mut original = SimulationEngine::new(config()).unwrap();
        original.step().unwrap();

        let mut restored =
            SimulationEngine::restore(config(), original.checkpoint().unwrap()).unwrap();

        original.run_to_completion().unwrap();
        restored.run_to_completion().unwrap();

        assert_eq!(
            original.state_hash().unwrap(),
            restored.state_hash().unwrap()
        );
    }

    #[test]
    fn test_mismatched_config_rejected() {
        let engine = SimulationEngine::new(config()).unwrap();
        let checkpoint = engine.checkpoint().unwrap();

        let mut other = config();
        other.tick_size_ms = 16;
        assert!(matches!(
            SimulationEngine::restore(other, checkpoint),
            Err(SimulationError::CheckpointMismatch { .. })
        ));
    }

    #[test]
    fn test_state_hash_ignores_run_id() {
        let engine_a = SimulationEngine::new(config()).unwrap();
        let engine_b = SimulationEngine::new(config()).unwrap();

        assert_ne!(engine_a.run_id(), engine_b.run_id());
        assert_eq!(
            engine_a.state_hash().unwrap(),
            engine_b.state_hash().unwrap()
        );
    }
}
