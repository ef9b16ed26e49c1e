//! Fault injection: forcing a task to fail instead of completing.
//!
//! The injector is a predicate the engine consults only at the instant a
//! task would otherwise complete: a task cannot fail mid-run nor after
//! completing. Failure is a terminal *state*, never an error; this is the
//! mechanism for demonstrating fault isolation versus cascading failure.
//!
//! Two failure domains:
//! - **Isolated** (`cascades: false`): the target fails; nothing else is
//!   affected. Every other task keeps its state and timing.
//! - **Cascading** (`cascades: true`): at the instant the target fails,
//!   every other running task fails too and the engine stops admitting new
//!   work, the "monolith" rendering where everything shows as down.

use crate::models::task::Task;
use serde::{Deserialize, Serialize};

/// Fault configuration supplied alongside the task set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultConfig {
    /// Id of the task forced to fail at its completion instant
    pub target_task_id: String,

    /// Whether the failure takes down all concurrently running tasks
    #[serde(default)]
    pub cascades: bool,
}

/// Predicate wrapper the engine evaluates at completion instants.
///
/// # Example
/// ```
/// use sched_sim_core_rs::{FaultConfig, FaultInjector, Task, TaskKind, TaskSpec};
///
/// let injector = FaultInjector::new(FaultConfig {
///     target_task_id: "ads".to_string(),
///     cascades: false,
/// });
///
/// let ads = Task::from_spec(&TaskSpec::new("ads".to_string(), TaskKind::Network, 100));
/// let cart = Task::from_spec(&TaskSpec::new("cart".to_string(), TaskKind::Network, 100));
/// assert!(injector.should_fail(&ads));
/// assert!(!injector.should_fail(&cart));
/// ```
#[derive(Debug, Clone)]
pub struct FaultInjector {
    config: FaultConfig,
}

impl FaultInjector {
    pub fn new(config: FaultConfig) -> Self {
        Self { config }
    }

    /// Whether `task` must fail instead of completing.
    pub fn should_fail(&self, task: &Task) -> bool {
        task.id() == self.config.target_task_id
    }

    /// Whether a triggered fault takes down all running tasks.
    pub fn cascades(&self) -> bool {
        self.config.cascades
    }

    /// Id of the configured target.
    pub fn target_task_id(&self) -> &str {
        &self.config.target_task_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::{TaskKind, TaskSpec};

    #[test]
    fn test_only_target_matches() {
        let injector = FaultInjector::new(FaultConfig {
            target_task_id: "t1".to_string(),
            cascades: false,
        });

        let target = Task::from_spec(&TaskSpec::new("t1".to_string(), TaskKind::Compute, 10));
        let other = Task::from_spec(&TaskSpec::new("t2".to_string(), TaskKind::Compute, 10));

        assert!(injector.should_fail(&target));
        assert!(!injector.should_fail(&other));
        assert!(!injector.cascades());
    }

    #[test]
    fn test_cascades_defaults_to_false_in_json() {
        let config: FaultConfig =
            serde_json::from_str("{\"target_task_id\":\"x\"}").unwrap();
        assert!(!config.cascades);
    }
}
