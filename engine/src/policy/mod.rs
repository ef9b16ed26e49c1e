//! Scheduling policies: pluggable eligibility strategies.
//!
//! A policy answers one question: given the task set and the current
//! simulated time, what is the earliest time each task may leave `Idle`?
//! The engine applies the answer uniformly each tick; the policy never
//! mutates anything.
//!
//! # Purity
//!
//! Policies are stateless (`&self`). Eligibility is a function of the task
//! set and elapsed time only, so re-evaluating at any tick yields the same
//! answer for the same inputs. This is what makes replays and checkpoints
//! exact. The pipeline policy reads predecessor *state* from the task list
//! it is handed; the engine always hands it the pre-tick list, so all
//! decisions within one tick see one consistent view.
//!
//! # Variants
//!
//! 1. **Sequential**: declared order, one task at a time
//! 2. **Parallel**: everything at once (optionally gated on a bootstrap task)
//! 3. **Priority**: tiers drain in urgency order, parallel within a tier
//! 4. **Pipeline**: each stage waits for its predecessor to complete

use crate::models::task::Task;
use serde::{Deserialize, Serialize};

mod parallel;
mod pipeline;
mod priority;
mod sequential;

pub use parallel::ParallelPolicy;
pub use pipeline::PipelinePolicy;
pub use priority::PriorityPolicy;
pub use sequential::SequentialPolicy;

/// Eligibility strategy for one simulation run.
///
/// # Example Implementation
///
/// ```
/// use sched_sim_core_rs::policy::SchedulingPolicy;
/// use sched_sim_core_rs::Task;
///
/// /// Everything is eligible immediately.
/// struct FreeForAll;
///
/// impl SchedulingPolicy for FreeForAll {
///     fn name(&self) -> &'static str {
///         "free-for-all"
///     }
///
///     fn eligible_start_ms(&self, _tasks: &[Task], _index: usize) -> Option<u64> {
///         Some(0)
///     }
///
///     fn predicted_total_ms(&self, tasks: &[Task]) -> u64 {
///         tasks.iter().map(|t| t.duration_ms()).max().unwrap_or(0)
///     }
/// }
/// ```
pub trait SchedulingPolicy: Send + Sync {
    /// Stable lowercase identifier, surfaced in snapshots.
    fn name(&self) -> &'static str;

    /// Earliest simulated time at which `tasks[index]` may leave `Idle`.
    ///
    /// `None` means the threshold cannot be determined yet (a pipeline
    /// stage whose predecessor has not completed); the engine re-asks on
    /// the next tick. Comparisons against the returned threshold use `>=`:
    /// a task becomes eligible in the tick where elapsed time reaches it.
    fn eligible_start_ms(&self, tasks: &[Task], index: usize) -> Option<u64>;

    /// Total run time this policy predicts for the task set, from the same
    /// sum/max arithmetic that drives eligibility.
    fn predicted_total_ms(&self, tasks: &[Task]) -> u64;

    /// Predicted completion time of the critical tier, where the policy
    /// has such a notion.
    fn predicted_critical_done_ms(&self, _tasks: &[Task]) -> Option<u64> {
        None
    }
}

/// Policy selection, part of the engine's JSON configuration.
///
/// Serialized with the external identifiers the UI widgets use:
/// `"sequential"`, `{"parallel": {...}}`, `"priority"`, `"pipeline"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyConfig {
    /// One task at a time, in declared order
    Sequential,

    /// All tasks at once; if a bootstrap task is named, every other task
    /// waits for its duration first
    Parallel {
        #[serde(default)]
        bootstrap_task_id: Option<String>,
    },

    /// Tiers drain in urgency order; parallel within a tier
    Priority,

    /// Ordered stages; each waits for its predecessor to complete
    Pipeline,
}

impl PolicyConfig {
    /// Instantiate the strategy this configuration names.
    pub fn build(&self) -> Box<dyn SchedulingPolicy> {
        match self {
            PolicyConfig::Sequential => Box::new(SequentialPolicy),
            PolicyConfig::Parallel { bootstrap_task_id } => {
                Box::new(ParallelPolicy::new(bootstrap_task_id.clone()))
            }
            PolicyConfig::Priority => Box::new(PriorityPolicy),
            PolicyConfig::Pipeline => Box::new(PipelinePolicy),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_dispatches_by_variant() {
        assert_eq!(PolicyConfig::Sequential.build().name(), "sequential");
        assert_eq!(
            PolicyConfig::Parallel {
                bootstrap_task_id: None
            }
            .build()
            .name(),
            "parallel"
        );
        assert_eq!(PolicyConfig::Priority.build().name(), "priority");
        assert_eq!(PolicyConfig::Pipeline.build().name(), "pipeline");
    }

    #[test]
    fn test_config_serialization_identifiers() {
        let json = serde_json::to_string(&PolicyConfig::Sequential).unwrap();
        assert_eq!(json, "\"sequential\"");

        let parallel: PolicyConfig =
            serde_json::from_str("{\"parallel\":{\"bootstrap_task_id\":\"boot\"}}").unwrap();
        assert_eq!(
            parallel,
            PolicyConfig::Parallel {
                bootstrap_task_id: Some("boot".to_string())
            }
        );
    }
}
