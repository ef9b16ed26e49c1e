//! Seeded workload generation: randomness stays outside the core.
//!
//! The frame-budget widget wants "janky" frames with irregular durations;
//! the engine wants deterministic inputs. This module bridges the two:
//! durations are sampled here, from a seeded generator, and the resulting
//! task specs are ordinary deterministic engine input. Same seed, same
//! workload, same simulation.

use crate::models::task::{Priority, TaskKind, TaskSpec};
use crate::rng::SimRng;
use serde::{Deserialize, Serialize};

/// How task durations are sampled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DurationDistribution {
    /// Every task gets the same duration
    Fixed { ms: u64 },

    /// Uniform in `[min_ms, max_ms)`
    Uniform { min_ms: u64, max_ms: u64 },

    /// Frame-budget model: a task normally takes exactly `budget_ms`, but
    /// with probability `jank_probability` it blows past the budget, up to
    /// `jank_multiplier` budgets long
    FrameBudget {
        budget_ms: u64,
        jank_probability: f64,
        jank_multiplier: u64,
    },
}

impl DurationDistribution {
    fn sample(&self, rng: &mut SimRng) -> u64 {
        match self {
            DurationDistribution::Fixed { ms } => *ms,
            DurationDistribution::Uniform { min_ms, max_ms } => rng.range_u64(*min_ms, *max_ms),
            DurationDistribution::FrameBudget {
                budget_ms,
                jank_probability,
                jank_multiplier,
            } => {
                if rng.next_f64() < *jank_probability {
                    rng.range_u64(budget_ms + 1, budget_ms * jank_multiplier + 1)
                } else {
                    *budget_ms
                }
            }
        }
    }
}

/// One batch of generated tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadConfig {
    /// Number of tasks to generate
    pub count: usize,

    /// Kind assigned to every generated task
    pub kind: TaskKind,

    /// Priority tier assigned to every generated task
    #[serde(default)]
    pub priority: Priority,

    /// Duration sampling
    pub duration: DurationDistribution,

    /// Generated ids are `{id_prefix}_{counter:04}`
    pub id_prefix: String,
}

/// Deterministic task-set generator.
///
/// # Example
/// ```
/// use sched_sim_core_rs::{DurationDistribution, TaskKind, WorkloadConfig, WorkloadGenerator};
///
/// let config = WorkloadConfig {
///     count: 60,
///     kind: TaskKind::Compute,
///     priority: Default::default(),
///     duration: DurationDistribution::FrameBudget {
///         budget_ms: 16,
///         jank_probability: 0.1,
///         jank_multiplier: 10,
///     },
///     id_prefix: "frame".to_string(),
/// };
///
/// let mut generator = WorkloadGenerator::new(42);
/// let tasks = generator.generate(&config);
/// assert_eq!(tasks.len(), 60);
/// assert_eq!(tasks[0].id, "frame_0000");
/// ```
pub struct WorkloadGenerator {
    rng: SimRng,
    next_id: usize,
}

impl WorkloadGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SimRng::new(seed),
            next_id: 0,
        }
    }

    /// Generate one batch of task specs.
    pub fn generate(&mut self, config: &WorkloadConfig) -> Vec<TaskSpec> {
        let mut specs = Vec::with_capacity(config.count);
        for _ in 0..config.count {
            let duration_ms = config.duration.sample(&mut self.rng);
            let id = format!("{}_{:04}", config.id_prefix, self.next_id);
            self.next_id += 1;

            specs.push(
                TaskSpec::new(id, config.kind, duration_ms).with_priority(config.priority),
            );
        }
        specs
    }
}
