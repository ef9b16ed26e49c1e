//! Fixed-pipeline policy: totally ordered stages, no concurrency.
//!
//! Stage *i+1* becomes eligible only when stage *i* reaches `Completed`:
//! sequential scheduling keyed on observed completion rather than declared
//! durations. The difference matters under fault injection: a failed stage
//! never completes, so everything behind it stays idle (and is eventually
//! reported stuck), which is exactly how the rendering-path widgets show a
//! broken stage.

use super::SchedulingPolicy;
use crate::models::task::{Task, TaskState};

/// Ordered-stage scheduling gated on predecessor completion.
pub struct PipelinePolicy;

impl SchedulingPolicy for PipelinePolicy {
    fn name(&self) -> &'static str {
        "pipeline"
    }

    fn eligible_start_ms(&self, tasks: &[Task], index: usize) -> Option<u64> {
        if index == 0 {
            return Some(0);
        }
        let predecessor = &tasks[index - 1];
        match predecessor.state() {
            TaskState::Completed => predecessor.completed_at_ms(),
            _ => None,
        }
    }

    fn predicted_total_ms(&self, tasks: &[Task]) -> u64 {
        tasks.iter().map(|t| t.duration_ms()).sum()
    }
}
