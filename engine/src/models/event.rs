//! Event logging for simulation replay and diagnostics.
//!
//! Every significant transition during a run is recorded here. The log is
//! the engine's observability surface: tests replay it to assert ordering,
//! and UI widgets can render a timeline from it without touching engine
//! internals.
//!
//! # Event Types
//!
//! - **TaskStarted / TaskCompleted / TaskFailed**: lifecycle transitions
//! - **CascadeTriggered**: one failure took down every running task
//! - **SafetyStop**: the max-elapsed bound fired with tasks still live
//! - **RunCompleted**: every task reached a terminal state

use serde::{Deserialize, Serialize};

/// One recorded state change.
///
/// `tick` is the step ordinal at which the transition was applied; `at_ms`
/// is the exact simulated time of the transition, which may fall inside the
/// tick (eligibility and finish times are not tick-quantized).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Task left `Idle`
    TaskStarted {
        tick: u64,
        at_ms: u64,
        task_id: String,
    },

    /// Task finished successfully
    TaskCompleted {
        tick: u64,
        at_ms: u64,
        task_id: String,
    },

    /// Task failed; `injected` distinguishes the configured fault target
    /// from collateral cascade failures
    TaskFailed {
        tick: u64,
        at_ms: u64,
        task_id: String,
        injected: bool,
    },

    /// A cascading fault took down every other running task
    CascadeTriggered {
        tick: u64,
        at_ms: u64,
        source_task_id: String,
        failed_task_ids: Vec<String>,
    },

    /// Safety bound exceeded with non-terminal tasks remaining
    SafetyStop {
        tick: u64,
        elapsed_ms: u64,
        stuck_task_ids: Vec<String>,
    },

    /// Every task reached a terminal state
    RunCompleted { tick: u64, elapsed_ms: u64 },
}

impl Event {
    /// Step ordinal at which the event was recorded.
    pub fn tick(&self) -> u64 {
        match self {
            Event::TaskStarted { tick, .. } => *tick,
            Event::TaskCompleted { tick, .. } => *tick,
            Event::TaskFailed { tick, .. } => *tick,
            Event::CascadeTriggered { tick, .. } => *tick,
            Event::SafetyStop { tick, .. } => *tick,
            Event::RunCompleted { tick, .. } => *tick,
        }
    }

    /// Short name of the event variant.
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::TaskStarted { .. } => "TaskStarted",
            Event::TaskCompleted { .. } => "TaskCompleted",
            Event::TaskFailed { .. } => "TaskFailed",
            Event::CascadeTriggered { .. } => "CascadeTriggered",
            Event::SafetyStop { .. } => "SafetyStop",
            Event::RunCompleted { .. } => "RunCompleted",
        }
    }

    /// Task id, for events tied to a single task.
    pub fn task_id(&self) -> Option<&str> {
        match self {
            Event::TaskStarted { task_id, .. } => Some(task_id),
            Event::TaskCompleted { task_id, .. } => Some(task_id),
            Event::TaskFailed { task_id, .. } => Some(task_id),
            Event::CascadeTriggered { source_task_id, .. } => Some(source_task_id),
            _ => None,
        }
    }
}

/// Append-only event log with convenience queries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Events recorded at a specific step ordinal.
    pub fn events_at_tick(&self, tick: u64) -> Vec<&Event> {
        self.events.iter().filter(|e| e.tick() == tick).collect()
    }

    /// Events of a specific variant, by `event_type()` name.
    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Events tied to a specific task.
    pub fn events_for_task(&self, task_id: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.task_id() == Some(task_id))
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
