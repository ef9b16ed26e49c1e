//! Domain models for the scheduling simulation.

pub mod event;
pub mod snapshot;
pub mod state;
pub mod task;

pub use event::{Event, EventLog};
pub use snapshot::{Snapshot, SnapshotMetrics, TaskView};
pub use state::SimulationState;
pub use task::{Priority, Task, TaskError, TaskKind, TaskSpec, TaskState};
