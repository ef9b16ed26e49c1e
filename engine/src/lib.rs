//! Scheduling Simulation Engine
//!
//! Deterministic, time-stepped simulator modelling how abstract tasks
//! (network loads, CPU-bound work, rendering pipeline stages) progress
//! through simulated time under pluggable scheduling policies.
//!
//! # Architecture
//!
//! - **core**: Simulated clock (fixed-size ticks)
//! - **models**: Domain types (Task, SimulationState, Event, Snapshot)
//! - **policy**: Scheduling policies (eligibility strategies)
//! - **fault**: Fault injection (isolated vs. cascading failure)
//! - **orchestrator**: Main simulation loop and checkpointing
//! - **rng**: Deterministic random number generation
//! - **workload**: Seeded task-set generation (randomness stays out of the core)
//!
//! # Critical Invariants
//!
//! 1. All durations and elapsed times are u64 milliseconds of simulated time
//! 2. The engine core consumes no randomness and performs no I/O
//! 3. Transitions are applied as one batch per tick, computed from the
//!    pre-tick state (iteration-order independent)

// Module declarations
pub mod core;
pub mod fault;
pub mod models;
pub mod orchestrator;
pub mod policy;
pub mod rng;
pub mod workload;

// Re-exports for convenience
pub use crate::core::clock::SimClock;
pub use fault::{FaultConfig, FaultInjector};
pub use models::{
    event::{Event, EventLog},
    snapshot::{Snapshot, SnapshotMetrics, TaskView},
    state::SimulationState,
    task::{Priority, Task, TaskError, TaskKind, TaskSpec, TaskState},
};
pub use orchestrator::{
    checkpoint::{config_hash, StateSnapshot, TaskCheckpoint},
    EngineConfig, SimulationEngine, SimulationError, UserEventOutcome, DEFAULT_MAX_ELAPSED_MS,
};
pub use policy::{PolicyConfig, SchedulingPolicy};
pub use rng::SimRng;
pub use workload::{DurationDistribution, WorkloadConfig, WorkloadGenerator};
