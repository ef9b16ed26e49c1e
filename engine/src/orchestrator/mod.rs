//! Simulation orchestration: the engine and its checkpointing support.

pub mod checkpoint;
mod engine;

pub use engine::{
    EngineConfig, SimulationEngine, SimulationError, UserEventOutcome, DEFAULT_MAX_ELAPSED_MS,
};
