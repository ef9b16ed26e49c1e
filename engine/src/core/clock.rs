//! Simulated time for the engine.
//!
//! The simulation operates in discrete, fixed-size ticks. The clock is the
//! only source of "now" inside the engine; the wall-clock timer that decides
//! when to tick lives outside the core.

use serde::{Deserialize, Serialize};

/// Monotonic simulated clock advanced in fixed-size ticks.
///
/// # Example
/// ```
/// use sched_sim_core_rs::SimClock;
///
/// let mut clock = SimClock::new(50); // 50 ms per tick
/// assert_eq!(clock.elapsed_ms(), 0);
///
/// clock.start();
/// clock.tick();
/// assert_eq!(clock.elapsed_ms(), 50);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimClock {
    /// Milliseconds of simulated time added per tick
    tick_size_ms: u64,
    /// Total simulated milliseconds elapsed since start
    elapsed_ms: u64,
    /// Whether the clock is currently being driven
    running: bool,
}

impl SimClock {
    /// Create a new, stopped clock.
    ///
    /// # Panics
    /// Panics if `tick_size_ms` is zero. Engine configuration validation
    /// rejects a zero tick size before a clock is ever constructed.
    pub fn new(tick_size_ms: u64) -> Self {
        assert!(tick_size_ms > 0, "tick_size_ms must be positive");
        Self {
            tick_size_ms,
            elapsed_ms: 0,
            running: false,
        }
    }

    /// Begin advancing. Ticking a stopped clock is a logic error upstream,
    /// not something the clock itself polices.
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Advance simulated time by exactly one tick.
    pub fn tick(&mut self) {
        self.elapsed_ms += self.tick_size_ms;
    }

    /// Return to zero elapsed time, stopped.
    pub fn reset(&mut self) {
        self.elapsed_ms = 0;
        self.running = false;
    }

    /// Total simulated milliseconds elapsed.
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    /// Number of whole ticks applied so far.
    pub fn ticks_elapsed(&self) -> u64 {
        self.elapsed_ms / self.tick_size_ms
    }

    /// Milliseconds added per tick.
    pub fn tick_size_ms(&self) -> u64 {
        self.tick_size_ms
    }

    /// Whether the clock is running.
    pub fn is_running(&self) -> bool {
        self.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "tick_size_ms must be positive")]
    fn test_zero_tick_size_panics() {
        SimClock::new(0);
    }

    #[test]
    fn test_reset_stops_and_zeroes() {
        let mut clock = SimClock::new(16);
        clock.start();
        clock.tick();
        clock.tick();
        assert_eq!(clock.elapsed_ms(), 32);
        assert_eq!(clock.ticks_elapsed(), 2);

        clock.reset();
        assert_eq!(clock.elapsed_ms(), 0);
        assert!(!clock.is_running());
    }
}
