//! Deterministic random number generation (xorshift64*).
//!
//! Used only by the workload generator: the engine core itself consumes no
//! randomness. Same seed, same sequence, which is what makes generated
//! task sets reproducible in tests and shareable between widget instances.

use serde::{Deserialize, Serialize};

/// Seeded xorshift64* generator.
///
/// # Example
/// ```
/// use sched_sim_core_rs::SimRng;
///
/// let mut rng = SimRng::new(42);
/// let a = rng.next_u64();
/// let duration = rng.range_u64(10, 100); // [10, 100)
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimRng {
    state: u64,
}

impl SimRng {
    /// Create a generator from a seed. A zero seed is coerced to 1
    /// (xorshift state must be non-zero).
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    /// Next raw 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Uniform value in `[min, max)`.
    ///
    /// # Panics
    /// Panics if `min >= max`.
    pub fn range_u64(&mut self, min: u64, max: u64) -> u64 {
        assert!(min < max, "min must be less than max");
        min + self.next_u64() % (max - min)
    }

    /// Uniform value in `[0.0, 1.0)`.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / ((1u64 << 53) as f64))
    }

    /// Current internal state, for resuming a sequence.
    pub fn state(&self) -> u64 {
        self.state
    }
}
