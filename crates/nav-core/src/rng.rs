//! Seeded noise source for sensor fixtures.
//!
//! Fixtures that simulate a jittery GPS or compass draw from a `SmallRng`
//! seeded explicitly, so the same seed replays the same noise on every run
//! and tests stay reproducible.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Deterministic jitter generator.
pub struct NoiseRng(SmallRng);

impl NoiseRng {
    pub fn new(seed: u64) -> Self {
        NoiseRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive an independent stream for another sensor from the same seed.
    pub fn derive(seed: u64, stream: u64) -> Self {
        NoiseRng(SmallRng::seed_from_u64(seed ^ stream.wrapping_mul(MIXING_CONSTANT)))
    }

    /// Uniform value in `[-amplitude, amplitude]`; zero for a non-positive or
    /// non-finite amplitude.
    pub fn symmetric(&mut self, amplitude: f64) -> f64 {
        if !(amplitude.is_finite() && amplitude > 0.0) {
            return 0.0;
        }
        self.0.gen_range(-amplitude..=amplitude)
    }

    /// Uniform value in `[0, max]`; zero for a non-positive bound.
    pub fn up_to(&mut self, max: f64) -> f64 {
        if !(max.is_finite() && max > 0.0) {
            return 0.0;
        }
        self.0.gen_range(0.0..=max)
    }
}
