//! Seedable noise source over a ChaCha8 PRNG.

use core::cmp::Ordering;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::app::ports::NoiseSource;

/// Deterministic for a given seed on every platform.
pub struct SeededNoise {
    rng: ChaCha8Rng,
    seed: u64,
}

impl SeededNoise {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl NoiseSource for SeededNoise {
    fn uniform(&mut self, low: f32, high: f32) -> f32 {
        // gen_range panics on an empty or NaN range
        if low.partial_cmp(&high) != Some(Ordering::Less) {
            return low;
        }
        self.rng.gen_range(low..high)
    }
}
