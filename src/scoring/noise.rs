//! Sources of bounded random noise for the scoring engine.
//!
//! The risk perturbation and the confidence jitter are the only
//! non-deterministic parts of a prediction. They are drawn through this
//! trait so tests can swap in a seeded or fixed source.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Provider of uniform draws in `[low, high]`
pub trait NoiseSource: Send + Sync {
    fn uniform(&self, low: f64, high: f64) -> f64;
}

/// Thread-local RNG per call; used in production.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngNoise;

impl NoiseSource for ThreadRngNoise {
    fn uniform(&self, low: f64, high: f64) -> f64 {
        if low >= high {
            return low;
        }
        rand::thread_rng().gen_range(low..=high)
    }
}

/// Reproducible noise from a fixed seed
pub struct SeededNoise {
    rng: Mutex<StdRng>,
}

impl SeededNoise {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl NoiseSource for SeededNoise {
    fn uniform(&self, low: f64, high: f64) -> f64 {
        if low >= high {
            return low;
        }
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.gen_range(low..=high)
    }
}

/// Always returns the same value, clamped into the requested range
#[derive(Debug, Clone, Copy)]
pub struct FixedNoise(pub f64);

impl FixedNoise {
    /// Disables noise entirely
    pub fn zero() -> Self {
        Self(0.0)
    }
}

impl NoiseSource for FixedNoise {
    fn uniform(&self, low: f64, high: f64) -> f64 {
        self.0.clamp(low, high.max(low))
    }
}
