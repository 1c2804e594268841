//! Explicitly owned random source for the engine
//!
//! Every model owns its own generator, forked from a master seed at engine
//! construction. Nothing in the engine touches a process-global RNG, so a
//! fixed seed reproduces an entire run.

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

/// Seedable random source shared by all generator components.
pub struct EngineRng {
    inner: StdRng,
}

impl EngineRng {
    /// Create a generator from an explicit seed for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }

    /// Create a generator from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            inner: StdRng::from_os_rng(),
        }
    }

    /// Derive an independently seeded child generator.
    ///
    /// Forking keeps each model on its own random stream so the models can
    /// tick in any order without perturbing each other's sequences.
    pub fn fork(&mut self) -> Self {
        Self::seeded(self.inner.random())
    }

    /// Uniform float in `[range.start, range.end)`.
    pub fn f64_range(&mut self, range: std::ops::Range<f64>) -> f64 {
        self.inner.random_range(range)
    }

    /// Uniform integer in the inclusive range.
    pub fn int_range(&mut self, range: std::ops::RangeInclusive<i64>) -> i64 {
        self.inner.random_range(range)
    }

    /// Uniform index below `len`; returns 0 for an empty collection.
    pub fn index(&mut self, len: usize) -> usize {
        if len <= 1 {
            0
        } else {
            self.inner.random_range(0..len)
        }
    }

    /// Bernoulli trial with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.inner.random_bool(p.clamp(0.0, 1.0))
    }

    /// Choose a random element from a slice.
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        slice.choose(&mut self.inner)
    }

    /// Choose from a fixed `(item, weight)` table.
    ///
    /// This is the single weighted-selection routine used by every category
    /// set (vehicle types, anomaly types, severities). Tables are compile-time
    /// constants with positive weights.
    pub fn weighted<'a, T>(&mut self, table: &'a [(T, f64)]) -> &'a T {
        let (item, _) = table
            .choose_weighted(&mut self.inner, |(_, weight)| *weight)
            .expect("weight table is non-empty with positive weights");
        item
    }

    /// Sample a normal distribution, falling back to the mean for a
    /// degenerate standard deviation.
    pub fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        match Normal::new(mean, std_dev) {
            Ok(dist) => dist.sample(&mut self.inner),
            Err(_) => mean,
        }
    }
}
