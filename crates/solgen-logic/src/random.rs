//! Seedable random source threaded through generation.
//!
//! There is no global generator: the galaxy builder owns one `GalaxyRng` per
//! build and lends it down the call chain. Same seed and same call order give
//! the same galaxy.

use std::f32::consts::TAU;

use rand::distributions::WeightedIndex;
use rand::prelude::*;
use rand::rngs::StdRng;

/// Random source for one galaxy build.
#[derive(Debug, Clone)]
pub struct GalaxyRng {
    inner: StdRng,
}

impl GalaxyRng {
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform float in `[lo, hi)`. Returns `lo` for an empty or inverted range.
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        if hi <= lo {
            return lo;
        }
        self.inner.gen_range(lo..hi)
    }

    /// Uniform integer in `[lo, hi]`.
    pub fn count(&mut self, lo: u32, hi: u32) -> u32 {
        if hi <= lo {
            return lo;
        }
        self.inner.gen_range(lo..=hi)
    }

    /// True with probability `p` (clamped to `[0, 1]`).
    pub fn chance(&mut self, p: f32) -> bool {
        self.inner.gen_bool(p.clamp(0.0, 1.0) as f64)
    }

    /// Uniform angle in `[0, 2π)`.
    pub fn angle(&mut self) -> f32 {
        self.inner.gen_range(0.0..TAU)
    }

    /// `1.0` or `-1.0` with equal odds.
    pub fn sign(&mut self) -> f32 {
        if self.inner.gen_bool(0.5) {
            1.0
        } else {
            -1.0
        }
    }

    /// Element chosen proportionally to `weight`. `None` when the pool is
    /// empty or no entry has a positive weight.
    pub fn weighted<'a, T, F>(&mut self, pool: &'a [T], weight: F) -> Option<&'a T>
    where
        F: Fn(&T) -> f32,
    {
        let weights = pool.iter().map(|item| weight(item).max(0.0));
        let index = WeightedIndex::new(weights).ok()?;
        pool.get(index.sample(&mut self.inner))
    }
}
