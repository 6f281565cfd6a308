// Selector: uniform random choice of a pool index, behind an injectable
// randomness capability.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::SpinError;

/// Source of randomness for picking items and extra revolutions.
///
/// Injected into the engine so tests can script outcomes.
pub trait RandomSource: Send + Sync {
    /// Uniform integer in `[0, n)`. Callers guarantee `n > 0`.
    fn index_below(&mut self, n: usize) -> usize;

    /// Uniform integer in `[min, max]` inclusive. Callers guarantee `min <= max`.
    fn revolutions(&mut self, min: u32, max: u32) -> u32;
}

/// `RandomSource` backed by `rand`'s standard generator.
#[derive(Debug, Clone)]
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    /// Seeded from OS entropy.
    pub fn from_entropy() -> Self {
        StdRandom {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic generator, for reproducible sessions and tests.
    pub fn seeded(seed: u64) -> Self {
        StdRandom {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for StdRandom {
    fn index_below(&mut self, n: usize) -> usize {
        self.rng.gen_range(0..n)
    }

    fn revolutions(&mut self, min: u32, max: u32) -> u32 {
        self.rng.gen_range(min..=max)
    }
}

/// Pick an index uniformly from a pool of `pool_len` items.
pub fn pick(rng: &mut dyn RandomSource, pool_len: usize) -> Result<usize, SpinError> {
    if pool_len == 0 {
        return Err(SpinError::EmptyPool);
    }
    let index = rng.index_below(pool_len);
    // A misbehaving source must not leak an out-of-range index.
    if index >= pool_len {
        return Err(SpinError::IndexOutOfRange {
            index,
            len: pool_len,
        });
    }
    Ok(index)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
