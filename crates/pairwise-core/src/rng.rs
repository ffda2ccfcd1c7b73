//! Deterministic randomness owned by one builder.
//!
//! Draws go through `u64` ranges so the same seed yields the same vectors on
//! 32- and 64-bit targets.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(Debug, Clone)]
pub struct VectorRng {
    seed: u64,
    inner: ChaCha8Rng,
}

impl VectorRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    pub fn pick_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        self.below(len)
    }

    /// Knuth shuffle of `items[start..]`; the prefix is left in place.
    ///
    /// Draws exactly `items.len() - start` values.
    pub fn shuffle_tail<T>(&mut self, items: &mut [T], start: usize) {
        let len = items.len();
        for i in start..len {
            let j = i + self.below(len - i);
            items.swap(i, j);
        }
    }

    fn below(&mut self, bound: usize) -> usize {
        let drawn = self.inner.gen_range(0..bound as u64);
        // Bounded by a usize, so the cast back is lossless.
        drawn as usize
    }
}
