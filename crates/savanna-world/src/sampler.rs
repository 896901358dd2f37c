//! Random position sampling for seeding and daily grass growth.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use savanna_core::Position;

/// Draws positions from a candidate list through a seeded generator, so a
/// fixed seed reproduces the same placements run after run.
#[derive(Debug)]
pub struct PositionSampler {
    rng: ChaCha8Rng,
}

impl PositionSampler {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Up to `k` distinct positions drawn uniformly without replacement.
    ///
    /// Asking for more than the candidate count returns every candidate;
    /// documented under-fulfillment, not an error.
    pub fn sample_unique(&mut self, candidates: &[Position], k: usize) -> Vec<Position> {
        let mut pool = candidates.to_vec();
        let k = k.min(pool.len());
        // Partial Fisher-Yates: only the first k slots need settling
        for i in 0..k {
            let j = self.rng.gen_range(i..pool.len());
            pool.swap(i, j);
        }
        pool.truncate(k);
        pool
    }

    /// `k` positions drawn uniformly and independently, repeats allowed
    pub fn sample_with_repetition(&mut self, candidates: &[Position], k: usize) -> Vec<Position> {
        if candidates.is_empty() {
            return Vec::new();
        }
        (0..k)
            .map(|_| candidates[self.rng.gen_range(0..candidates.len())])
            .collect()
    }
}
