//! Random source seam
//!
//! Every probabilistic decision in the simulation draws through [`RngPolicy`],
//! so tests can replay exact outcomes and runs stay reproducible per seed.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Uniform integer source
pub trait RngPolicy {
    /// Uniform integer in `0..upper` (always 0 when `upper <= 1`)
    fn below(&mut self, upper: u32) -> u32;

    /// True with probability `1 / odds`
    fn one_in(&mut self, odds: u32) -> bool {
        self.below(odds) == 0
    }
}

/// Seeded PCG generator (the session's RNG)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeededRng {
    pub seed: u64,
    rng: Pcg32,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl RngPolicy for SeededRng {
    fn below(&mut self, upper: u32) -> u32 {
        if upper <= 1 {
            return 0;
        }
        self.rng.random_range(0..upper)
    }
}

/// Replays a fixed sequence of draws, each reduced modulo the requested range.
/// Falls back to `fallback` once the script runs out.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRng {
    draws: VecDeque<u32>,
    fallback: u32,
}

impl ScriptedRng {
    pub fn new(draws: impl IntoIterator<Item = u32>) -> Self {
        Self {
            draws: draws.into_iter().collect(),
            fallback: 0,
        }
    }

    /// Value returned after the script is exhausted
    pub fn with_fallback(mut self, fallback: u32) -> Self {
        self.fallback = fallback;
        self
    }

    /// Draws not yet consumed
    pub fn remaining(&self) -> usize {
        self.draws.len()
    }
}

impl RngPolicy for ScriptedRng {
    fn below(&mut self, upper: u32) -> u32 {
        if upper <= 1 {
            return 0;
        }
        let raw = self.draws.pop_front().unwrap_or(self.fallback);
        raw % upper
    }
}
