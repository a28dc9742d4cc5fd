//! Random source seam.
//!
//! Gates only ever need a closed-range integer roll. Any `rand::Rng` can
//! serve; [`SimRng`] wraps a seeded `SmallRng` so runs are reproducible.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// Uniform integer draws in a closed range.
pub trait RandomSource {
    /// Draws from `low..=high`. Returns `low` when the range is empty.
    fn roll(&mut self, low: u32, high: u32) -> u32;
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn roll(&mut self, low: u32, high: u32) -> u32 {
        if low >= high {
            return low;
        }
        self.gen_range(low..=high)
    }
}

/// Seeded random number generator for simulations
#[derive(Debug, Clone)]
pub struct SimRng(pub SmallRng);

impl SimRng {
    pub fn seeded(seed: u64) -> Self {
        Self(SmallRng::seed_from_u64(seed))
    }
}

impl RandomSource for SimRng {
    fn roll(&mut self, low: u32, high: u32) -> u32 {
        self.0.roll(low, high)
    }
}

/// Replays a fixed sequence of rolls, clamped into the requested range.
///
/// Once the sequence runs out every roll returns `low`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRolls {
    rolls: VecDeque<u32>,
    drawn: usize,
}

impl ScriptedRolls {
    pub fn new(rolls: impl IntoIterator<Item = u32>) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
            drawn: 0,
        }
    }

    /// Number of rolls taken so far.
    pub fn drawn(&self) -> usize {
        self.drawn
    }
}

impl RandomSource for ScriptedRolls {
    fn roll(&mut self, low: u32, high: u32) -> u32 {
        self.drawn += 1;
        match self.rolls.pop_front() {
            Some(value) => value.clamp(low, high.max(low)),
            None => low,
        }
    }
}
