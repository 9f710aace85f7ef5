//! Obstacle spawn scheduling
//!
//! Two tick-counted timers, one per obstacle kind. Each timer resamples its
//! delay from a score-dependent range every time it fires, so obstacles come
//! faster as the run goes on. All randomness goes through [`Sampler`] so a
//! seed (or a scripted sequence in tests) fully determines the schedule.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Source of random values for the simulation
pub trait Sampler {
    /// Uniform integer in `[lo, hi]` (inclusive)
    fn range_u32(&mut self, lo: u32, hi: u32) -> u32;
    /// Uniform float in `[lo, hi]` (inclusive)
    fn range_f32(&mut self, lo: f32, hi: f32) -> f32;
}

/// Seeded PCG sampler used for real runs
#[derive(Debug, Clone)]
pub struct SeededSampler {
    seed: u64,
    rng: Pcg32,
}

impl SeededSampler {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Sampler for SeededSampler {
    fn range_u32(&mut self, lo: u32, hi: u32) -> u32 {
        if lo >= hi {
            return lo;
        }
        self.rng.random_range(lo..=hi)
    }

    fn range_f32(&mut self, lo: f32, hi: f32) -> f32 {
        if lo >= hi {
            return lo;
        }
        self.rng.random_range(lo..=hi)
    }
}

/// Score-scaled spawn delay range, in ticks
///
/// `range(score)` divides the base bounds by `1 + score / difficulty`, so
/// both ends and the width shrink as the score rises. Both ends are floored
/// at `floor`, which is at least one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayCurve {
    pub base_min: u32,
    pub base_max: u32,
    pub floor: u32,
    /// Score at which the delays are halved
    pub difficulty: u32,
}

impl DelayCurve {
    /// Build a curve, rejecting ranges that could produce a zero or inverted delay
    pub fn new(
        curve: &'static str,
        base_min: u32,
        base_max: u32,
        floor: u32,
        difficulty: u32,
    ) -> Result<Self, ConfigError> {
        let c = Self {
            base_min,
            base_max,
            floor,
            difficulty,
        };
        c.validate(curve)?;
        Ok(c)
    }

    pub fn validate(&self, curve: &'static str) -> Result<(), ConfigError> {
        if self.floor == 0 {
            return Err(ConfigError::ZeroDelayFloor { curve });
        }
        if self.base_min > self.base_max {
            return Err(ConfigError::InvertedDelayRange {
                curve,
                min: self.base_min,
                max: self.base_max,
            });
        }
        if self.base_min < self.floor {
            return Err(ConfigError::DelayBelowFloor {
                curve,
                min: self.base_min,
                floor: self.floor,
            });
        }
        if self.difficulty == 0 {
            return Err(ConfigError::ZeroDifficulty { curve });
        }
        Ok(())
    }

    fn scale(&self, value: u32, score: u64) -> u32 {
        let k = self.difficulty as u64;
        (value as u64 * k / (k + score)) as u32
    }

    /// Inclusive `(min, max)` delay for the given score
    pub fn range(&self, score: u64) -> (u32, u32) {
        let floor = self.floor.max(1);
        let min = self.scale(self.base_min, score).max(floor);
        let max = self.scale(self.base_max, score).max(min);
        (min, max)
    }
}

/// A randomized-interval countdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnTimer {
    pub counter: u32,
    pub delay: u32,
    pub curve: DelayCurve,
}

impl SpawnTimer {
    /// Start a timer with its first delay sampled at score 0
    pub fn new(curve: DelayCurve, sampler: &mut dyn Sampler) -> Self {
        let (lo, hi) = curve.range(0);
        Self {
            counter: 0,
            delay: sampler.range_u32(lo, hi),
            curve,
        }
    }

    /// Advance one tick; returns true when a spawn is due
    pub fn tick(&mut self, score: u64, sampler: &mut dyn Sampler) -> bool {
        self.counter += 1;
        if self.counter < self.delay {
            return false;
        }
        self.counter = 0;
        let (lo, hi) = self.curve.range(score);
        self.delay = sampler.range_u32(lo, hi);
        true
    }
}

/// Which obstacles are due this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnRequests {
    pub ground: bool,
    pub flying: bool,
}

/// The two spawn timers plus the flying activation gate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnScheduler {
    pub ground: SpawnTimer,
    pub flying: SpawnTimer,
    /// Score below which the flying timer does not run at all
    pub flying_activation_score: u64,
}

impl SpawnScheduler {
    pub fn new(
        ground: DelayCurve,
        flying: DelayCurve,
        flying_activation_score: u64,
        sampler: &mut dyn Sampler,
    ) -> Self {
        Self {
            ground: SpawnTimer::new(ground, sampler),
            flying: SpawnTimer::new(flying, sampler),
            flying_activation_score,
        }
    }

    pub fn flying_active(&self, score: u64) -> bool {
        score >= self.flying_activation_score
    }

    pub fn tick(&mut self, score: u64, sampler: &mut dyn Sampler) -> SpawnRequests {
        let ground = self.ground.tick(score, sampler);
        let flying = self.flying_active(score) && self.flying.tick(score, sampler);
        SpawnRequests { ground, flying }
    }
}
