//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time/ticks (fixed-step clock fed by variable frame deltas)
//! - Browser bindings for the external renderer (wasm32)

#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

/// Turns variable frame times into whole fixed simulation steps
#[derive(Debug, Clone)]
pub struct FixedStepClock {
    pub step: f32,
    accumulator: f32,
}

impl Default for FixedStepClock {
    fn default() -> Self {
        Self::new(SIM_DT)
    }
}

impl FixedStepClock {
    pub fn new(step: f32) -> Self {
        Self {
            step,
            accumulator: 0.0,
        }
    }

    /// Feed a frame delta (seconds); returns how many steps to run now.
    /// Long frames are clamped and capped so a stall can't snowball.
    /// NaN and infinite deltas count as zero.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        let frame_dt = if frame_dt.is_finite() { frame_dt } else { 0.0 };
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut steps = 0;
        while self.accumulator >= self.step && steps < MAX_SUBSTEPS {
            self.accumulator -= self.step;
            steps += 1;
        }
        if steps == MAX_SUBSTEPS {
            // Drop the backlog instead of carrying it into the next frame
            self.accumulator = self.accumulator.min(self.step);
        }
        steps
    }

    /// Fraction of a step left over (for render interpolation)
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_matching_step_give_one_step() {
        let step = 1.0 / 64.0;
        let mut clock = FixedStepClock::new(step);
        assert_eq!(clock.advance(step), 1);
        assert_eq!(clock.advance(step / 2.0), 0);
        assert_eq!(clock.advance(step / 2.0), 1);
        assert_eq!(clock.alpha(), 0.0);
    }

    #[test]
    fn test_long_frame_is_capped() {
        let mut clock = FixedStepClock::new(0.001);
        assert_eq!(clock.advance(5.0), MAX_SUBSTEPS);
        assert!(clock.alpha() <= 1.0);
    }

    #[test]
    fn test_non_finite_frame_ignored() {
        let step = 1.0 / 64.0;
        let mut clock = FixedStepClock::new(step);
        assert_eq!(clock.advance(f32::NAN), 0);
        assert_eq!(clock.advance(f32::INFINITY), 0);
        assert_eq!(clock.advance(step), 1);
        assert_eq!(clock.advance(step), 1);
        assert_eq!(clock.alpha(), 0.0);
    }

    #[test]
    fn test_negative_frame_ignored() {
        let mut clock = FixedStepClock::default();
        assert_eq!(clock.advance(-1.0), 0);
    }
}
