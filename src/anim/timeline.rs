//! Step timing.
//!
//! Each step is shown for `step_ms`, split into redraw ticks of `tick_ms`
//! (the arrow is re-routed on every tick so it follows layout changes),
//! followed by a short `pause_ms` gap before the next step.
//!
//! ```text
//! | step 0: tick tick tick ... | pause | step 1: tick ... | pause | done
//! ```

use serde::{Serialize, Deserialize};
use thiserror::Error;
use crate::anim::Easing;

/// Longest accepted step, tick or pause, in milliseconds.
pub const MAX_TIMING_MS: u64 = 60_000;

/// Timing knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// How long each step stays on screen.
    pub step_ms: u64,
    /// Redraw interval while a step is shown.
    pub tick_ms: u64,
    /// Gap between steps.
    pub pause_ms: u64,
    /// How the active arrow is revealed.
    pub easing: Easing,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            step_ms: 1600,
            tick_ms: 60,
            pause_ms: 120,
            easing: Easing::Instant,
        }
    }
}

impl AnimationConfig {
    /// Check that every duration is within [`MAX_TIMING_MS`].
    pub fn validate(&self) -> Result<(), TimingError> {
        let fields = [("step_ms", self.step_ms), ("tick_ms", self.tick_ms), ("pause_ms", self.pause_ms)];
        for (field, value) in fields {
            if value > MAX_TIMING_MS {
                return Err(TimingError::TooLong { field, value });
            }
        }
        Ok(())
    }

    /// Redraw ticks per step. Always at least one.
    pub fn ticks_per_step(&self) -> u64 {
        match self.tick_ms {
            0 => 1,
            tick => (self.step_ms / tick).max(1),
        }
    }

    /// Length of one tick.
    pub fn tick_len(&self) -> u64 {
        match self.tick_ms {
            0 => self.step_ms,
            tick => tick,
        }
    }

    /// Time a step is actually shown (whole ticks only).
    pub fn active_ms(&self) -> u64 {
        self.ticks_per_step().saturating_mul(self.tick_len())
    }

    /// Time from one step's start to the next.
    pub fn slot_ms(&self) -> u64 {
        self.active_ms().saturating_add(self.pause_ms)
    }
}

/// A timing value out of range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimingError {
    #[error("{field} is {value} ms, at most {max} ms is allowed", max = MAX_TIMING_MS)]
    TooLong { field: &'static str, value: u64 },
}

/// Where the animation is at a given moment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Position {
    /// A step is on screen.
    Active {
        step: usize,
        tick: u64,
        /// Linear progress through the step's active time, in `[0, 1)`.
        progress: f64,
    },
    /// Between a step and the next one.
    Pause { step: usize },
    /// Every step has been shown.
    Finished,
}

/// The schedule for a fixed number of steps.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    steps: usize,
    config: AnimationConfig,
}

impl Timeline {
    pub fn new(steps: usize, config: AnimationConfig) -> Self {
        Self { steps, config }
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    /// Duration of the whole animation.
    pub fn total_ms(&self) -> u64 {
        (self.steps as u64).saturating_mul(self.config.slot_ms())
    }

    /// When step `step` starts.
    pub fn step_start(&self, step: usize) -> u64 {
        (step as u64).saturating_mul(self.config.slot_ms())
    }

    /// Position at `elapsed_ms` after the animation started.
    pub fn position(&self, elapsed_ms: u64) -> Position {
        let slot = self.config.slot_ms();
        if self.steps == 0 || slot == 0 || elapsed_ms >= self.total_ms() {
            return Position::Finished;
        }

        let step = (elapsed_ms / slot) as usize;
        let within = elapsed_ms % slot;
        let active = self.config.active_ms();

        if within < active {
            Position::Active {
                step,
                tick: within / self.config.tick_len(),
                progress: within as f64 / active as f64,
            }
        } else {
            Position::Pause { step }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timing() {
        let config = AnimationConfig::default();
        assert_eq!(config.ticks_per_step(), 26);
        assert_eq!(config.active_ms(), 1560);
        assert_eq!(config.slot_ms(), 1680);
        assert_eq!(Timeline::new(9, config).total_ms(), 9 * 1680);
    }

    #[test]
    fn test_positions() {
        let t = Timeline::new(2, AnimationConfig::default());
        assert_eq!(t.position(0), Position::Active { step: 0, tick: 0, progress: 0.0 });
        assert!(matches!(t.position(130), Position::Active { step: 0, tick: 2, .. }));
        assert_eq!(t.position(1560), Position::Pause { step: 0 });
        assert_eq!(t.position(1679), Position::Pause { step: 0 });
        assert!(matches!(t.position(1680), Position::Active { step: 1, tick: 0, .. }));
        assert_eq!(t.position(3360), Position::Finished);
        assert_eq!(t.position(u64::MAX), Position::Finished);
    }

    #[test]
    fn test_degenerate_configs() {
        let config = AnimationConfig { step_ms: 30, tick_ms: 60, pause_ms: 0, easing: Easing::Instant };
        assert_eq!(config.ticks_per_step(), 1);
        assert_eq!(config.active_ms(), 60);

        let config = AnimationConfig { step_ms: 100, tick_ms: 0, pause_ms: 10, easing: Easing::Linear };
        assert_eq!(config.ticks_per_step(), 1);
        assert_eq!(config.slot_ms(), 110);

        let zero = AnimationConfig { step_ms: 0, tick_ms: 0, pause_ms: 0, easing: Easing::Instant };
        assert_eq!(Timeline::new(3, zero).position(0), Position::Finished);
        assert_eq!(Timeline::new(0, AnimationConfig::default()).position(0), Position::Finished);
    }

    #[test]
    fn test_validate_bounds() {
        assert_eq!(AnimationConfig::default().validate(), Ok(()));
        let edge = AnimationConfig { step_ms: MAX_TIMING_MS, tick_ms: 0, pause_ms: 0, easing: Easing::Linear };
        assert_eq!(edge.validate(), Ok(()));

        let long = AnimationConfig { step_ms: u64::MAX, tick_ms: 1, ..AnimationConfig::default() };
        assert_eq!(long.validate(), Err(TimingError::TooLong { field: "step_ms", value: u64::MAX }));
        let pause = AnimationConfig { pause_ms: MAX_TIMING_MS + 1, ..AnimationConfig::default() };
        assert!(matches!(pause.validate(), Err(TimingError::TooLong { field: "pause_ms", .. })));
    }

    #[test]
    fn test_saturating_schedule() {
        let config = AnimationConfig { step_ms: u64::MAX, tick_ms: 1, pause_ms: u64::MAX, easing: Easing::Instant };
        assert_eq!(config.slot_ms(), u64::MAX);
        let t = Timeline::new(3, config);
        assert_eq!(t.total_ms(), u64::MAX);
        assert_eq!(t.step_start(2), u64::MAX);
        assert!(matches!(t.position(5), Position::Active { step: 0, tick: 5, .. }));
    }

    #[test]
    fn test_config_defaults_fill_gaps() {
        let config: AnimationConfig = serde_json::from_str(r#"{"step_ms": 800, "easing": "ease-in-out"}"#).unwrap();
        assert_eq!(config.step_ms, 800);
        assert_eq!(config.tick_ms, 60);
        assert_eq!(config.pause_ms, 120);
        assert_eq!(config.easing, Easing::EaseInOut);
    }
}
