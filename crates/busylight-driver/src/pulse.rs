//! Triangle-wave pulse math.

use std::time::Duration;

use busylight_curves::Color;
use busylight_stepper::{Stepper, StepperError};

/// The one live animation a driver may own: a stepper plus the color
/// stops it interpolates between.
///
/// One full cycle is `2 * half_steps` steps: the first half fades
/// `high → low`, the second fades `low → high` (a triangle, not a
/// sawtooth — the light never jumps). The cycle stepper wraps forever;
/// the animation ends only by being dropped when a new command
/// supersedes it.
#[derive(Debug)]
pub(crate) struct PulseAnimation {
    pub stepper: Stepper,
    high: Color,
    low: Color,
    half_steps: u32,
}

impl PulseAnimation {
    /// Build a pulse with one full cycle lasting `rate`, stepped at
    /// `tick` granularity. Rates shorter than two ticks degrade to the
    /// fastest representable pulse (`half_steps == 1`).
    pub fn new(high: Color, low: Color, rate: Duration, tick: Duration) -> Result<Self, StepperError> {
        let half_steps = half_cycle_steps(rate, tick);
        let stepper = Stepper::cycle(2 * half_steps, tick)?;
        Ok(Self {
            stepper,
            high,
            low,
            half_steps,
        })
    }

    /// Pre-gamma color for a step index.
    ///
    /// Step `i` in the first half interpolates at `i / half_steps`, so
    /// step 0 is exactly `high`; step `half_steps` starts the second
    /// half at fraction 0, exactly `low`.
    pub fn color_at(&self, step: u32) -> Color {
        let half = self.half_steps;
        if step < half {
            Color::tween(self.high, self.low, step as f32 / half as f32)
        } else {
            Color::tween(self.low, self.high, (step - half) as f32 / half as f32)
        }
    }

    #[cfg(test)]
    pub fn half_steps(&self) -> u32 {
        self.half_steps
    }
}

/// `floor((rate/2) / tick)`, floored at one step per half and saturated
/// at `u32::MAX / 2` so a full cycle's step count always fits in `u32`.
pub(crate) fn half_cycle_steps(rate: Duration, tick: Duration) -> u32 {
    let tick_ms = tick.as_millis().max(1);
    let half_ms = rate.as_millis() / 2;
    u32::try_from((half_ms / tick_ms).max(1)).unwrap_or(u32::MAX / 2)
}
