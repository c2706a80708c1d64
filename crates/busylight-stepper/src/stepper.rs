//! Poll-driven periodic stepper with absolute deadlines.

use std::time::{Duration, Instant};

use crate::error::StepperError;

/// How a stepper treats its step count.
///
/// Two historical behaviors exist for finite animations — auto-stop after
/// the last step versus wrap-forever with an external stop — and mixing
/// them up produces animations that either cut out early or never end.
/// This crate pins one semantic per mode:
///
/// - [`StepMode::Finite`] yields indices `0..n` exactly once, then the
///   stepper is finished. No external `stop()` required.
/// - [`StepMode::Cycle`] yields `0..n` and wraps back to `0` forever;
///   only [`Stepper::stop`] (or dropping the stepper) ends it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepMode {
    /// Fire exactly this many steps, then finish.
    Finite(u32),
    /// Wrap the index modulo this cycle length until stopped.
    Cycle(u32),
}

/// Timing state for one running animation.
///
/// Deadlines are absolute (`next_due += period`) so step cadence does not
/// drift with owner-loop latency. If the owner falls more than one period
/// behind, the stepper re-anchors to `now + period` instead of bursting
/// to catch up — skipping frames looks better on an LED than replaying
/// them.
#[derive(Debug)]
pub struct Stepper {
    mode: StepMode,
    period: Duration,
    index: u32,
    next_due: Instant,
    stopped: bool,
}

impl Stepper {
    /// Stepper that auto-stops after `total_steps` steps.
    pub fn finite(total_steps: u32, period: Duration) -> Result<Self, StepperError> {
        Self::with_mode(StepMode::Finite(total_steps), period)
    }

    /// Stepper that wraps its index modulo `cycle_len` until stopped.
    pub fn cycle(cycle_len: u32, period: Duration) -> Result<Self, StepperError> {
        Self::with_mode(StepMode::Cycle(cycle_len), period)
    }

    fn with_mode(mode: StepMode, period: Duration) -> Result<Self, StepperError> {
        let steps = match mode {
            StepMode::Finite(n) | StepMode::Cycle(n) => n,
        };
        if steps == 0 {
            return Err(StepperError::ZeroSteps);
        }
        if period.is_zero() {
            return Err(StepperError::ZeroPeriod(period));
        }

        Ok(Self {
            mode,
            period,
            index: 0,
            // The first step fires immediately so an animation's initial
            // color reaches the hardware without waiting out a period.
            next_due: Instant::now(),
            stopped: false,
        })
    }

    /// Yield the current step index if one is due at `now`, advancing the
    /// internal state. Returns `None` while not yet due, and forever once
    /// stopped or finished.
    pub fn poll(&mut self, now: Instant) -> Option<u32> {
        if self.stopped || now < self.next_due {
            return None;
        }

        let fired = self.index;

        self.index += 1;
        match self.mode {
            StepMode::Finite(total) => {
                if self.index >= total {
                    self.stopped = true;
                }
            }
            StepMode::Cycle(len) => {
                self.index %= len;
            }
        }

        self.next_due += self.period;
        if self.next_due < now {
            self.next_due = now + self.period;
        }

        Some(fired)
    }

    /// Cancel the stepper. Idempotent; after this, [`poll`](Self::poll)
    /// never yields again.
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    /// True once stopped explicitly or finished (finite mode).
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Time until the next step is due, `Duration::ZERO` if overdue,
    /// `None` once stopped. Owners use this as their sleep bound.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        if self.stopped {
            return None;
        }
        Some(self.next_due.saturating_duration_since(now))
    }

    /// Configured step period.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Configured mode.
    pub fn mode(&self) -> StepMode {
        self.mode
    }
}
