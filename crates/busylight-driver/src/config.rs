//! Driver timing and calibration configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tunable driver intervals and the gamma calibration exponent.
///
/// Defaults match the hardware: a ~20 ms animation tick (50 fps is well
/// past what the firmware can show), a 20 s keep-alive so the device's
/// watchdog never reverts it to idle, and a 2 s reconnect backoff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Animation step granularity.
    pub tick: Duration,
    /// Re-send the current buffer after this much write silence.
    pub keepalive: Duration,
    /// Delay between reconnect attempts while no device is attached.
    pub reconnect_backoff: Duration,
    /// Exponent for the perceptual gamma curve.
    pub gamma_exponent: f32,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(20),
            keepalive: Duration::from_secs(20),
            reconnect_backoff: Duration::from_secs(2),
            gamma_exponent: 2.2,
        }
    }
}

impl DriverConfig {
    /// Clamp degenerate values to safe minimums.
    ///
    /// A zero tick would spin the worker loop and a zero backoff would
    /// hammer enumeration; both are floored at 1 ms.
    pub(crate) fn normalized(mut self) -> Self {
        let floor = Duration::from_millis(1);
        if self.tick < floor {
            self.tick = floor;
        }
        if self.reconnect_backoff < floor {
            self.reconnect_backoff = floor;
        }
        if self.keepalive < floor {
            self.keepalive = floor;
        }
        self
    }
}
