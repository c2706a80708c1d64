//! RGB color triple and linear interpolation.

use serde::{Deserialize, Serialize};

/// An 8-bit-per-channel RGB color.
///
/// Ephemeral by design: one is built per command or per animation step,
/// never stored long-term. All arithmetic on channels clamps to
/// `[0, 255]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// All channels zero; writing this turns the light off.
    pub const OFF: Color = Color { r: 0, g: 0, b: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// True when every channel is zero.
    pub fn is_off(&self) -> bool {
        self.r == 0 && self.g == 0 && self.b == 0
    }

    /// Linear interpolation from `start` to `end` at fraction `t`.
    ///
    /// `t` is clamped to `[0, 1]`; channel results are rounded to the
    /// nearest integer so the midpoint of 0 and 255 lands on 128 rather
    /// than truncating to 127.
    pub fn tween(start: Color, end: Color, t: f32) -> Color {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };

        let lerp = |a: u8, b: u8| -> u8 {
            let v = f32::from(a) + (f32::from(b) - f32::from(a)) * t;
            v.round().clamp(0.0, 255.0) as u8
        };

        Color {
            r: lerp(start.r, end.r),
            g: lerp(start.g, end.g),
            b: lerp(start.b, end.b),
        }
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self { r, g, b }
    }
}
