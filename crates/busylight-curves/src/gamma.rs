//! Pre-computed gamma lookup table for LED channel correction.

use crate::color::Color;

/// Default perceptual exponent; the hardware band is roughly 2.2–2.8
/// depending on calibration.
pub const DEFAULT_EXPONENT: f32 = 2.2;

/// Pre-computed 256-entry gamma curve.
///
/// `correct()` is a pure table lookup: total, deterministic,
/// allocation-free, and safe to call from any thread. It deliberately has
/// no special cases; in particular a non-zero input may correct to zero,
/// and callers that need a "dim but not off" floor must substitute their
/// own minimal value (the driver's pulse low-end does exactly that).
///
/// # Example
///
/// ```
/// use busylight_curves::GammaLut;
///
/// let lut = GammaLut::new();
/// assert_eq!(lut.correct(0), 0);
/// assert_eq!(lut.correct(255), 255);
/// assert!(lut.correct(128) < 128);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GammaLut {
    table: [u8; 256],
}

impl GammaLut {
    /// Number of table entries.
    pub const SIZE: usize = 256;

    /// Build a table for `round(255 * (c/255)^exponent)`.
    ///
    /// The exponent is clamped to `[1.0, 4.0]`; 1.0 yields the identity
    /// mapping. Construction allocates nothing and is cheap enough to do
    /// once at driver start.
    pub fn with_exponent(exponent: f32) -> Self {
        let exponent = if exponent.is_finite() {
            exponent.clamp(1.0, 4.0)
        } else {
            DEFAULT_EXPONENT
        };

        let mut table = [0u8; Self::SIZE];
        for (i, entry) in table.iter_mut().enumerate() {
            let linear = i as f32 / 255.0;
            *entry = (linear.powf(exponent) * 255.0).round().clamp(0.0, 255.0) as u8;
        }

        Self { table }
    }

    /// Table with the default exponent.
    pub fn new() -> Self {
        Self::with_exponent(DEFAULT_EXPONENT)
    }

    /// Correct a single channel value.
    #[inline]
    pub fn correct(&self, channel: u8) -> u8 {
        self.table[channel as usize]
    }

    /// Correct all three channels of a color.
    pub fn correct_color(&self, color: Color) -> Color {
        Color {
            r: self.correct(color.r),
            g: self.correct(color.g),
            b: self.correct(color.b),
        }
    }

    /// True when no adjacent pair of entries inverts brightness.
    pub fn is_monotonic(&self) -> bool {
        self.table.windows(2).all(|w| w[0] <= w[1])
    }

    /// Raw table, for inspection in tests.
    pub fn table(&self) -> &[u8; 256] {
        &self.table
    }
}

impl Default for GammaLut {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_endpoints_are_fixpoints() {
        let lut = GammaLut::new();
        assert_eq!(lut.correct(0), 0);
        assert_eq!(lut.correct(255), 255);
    }

    #[test]
    fn test_default_curve_is_monotonic() {
        assert!(GammaLut::new().is_monotonic());
    }

    #[test]
    fn test_identity_exponent() {
        let lut = GammaLut::with_exponent(1.0);
        for c in 0..=255u8 {
            assert_eq!(lut.correct(c), c);
        }
    }

    #[test]
    fn test_exponent_is_clamped() {
        let low = GammaLut::with_exponent(0.1);
        let high = GammaLut::with_exponent(100.0);

        assert_eq!(low.table(), GammaLut::with_exponent(1.0).table());
        assert_eq!(high.table(), GammaLut::with_exponent(4.0).table());
    }

    #[test]
    fn test_non_finite_exponent_falls_back_to_default() {
        let lut = GammaLut::with_exponent(f32::NAN);
        assert_eq!(lut.table(), GammaLut::new().table());
    }

    #[test]
    fn test_correct_color_applies_per_channel() {
        let lut = GammaLut::new();
        let corrected = lut.correct_color(Color::new(255, 128, 0));

        assert_eq!(corrected.r, 255);
        assert_eq!(corrected.g, lut.correct(128));
        assert_eq!(corrected.b, 0);
    }

    #[test]
    fn test_dim_inputs_may_round_to_zero() {
        // The driver relies on this: low pre-gamma values can land on 0
        // and the lut must not special-case them.
        let lut = GammaLut::with_exponent(2.8);
        assert_eq!(lut.correct(1), 0);
    }

    proptest! {
        #[test]
        fn prop_monotonic_non_decreasing(c in 0u8..255) {
            let lut = GammaLut::new();
            prop_assert!(lut.correct(c) <= lut.correct(c + 1));
        }

        #[test]
        fn prop_any_exponent_monotonic(exp in 1.0f32..4.0) {
            prop_assert!(GammaLut::with_exponent(exp).is_monotonic());
        }
    }
}
