//! Hex color argument parsing.

use anyhow::{Context, Result, bail};
use busylight_curves::Color;

/// Parse `#rrggbb` or `rrggbb` into a [`Color`].
pub fn parse_color(input: &str) -> Result<Color> {
    let hex = input.strip_prefix('#').unwrap_or(input);
    if hex.len() != 6 || !hex.is_ascii() {
        bail!("expected a 6-digit hex color like ff8800, got '{input}'");
    }

    let channel = |range: std::ops::Range<usize>| -> Result<u8> {
        u8::from_str_radix(&hex[range], 16)
            .with_context(|| format!("invalid hex color '{input}'"))
    };

    Ok(Color::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_with_and_without_hash() {
        assert_eq!(parse_color("ff8800").expect("valid"), Color::new(255, 136, 0));
        assert_eq!(parse_color("#00ff00").expect("valid"), Color::new(0, 255, 0));
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(parse_color("fff").is_err());
        assert!(parse_color("gggggg").is_err());
        assert!(parse_color("#ff88001").is_err());
        assert!(parse_color("").is_err());
    }
}
