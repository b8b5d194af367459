//! Color mapping utilities for SVG visualization.

use std::fmt;

/// Simple RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl fmt::Display for Rgb {
    /// Format as CSS hex: #rrggbb
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Sequential ramp, light yellow (low) to dark red (high).
const LOW: Rgb = Rgb { r: 0xff, g: 0xf7, b: 0xbc };
const HIGH: Rgb = Rgb { r: 0xb1, g: 0x00, b: 0x26 };

/// Color for `t` in [0.0, 1.0]; values outside are clamped, NaN maps to the low end.
pub fn sequential_color(t: f64) -> Rgb {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

    let lerp = |a: u8, b: u8| -> u8 {
        (a as f64 + (b as f64 - a as f64) * t)
            .round()
            .clamp(0.0, 255.0) as u8
    };

    Rgb { r: lerp(LOW.r, HIGH.r), g: lerp(LOW.g, HIGH.g), b: lerp(LOW.b, HIGH.b) }
}
