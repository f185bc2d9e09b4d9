//! RGBA color type and conversions
//!
//! Colors are linear RGBA floats. Hex parsing backs the rich-text
//! `<color=#..>` directive; HSV conversion backs the colour picker.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Linear RGBA color with components in `[0, 1]`
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Color {
    /// Red component
    pub r: f32,
    /// Green component
    pub g: f32,
    /// Blue component
    pub b: f32,
    /// Alpha component
    pub a: f32,
}

impl Color {
    /// Opaque white
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// Opaque black
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque red
    pub const RED: Self = Self::new(1.0, 0.0, 0.0, 1.0);
    /// Opaque green
    pub const GREEN: Self = Self::new(0.0, 1.0, 0.0, 1.0);
    /// Opaque blue
    pub const BLUE: Self = Self::new(0.0, 0.0, 1.0, 1.0);
    /// Opaque yellow
    pub const YELLOW: Self = Self::new(1.0, 1.0, 0.0, 1.0);
    /// Opaque mid grey
    pub const GREY: Self = Self::new(0.5, 0.5, 0.5, 1.0);
    /// Fully transparent black
    pub const CLEAR: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Create a color from explicit components
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color from RGB components
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Copy of this color with a different alpha
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Parse a hex color code of the form `RRGGBB` or `RRGGBBAA`
    /// (case-insensitive, no leading `#`). Returns `None` for any
    /// other length or non-hex characters.
    pub fn try_parse_hex(code: &str) -> Option<Self> {
        if code.len() != 6 && code.len() != 8 {
            return None;
        }
        if !code.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| -> f32 {
            // Length/digit checks above make this parse infallible.
            u8::from_str_radix(&code[i..i + 2], 16).unwrap_or(0) as f32 / 255.0
        };
        let a = if code.len() == 8 { channel(6) } else { 1.0 };
        Some(Self::new(channel(0), channel(2), channel(4), a))
    }

    /// Convert HSV components (each in `[0, 1]`) to an opaque RGB color
    pub fn from_hsv(h: f32, s: f32, v: f32) -> Self {
        let h = (h.clamp(0.0, 1.0) * 6.0) % 6.0;
        let i = h.floor();
        let f = h - i;
        let p = v * (1.0 - s);
        let q = v * (1.0 - s * f);
        let t = v * (1.0 - s * (1.0 - f));
        let (r, g, b) = match i as u32 {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };
        Self::rgb(r, g, b)
    }

    /// Components as a fixed array, in RGBA order
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn parses_six_digit_hex() {
        let c = Color::try_parse_hex("FF0000").unwrap();
        assert_relative_eq!(c.r, 1.0);
        assert_relative_eq!(c.g, 0.0);
        assert_relative_eq!(c.b, 0.0);
        assert_relative_eq!(c.a, 1.0);
    }

    #[test]
    fn parses_eight_digit_hex_with_alpha() {
        let c = Color::try_parse_hex("00ff0080").unwrap();
        assert_relative_eq!(c.g, 1.0);
        assert_relative_eq!(c.a, 128.0 / 255.0);
    }

    #[test]
    fn hex_parse_is_case_insensitive() {
        assert_eq!(
            Color::try_parse_hex("aAbBcC"),
            Color::try_parse_hex("AABBCC")
        );
    }

    #[test]
    fn rejects_malformed_hex() {
        assert!(Color::try_parse_hex("FFF").is_none());
        assert!(Color::try_parse_hex("GG0000").is_none());
        assert!(Color::try_parse_hex("FF00001").is_none());
        assert!(Color::try_parse_hex("").is_none());
    }

    #[test]
    fn hsv_primaries() {
        let red = Color::from_hsv(0.0, 1.0, 1.0);
        assert_relative_eq!(red.r, 1.0);
        assert_relative_eq!(red.g, 0.0);

        let green = Color::from_hsv(1.0 / 3.0, 1.0, 1.0);
        assert_relative_eq!(green.g, 1.0, epsilon = 1e-5);

        // Zero saturation is greyscale regardless of hue
        let grey = Color::from_hsv(0.7, 0.0, 0.5);
        assert_relative_eq!(grey.r, 0.5);
        assert_relative_eq!(grey.g, 0.5);
        assert_relative_eq!(grey.b, 0.5);
    }
}
