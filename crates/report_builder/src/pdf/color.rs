//! RGB colors and the report palette.

use mocap_core::Classification;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (the `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Like [`Color::from_hex`], with a fallback for malformed input.
    pub fn hex_or(hex: &str, fallback: Color) -> Self {
        Self::from_hex(hex).unwrap_or(fallback)
    }

    /// Channels scaled to `0.0..=1.0` for PDF color operators.
    pub fn components(&self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

// Report palette
pub const NAVY: Color = Color::rgb(0x00, 0x28, 0x55);
pub const GOLD: Color = Color::rgb(0xEA, 0xAA, 0x00);
pub const LIGHT_GOLD: Color = Color::rgb(0xF5, 0xD7, 0x8E);
pub const DARK_GRAY: Color = Color::rgb(0x33, 0x33, 0x33);
pub const LIGHT_GRAY: Color = Color::rgb(0xF5, 0xF5, 0xF5);
pub const GRID_GRAY: Color = Color::rgb(0xD9, 0xD9, 0xD9);
pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);

// Plot colors
pub const BLUE: Color = Color::rgb(0x00, 0x00, 0xFF);
pub const RED: Color = Color::rgb(0xFF, 0x00, 0x00);
pub const GRAY: Color = Color::rgb(0x80, 0x80, 0x80);
pub const LIGHT_BLUE: Color = Color::rgb(0xAD, 0xD8, 0xE6);
pub const ROYAL_BLUE: Color = Color::rgb(0x41, 0x69, 0xE1);
pub const DARK_ORANGE: Color = Color::rgb(0xFF, 0x8C, 0x00);
pub const SADDLE_BROWN: Color = Color::rgb(0x8B, 0x45, 0x13);
pub const DARK_GOLDENROD: Color = Color::rgb(0xB8, 0x86, 0x0B);

/// Table cell background for a classification.
pub fn classification_fill(classification: Classification) -> Color {
    match classification {
        Classification::InRange => Color::rgb(0x90, 0xEE, 0x90),
        Classification::NearRange => Color::rgb(0xFF, 0xFA, 0xCD),
        Classification::OutOfRange => Color::rgb(0xFF, 0xB6, 0xC1),
        Classification::Unclassified => LIGHT_GRAY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(Color::from_hex("#002855"), Some(NAVY));
        assert_eq!(Color::from_hex("EAAA00"), Some(GOLD));
        assert_eq!(Color::from_hex("#12345"), None);
        assert_eq!(Color::from_hex("#GG0000"), None);
        assert_eq!(Color::hex_or("nope", BLACK), BLACK);
    }

    #[test]
    fn test_classification_fill() {
        assert_eq!(
            classification_fill(Classification::InRange),
            Color::from_hex("#90EE90").unwrap()
        );
        assert_eq!(classification_fill(Classification::Unclassified), LIGHT_GRAY);
    }
}
