//! Standard Type 1 fonts (Helvetica family) with AFM advance widths.
//!
//! Text is written with WinAnsiEncoding; characters outside it are
//! replaced with `?`.

use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Font {
    Regular,
    Bold,
}

/// Advance widths (1/1000 em) for ASCII 32..=126.
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0..?
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // P.._
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // `..o
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // p..~
];

const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, //
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, //
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, //
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, //
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, //
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, //
];

impl Font {
    pub const ALL: [Font; 2] = [Font::Regular, Font::Bold];

    /// Name of the font in the page resource dictionary.
    pub fn resource_name(&self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }

    pub fn base_font(&self) -> &'static str {
        match self {
            Font::Regular => "Helvetica",
            Font::Bold => "Helvetica-Bold",
        }
    }

    fn glyph_width(&self, byte: u8) -> u16 {
        let table = match self {
            Font::Regular => &HELVETICA,
            Font::Bold => &HELVETICA_BOLD,
        };
        match byte {
            32..=126 => table[(byte - 32) as usize],
            0x95 => 350,                // bullet
            0x96 => 556,                // en dash
            0xB0 => 400,                // degree
            0xB1 => 584,                // plus-minus
            0xA0 => 278,                // nbsp
            _ => 556,
        }
    }

    /// Width of `text` in points at `size`.
    pub fn text_width(&self, text: &str, size: f64) -> f64 {
        let units: u32 = encode_lossy(text)
            .into_iter()
            .map(|b| self.glyph_width(b) as u32)
            .sum();
        units as f64 * size / 1000.0
    }
}

fn win_ansi_byte(c: char) -> Option<u8> {
    match c {
        ' '..='~' => Some(c as u8),
        '\u{2022}' => Some(0x95),
        '\u{2013}' => Some(0x96),
        '\u{2014}' => Some(0x97),
        '\u{2019}' => Some(0x92),
        '\u{00A0}'..='\u{00FF}' => Some(c as u32 as u8),
        _ => None,
    }
}

/// Characters of `text` that WinAnsi cannot represent.
pub fn unencodable_chars(text: &str) -> Vec<char> {
    text.chars().filter(|&c| win_ansi_byte(c).is_none()).collect()
}

/// Encode text as WinAnsi (CP1252) bytes, logging any replaced characters.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    let missing = unencodable_chars(text);
    if !missing.is_empty() {
        warn!(
            "Replacing {:?} with '?' in {:?}: not representable in WinAnsi",
            missing, text
        );
    }
    encode_lossy(text)
}

fn encode_lossy(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| win_ansi_byte(c).unwrap_or(b'?'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_win_ansi() {
        assert_eq!(encode_win_ansi("193° ± 1°"), b"193\xB0 \xB1 1\xB0".to_vec());
        assert_eq!(encode_win_ansi("• a"), vec![0x95, b' ', b'a']);
        assert_eq!(encode_win_ansi("→"), b"?".to_vec());
    }

    #[test]
    fn test_unencodable_chars_are_reported() {
        assert!(unencodable_chars("José Núñez 193° ± 1° • –").is_empty());
        assert_eq!(unencodable_chars("Łukasz 大谷"), vec!['Ł', '大', '谷']);
        assert_eq!(encode_win_ansi("Łukasz"), b"?ukasz".to_vec());
        // width uses the same replacement glyph
        assert_eq!(
            Font::Regular.text_width("Ł", 10.0),
            Font::Regular.text_width("?", 10.0)
        );
    }

    #[test]
    fn test_text_width() {
        // "Hi" = 722 + 222
        assert!((Font::Regular.text_width("Hi", 10.0) - 9.44).abs() < 1e-9);
        assert!(Font::Bold.text_width("Shoulder", 12.0) > Font::Regular.text_width("Shoulder", 12.0));
        assert_eq!(Font::Regular.text_width("", 12.0), 0.0);
    }
}
