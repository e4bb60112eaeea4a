//! Color-string parsing for bar fills.

use anyhow::{anyhow, Result};
use plotters::style::RGBColor;

/// Named fills accepted in options, each with its one-letter shorthand
const NAMED_COLORS: &[(&str, Option<char>, RGBColor)] = &[
    ("green", Some('g'), RGBColor(0, 128, 0)),
    ("red", Some('r'), RGBColor(255, 0, 0)),
    ("blue", Some('b'), RGBColor(0, 0, 255)),
    ("cyan", Some('c'), RGBColor(0, 191, 191)),
    ("magenta", Some('m'), RGBColor(191, 0, 191)),
    ("yellow", Some('y'), RGBColor(191, 191, 0)),
    ("black", Some('k'), RGBColor(0, 0, 0)),
    ("white", Some('w'), RGBColor(255, 255, 255)),
    ("orange", None, RGBColor(255, 165, 0)),
    ("gray", None, RGBColor(128, 128, 128)),
    ("grey", None, RGBColor(128, 128, 128)),
];

/// Parse `#RRGGBB`, `#RGB`, a color name or its one-letter shorthand
pub fn parse_color(color_str: &str) -> Option<RGBColor> {
    let color_str = color_str.trim();
    if let Some(hex) = color_str.strip_prefix('#') {
        return parse_hex_color(hex);
    }

    let lower = color_str.to_ascii_lowercase();
    let mut chars = lower.chars();
    let letter = match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    };

    NAMED_COLORS
        .iter()
        .find(|(name, short, _)| *name == lower || (letter.is_some() && *short == letter))
        .map(|(_, _, rgb)| *rgb)
}

/// Like [`parse_color`], but unknown colors are an error
pub fn resolve_color(color_str: &str) -> Result<RGBColor> {
    parse_color(color_str).ok_or_else(|| anyhow!("Unknown color '{}'", color_str))
}

fn parse_hex_color(digits: &str) -> Option<RGBColor> {
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let value = u32::from_str_radix(digits, 16).ok()?;
    match digits.len() {
        6 => Some(RGBColor((value >> 16) as u8, (value >> 8) as u8, value as u8)),
        // each nibble is doubled: #f80 == #ff8800
        3 => {
            let nibble = |shift: u32| ((value >> shift) & 0xf) as u8 * 17;
            Some(RGBColor(nibble(8), nibble(4), nibble(0)))
        }
        _ => None,
    }
}
