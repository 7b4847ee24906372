//! Color parsing and formatting for glow overrides.
//!
//! Saved originals use the compact form `RRGGBB` (uppercase, alpha dropped).

use serde::{Deserialize, Serialize};

use crate::error::{RedAlertError, Result};

/// An 8-bit-per-channel RGBA color, as carried by glow components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color32 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color32 {
    /// Fully opaque color from RGB channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Compare RGB channels only.
    pub fn same_rgb(&self, other: &Color32) -> bool {
        self.r == other.r && self.g == other.g && self.b == other.b
    }
}

/// The fixed alarm override color (pure red).
pub const ALARM_COLOR: Color32 = Color32::rgb(255, 0, 0);

/// Whether a color already shows the alarm color.
pub fn is_alarm_colored(color: &Color32) -> bool {
    color.same_rgb(&ALARM_COLOR)
}

/// Format a color as `RRGGBB`. Alpha is dropped.
pub fn format_color(color: &Color32) -> String {
    format!("{:02X}{:02X}{:02X}", color.r, color.g, color.b)
}

/// Parse a hex color string.
///
/// Accepts `"RRGGBB"`, `"#RRGGBB"`, `"0xRRGGBB"` and the 8-digit
/// `RRGGBBAA` forms. Alpha defaults to 255 when not present. Digits past the
/// sixth are ignored unless exactly eight remain.
pub fn parse_color(s: &str) -> Result<Color32> {
    let trimmed = s.trim();
    let hex = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .or_else(|| trimmed.strip_prefix('#'))
        .unwrap_or(trimmed);

    if !hex.is_ascii() || hex.len() < 6 {
        return Err(RedAlertError::Color(format!(
            "Invalid hex color: {s:?} (expected RRGGBB)"
        )));
    }

    let byte_at = |offset: usize| -> Result<u8> {
        let pair = &hex[offset..offset + 2];
        // from_str_radix would accept a leading '+'
        if !pair.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(RedAlertError::Color(format!("Invalid hex color: {s:?}")));
        }
        u8::from_str_radix(pair, 16)
            .map_err(|_| RedAlertError::Color(format!("Invalid hex color: {s:?}")))
    };

    let r = byte_at(0)?;
    let g = byte_at(2)?;
    let b = byte_at(4)?;
    let a = if hex.len() == 8 { byte_at(6)? } else { 255 };
    Ok(Color32::rgba(r, g, b, a))
}

/// Resolve a color name (`"red"`, `"blue"`, ...) to an opaque color.
pub fn named_color(name: &str) -> Option<Color32> {
    let color = match name.trim().to_lowercase().as_str() {
        "red" => ALARM_COLOR,
        "green" => Color32::rgb(0, 255, 0),
        "blue" => Color32::rgb(0, 0, 255),
        "white" => Color32::rgb(255, 255, 255),
        "yellow" => Color32::rgb(255, 255, 0),
        "orange" => Color32::rgb(255, 128, 0),
        "purple" => Color32::rgb(128, 0, 255),
        "cyan" => Color32::rgb(0, 255, 255),
        "black" | "off" => Color32::rgb(0, 0, 0),
        _ => return None,
    };
    Some(color)
}

/// Parse either a color name or a hex string.
pub fn parse_color_or_name(s: &str) -> Result<Color32> {
    match named_color(s) {
        Some(color) => Ok(color),
        None => parse_color(s),
    }
}
