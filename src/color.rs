//! Color parsing for template attributes.
//!
//! Accepts named colors, `#RRGGBB`, `#AARRGGBB`, bare hex and `rgb(r, g, b)`.
//! Parsing is lenient by policy: callers ask for a fallback and a malformed
//! template renders with that fallback instead of failing.

use serde::{Deserialize, Serialize};

/// RGB color with u8 components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);
    pub const LIGHT_GRAY: Self = Self::new(211, 211, 211);
    pub const CADET_BLUE: Self = Self::new(95, 158, 160);

    /// Create a new RGB color.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse from a hex string (with or without #), 6 or 8 digits.
    ///
    /// Eight digits are read as Excel's AARRGGBB; the alpha is dropped.
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim().strip_prefix('#').unwrap_or(s.trim());
        let hex = match hex.len() {
            6 => hex,
            8 => hex.get(2..)?,
            _ => return None,
        };
        let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
        let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
        let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
        Some(Self { r, g, b })
    }

    /// Convert to a CSS hex string (#RRGGBB).
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Convert to the opaque ARGB form used in SpreadsheetML (`FFRRGGBB`).
    pub fn to_argb(self) -> String {
        format!("FF{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Named colors understood in templates (lowercase, CSS names).
const NAMED_COLORS: &[(&str, Rgb)] = &[
    ("black", Rgb::new(0, 0, 0)),
    ("white", Rgb::new(255, 255, 255)),
    ("red", Rgb::new(255, 0, 0)),
    ("green", Rgb::new(0, 128, 0)),
    ("lime", Rgb::new(0, 255, 0)),
    ("blue", Rgb::new(0, 0, 255)),
    ("yellow", Rgb::new(255, 255, 0)),
    ("cyan", Rgb::new(0, 255, 255)),
    ("aqua", Rgb::new(0, 255, 255)),
    ("magenta", Rgb::new(255, 0, 255)),
    ("fuchsia", Rgb::new(255, 0, 255)),
    ("gray", Rgb::new(128, 128, 128)),
    ("grey", Rgb::new(128, 128, 128)),
    ("silver", Rgb::new(192, 192, 192)),
    ("lightgray", Rgb::new(211, 211, 211)),
    ("lightgrey", Rgb::new(211, 211, 211)),
    ("darkgray", Rgb::new(169, 169, 169)),
    ("darkgrey", Rgb::new(169, 169, 169)),
    ("maroon", Rgb::new(128, 0, 0)),
    ("olive", Rgb::new(128, 128, 0)),
    ("navy", Rgb::new(0, 0, 128)),
    ("purple", Rgb::new(128, 0, 128)),
    ("teal", Rgb::new(0, 128, 128)),
    ("orange", Rgb::new(255, 165, 0)),
    ("brown", Rgb::new(165, 42, 42)),
    ("pink", Rgb::new(255, 192, 203)),
    ("gold", Rgb::new(255, 215, 0)),
    ("beige", Rgb::new(245, 245, 220)),
    ("ivory", Rgb::new(255, 255, 240)),
    ("khaki", Rgb::new(240, 230, 140)),
    ("coral", Rgb::new(255, 127, 80)),
    ("salmon", Rgb::new(250, 128, 114)),
    ("tomato", Rgb::new(255, 99, 71)),
    ("crimson", Rgb::new(220, 20, 60)),
    ("indigo", Rgb::new(75, 0, 130)),
    ("violet", Rgb::new(238, 130, 238)),
    ("orchid", Rgb::new(218, 112, 214)),
    ("plum", Rgb::new(221, 160, 221)),
    ("tan", Rgb::new(210, 180, 140)),
    ("wheat", Rgb::new(245, 222, 179)),
    ("skyblue", Rgb::new(135, 206, 235)),
    ("lightblue", Rgb::new(173, 216, 230)),
    ("steelblue", Rgb::new(70, 130, 180)),
    ("royalblue", Rgb::new(65, 105, 225)),
    ("cadetblue", Rgb::new(95, 158, 160)),
    ("darkblue", Rgb::new(0, 0, 139)),
    ("darkgreen", Rgb::new(0, 100, 0)),
    ("lightgreen", Rgb::new(144, 238, 144)),
    ("seagreen", Rgb::new(46, 139, 87)),
    ("darkred", Rgb::new(139, 0, 0)),
    ("lightyellow", Rgb::new(255, 255, 224)),
    ("whitesmoke", Rgb::new(245, 245, 245)),
    ("gainsboro", Rgb::new(220, 220, 220)),
];

/// Parse a color string.
///
/// Supports:
/// - named colors ("red", "LightGray")
/// - "#RRGGBB" / "RRGGBB"
/// - "#AARRGGBB" (Excel format: alpha first)
/// - "rgb(r, g, b)"
pub fn parse_color(s: &str) -> Option<Rgb> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if s.starts_with("rgb(") {
        return parse_rgb_string(s);
    }

    let lower = s.to_ascii_lowercase();
    if let Some((_, rgb)) = NAMED_COLORS.iter().find(|(name, _)| *name == lower) {
        return Some(*rgb);
    }

    Rgb::from_hex(s)
}

/// Parse a color, substituting `fallback` when the value is not understood.
pub fn parse_color_or(s: &str, fallback: Rgb) -> Rgb {
    match parse_color(s) {
        Some(rgb) => rgb,
        None => {
            tracing::debug!(value = s, "unparsable color, using fallback");
            fallback
        }
    }
}

fn parse_rgb_string(s: &str) -> Option<Rgb> {
    let inner = s.strip_prefix("rgb(")?.strip_suffix(')')?;
    let mut parts = inner.split(',').map(str::trim);
    let r: u8 = parts.next()?.parse().ok()?;
    let g: u8 = parts.next()?.parse().ok()?;
    let b: u8 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Rgb { r, g, b })
}
