use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::{MergeSpan, PageStyle};
use crate::color::Rgb;

/// Default font when neither the template nor the options name one.
pub const DEFAULT_FONT_NAME: &str = "Calibri";
pub const DEFAULT_FONT_SIZE: f64 = 11.0;

/// Error returned by the template enum parsers.
///
/// Never escapes the crate: attribute parsing turns it into a fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant(pub String);

/// Font state carried by a [`Style`].
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Font {
    pub name: String,
    pub size: f64,
    pub color: Rgb,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub vert_align: FontVertAlign,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            name: DEFAULT_FONT_NAME.to_string(),
            size: DEFAULT_FONT_SIZE,
            color: Rgb::BLACK,
            bold: false,
            italic: false,
            underline: false,
            vert_align: FontVertAlign::Baseline,
        }
    }
}

/// Font style keyword from templates. `Inherited` leaves the font alone.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Inherited,
    Normal,
    Bold,
    Italic,
    BoldItalic,
    Underline,
}

impl FontStyle {
    /// Apply the keyword to a font. Flags only accumulate, except `Normal`.
    pub fn apply(self, font: &mut Font) {
        match self {
            Self::Inherited => {}
            Self::Normal => {
                font.bold = false;
                font.italic = false;
                font.underline = false;
            }
            Self::Bold => font.bold = true,
            Self::Italic => font.italic = true,
            Self::BoldItalic => {
                font.bold = true;
                font.italic = true;
            }
            Self::Underline => font.underline = true,
        }
    }
}

impl FromStr for FontStyle {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inherited" => Ok(Self::Inherited),
            "normal" | "regular" => Ok(Self::Normal),
            "bold" => Ok(Self::Bold),
            "italic" => Ok(Self::Italic),
            "bolditalic" | "bold-italic" => Ok(Self::BoldItalic),
            "underline" => Ok(Self::Underline),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// Subscript/superscript for text runs.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FontVertAlign {
    #[default]
    Baseline,
    Subscript,
    Superscript,
}

impl FromStr for FontVertAlign {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "baseline" => Ok(Self::Baseline),
            "sub" | "subscript" => Ok(Self::Subscript),
            "super" | "superscript" => Ok(Self::Superscript),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum HAlign {
    #[default]
    General,
    Left,
    Center,
    Right,
    Fill,
    Justify,
}

impl HAlign {
    /// SpreadsheetML attribute value; `None` for the implicit default.
    pub fn as_xlsx(self) -> Option<&'static str> {
        match self {
            Self::General => None,
            Self::Left => Some("left"),
            Self::Center => Some("center"),
            Self::Right => Some("right"),
            Self::Fill => Some("fill"),
            Self::Justify => Some("justify"),
        }
    }
}

impl FromStr for HAlign {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "general" => Ok(Self::General),
            "left" => Ok(Self::Left),
            "center" | "centre" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            "fill" => Ok(Self::Fill),
            "justify" | "justified" => Ok(Self::Justify),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum VAlign {
    Top,
    Center,
    #[default]
    Bottom,
    Justify,
}

impl VAlign {
    /// SpreadsheetML attribute value; `None` for the implicit default.
    pub fn as_xlsx(self) -> Option<&'static str> {
        match self {
            Self::Top => Some("top"),
            Self::Center => Some("center"),
            Self::Bottom => None,
            Self::Justify => Some("justify"),
        }
    }
}

impl FromStr for VAlign {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(Self::Top),
            // Templates written for HTML use "middle"; baseline has no grid meaning.
            "middle" | "center" | "baseline" => Ok(Self::Center),
            "bottom" => Ok(Self::Bottom),
            "justify" | "justified" => Ok(Self::Justify),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// Which edges of a region get a border.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BorderKind {
    #[default]
    None,
    Top,
    Bottom,
    Left,
    Right,
    Box,
}

impl FromStr for BorderKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "box" | "all" => Ok(Self::Box),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// Border line style.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum BorderStyle {
    None,
    #[default]
    Thin,
    Medium,
    Thick,
    Dashed,
    Dotted,
    Double,
    Hair,
}

impl BorderStyle {
    pub fn as_xlsx(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Thin => "thin",
            Self::Medium => "medium",
            Self::Thick => "thick",
            Self::Dashed => "dashed",
            Self::Dotted => "dotted",
            Self::Double => "double",
            Self::Hair => "hair",
        }
    }
}

impl FromStr for BorderStyle {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "thin" => Ok(Self::Thin),
            "medium" => Ok(Self::Medium),
            "thick" => Ok(Self::Thick),
            "dashed" => Ok(Self::Dashed),
            "dotted" => Ok(Self::Dotted),
            "double" => Ok(Self::Double),
            "hair" => Ok(Self::Hair),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TextWrap {
    #[default]
    NoWrap,
    Wrap,
}

impl FromStr for TextWrap {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nowrap" | "none" | "false" => Ok(Self::NoWrap),
            "wrap" | "true" => Ok(Self::Wrap),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// Column width request: fixed, autofit to content, or shrink text to fit.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum Dimension {
    Auto,
    Fit,
    Points(f64),
}

impl FromStr for Dimension {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "fit" => Ok(Self::Fit),
            _ => s
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v >= 0.0)
                .map(Self::Points)
                .ok_or_else(|| UnknownVariant(s.to_string())),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Size {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

/// Style value copied down the container tree.
///
/// Containers clone their parent's style on construction and mutate only the
/// clone, so nothing a child does can reach back into a parent.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    pub font: Font,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<Rgb>,
    pub border: BorderKind,
    pub border_style: BorderStyle,
    pub border_color: Rgb,
    pub h_align: HAlign,
    pub v_align: VAlign,
    pub text_wrap: TextWrap,
    pub merged_row: MergeSpan,
    pub merged_col: MergeSpan,
    pub size: Size,
    /// Column budget of the enclosing table, if it declared one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_columns: Option<u32>,
}

impl Style {
    /// Baseline for a page: boxed light-gray thin borders, page font and alignment.
    pub fn from_page(page: &PageStyle) -> Self {
        Self {
            font: page.font.clone(),
            bg_color: None,
            border: BorderKind::Box,
            border_style: BorderStyle::Thin,
            border_color: Rgb::LIGHT_GRAY,
            h_align: page.h_align,
            v_align: page.v_align,
            text_wrap: TextWrap::NoWrap,
            merged_row: MergeSpan::default(),
            merged_col: MergeSpan::default(),
            size: Size::default(),
            total_columns: None,
        }
    }

    /// Copy taken by a child container.
    #[must_use]
    pub fn derive_child(&self) -> Self {
        self.clone()
    }

    pub fn set_merged_row(&mut self, start: u32, count: u32) {
        self.merged_row = MergeSpan::new(start, count);
    }

    pub fn set_merged_col(&mut self, start: u32, count: u32) {
        self.merged_col = MergeSpan::new(start, count);
    }

    pub fn is_merged(&self) -> bool {
        self.merged_row | self.merged_col
    }

    pub fn has_border(&self) -> bool {
        self.border != BorderKind::None && self.border_style != BorderStyle::None
    }

    pub fn wraps(&self) -> bool {
        self.text_wrap == TextWrap::Wrap
    }
}
