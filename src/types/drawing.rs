use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::{CellRange, Font, UnknownVariant};
use crate::color::Rgb;

/// Raster format of an embedded picture, detected from its bytes.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
}

impl ImageFormat {
    /// Sniff the format from magic bytes.
    pub fn detect(data: &[u8]) -> Option<Self> {
        match data {
            [0x89, b'P', b'N', b'G', ..] => Some(Self::Png),
            [0xFF, 0xD8, 0xFF, ..] => Some(Self::Jpeg),
            [b'G', b'I', b'F', b'8', ..] => Some(Self::Gif),
            [b'B', b'M', ..] => Some(Self::Bmp),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
        }
    }
}

/// Embedded picture anchored at a cell, sized in pixels.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Picture {
    pub name: String,
    pub format: ImageFormat,
    #[serde(skip)]
    pub data: Vec<u8>,
    pub row: u32,
    pub column: u32,
    pub width: u32,
    pub height: u32,
}

/// Preset geometry for shapes (DrawingML `prstGeom` names).
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ShapeKind {
    #[default]
    Line,
    Rect,
    RoundRect,
    Ellipse,
    Triangle,
    Diamond,
    RightArrow,
    LeftArrow,
    UpArrow,
    DownArrow,
    Star5,
}

impl ShapeKind {
    pub fn preset(self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Rect => "rect",
            Self::RoundRect => "roundRect",
            Self::Ellipse => "ellipse",
            Self::Triangle => "triangle",
            Self::Diamond => "diamond",
            Self::RightArrow => "rightArrow",
            Self::LeftArrow => "leftArrow",
            Self::UpArrow => "upArrow",
            Self::DownArrow => "downArrow",
            Self::Star5 => "star5",
        }
    }
}

impl FromStr for ShapeKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "line" => Ok(Self::Line),
            "rect" | "rectangle" => Ok(Self::Rect),
            "roundrect" | "roundedrectangle" => Ok(Self::RoundRect),
            "ellipse" | "oval" | "circle" => Ok(Self::Ellipse),
            "triangle" => Ok(Self::Triangle),
            "diamond" => Ok(Self::Diamond),
            "rightarrow" => Ok(Self::RightArrow),
            "leftarrow" => Ok(Self::LeftArrow),
            "uparrow" => Ok(Self::UpArrow),
            "downarrow" => Ok(Self::DownArrow),
            "star5" | "star" => Ok(Self::Star5),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// Vertical anchoring of a shape's text.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TextAnchor {
    Top,
    #[default]
    Center,
    Bottom,
}

impl TextAnchor {
    pub fn as_drawingml(self) -> &'static str {
        match self {
            Self::Top => "t",
            Self::Center => "ctr",
            Self::Bottom => "b",
        }
    }
}

impl FromStr for TextAnchor {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" | "t" => Ok(Self::Top),
            "center" | "middle" | "ctr" => Ok(Self::Center),
            "bottom" | "b" => Ok(Self::Bottom),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    pub name: String,
    pub kind: ShapeKind,
    pub fill_color: Rgb,
    pub border_color: Rgb,
    pub text: String,
    pub anchor: TextAnchor,
    pub font: Font,
    pub row: u32,
    pub column: u32,
    /// Pixel offsets inside the anchor cell.
    pub offset_x: u32,
    pub offset_y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ChartType {
    #[default]
    Line,
    LineMarkers,
    LineStacked,
    Scatter,
    ScatterLines,
    ScatterSmooth,
}

impl ChartType {
    pub fn is_scatter(self) -> bool {
        matches!(self, Self::Scatter | Self::ScatterLines | Self::ScatterSmooth)
    }
}

impl FromStr for ChartType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "line" => Ok(Self::Line),
            "linemarkers" | "line-markers" => Ok(Self::LineMarkers),
            "linestacked" | "line-stacked" => Ok(Self::LineStacked),
            "scatter" | "xyscatter" => Ok(Self::Scatter),
            "scatterlines" | "xyscatterlines" => Ok(Self::ScatterLines),
            "scattersmooth" | "xyscattersmooth" => Ok(Self::ScatterSmooth),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Marker {
    None,
    #[default]
    Square,
    Circle,
    Diamond,
    Triangle,
    X,
    Star,
    Dash,
    Dot,
    Plus,
    Auto,
}

impl Marker {
    pub fn as_drawingml(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Square => "square",
            Self::Circle => "circle",
            Self::Diamond => "diamond",
            Self::Triangle => "triangle",
            Self::X => "x",
            Self::Star => "star",
            Self::Dash => "dash",
            Self::Dot => "dot",
            Self::Plus => "plus",
            Self::Auto => "auto",
        }
    }
}

impl FromStr for Marker {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "square" => Ok(Self::Square),
            "circle" => Ok(Self::Circle),
            "diamond" => Ok(Self::Diamond),
            "triangle" => Ok(Self::Triangle),
            "x" => Ok(Self::X),
            "star" => Ok(Self::Star),
            "dash" => Ok(Self::Dash),
            "dot" => Ok(Self::Dot),
            "plus" => Ok(Self::Plus),
            "auto" => Ok(Self::Auto),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum LegendPosition {
    Top,
    Left,
    #[default]
    Right,
    Bottom,
    TopRight,
}

impl LegendPosition {
    pub fn as_drawingml(self) -> &'static str {
        match self {
            Self::Top => "t",
            Self::Left => "l",
            Self::Right => "r",
            Self::Bottom => "b",
            Self::TopRight => "tr",
        }
    }
}

impl FromStr for LegendPosition {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(Self::Top),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "bottom" => Ok(Self::Bottom),
            "topright" | "top-right" => Ok(Self::TopRight),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// Axis bounds from `x-limit="0,100"`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AxisLimit {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl AxisLimit {
    pub fn is_set(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }
}

impl FromStr for AxisLimit {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(',');
        let mut bound = || -> Result<Option<f64>, UnknownVariant> {
            match parts.next().map(str::trim) {
                None | Some("") => Ok(None),
                Some(p) => p
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .map(Some)
                    .ok_or_else(|| UnknownVariant(s.to_string())),
            }
        };
        let min = bound()?;
        let max = bound()?;
        Ok(Self { min, max })
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<String>,
    pub line_color: Rgb,
    pub marker_color: Rgb,
    pub marker: Marker,
    /// Category (line) or X values (scatter).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_range: Option<CellRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_range: Option<CellRange>,
}

impl Default for ChartSeries {
    fn default() -> Self {
        Self {
            legend: None,
            line_color: Rgb::CADET_BLUE,
            marker_color: Rgb::CADET_BLUE,
            marker: Marker::Square,
            x_range: None,
            y_range: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Chart {
    pub chart_type: ChartType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub row: u32,
    pub column: u32,
    pub width: u32,
    pub height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_format: Option<String>,
    pub x_limit: AxisLimit,
    pub y_limit: AxisLimit,
    /// `None` hides the legend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<LegendPosition>,
    pub rounded_corners: bool,
    pub series: Vec<ChartSeries>,
}

impl Default for Chart {
    fn default() -> Self {
        Self {
            chart_type: ChartType::Line,
            title: None,
            row: 0,
            column: 0,
            width: 800,
            height: 600,
            x_label: None,
            y_label: None,
            x_format: None,
            y_format: None,
            x_limit: AxisLimit::default(),
            y_limit: AxisLimit::default(),
            legend: Some(LegendPosition::Right),
            rounded_corners: false,
            series: Vec::new(),
        }
    }
}

/// Anything placed on the sheet's drawing layer.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum Drawing {
    Picture(Picture),
    Shape(Shape),
    Chart(Chart),
}
