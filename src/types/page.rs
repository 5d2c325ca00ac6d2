use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::{Font, HAlign, UnknownVariant, VAlign};

/// Inches per template margin unit (template margins are in centimeters).
pub const MARGIN_SCALE: f64 = 0.39;

/// Page-level style baseline collected from `document` and `page` attributes.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageStyle {
    pub font: Font,
    pub h_align: HAlign,
    pub v_align: VAlign,
    pub margin: Thickness,
}

/// Four edge values. Parses `a`, `h,v` or `l,t,r,b`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Thickness {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Thickness {
    pub fn is_zero(&self) -> bool {
        self.left == 0.0 && self.top == 0.0 && self.right == 0.0 && self.bottom == 0.0
    }
}

impl FromStr for Thickness {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values: Vec<f64> = s
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<Result<_, _>>()
            .map_err(|_| UnknownVariant(s.to_string()))?;
        if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(UnknownVariant(s.to_string()));
        }
        match values.as_slice() {
            [all] => Ok(Self {
                left: *all,
                top: *all,
                right: *all,
                bottom: *all,
            }),
            [h, v] => Ok(Self {
                left: *h,
                top: *v,
                right: *h,
                bottom: *v,
            }),
            [left, top, right, bottom] => Ok(Self {
                left: *left,
                top: *top,
                right: *right,
                bottom: *bottom,
            }),
            _ => Err(UnknownVariant(s.to_string())),
        }
    }
}

/// Rectangle given as `left,top,right,bottom` in 1-based column/row numbers.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PagePoint {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl PagePoint {
    /// A usable area: every edge positive and the rectangle not inverted.
    pub fn is_valid(&self) -> bool {
        self.left > 0
            && self.top > 0
            && self.right >= self.left
            && self.bottom >= self.top
    }
}

impl FromStr for PagePoint {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values: Vec<u32> = s
            .split(',')
            .map(|p| p.trim().parse::<u32>())
            .collect::<Result<_, _>>()
            .map_err(|_| UnknownVariant(s.to_string()))?;
        match values.as_slice() {
            [all] => Ok(Self {
                left: *all,
                top: *all,
                right: *all,
                bottom: *all,
            }),
            [h, v] => Ok(Self {
                left: *h,
                top: *v,
                right: *h,
                bottom: *v,
            }),
            [left, top, right, bottom] => Ok(Self {
                left: *left,
                top: *top,
                right: *right,
                bottom: *bottom,
            }),
            _ => Err(UnknownVariant(s.to_string())),
        }
    }
}

/// A `row` or `row-col` pair; 0 means "not set" on that axis.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageLimit {
    pub row: u32,
    pub col: u32,
}

impl PageLimit {
    /// Parse with an explicit separator. Unparsable parts read as 0.
    pub fn parse_with(value: &str, separator: char) -> Self {
        let mut parts = value.split(separator);
        let first = parts.next();
        let second = parts.next();
        if parts.next().is_some() {
            return Self::default();
        }
        let num = |p: Option<&str>| p.and_then(|p| p.trim().parse::<u32>().ok()).unwrap_or(0);
        Self {
            row: num(first),
            col: num(second),
        }
    }
}

/// Page breaks from `page-breaks="12,30-4,0-7"`: rows, or `row-col` pairs.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageBreaks {
    pub breaks: Vec<PageLimit>,
}

impl PageBreaks {
    pub fn parse(value: &str) -> Self {
        Self {
            breaks: value
                .split(',')
                .filter(|p| !p.trim().is_empty())
                .map(|p| PageLimit::parse_with(p, '-'))
                .collect(),
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = u32> + '_ {
        self.breaks.iter().map(|b| b.row).filter(|r| *r > 0)
    }

    pub fn cols(&self) -> impl Iterator<Item = u32> + '_ {
        self.breaks.iter().map(|b| b.col).filter(|c| *c > 0)
    }
}

/// Header or footer text, split into the three print sections.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HeaderFooter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<String>,
}

impl HeaderFooter {
    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.center.is_none() && self.right.is_none()
    }

    /// Set the section that corresponds to an alignment (general → center).
    pub fn set(&mut self, align: HAlign, text: String) {
        match align {
            HAlign::Left => self.left = Some(text),
            HAlign::Right => self.right = Some(text),
            _ => self.center = Some(text),
        }
    }
}

/// Print and view settings for one sheet.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageSetup {
    /// Margins in inches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margins: Option<Thickness>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_margin: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer_margin: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub print_area: Option<PagePoint>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub row_breaks: Vec<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub col_breaks: Vec<u32>,
    pub page_break_view: bool,
    pub protected: bool,
    pub fit_to_page: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fit_to_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fit_to_height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_row_height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_col_width: Option<f64>,
    /// `col-width="auto"` on the page: every column is autofit.
    pub autofit_columns: bool,
    pub header: HeaderFooter,
    pub footer: HeaderFooter,
}
