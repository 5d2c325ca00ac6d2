use serde::{Deserialize, Serialize};

use super::{BorderStyle, Font, HAlign, Style, VAlign};
use crate::cell_ref::range_name;
use crate::color::Rgb;

/// A rectangular block of cells, 1-based and inclusive.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct CellRange {
    pub start_row: u32,
    pub start_col: u32,
    pub end_row: u32,
    pub end_col: u32,
}

impl CellRange {
    pub fn new(start_row: u32, start_col: u32, end_row: u32, end_col: u32) -> Self {
        Self {
            start_row: start_row.min(end_row),
            start_col: start_col.min(end_col),
            end_row: end_row.max(start_row),
            end_col: end_col.max(start_col),
        }
    }

    pub fn cell(row: u32, col: u32) -> Self {
        Self::new(row, col, row, col)
    }

    pub fn contains(&self, row: u32, col: u32) -> bool {
        row >= self.start_row && row <= self.end_row && col >= self.start_col && col <= self.end_col
    }

    /// Whether `other` lies entirely inside this range.
    pub fn encloses(&self, other: &Self) -> bool {
        self.contains(other.start_row, other.start_col) && self.contains(other.end_row, other.end_col)
    }

    pub fn intersects(&self, other: &Self) -> bool {
        self.start_row <= other.end_row
            && other.start_row <= self.end_row
            && self.start_col <= other.end_col
            && other.start_col <= self.end_col
    }

    pub fn rows(&self) -> u32 {
        self.end_row - self.start_row + 1
    }

    pub fn cols(&self) -> u32 {
        self.end_col - self.start_col + 1
    }

    pub fn is_single(&self) -> bool {
        self.start_row == self.end_row && self.start_col == self.end_col
    }

    /// A1-style reference (`B2:D4`, or `B2` for a single cell).
    pub fn a1(&self) -> String {
        range_name(self.start_row, self.start_col, self.end_row, self.end_col)
    }
}

/// One formatted run inside a rich-text cell.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RichTextRun {
    pub text: String,
    /// Run-level font; `None` inherits the cell font.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<Font>,
}

impl RichTextRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font: None,
        }
    }
}

/// Stored content of a cell.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", tag = "type", content = "value")]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    RichText(Vec<RichTextRun>),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.is_empty(),
            Self::RichText(runs) => runs.is_empty(),
            Self::Number(_) | Self::Bool(_) => false,
        }
    }

    /// Plain text of the value, runs concatenated.
    pub fn text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(s) => s.clone(),
            Self::Number(n) => format_number(*n),
            Self::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            Self::RichText(runs) => runs.iter().map(|r| r.text.as_str()).collect(),
        }
    }
}

/// Shortest decimal form, without a trailing `.0` for integral values.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}

/// One drawn cell edge.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct BorderLine {
    pub style: BorderStyle,
    pub color: Rgb,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct CellBorders {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<BorderLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<BorderLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<BorderLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<BorderLine>,
}

impl CellBorders {
    pub fn is_empty(&self) -> bool {
        self.top.is_none() && self.bottom.is_none() && self.left.is_none() && self.right.is_none()
    }
}

/// Formatting stored on a surface cell, flattened out of a [`Style`].
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CellFormat {
    pub font: Font,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<Rgb>,
    pub h_align: HAlign,
    pub v_align: VAlign,
    pub wrap: bool,
    pub shrink_to_fit: bool,
    pub borders: CellBorders,
}

impl CellFormat {
    /// Everything but the borders, which depend on the cell's place in a range.
    pub fn apply_style(&mut self, style: &Style) {
        self.font = style.font.clone();
        if style.bg_color.is_some() {
            self.fill = style.bg_color;
        }
        self.h_align = style.h_align;
        self.v_align = style.v_align;
        self.wrap |= style.wraps();
    }
}

/// A cell on the surface: value plus its formatting.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub value: CellValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<CellFormat>,
}

impl Cell {
    /// Append a run, converting an existing plain value into its first run.
    pub fn push_run(&mut self, run: RichTextRun) {
        match &mut self.value {
            CellValue::RichText(runs) => runs.push(run),
            CellValue::Empty => self.value = CellValue::RichText(vec![run]),
            other => {
                let first = RichTextRun::plain(other.text());
                self.value = CellValue::RichText(vec![first, run]);
            }
        }
    }

    /// Extend the last run's text, or start a plain run.
    pub fn append_to_last_run(&mut self, text: &str) {
        if let CellValue::RichText(runs) = &mut self.value {
            if let Some(last) = runs.last_mut() {
                last.text.push_str(text);
                return;
            }
        }
        self.push_run(RichTextRun::plain(text));
    }

    pub fn format_mut(&mut self) -> &mut CellFormat {
        self.format.get_or_insert_with(CellFormat::default)
    }

    pub fn is_rich_text(&self) -> bool {
        matches!(self.value, CellValue::RichText(_))
    }

    pub fn run_count(&self) -> usize {
        match &self.value {
            CellValue::RichText(runs) => runs.len(),
            _ => 0,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_range_geometry() {
        let r = CellRange::new(4, 5, 2, 3);
        assert_eq!((r.start_row, r.start_col, r.end_row, r.end_col), (2, 3, 4, 5));
        assert_eq!(r.rows(), 3);
        assert_eq!(r.cols(), 3);
        assert!(r.contains(3, 4));
        assert!(!r.contains(5, 4));
        assert!(r.intersects(&CellRange::cell(4, 5)));
        assert!(!r.intersects(&CellRange::cell(1, 1)));
        assert!(r.encloses(&CellRange::new(2, 3, 3, 4)));
        assert!(!r.encloses(&CellRange::new(4, 5, 5, 5)));
        assert_eq!(r.a1(), "C2:E4");
        assert_eq!(CellRange::cell(1, 1).a1(), "A1");
    }

    #[test]
    fn test_push_run_converts_plain_value() {
        let mut cell = Cell {
            value: CellValue::Number(42.0),
            ..Cell::default()
        };
        cell.push_run(RichTextRun::plain(" units"));
        assert_eq!(cell.value.text(), "42 units");
        assert_eq!(cell.run_count(), 2);

        cell.append_to_last_run("\n");
        assert_eq!(cell.value.text(), "42 units\n");
        assert_eq!(cell.run_count(), 2);
    }

    #[test]
    fn test_append_to_empty_cell_starts_run() {
        let mut cell = Cell::default();
        assert!(cell.value.is_empty());
        cell.append_to_last_run("x");
        assert!(cell.is_rich_text());
        assert_eq!(cell.value.text(), "x");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(-2.5), "-2.5");
    }
}
