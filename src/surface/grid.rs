use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{check_address, Surface};
use crate::error::Result;
use crate::types::{Cell, CellRange, Chart, Drawing, PageSetup, Picture, Shape};

/// Excel's default column width in characters.
pub const DEFAULT_COLUMN_WIDTH: f64 = 8.43;

/// Per-column sizing requests.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ColumnInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    pub best_fit: bool,
    /// `(min, max)` bounds for an autofit; `max <= 0` means unbounded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autofit: Option<(f64, f64)>,
}

/// Sparse in-memory worksheet.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct SheetGrid {
    name: String,
    /// Keyed by (row, col), so iteration is row-major.
    #[serde(with = "cell_map")]
    cells: BTreeMap<(u32, u32), Cell>,
    merges: Vec<CellRange>,
    appended_rows: u32,
    row_heights: BTreeMap<u32, f64>,
    columns: BTreeMap<u32, ColumnInfo>,
    drawings: Vec<Drawing>,
    page: PageSetup,
}

impl SheetGrid {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = ((u32, u32), &Cell)> {
        self.cells.iter().map(|(k, v)| (*k, v))
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Text of a cell, empty when absent.
    pub fn text(&self, row: u32, col: u32) -> String {
        self.cells
            .get(&(row, col))
            .map(|c| c.value.text())
            .unwrap_or_default()
    }

    pub fn row_height(&self, row: u32) -> Option<f64> {
        self.row_heights.get(&row).copied()
    }

    pub fn row_heights(&self) -> &BTreeMap<u32, f64> {
        &self.row_heights
    }

    pub fn columns(&self) -> &BTreeMap<u32, ColumnInfo> {
        &self.columns
    }

    pub fn drawings(&self) -> &[Drawing] {
        &self.drawings
    }

    pub fn page_setup(&self) -> &PageSetup {
        &self.page
    }

    /// Highest used column, 0 for an empty sheet.
    pub fn max_column(&self) -> u32 {
        let from_cells = self.cells.keys().map(|(_, c)| *c).max().unwrap_or(0);
        let from_merges = self.merges.iter().map(|m| m.end_col).max().unwrap_or(0);
        from_cells.max(from_merges)
    }

    /// The used range, if anything was written.
    pub fn dimension(&self) -> Option<CellRange> {
        let rows = self.row_count();
        let cols = self.max_column();
        (rows > 0 && cols > 0).then(|| CellRange::new(1, 1, rows, cols))
    }

    /// Resolve the final width of a column, estimating autofit from content.
    pub fn column_width(&self, col: u32) -> Option<f64> {
        let info = self.columns.get(&col);
        let autofit = info
            .and_then(|i| i.autofit)
            .or_else(|| self.page.autofit_columns.then_some((0.0, 0.0)));
        if let Some((min, max)) = autofit {
            let mut width = self.estimate_width(col).max(min);
            if max > 0.0 {
                width = width.min(max);
            }
            return Some(width);
        }
        info.and_then(|i| i.width).or(self.page.default_col_width)
    }

    /// Rough content width in characters, scaled by font size.
    fn estimate_width(&self, col: u32) -> f64 {
        self.cells
            .iter()
            .filter(|((_, c), _)| *c == col)
            .filter(|((r, c), _)| {
                self.merged_at(*r, *c)
                    .map_or(true, |m| m.is_single())
            })
            .map(|(_, cell)| {
                let size = cell
                    .format
                    .as_ref()
                    .map_or(crate::types::DEFAULT_FONT_SIZE, |f| f.font.size);
                let longest = cell
                    .value
                    .text()
                    .lines()
                    .map(|l| l.chars().count())
                    .max()
                    .unwrap_or(0);
                #[allow(clippy::cast_precision_loss)]
                let chars = longest as f64;
                chars * size / crate::types::DEFAULT_FONT_SIZE + 1.5
            })
            .fold(DEFAULT_COLUMN_WIDTH, f64::max)
    }
}

impl Surface for SheetGrid {
    fn create(name: &str) -> Self {
        Self::new(name)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn cell(&self, row: u32, col: u32) -> Option<&Cell> {
        self.cells.get(&(row, col))
    }

    fn cell_at(&mut self, row: u32, col: u32) -> Result<&mut Cell> {
        check_address(row, col)?;
        Ok(self.cells.entry((row, col)).or_default())
    }

    fn merged_at(&self, row: u32, col: u32) -> Option<CellRange> {
        self.merges.iter().find(|m| m.contains(row, col)).copied()
    }

    fn merges(&self) -> &[CellRange] {
        &self.merges
    }

    fn set_merged(&mut self, range: CellRange) -> Result<()> {
        let range = self.range_at(range)?;
        if range.is_single() {
            return Ok(());
        }
        if let Some(existing) = self.merges.iter().find(|m| m.intersects(&range)) {
            if *existing != range {
                tracing::warn!(
                    "merge {} overlaps {}, keeping the earlier one",
                    range.a1(),
                    existing.a1()
                );
            }
            return Ok(());
        }
        self.merges.push(range);
        Ok(())
    }

    fn row_count(&self) -> u32 {
        let from_cells = self.cells.keys().map(|(r, _)| *r).max().unwrap_or(0);
        let from_merges = self.merges.iter().map(|m| m.end_row).max().unwrap_or(0);
        self.appended_rows.max(from_cells).max(from_merges)
    }

    fn append_row(&mut self) -> u32 {
        self.appended_rows = self.appended_rows.saturating_add(1);
        self.appended_rows
    }

    fn set_row_height(&mut self, row: u32, height: f64) {
        if height.is_finite() && height >= 0.0 {
            self.row_heights.insert(row, height);
        }
    }

    fn set_column_width(&mut self, col: u32, width: f64) {
        if width.is_finite() && width >= 0.0 {
            self.columns.entry(col).or_default().width = Some(width);
        }
    }

    fn autofit_column(&mut self, col: u32, min: f64, max: f64) {
        self.columns.entry(col).or_default().autofit = Some((min.max(0.0), max));
    }

    fn set_best_fit(&mut self, col: u32) {
        self.columns.entry(col).or_default().best_fit = true;
    }

    fn add_picture(&mut self, picture: Picture) {
        self.drawings.push(Drawing::Picture(picture));
    }

    fn add_shape(&mut self, shape: Shape) {
        self.drawings.push(Drawing::Shape(shape));
    }

    fn add_chart(&mut self, chart: Chart) {
        self.drawings.push(Drawing::Chart(chart));
    }

    fn page_setup_mut(&mut self) -> &mut PageSetup {
        &mut self.page
    }
}

/// JSON objects need string keys; cells serialize as a list of `{row, col, cell}`.
mod cell_map {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::types::Cell;

    #[derive(Serialize, Deserialize)]
    struct Entry {
        row: u32,
        col: u32,
        cell: Cell,
    }

    pub fn serialize<S: Serializer>(
        cells: &BTreeMap<(u32, u32), Cell>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let entries: Vec<Entry> = cells
            .iter()
            .map(|((row, col), cell)| Entry {
                row: *row,
                col: *col,
                cell: cell.clone(),
            })
            .collect();
        entries.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<(u32, u32), Cell>, D::Error> {
        let entries = Vec::<Entry>::deserialize(deserializer)?;
        Ok(entries
            .into_iter()
            .map(|e| ((e.row, e.col), e.cell))
            .collect())
    }
}
