//! The spreadsheet backend the layout engine writes into.
//!
//! The engine never touches a concrete worksheet type: it asks a [`Surface`]
//! for cells, merges and styles by 1-based coordinates. [`SheetGrid`] is the
//! in-memory implementation that the XLSX exporter serializes.

mod grid;

pub use grid::{ColumnInfo, SheetGrid};

use crate::cell_ref::{MAX_COLUMN, MAX_ROW};
use crate::color::Rgb;
use crate::error::{Result, StructuralError};
use crate::types::{
    BorderKind, BorderLine, Cell, CellRange, CellValue, Chart, Font, PageSetup, Picture,
    RichTextRun, Shape, Style,
};

/// Reject coordinates outside the addressable grid.
pub fn check_address(row: u32, col: u32) -> Result<()> {
    if row == 0 || col == 0 || row > MAX_ROW || col > MAX_COLUMN {
        return Err(StructuralError::OutOfGrid { row, column: col }.into());
    }
    Ok(())
}

/// Trait for grid backends.
///
/// All coordinates are 1-based. Implementations own cell storage, merged
/// regions, row/column metrics, the drawing layer and page setup.
pub trait Surface {
    /// Create an empty worksheet.
    fn create(name: &str) -> Self
    where
        Self: Sized;

    fn name(&self) -> &str;

    /// Read a cell without materializing it.
    fn cell(&self, row: u32, col: u32) -> Option<&Cell>;

    /// Get a cell for writing, creating it if needed.
    fn cell_at(&mut self, row: u32, col: u32) -> Result<&mut Cell>;

    /// The merged region covering (row, col), if any.
    fn merged_at(&self, row: u32, col: u32) -> Option<CellRange>;

    /// All merged regions in creation order.
    fn merges(&self) -> &[CellRange];

    /// Mark a region as merged.
    fn set_merged(&mut self, range: CellRange) -> Result<()>;

    /// Number of materialized rows.
    fn row_count(&self) -> u32;

    /// Materialize one more row; returns its index.
    fn append_row(&mut self) -> u32;

    fn set_row_height(&mut self, row: u32, height: f64);

    fn set_column_width(&mut self, col: u32, width: f64);

    /// Fit the column to its content, clamped to `[min, max]` when `max > 0`.
    fn autofit_column(&mut self, col: u32, min: f64, max: f64);

    /// Let the consumer pick the best width for the column.
    fn set_best_fit(&mut self, col: u32);

    fn add_picture(&mut self, picture: Picture);

    fn add_shape(&mut self, shape: Shape);

    fn add_chart(&mut self, chart: Chart);

    fn page_setup_mut(&mut self) -> &mut PageSetup;

    /// Cells of a range, validated. The layout engine uses the returned range
    /// as the address of whatever it writes next.
    fn range_at(&self, range: CellRange) -> Result<CellRange> {
        check_address(range.start_row, range.start_col)?;
        check_address(range.end_row, range.end_col)?;
        Ok(range)
    }

    /// Whether (row, col) belongs to a merge that `range` only partly covers.
    fn in_foreign_merge(&self, range: CellRange, row: u32, col: u32) -> bool {
        self.merged_at(row, col).is_some_and(|m| !range.encloses(&m))
    }

    /// Apply a style to every cell of a range, borders included.
    ///
    /// Cells of a merge the range only partly covers belong to that merge
    /// and keep their style.
    fn set_style(&mut self, range: CellRange, style: &Style) -> Result<()> {
        let range = self.range_at(range)?;
        for row in range.start_row..=range.end_row {
            for col in range.start_col..=range.end_col {
                if self.in_foreign_merge(range, row, col) {
                    continue;
                }
                self.cell_at(row, col)?.format_mut().apply_style(style);
            }
        }
        self.set_border(range, style)
    }

    /// Draw the style's border along the outline of a range.
    ///
    /// `Box` draws the perimeter, `Top` only the first row, and so on. Cell
    /// fonts and fills are left alone.
    fn set_border(&mut self, range: CellRange, style: &Style) -> Result<()> {
        if !style.has_border() {
            return Ok(());
        }
        let range = self.range_at(range)?;
        let line = BorderLine {
            style: style.border_style,
            color: style.border_color,
        };
        for row in range.start_row..=range.end_row {
            for col in range.start_col..=range.end_col {
                let (top, bottom, left, right) = (
                    row == range.start_row,
                    row == range.end_row,
                    col == range.start_col,
                    col == range.end_col,
                );
                if !(top || bottom || left || right) || self.in_foreign_merge(range, row, col) {
                    continue;
                }
                let borders = &mut self.cell_at(row, col)?.format_mut().borders;
                match style.border {
                    BorderKind::None => {}
                    BorderKind::Top if top => borders.top = Some(line),
                    BorderKind::Bottom if bottom => borders.bottom = Some(line),
                    BorderKind::Left if left => borders.left = Some(line),
                    BorderKind::Right if right => borders.right = Some(line),
                    BorderKind::Box => {
                        if top {
                            borders.top = Some(line);
                        }
                        if bottom {
                            borders.bottom = Some(line);
                        }
                        if left {
                            borders.left = Some(line);
                        }
                        if right {
                            borders.right = Some(line);
                        }
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    /// Solid background over a range.
    fn set_fill(&mut self, range: CellRange, color: Rgb) -> Result<()> {
        let range = self.range_at(range)?;
        for row in range.start_row..=range.end_row {
            for col in range.start_col..=range.end_col {
                self.cell_at(row, col)?.format_mut().fill = Some(color);
            }
        }
        Ok(())
    }

    /// Append a rich-text run to a cell.
    fn write_text(&mut self, row: u32, col: u32, text: &str, font: Option<&Font>) -> Result<()> {
        self.cell_at(row, col)?.push_run(RichTextRun {
            text: text.to_string(),
            font: font.cloned(),
        });
        Ok(())
    }

    /// Replace a cell's value.
    fn write_value(&mut self, row: u32, col: u32, value: CellValue) -> Result<()> {
        self.cell_at(row, col)?.value = value;
        Ok(())
    }

    /// Newline at the end of a cell's text.
    fn append_newline(&mut self, row: u32, col: u32) -> Result<()> {
        self.cell_at(row, col)?.append_to_last_run("\n");
        Ok(())
    }

    fn set_shrink_to_fit(&mut self, range: CellRange) -> Result<()> {
        let range = self.range_at(range)?;
        for row in range.start_row..=range.end_row {
            for col in range.start_col..=range.end_col {
                self.cell_at(row, col)?.format_mut().shrink_to_fit = true;
            }
        }
        Ok(())
    }
}
