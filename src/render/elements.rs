use crate::error::Result;
use crate::layout::{ContainerId, ContainerKind};
use crate::model::ModelValue;
use crate::surface::Surface;
use crate::template::Node;
use crate::types::{
    format_number, CellRange, CellValue, Dimension, FontStyle, HAlign, Style, TextWrap,
};
use crate::xml_helpers::{attr_f64, attr_parse, attr_span, attr_u32};

use super::{styles, Renderer};

/// Strip leading/trailing whitespace only where it spans a line break, so
/// `Total: <b>5</b>` keeps its space but pretty-printed markup loses its
/// indentation.
fn trim_indentation(text: &str) -> &str {
    let lead = text.len() - text.trim_start().len();
    let text = match text.get(..lead) {
        Some(ws) if ws.contains('\n') => text.trim_start(),
        _ => text,
    };
    let body = text.trim_end().len();
    match text.get(body..) {
        Some(ws) if ws.contains('\n') => text.trim_end(),
        _ => text,
    }
}

/// A terminal value on its way into a cell.
enum Scalar {
    Number(f64),
    Text(String),
}

impl<S: Surface> Renderer<'_, S> {
    // ---- pages ------------------------------------------------------------

    pub(super) fn page(&mut self, node: &Node) -> Result<ContainerId> {
        let workbook = self.layout.workbook();
        let name = node.attr("name").map_or_else(
            || format!("{}{}", self.options.sheet_prefix, workbook.sheet_count() + 1),
            str::to_string,
        );
        let mut style = workbook.baseline().clone();
        let setup = styles::apply_page(node, workbook.page_style(), &mut style);
        let sheet = self.layout.open_sheet(&name, style);
        *self.layout.surface_mut(sheet)?.page_setup_mut() = setup;
        Ok(sheet)
    }

    pub(super) fn header_footer(&mut self, parent: ContainerId, node: &Node) -> Result<()> {
        let align = attr_parse::<HAlign>(node, "halign").unwrap_or(HAlign::Center);
        let text = node.inner_text().trim().to_string();
        let setup = self.layout.surface_mut(parent)?.page_setup_mut();
        if node.name == "header" {
            setup.header.set(align, text);
        } else {
            setup.footer.set(align, text);
        }
        Ok(())
    }

    pub(super) fn columns(&mut self, parent: ContainerId, node: &Node) -> Result<()> {
        for column in node.elements().filter(|n| n.name == "column") {
            self.column_width(parent, column)?;
        }
        Ok(())
    }

    /// `column index="N"`: explicit width, best fit, or autofit within
    /// `min-width`/`max-width`.
    pub(super) fn column_width(&mut self, parent: ContainerId, node: &Node) -> Result<()> {
        let Some(index) = attr_u32(node, "index").filter(|i| *i > 0) else {
            tracing::debug!("column without a usable index");
            return Ok(());
        };
        let min = attr_f64(node, "min-width").unwrap_or(0.0);
        let max = attr_f64(node, "max-width").unwrap_or(0.0);
        let surface = self.layout.surface_mut(parent)?;
        match attr_parse::<Dimension>(node, "width") {
            Some(Dimension::Points(width)) => surface.set_column_width(index, width),
            Some(Dimension::Fit) => surface.set_best_fit(index),
            Some(Dimension::Auto) | None => surface.autofit_column(index, min, max),
        }
        Ok(())
    }

    // ---- tables -----------------------------------------------------------

    /// `table`: a positioned element; `row="R"` pins it with a row jump.
    pub(super) fn table(&mut self, parent: ContainerId, node: &Node) -> Result<ContainerId> {
        let mut style = self.layout.style(parent)?.derive_child();
        styles::apply_common(node, &mut style);
        styles::apply_height(node, "row-height", &mut style);
        if let Some(cols) = attr_u32(node, "cols").filter(|c| *c > 0) {
            style.total_columns = Some(cols);
        }
        let column = attr_u32(node, "column").filter(|c| *c > 0);
        let (container, row) = match attr_u32(node, "row").filter(|r| *r > 0) {
            Some(row) => (self.layout.jump(parent, row, style.clone())?, Some(row)),
            None => (parent, None),
        };
        self.layout.element(container, style, row, column)
    }

    pub(super) fn table_row(&mut self, parent: ContainerId, node: &Node) -> Result<ContainerId> {
        let mut style = self.layout.style(parent)?.derive_child();
        styles::apply_common(node, &mut style);
        styles::apply_height(node, "height", &mut style);
        self.layout.new_row(parent, Some(style), 1)
    }

    /// `td`/`th`: claim a (possibly merged) block. Plain text is written as
    /// the cell value; element content gets a cell scope.
    pub(super) fn table_cell(
        &mut self,
        parent: ContainerId,
        node: &Node,
    ) -> Result<Option<ContainerId>> {
        let mut style = self.layout.style(parent)?.derive_child();
        styles::apply_common(node, &mut style);
        styles::apply_width(node, &mut style);
        let colspan = attr_span(node, "colspan");
        let rowspan = attr_span(node, "rowspan");

        let range = self.layout.get_merged_range(parent, rowspan, colspan)?;
        let surface = self.layout.surface_mut(parent)?;
        match style.size.width {
            Some(Dimension::Auto) => {
                for col in range.start_col..=range.end_col {
                    surface.autofit_column(col, 0.0, 0.0);
                }
            }
            Some(Dimension::Fit) => surface.set_shrink_to_fit(range)?,
            Some(Dimension::Points(width)) => surface.set_column_width(range.start_col, width),
            None => {}
        }
        surface.set_style(range, &style)?;

        if node.has_elements() {
            return self.layout.cell(parent, range, style, false).map(Some);
        }
        let text = node.inner_text();
        let text = text.trim();
        if !text.is_empty() {
            self.layout.surface_mut(parent)?.write_value(
                range.start_row,
                range.start_col,
                CellValue::Text(text.to_string()),
            )?;
        }
        Ok(None)
    }

    // ---- text -------------------------------------------------------------

    pub(super) fn heading(
        &mut self,
        parent: ContainerId,
        node: &Node,
        bump: f64,
    ) -> Result<Option<ContainerId>> {
        let mut style = self.layout.style(parent)?.derive_child();
        style.font.size += bump;
        style.font.bold = true;
        self.open_text(parent, node, style)
    }

    /// `text`, `b`, `i`, `u`: a text scope at the next cell (or inside the
    /// enclosing cell) whose font applies to every run written in it.
    pub(super) fn text(
        &mut self,
        parent: ContainerId,
        node: &Node,
        font_style: FontStyle,
    ) -> Result<Option<ContainerId>> {
        let mut style = self.layout.style(parent)?.derive_child();
        font_style.apply(&mut style.font);
        self.open_text(parent, node, style)
    }

    fn open_text(
        &mut self,
        parent: ContainerId,
        node: &Node,
        mut style: Style,
    ) -> Result<Option<ContainerId>> {
        styles::apply_common(node, &mut style);
        let range = self.layout.get_range(parent, Some(&style))?;
        if style.wraps() {
            self.layout
                .surface_mut(parent)?
                .cell_at(range.start_row, range.start_col)?
                .format_mut()
                .wrap = true;
        }
        self.layout.cell(parent, range, style, true).map(Some)
    }

    /// Bare text: a run in the nearest cell, using the scope's font.
    pub(super) fn text_node(&mut self, parent: ContainerId, text: &str) -> Result<()> {
        let flags = self.layout.flags(parent)?;
        let text = if flags.in_text() {
            trim_indentation(text)
        } else {
            text.trim()
        };
        if text.is_empty() {
            return Ok(());
        }
        let font = self.layout.style(parent)?.font.clone();
        let range = self.layout.get_range(parent, None)?;
        self.layout
            .surface_mut(parent)?
            .write_text(range.start_row, range.start_col, text, Some(&font))
    }

    /// `p`: a wrapped text cell on a new row. Multi-line content (or a
    /// colspan) is merged downwards and the rows it covers are skipped.
    pub(super) fn paragraph(&mut self, parent: ContainerId, node: &Node) -> Result<()> {
        let row = self.layout.new_row(parent, None, 1)?;
        let in_row = matches!(self.layout.container(row)?.kind, ContainerKind::Row { .. });
        let mut style = self.layout.style(row)?.derive_child();
        styles::apply_common(node, &mut style);
        style.text_wrap = TextWrap::Wrap;
        let colspan = attr_span(node, "colspan");
        if in_row {
            if let Some(height) = attr_f64(node, "height").filter(|h| *h > 0.0) {
                let index = self.layout.row(row)?;
                self.layout.surface_mut(row)?.set_row_height(index, height);
            }
        }

        let range = self.layout.get_range(row, Some(&style))?;
        let text = self.layout.cell(row, range, style.clone(), true)?;
        self.walk_children(node, text)?;
        if !in_row {
            return Ok(());
        }

        let content = self
            .layout
            .surface(row)?
            .cell(range.start_row, range.start_col)
            .map(|c| c.value.text())
            .unwrap_or_default();
        let newlines = content.matches('\n').count();
        let lines = u32::try_from(newlines).unwrap_or(u32::MAX).saturating_add(1);
        if lines > 1 || colspan > 1 {
            let merged =
                self.layout
                    .merge_region(row, range.start_row, range.start_col, lines, colspan)?;
            self.layout.surface_mut(row)?.set_style(merged, &style)?;
        }
        if lines > 1 {
            self.layout.make_empty_rows(row, lines - 1)?;
        }
        Ok(())
    }

    /// `br`: a line break inside a cell, otherwise one visible blank row.
    pub(super) fn line_break(&mut self, parent: ContainerId) -> Result<()> {
        if self.layout.flags(parent)?.in_cell() {
            let range = self.layout.get_range(parent, None)?;
            return self
                .layout
                .surface_mut(parent)?
                .append_newline(range.start_row, range.start_col);
        }
        self.layout.make_empty_row(parent)
    }

    pub(super) fn empty_row(&mut self, parent: ContainerId, node: &Node) -> Result<()> {
        let rows = attr_span(node, "rows");
        if self.layout.flags(parent)?.in_cell() {
            let range = self.layout.get_range(parent, None)?;
            let surface = self.layout.surface_mut(parent)?;
            for _ in 0..rows {
                surface.append_newline(range.start_row, range.start_col)?;
            }
            return Ok(());
        }
        self.layout.make_empty_rows(parent, rows)
    }

    pub(super) fn space(&mut self, parent: ContainerId) -> Result<()> {
        let range = self.layout.get_range(parent, None)?;
        self.layout
            .surface_mut(parent)?
            .write_text(range.start_row, range.start_col, " ", None)
    }

    /// `skip cols="N"` claims columns, `skip rows="N"` leaves blank rows,
    /// bare `skip` claims one column.
    pub(super) fn skip(&mut self, parent: ContainerId, node: &Node) -> Result<()> {
        match (attr_u32(node, "cols"), attr_u32(node, "rows")) {
            (Some(cols), _) => self.layout.skip_column(parent, cols),
            (None, Some(rows)) => self.layout.make_empty_rows(parent, rows),
            (None, None) => self.layout.skip_column(parent, 1),
        }
    }

    // ---- values -----------------------------------------------------------

    pub(super) fn number(&mut self, parent: ContainerId, node: &Node) -> Result<()> {
        let raw = node
            .attr("value")
            .map_or_else(|| node.inner_text(), str::to_string);
        let value = match raw.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Scalar::Number(n),
            _ => {
                tracing::debug!(value = %raw.trim(), "number is not numeric, writing text");
                Scalar::Text(raw.trim().to_string())
            }
        };
        self.write_scalar(parent, value)
    }

    /// `value name="x"`: the bound scalar, or an empty string when unbound.
    pub(super) fn value(&mut self, parent: ContainerId, node: &Node) -> Result<()> {
        let name = node.attr("name").unwrap_or(".");
        let value = match self.lookup(name) {
            Some(ModelValue::Number(n)) => Scalar::Number(n),
            Some(other) => Scalar::Text(other.display_text()),
            None => {
                tracing::debug!(binding = name, "unbound value");
                Scalar::Text(String::new())
            }
        };
        self.write_scalar(parent, value)
    }

    /// Numbers become numeric cells except inside text scopes, where they
    /// are appended as runs.
    fn write_scalar(&mut self, parent: ContainerId, value: Scalar) -> Result<()> {
        let flags = self.layout.flags(parent)?;
        let font = self.layout.style(parent)?.font.clone();
        let range = self.layout.get_range(parent, None)?;
        let surface = self.layout.surface_mut(parent)?;
        let (row, col) = (range.start_row, range.start_col);
        match value {
            Scalar::Number(n) if !flags.in_text() => {
                surface.write_value(row, col, CellValue::Number(n))
            }
            Scalar::Number(n) => {
                surface.write_text(row, col, &format_number(n), Some(&font))
            }
            Scalar::Text(text) if flags.in_text() => {
                surface.write_text(row, col, &text, Some(&font))
            }
            Scalar::Text(text) => surface.write_value(row, col, CellValue::Text(text)),
        }
    }

    // ---- lists ------------------------------------------------------------

    /// `li`: one row per item. Plain items write their text; items with
    /// element content get a cell scope.
    pub(super) fn list_item(
        &mut self,
        parent: ContainerId,
        node: &Node,
    ) -> Result<Option<ContainerId>> {
        let row = self.layout.new_row(parent, None, 1)?;
        let range = self.layout.get_range(row, None)?;
        if node.has_elements() {
            let style = self.layout.style(row)?.derive_child();
            return self.layout.cell(row, range, style, false).map(Some);
        }
        let text = node.inner_text();
        let font = self.layout.style(parent)?.font.clone();
        self.layout.surface_mut(row)?.write_text(
            range.start_row,
            range.start_col,
            text.trim(),
            Some(&font),
        )?;
        Ok(None)
    }

    // ---- regions ----------------------------------------------------------

    /// `div` and `border`: children laid out inside a positioned element,
    /// then the region outlined. The region is `rows` x `cols` from the
    /// element's origin when given, otherwise whatever the children claimed.
    /// `border` also fills the region with its background.
    pub(super) fn region(&mut self, parent: ContainerId, node: &Node, fill: bool) -> Result<()> {
        let mut style = self.layout.style(parent)?.derive_child();
        styles::apply_common(node, &mut style);
        styles::apply_height(node, "height", &mut style);
        let column = attr_u32(node, "column").filter(|c| *c > 0);
        let (container, row) = match attr_u32(node, "row").filter(|r| *r > 0) {
            Some(row) => (self.layout.jump(parent, row, style.clone())?, Some(row)),
            None => (parent, None),
        };
        let element = self.layout.element(container, style.clone(), row, column)?;
        if let Some(column) = column {
            self.layout.set_column(container, column)?;
        }

        self.layout.begin_extent();
        let walked = self.walk_children(node, element);
        let extent = self.layout.end_extent();
        walked?;

        let rows = attr_u32(node, "rows").filter(|r| *r > 0);
        let cols = attr_u32(node, "cols").filter(|c| *c > 0);
        let origin_row = self.layout.row(element)?;
        let origin_col = self.layout.column(element)?;
        let region = match (rows, cols, extent) {
            (None, None, Some(extent)) => extent,
            _ => CellRange::new(
                origin_row,
                origin_col,
                origin_row.saturating_add(rows.unwrap_or(1) - 1),
                origin_col.saturating_add(cols.unwrap_or(1) - 1),
            ),
        };
        let surface = self.layout.surface_mut(element)?;
        if fill {
            if let Some(color) = style.bg_color {
                surface.set_fill(region, color)?;
            }
        }
        surface.set_border(region, &style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_indentation() {
        assert_eq!(trim_indentation("Total: "), "Total: ");
        assert_eq!(trim_indentation("\n    Hello world\n  "), "Hello world");
        assert_eq!(trim_indentation(" a\n"), " a");
    }
}
