//! Generates worksheet XML from a [`SheetGrid`].
//!
//! Text is written as inline strings (`t="inlineStr"`), so no shared string
//! table is needed. Rich-text cells keep one `<r>` per run.

use std::collections::BTreeMap;

use crate::cell_ref::cell_name;
use crate::surface::{SheetGrid, Surface};
use crate::types::{format_number, Cell, CellValue, HeaderFooter, RichTextRun};

use super::styles_writer::{font_props, StyleTable};
use super::xml_escape;

const DEFAULT_ROW_HEIGHT: f64 = 15.0;

/// Write a complete worksheet XML string. `drawing_rel` is the relationship
/// id of the sheet's drawing part, if it has one.
pub(crate) fn write_sheet_xml(
    sheet: &SheetGrid,
    styles: &mut StyleTable,
    drawing_rel: Option<&str>,
) -> String {
    let page = sheet.page_setup();
    let mut out = String::with_capacity(4096);
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push('\n');
    out.push_str(
        r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" "#,
    );
    out.push_str(
        r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
    );
    out.push('\n');

    if page.fit_to_page {
        out.push_str("<sheetPr><pageSetUpPr fitToPage=\"1\"/></sheetPr>\n");
    }

    // <dimension>
    if let Some(dim) = sheet.dimension() {
        out.push_str(&format!("<dimension ref=\"{}\"/>\n", dim.a1()));
    }

    // <sheetViews>
    out.push_str("<sheetViews><sheetView workbookViewId=\"0\"");
    if page.page_break_view {
        out.push_str(" view=\"pageBreakPreview\"");
    }
    out.push_str("/></sheetViews>\n");

    // <sheetFormatPr>
    let row_height = page.default_row_height.unwrap_or(DEFAULT_ROW_HEIGHT);
    out.push_str(&format!("<sheetFormatPr defaultRowHeight=\"{row_height:.2}\""));
    if page.default_row_height.is_some() {
        out.push_str(" customHeight=\"1\"");
    }
    if let Some(width) = page.default_col_width {
        out.push_str(&format!(" defaultColWidth=\"{width:.4}\""));
    }
    out.push_str("/>\n");

    write_cols(&mut out, sheet);

    out.push_str("<sheetData>\n");
    write_sheet_data(&mut out, sheet, styles);
    out.push_str("</sheetData>\n");

    if page.protected {
        out.push_str("<sheetProtection sheet=\"1\" objects=\"1\" scenarios=\"1\"/>\n");
    }

    // <mergeCells>
    let merges = sheet.merges();
    if !merges.is_empty() {
        out.push_str(&format!("<mergeCells count=\"{}\">\n", merges.len()));
        for merge in merges {
            out.push_str(&format!("<mergeCell ref=\"{}\"/>\n", merge.a1()));
        }
        out.push_str("</mergeCells>\n");
    }

    // <pageMargins> is required before <pageSetup>
    let margins = page.margins.unwrap_or_default();
    let or = |v: f64, d: f64| if page.margins.is_some() { v } else { d };
    out.push_str(&format!(
        "<pageMargins left=\"{:.2}\" right=\"{:.2}\" top=\"{:.2}\" bottom=\"{:.2}\" header=\"{:.2}\" footer=\"{:.2}\"/>\n",
        or(margins.left, 0.7),
        or(margins.right, 0.7),
        or(margins.top, 0.75),
        or(margins.bottom, 0.75),
        page.header_margin.unwrap_or(0.3),
        page.footer_margin.unwrap_or(0.3),
    ));

    if page.fit_to_page || page.fit_to_width.is_some() || page.fit_to_height.is_some() {
        out.push_str(&format!(
            "<pageSetup fitToWidth=\"{}\" fitToHeight=\"{}\"/>\n",
            page.fit_to_width.unwrap_or(1),
            page.fit_to_height.unwrap_or(0)
        ));
    }

    if !page.header.is_empty() || !page.footer.is_empty() {
        out.push_str("<headerFooter>");
        if !page.header.is_empty() {
            out.push_str(&format!("<oddHeader>{}</oddHeader>", header_footer_text(&page.header)));
        }
        if !page.footer.is_empty() {
            out.push_str(&format!("<oddFooter>{}</oddFooter>", header_footer_text(&page.footer)));
        }
        out.push_str("</headerFooter>\n");
    }

    write_breaks(&mut out, "rowBreaks", &page.row_breaks, 16_383);
    write_breaks(&mut out, "colBreaks", &page.col_breaks, 1_048_575);

    if let Some(rel) = drawing_rel {
        out.push_str(&format!("<drawing r:id=\"{rel}\"/>\n"));
    }

    out.push_str("</worksheet>");
    out
}

fn write_cols(out: &mut String, sheet: &SheetGrid) {
    let mut cols: Vec<(u32, String)> = Vec::new();
    let mut indices: Vec<u32> = sheet.columns().keys().copied().collect();
    if sheet.page_setup().autofit_columns {
        indices.extend(1..=sheet.max_column());
        indices.sort_unstable();
        indices.dedup();
    }
    for col in indices {
        let best_fit = sheet.columns().get(&col).is_some_and(|c| c.best_fit);
        let mut attrs = String::new();
        if let Some(width) = sheet.column_width(col) {
            attrs.push_str(&format!(" width=\"{width:.4}\" customWidth=\"1\""));
        }
        if best_fit {
            attrs.push_str(" bestFit=\"1\"");
        }
        if !attrs.is_empty() {
            cols.push((col, attrs));
        }
    }
    if cols.is_empty() {
        return;
    }
    out.push_str("<cols>\n");
    for (col, attrs) in cols {
        out.push_str(&format!("<col min=\"{col}\" max=\"{col}\"{attrs}/>\n"));
    }
    out.push_str("</cols>\n");
}

/// Write all cell rows into `<sheetData>`, including rows that only carry a
/// custom height.
fn write_sheet_data(out: &mut String, sheet: &SheetGrid, styles: &mut StyleTable) {
    let mut rows: BTreeMap<u32, Vec<(u32, &Cell)>> = BTreeMap::new();
    for ((row, col), cell) in sheet.cells() {
        rows.entry(row).or_default().push((col, cell));
    }
    for row in sheet.row_heights().keys() {
        rows.entry(*row).or_default();
    }

    for (row, cells) in &rows {
        out.push_str(&format!("<row r=\"{row}\""));
        if let Some(height) = sheet.row_height(*row) {
            out.push_str(&format!(" ht=\"{height:.2}\" customHeight=\"1\""));
        }
        out.push('>');
        for (col, cell) in cells {
            write_cell(out, *row, *col, cell, styles);
        }
        out.push_str("</row>\n");
    }
}

/// Write a single `<c>` element.
fn write_cell(out: &mut String, row: u32, col: u32, cell: &Cell, styles: &mut StyleTable) {
    out.push_str(&format!("<c r=\"{}\"", cell_name(row, col)));
    if let Some(format) = &cell.format {
        out.push_str(&format!(" s=\"{}\"", styles.xf_index(format)));
    }
    match &cell.value {
        CellValue::Empty => out.push_str("/>"),
        CellValue::Number(n) => {
            out.push_str(&format!("><v>{}</v></c>", format_number(*n)));
        }
        CellValue::Bool(b) => {
            out.push_str(&format!(" t=\"b\"><v>{}</v></c>", u8::from(*b)));
        }
        CellValue::Text(text) => {
            out.push_str(" t=\"inlineStr\"><is>");
            write_t(out, text);
            out.push_str("</is></c>");
        }
        CellValue::RichText(runs) => {
            out.push_str(" t=\"inlineStr\"><is>");
            for run in runs {
                write_run(out, run);
            }
            out.push_str("</is></c>");
        }
    }
}

fn write_run(out: &mut String, run: &RichTextRun) {
    out.push_str("<r>");
    if let Some(font) = &run.font {
        out.push_str("<rPr>");
        out.push_str(&font_props(font, "rFont"));
        out.push_str("</rPr>");
    }
    write_t(out, &run.text);
    out.push_str("</r>");
}

fn write_t(out: &mut String, text: &str) {
    if text.starts_with(char::is_whitespace) || text.ends_with(char::is_whitespace) {
        out.push_str("<t xml:space=\"preserve\">");
    } else {
        out.push_str("<t>");
    }
    out.push_str(&xml_escape(text));
    out.push_str("</t>");
}

/// `&L`/`&C`/`&R` section codes.
fn header_footer_text(hf: &HeaderFooter) -> String {
    let mut text = String::new();
    for (code, section) in [("&L", &hf.left), ("&C", &hf.center), ("&R", &hf.right)] {
        if let Some(section) = section {
            text.push_str(code);
            text.push_str(section);
        }
    }
    xml_escape(&text)
}

fn write_breaks(out: &mut String, tag: &str, breaks: &[u32], max: u32) {
    if breaks.is_empty() {
        return;
    }
    out.push_str(&format!(
        "<{tag} count=\"{0}\" manualBreakCount=\"{0}\">",
        breaks.len()
    ));
    for id in breaks {
        out.push_str(&format!("<brk id=\"{id}\" max=\"{max}\" man=\"1\"/>"));
    }
    out.push_str(&format!("</{tag}>\n"));
}
