//! XLSX export pipeline.
//!
//! Writes a fresh package from rendered [`SheetGrid`]s: one worksheet part per
//! sheet, a shared styles part, and a drawing part (with its media and chart
//! parts) for every sheet that has drawings.

mod drawing_writer;
mod package;
mod sheet_writer;
mod styles_writer;

use crate::cell_ref::sheet_range_name;
use crate::error::Result;
use crate::surface::{SheetGrid, Surface};
use crate::types::Font;
use crate::Document;

use drawing_writer::{write_drawing, PartIds};
use package::{
    Package, CT_CHART, CT_DRAWING, CT_STYLES, CT_WORKBOOK, CT_WORKSHEET, REL_DRAWING,
    REL_OFFICE_DOCUMENT, REL_STYLES, REL_WORKSHEET,
};
use sheet_writer::write_sheet_xml;
use styles_writer::StyleTable;

/// Serialize a rendered document to XLSX bytes.
///
/// A document without sheets still produces a valid workbook with one empty
/// sheet, since spreadsheet applications refuse a workbook with none.
pub fn write_xlsx(document: &Document) -> Result<Vec<u8>> {
    let placeholder;
    let sheets: &[SheetGrid] = if document.sheets.is_empty() {
        placeholder = [SheetGrid::new("Sheet1")];
        &placeholder
    } else {
        &document.sheets
    };

    let mut package = Package::new();
    let mut styles = StyleTable::new(&Font::default());
    let mut ids = PartIds::default();

    for (idx, sheet) in sheets.iter().enumerate() {
        let n = idx + 1;
        let sheet_path = format!("xl/worksheets/sheet{n}.xml");
        let drawing_rel = match write_drawing(sheet, &mut ids) {
            Some(parts) => {
                let drawing_path = format!("xl/drawings/drawing{n}.xml");
                for (path, content_type, data) in &parts.media {
                    package.add_media(path, *content_type, data)?;
                }
                for (path, xml) in &parts.charts {
                    package.add_part(path, CT_CHART, xml)?;
                }
                package.add_part(&drawing_path, CT_DRAWING, &parts.xml)?;
                package.add_rels(&drawing_path, &parts.rels)?;
                package.add_rels(
                    &sheet_path,
                    &[(
                        "rId1".to_string(),
                        REL_DRAWING,
                        format!("../drawings/drawing{n}.xml"),
                    )],
                )?;
                Some("rId1")
            }
            None => None,
        };
        let xml = write_sheet_xml(sheet, &mut styles, drawing_rel);
        package.add_part(&sheet_path, CT_WORKSHEET, &xml)?;
    }

    package.add_part("xl/styles.xml", CT_STYLES, &styles.to_xml())?;
    package.add_part("xl/workbook.xml", CT_WORKBOOK, &workbook_xml(sheets))?;

    let mut rels: Vec<(String, &str, String)> = (1..=sheets.len())
        .map(|n| (format!("rId{n}"), REL_WORKSHEET, format!("worksheets/sheet{n}.xml")))
        .collect();
    rels.push((
        format!("rId{}", sheets.len() + 1),
        REL_STYLES,
        "styles.xml".to_string(),
    ));
    package.add_rels("xl/workbook.xml", &rels)?;
    package.add_rels(
        "",
        &[(
            "rId1".to_string(),
            REL_OFFICE_DOCUMENT,
            "xl/workbook.xml".to_string(),
        )],
    )?;

    let bytes = package.finish()?;
    tracing::debug!(sheets = sheets.len(), bytes = bytes.len(), "wrote xlsx");
    Ok(bytes)
}

fn workbook_xml(sheets: &[SheetGrid]) -> String {
    let mut out = String::with_capacity(1024);
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push('\n');
    out.push_str(
        r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" "#,
    );
    out.push_str(
        r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
    );
    out.push_str("<sheets>");
    for (idx, sheet) in sheets.iter().enumerate() {
        out.push_str(&format!(
            r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
            xml_escape(sheet.name()),
            idx + 1,
            idx + 1
        ));
    }
    out.push_str("</sheets>");

    let print_areas: Vec<(usize, String)> = sheets
        .iter()
        .enumerate()
        .filter_map(|(idx, sheet)| {
            let area = sheet.page_setup().print_area?;
            Some((
                idx,
                sheet_range_name(sheet.name(), area.top, area.left, area.bottom, area.right),
            ))
        })
        .collect();
    if !print_areas.is_empty() {
        out.push_str("<definedNames>");
        for (idx, range) in print_areas {
            out.push_str(&format!(
                r#"<definedName name="_xlnm.Print_Area" localSheetId="{idx}">{}</definedName>"#,
                xml_escape(&range)
            ));
        }
        out.push_str("</definedNames>");
    }
    out.push_str("</workbook>");
    out
}

/// Minimal XML escaping for attribute/text content.
pub(crate) fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
