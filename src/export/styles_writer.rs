//! Builds `xl/styles.xml` from the cell formats of every sheet.
//!
//! Fonts, fills and borders are deduplicated by their serialized XML, so two
//! cells with equal formatting share one `cellXfs` entry.

use std::collections::HashMap;

use crate::types::{BorderLine, CellBorders, CellFormat, Font, FontVertAlign};

use super::xml_escape;

/// Interned style parts. Index 0 of every table is the workbook default.
#[derive(Debug)]
pub(crate) struct StyleTable {
    fonts: Interner,
    fills: Interner,
    borders: Interner,
    xfs: Interner,
}

#[derive(Debug, Default)]
struct Interner {
    items: Vec<String>,
    index: HashMap<String, u32>,
}

impl Interner {
    fn intern(&mut self, xml: String) -> u32 {
        if let Some(&idx) = self.index.get(&xml) {
            return idx;
        }
        let idx = u32::try_from(self.items.len()).unwrap_or(u32::MAX);
        self.index.insert(xml.clone(), idx);
        self.items.push(xml);
        idx
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

impl StyleTable {
    pub(crate) fn new(default_font: &Font) -> Self {
        let mut table = Self {
            fonts: Interner::default(),
            fills: Interner::default(),
            borders: Interner::default(),
            xfs: Interner::default(),
        };
        table.fonts.intern(font_xml(default_font));
        // Excel requires the first two fills to be "none" and "gray125".
        table
            .fills
            .intern(r#"<fill><patternFill patternType="none"/></fill>"#.to_string());
        table
            .fills
            .intern(r#"<fill><patternFill patternType="gray125"/></fill>"#.to_string());
        table.borders.intern(border_xml(&CellBorders::default()));
        table
            .xfs
            .intern(r#"<xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/>"#.to_string());
        table
    }

    /// `cellXfs` index for a cell format.
    pub(crate) fn xf_index(&mut self, format: &CellFormat) -> u32 {
        let font_id = self.fonts.intern(font_xml(&format.font));
        let fill_id = match format.fill {
            Some(color) => self.fills.intern(format!(
                r#"<fill><patternFill patternType="solid"><fgColor rgb="{}"/><bgColor indexed="64"/></patternFill></fill>"#,
                color.to_argb()
            )),
            None => 0,
        };
        let border_id = self.borders.intern(border_xml(&format.borders));

        let mut xf = format!(
            r#"<xf numFmtId="0" fontId="{font_id}" fillId="{fill_id}" borderId="{border_id}" xfId="0" applyFont="1""#
        );
        if fill_id > 0 {
            xf.push_str(r#" applyFill="1""#);
        }
        if border_id > 0 {
            xf.push_str(r#" applyBorder="1""#);
        }
        let alignment = alignment_xml(format);
        if alignment.is_empty() {
            xf.push_str("/>");
        } else {
            xf.push_str(r#" applyAlignment="1">"#);
            xf.push_str(&alignment);
            xf.push_str("</xf>");
        }
        self.xfs.intern(xf)
    }

    pub(crate) fn to_xml(&self) -> String {
        let mut out = String::with_capacity(2048);
        out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        out.push('\n');
        out.push_str(r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#);
        write_table(&mut out, "fonts", &self.fonts);
        write_table(&mut out, "fills", &self.fills);
        write_table(&mut out, "borders", &self.borders);
        out.push_str(r#"<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>"#);
        write_table(&mut out, "cellXfs", &self.xfs);
        out.push_str(r#"<cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>"#);
        out.push_str("</styleSheet>");
        out
    }

    #[cfg(test)]
    pub(crate) fn font_count(&self) -> usize {
        self.fonts.len()
    }

    #[cfg(test)]
    pub(crate) fn xf_count(&self) -> usize {
        self.xfs.len()
    }
}

fn write_table(out: &mut String, tag: &str, table: &Interner) {
    out.push_str(&format!("<{tag} count=\"{}\">", table.len()));
    for item in &table.items {
        out.push_str(item);
    }
    out.push_str(&format!("</{tag}>"));
}

/// `<font>` body, also used for `<rPr>` in rich-text runs.
pub(crate) fn font_props(font: &Font, name_tag: &str) -> String {
    let mut out = String::new();
    if font.bold {
        out.push_str("<b/>");
    }
    if font.italic {
        out.push_str("<i/>");
    }
    if font.underline {
        out.push_str("<u/>");
    }
    match font.vert_align {
        FontVertAlign::Baseline => {}
        FontVertAlign::Subscript => out.push_str(r#"<vertAlign val="subscript"/>"#),
        FontVertAlign::Superscript => out.push_str(r#"<vertAlign val="superscript"/>"#),
    }
    out.push_str(&format!(
        r#"<sz val="{}"/><color rgb="{}"/><{name_tag} val="{}"/>"#,
        font.size,
        font.color.to_argb(),
        xml_escape(&font.name)
    ));
    out
}

fn font_xml(font: &Font) -> String {
    format!("<font>{}</font>", font_props(font, "name"))
}

fn border_xml(borders: &CellBorders) -> String {
    let edge = |tag: &str, line: Option<BorderLine>| match line {
        Some(line) => format!(
            r#"<{tag} style="{}"><color rgb="{}"/></{tag}>"#,
            line.style.as_xlsx(),
            line.color.to_argb()
        ),
        None => format!("<{tag}/>"),
    };
    format!(
        "<border>{}{}{}{}<diagonal/></border>",
        edge("left", borders.left),
        edge("right", borders.right),
        edge("top", borders.top),
        edge("bottom", borders.bottom)
    )
}

fn alignment_xml(format: &CellFormat) -> String {
    let mut attrs = String::new();
    if let Some(h) = format.h_align.as_xlsx() {
        attrs.push_str(&format!(r#" horizontal="{h}""#));
    }
    if let Some(v) = format.v_align.as_xlsx() {
        attrs.push_str(&format!(r#" vertical="{v}""#));
    }
    if format.wrap {
        attrs.push_str(r#" wrapText="1""#);
    }
    if format.shrink_to_fit {
        attrs.push_str(r#" shrinkToFit="1""#);
    }
    if attrs.is_empty() {
        String::new()
    } else {
        format!("<alignment{attrs}/>")
    }
}
