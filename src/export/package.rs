//! The OPC container: part bookkeeping, content types and relationships.

use std::collections::BTreeSet;
use std::io::{Cursor, Write};

use zip::write::FileOptions;
use zip::ZipWriter;

use crate::error::Result;

use super::xml_escape;

pub(crate) const CT_WORKBOOK: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";
pub(crate) const CT_WORKSHEET: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml";
pub(crate) const CT_STYLES: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml";
pub(crate) const CT_DRAWING: &str = "application/vnd.openxmlformats-officedocument.drawing+xml";
pub(crate) const CT_CHART: &str =
    "application/vnd.openxmlformats-officedocument.drawingml.chart+xml";

pub(crate) const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
pub(crate) const REL_WORKSHEET: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
pub(crate) const REL_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
pub(crate) const REL_DRAWING: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/drawing";

/// Streams parts into a ZIP archive and remembers what `[Content_Types].xml`
/// has to declare.
pub(crate) struct Package {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    overrides: Vec<(String, &'static str)>,
    extensions: BTreeSet<(String, &'static str)>,
}

impl Package {
    pub(crate) fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            overrides: Vec::new(),
            extensions: BTreeSet::new(),
        }
    }

    fn write_entry(&mut self, path: &str, data: &[u8]) -> Result<()> {
        let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        self.writer.start_file(path, options)?;
        self.writer.write_all(data)?;
        Ok(())
    }

    /// A part with its own content type override.
    pub(crate) fn add_part(&mut self, path: &str, content_type: &'static str, xml: &str) -> Result<()> {
        self.write_entry(path, xml.as_bytes())?;
        self.overrides.push((format!("/{path}"), content_type));
        Ok(())
    }

    /// A binary part whose content type is declared by extension.
    pub(crate) fn add_media(&mut self, path: &str, content_type: &'static str, data: &[u8]) -> Result<()> {
        let ext = path.rsplit_once('.').map_or("bin", |(_, e)| e);
        self.extensions.insert((ext.to_string(), content_type));
        self.write_entry(path, data)
    }

    /// A `.rels` part for the part at `owner` (`""` for the package root).
    pub(crate) fn add_rels(&mut self, owner: &str, rels: &[(String, &str, String)]) -> Result<()> {
        let path = match owner.rsplit_once('/') {
            Some((dir, file)) => format!("{dir}/_rels/{file}.rels"),
            None if owner.is_empty() => "_rels/.rels".to_string(),
            None => format!("_rels/{owner}.rels"),
        };
        let xml = relationships_xml(rels);
        self.write_entry(&path, xml.as_bytes())
    }

    /// Write `[Content_Types].xml` and close the archive.
    pub(crate) fn finish(mut self) -> Result<Vec<u8>> {
        let xml = self.content_types_xml();
        self.write_entry("[Content_Types].xml", xml.as_bytes())?;
        let cursor = self.writer.finish()?;
        Ok(cursor.into_inner())
    }

    fn content_types_xml(&self) -> String {
        let mut out = String::with_capacity(1024);
        out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        out.push('\n');
        out.push_str(
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
        );
        out.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
        out.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
        for (ext, content_type) in &self.extensions {
            out.push_str(&format!(
                r#"<Default Extension="{ext}" ContentType="{content_type}"/>"#
            ));
        }
        for (part, content_type) in &self.overrides {
            out.push_str(&format!(
                r#"<Override PartName="{}" ContentType="{content_type}"/>"#,
                xml_escape(part)
            ));
        }
        out.push_str("</Types>");
        out
    }
}

fn relationships_xml(rels: &[(String, &str, String)]) -> String {
    let mut out = String::with_capacity(512);
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push('\n');
    out.push_str(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for (id, kind, target) in rels {
        out.push_str(&format!(
            r#"<Relationship Id="{id}" Type="{kind}" Target="{}"/>"#,
            xml_escape(target)
        ));
    }
    out.push_str("</Relationships>");
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    #[test]
    fn test_rels_paths_and_content_types() {
        let mut package = Package::new();
        package
            .add_part("xl/workbook.xml", CT_WORKBOOK, "<workbook/>")
            .unwrap();
        package
            .add_rels("xl/workbook.xml", &[("rId1".into(), REL_STYLES, "styles.xml".into())])
            .unwrap();
        package.add_rels("", &[]).unwrap();
        package.add_media("xl/media/image1.png", "image/png", b"x").unwrap();
        let bytes = package.finish().unwrap();

        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert!(archive.by_name("xl/_rels/workbook.xml.rels").is_ok());
        assert!(archive.by_name("_rels/.rels").is_ok());
        let mut types = String::new();
        archive
            .by_name("[Content_Types].xml")
            .unwrap()
            .read_to_string(&mut types)
            .unwrap();
        assert!(types.contains(r#"<Default Extension="png" ContentType="image/png"/>"#));
        assert!(types.contains(r#"PartName="/xl/workbook.xml""#));
    }
}
