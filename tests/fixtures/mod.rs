//! Test fixtures for generating templates and binary assets in memory.
//!
//! This module provides builders for writing template markup
//! programmatically, useful for testing layouts with known inputs.
//!
//! # Example
//!
//! ```rust
//! use fixtures::{TemplateBuilder, table};
//!
//! let template = TemplateBuilder::new()
//!     .attr("font-size", "10")
//!     .page("Report", &table(&[&["Item", "Qty"], &["A-1", "3"]]))
//!     .build();
//!
//! let document = xltemplate::render_document(&template, &xltemplate::EmptyModel, &Default::default()).unwrap();
//! ```
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

// ============================================================================
// Template Builder
// ============================================================================

/// Builder for a `document` with one or more pages.
#[derive(Debug, Clone, Default)]
pub struct TemplateBuilder {
    attrs: Vec<(String, String)>,
    pages: Vec<String>,
}

impl TemplateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attribute on the `document` element.
    pub fn attr(mut self, key: &str, value: &str) -> Self {
        self.attrs.push((key.to_string(), value.to_string()));
        self
    }

    /// A named page with raw markup as its body.
    pub fn page(self, name: &str, body: &str) -> Self {
        self.page_with(&[("name", name)], body)
    }

    /// A page without a name, so it gets the default prefix.
    pub fn unnamed_page(self, body: &str) -> Self {
        self.page_with(&[], body)
    }

    pub fn page_with(mut self, attrs: &[(&str, &str)], body: &str) -> Self {
        self.pages
            .push(format!("<page{}>{body}</page>", attr_list(attrs)));
        self
    }

    pub fn build(&self) -> String {
        let attrs: Vec<(&str, &str)> = self
            .attrs
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        format!(
            "<document{}>{}</document>",
            attr_list(&attrs),
            self.pages.concat()
        )
    }
}

fn attr_list(attrs: &[(&str, &str)]) -> String {
    attrs
        .iter()
        .map(|(k, v)| format!(r#" {k}="{}""#, escape(v)))
        .collect()
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('"', "&quot;")
}

/// A plain table: one `tr` per row, one `td` per cell.
pub fn table(rows: &[&[&str]]) -> String {
    table_with(&[], rows)
}

pub fn table_with(attrs: &[(&str, &str)], rows: &[&[&str]]) -> String {
    let body: String = rows
        .iter()
        .map(|cells| {
            let tds: String = cells
                .iter()
                .map(|c| format!("<td>{}</td>", escape(c)))
                .collect();
            format!("<tr>{tds}</tr>")
        })
        .collect();
    format!("<table{}>{body}</table>", attr_list(attrs))
}

/// A single page document around `body`.
pub fn single_page(body: &str) -> String {
    TemplateBuilder::new().page("Sheet", body).build()
}

// ============================================================================
// Binary assets
// ============================================================================

/// A 1x1 transparent PNG.
pub const PNG_1X1: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4,
    0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00, 0x01, 0x00, 0x00,
    0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE,
    0x42, 0x60, 0x82,
];

/// The PNG as a `base64:` model string.
pub fn png_model_string() -> String {
    format!("base64:{}", BASE64.encode(PNG_1X1))
}

/// The PNG as a data URL for `image src="..."`.
pub fn png_data_url() -> String {
    format!("data:image/png;base64,{}", BASE64.encode(PNG_1X1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_output() {
        let xml = TemplateBuilder::new()
            .attr("font-size", "10")
            .page("A & B", "<p>x</p>")
            .unnamed_page("")
            .build();
        assert_eq!(
            xml,
            r#"<document font-size="10"><page name="A &amp; B"><p>x</p></page><page></page></document>"#
        );
    }

    #[test]
    fn test_table_markup() {
        assert_eq!(
            table(&[&["a", "b"], &["c"]]),
            "<table><tr><td>a</td><td>b</td></tr><tr><td>c</td></tr></table>"
        );
    }
}
