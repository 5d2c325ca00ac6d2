//! xltemplate - markup templates to XLSX workbooks
//!
//! Renders a hierarchical template (pages, tables, rows, cells, inline text,
//! lists, drawings) onto spreadsheet grids:
//! - Row/column cursors with row and column spans
//! - Merged-region avoidance: later content steps past earlier merges
//! - Pinned tables (`row="N"`) with filler rows up to the target
//! - Inherited font, alignment, border and fill styles
//! - Data binding from JSON models (`value`, `foreach`, `image name=...`)
//! - Pictures, shapes, and line/scatter charts
//!
//! # Usage
//!
//! ```no_run
//! use xltemplate::{render_xlsx, RenderOptions};
//!
//! let template = r#"<document><page name="Report"><table>
//!     <tr><th>Item</th><th>Qty</th></tr>
//!     <foreach name="lines"><tr><td><value name="sku"/></td><td><value name="qty"/></td></tr></foreach>
//! </table></page></document>"#;
//! let model = serde_json::json!({ "lines": [{ "sku": "A-1", "qty": 3 }] });
//! let bytes = render_xlsx(template, &model, &RenderOptions::default())?;
//! std::fs::write("report.xlsx", bytes)?;
//! # Ok::<(), xltemplate::XltemplateError>(())
//! ```

pub mod cell_ref;
pub mod color;
pub mod error;
pub mod export;
pub mod layout;
pub mod model;
pub mod render;
pub mod surface;
pub mod template;
pub mod types;
pub mod xml_helpers;

use serde::{Deserialize, Serialize};

pub use error::{Result, StructuralError, XltemplateError};
pub use model::{DataModel, EmptyModel, ModelValue};
pub use render::{RenderOptions, UnknownTags};
pub use surface::{SheetGrid, Surface};
pub use template::Node;

/// A rendered workbook: one grid per page, in template order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub sheets: Vec<SheetGrid>,
}

impl Document {
    /// Look a sheet up by its final (sanitized, deduplicated) name.
    pub fn sheet(&self, name: &str) -> Option<&SheetGrid> {
        self.sheets.iter().find(|s| s.name() == name)
    }

    /// Serialize the rendered grids for inspection.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Parse a template and lay it out against a model.
///
/// # Errors
/// Returns an error for malformed markup or a structurally invalid template
/// (see [`StructuralError`]).
pub fn render_document(
    template: &str,
    model: &dyn DataModel,
    options: &RenderOptions,
) -> Result<Document> {
    let root = template::parse(template)?;
    render_node(&root, model, options)
}

/// Lay out an already parsed template.
///
/// # Errors
/// Returns an error for a structurally invalid template.
pub fn render_node(root: &Node, model: &dyn DataModel, options: &RenderOptions) -> Result<Document> {
    let sheets = render::render::<SheetGrid>(root, model, options)?;
    Ok(Document { sheets })
}

/// Render a template straight to XLSX bytes.
///
/// # Errors
/// Returns an error if rendering or packaging fails.
pub fn render_xlsx(template: &str, model: &dyn DataModel, options: &RenderOptions) -> Result<Vec<u8>> {
    let document = render_document(template, model, options)?;
    export::write_xlsx(&document)
}

/// Get the library version
#[must_use]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
