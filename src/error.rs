//! Structured error types for xltemplate.
//!
//! Attribute-level problems never show up here: they degrade to defaults where
//! they are parsed. Everything in this module aborts the render.

/// Template shapes the layout engine refuses to interpret.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructuralError {
    /// A row container was asked for a nested row.
    #[error("row inside row is not allowed (row {row})")]
    RowInsideRow { row: u32 },

    /// A column skip was requested inside a fixed-width cell scope.
    #[error("cannot skip columns inside a cell (row {row}, column {column})")]
    ColumnSkipInCell { row: u32, column: u32 },

    /// The merge skip-and-retry loop could not find a free cell.
    #[error("merge resolution did not terminate at row {row}, column {column}")]
    MergeUnresolvable { row: u32, column: u32 },

    /// A coordinate fell outside the addressable grid.
    #[error("address outside the grid: row {row}, column {column}")]
    OutOfGrid { row: u32, column: u32 },

    /// Content was emitted before any page/sheet existed.
    #[error("no sheet is open for `{0}`")]
    NoSheet(String),
}

/// All errors that can occur while rendering a template.
#[derive(Debug, thiserror::Error)]
pub enum XltemplateError {
    /// XML parsing error from quick-xml.
    #[error("XML parsing: {0}")]
    Xml(#[from] quick_xml::Error),

    /// ZIP archive error.
    #[error("ZIP archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// JSON model or options error.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The template source is not a usable node tree.
    #[error("Template: {0}")]
    Template(String),

    /// Structural template error raised by the layout engine.
    #[error("Layout: {0}")]
    Structural(#[from] StructuralError),

    /// Data model lookup failure that cannot be degraded.
    #[error("Model: {0}")]
    Model(String),

    /// XLSX export failure.
    #[error("Export: {0}")]
    Export(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, XltemplateError>;

impl From<quick_xml::events::attributes::AttrError> for XltemplateError {
    fn from(e: quick_xml::events::attributes::AttrError) -> Self {
        Self::Xml(quick_xml::Error::InvalidAttr(e))
    }
}

impl XltemplateError {
    /// True for errors caused by the template's structure rather than I/O or encoding.
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::Structural(_))
    }
}
