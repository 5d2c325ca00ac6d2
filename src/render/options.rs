use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// What the driver does with element names it does not know.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum UnknownTags {
    /// Walk the children inside a passthrough element container.
    #[default]
    Passthrough,
    /// Drop the element and everything under it.
    Ignore,
}

/// Render configuration, usually read from a JSON file.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    /// Name stem for pages without a `name` attribute (`Page1`, `Page2`, ...).
    pub sheet_prefix: String,
    /// Baseline font, overridden by `document` attributes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    pub unknown_tags: UnknownTags,
    /// Cap on merge-skipping retries per claim. Unbounded when absent; the
    /// search still stops at the edge of the grid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_merge_retries: Option<u32>,
    /// Directory `image path="..."` is resolved against.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_dir: Option<PathBuf>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            sheet_prefix: "Page".to_string(),
            font_name: None,
            font_size: None,
            unknown_tags: UnknownTags::Passthrough,
            max_merge_retries: None,
            asset_dir: None,
        }
    }
}

impl RenderOptions {
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
