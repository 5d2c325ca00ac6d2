use crate::error::{Result, StructuralError, XltemplateError};
use crate::surface::Surface;
use crate::types::{PageStyle, Style};

use super::sheet::SheetState;

/// Characters Excel rejects in sheet names.
const INVALID_SHEET_CHARS: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];
const MAX_SHEET_NAME: usize = 31;

/// Top-level registry: ordered sheets plus the workbook baseline.
#[derive(Debug)]
pub struct Workbook<S> {
    sheets: Vec<SheetState<S>>,
    page_style: PageStyle,
    baseline: Style,
    current: Option<usize>,
}

impl<S: Surface> Workbook<S> {
    pub fn new(page_style: PageStyle) -> Self {
        let baseline = Style::from_page(&page_style);
        Self {
            sheets: Vec::new(),
            page_style,
            baseline,
            current: None,
        }
    }

    pub fn page_style(&self) -> &PageStyle {
        &self.page_style
    }

    /// Style every new page starts from.
    pub fn baseline(&self) -> &Style {
        &self.baseline
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Index of the most recently created sheet.
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Add a sheet and make it current. Names are made valid and unique.
    pub fn add_sheet(&mut self, name: &str, style: Style) -> usize {
        let name = self.unique_name(&sanitize_sheet_name(name));
        tracing::debug!(sheet = %name, "creating sheet");
        self.sheets.push(SheetState::new(S::create(&name), style));
        let idx = self.sheets.len() - 1;
        self.current = Some(idx);
        idx
    }

    pub fn sheet(&self, idx: usize) -> Result<&SheetState<S>> {
        self.sheets
            .get(idx)
            .ok_or_else(|| StructuralError::NoSheet(format!("sheet #{idx}")).into())
    }

    pub fn sheet_mut(&mut self, idx: usize) -> Result<&mut SheetState<S>> {
        self.sheets
            .get_mut(idx)
            .ok_or_else(|| XltemplateError::from(StructuralError::NoSheet(format!("sheet #{idx}"))))
    }

    pub fn sheets(&self) -> impl Iterator<Item = &SheetState<S>> {
        self.sheets.iter()
    }

    /// Hand the finished surfaces over in creation order.
    pub fn into_surfaces(self) -> Vec<S> {
        self.sheets.into_iter().map(|s| s.surface).collect()
    }

    fn unique_name(&self, base: &str) -> String {
        let taken = |n: &str| {
            self.sheets
                .iter()
                .any(|s| s.surface.name().eq_ignore_ascii_case(n))
        };
        if !taken(base) {
            return base.to_string();
        }
        (2..)
            .map(|i| {
                let suffix = format!(" ({i})");
                let keep = MAX_SHEET_NAME.saturating_sub(suffix.len());
                let stem: String = base.chars().take(keep).collect();
                format!("{stem}{suffix}")
            })
            .find(|n| !taken(n))
            .unwrap_or_else(|| base.to_string())
    }
}

fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if INVALID_SHEET_CHARS.contains(&c) { '_' } else { c })
        .take(MAX_SHEET_NAME)
        .collect();
    let cleaned = cleaned.trim_matches('\'').trim().to_string();
    if cleaned.is_empty() {
        "Sheet".to_string()
    } else {
        cleaned
    }
}
