use crate::surface::Surface;
use crate::types::Style;

use super::row::{RowSource, RowState};

/// Ordered, 1-based table of row states for one sheet.
///
/// Addressing row R leaves the table at least R long; the gap is filled with
/// filler rows.
#[derive(Debug, Clone, Default)]
pub struct RowTable {
    rows: Vec<RowState>,
}

fn slot(row: u32) -> Option<usize> {
    row.checked_sub(1).and_then(|r| usize::try_from(r).ok())
}

impl RowTable {
    pub fn len(&self) -> u32 {
        u32::try_from(self.rows.len()).unwrap_or(u32::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, row: u32) -> Option<&RowState> {
        slot(row).and_then(|i| self.rows.get(i))
    }

    pub fn get_mut(&mut self, row: u32) -> Option<&mut RowState> {
        slot(row).and_then(|i| self.rows.get_mut(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = &RowState> {
        self.rows.iter()
    }

    /// Append fillers until the table is `len` long. Returns how many were added.
    pub fn pad_to(&mut self, len: u32, style: &Style, source: RowSource) -> u32 {
        let mut added = 0;
        while self.len() < len {
            let next = self.len().saturating_add(1);
            self.rows.push(RowState::filler(next, style.clone(), source));
            added += 1;
        }
        added
    }

    /// Put a content row in its slot. A filler is replaced; a content row
    /// already there is reused in place. Returns how many entries were
    /// appended.
    pub fn place(&mut self, state: RowState, filler_style: &Style) -> u32 {
        let row = state.row;
        let added = self.pad_to(row.saturating_sub(1), filler_style, state.source);
        match self.get_mut(row) {
            Some(existing) if existing.filler => {
                *existing = state;
                added
            }
            Some(existing) => {
                existing.reuse(state);
                added
            }
            None => {
                self.rows.push(state);
                added + 1
            }
        }
    }
}

/// One sheet: its surface, row table and sequential row cursor.
#[derive(Debug)]
pub struct SheetState<S> {
    pub surface: S,
    pub rows: RowTable,
    /// Next row the sheet hands out.
    pub cursor: u32,
    /// Row last handed out by the sheet, if any since the last blank-row run.
    pub current_row: Option<u32>,
    /// Baseline style of the page.
    pub style: Style,
}

impl<S: Surface> SheetState<S> {
    pub fn new(surface: S, style: Style) -> Self {
        Self {
            surface,
            rows: RowTable::default(),
            cursor: 1,
            current_row: None,
            style,
        }
    }

    /// Pad the table with fillers, keeping the surface row count in step.
    pub fn pad_rows(&mut self, len: u32, source: RowSource) -> u32 {
        let added = self.rows.pad_to(len, &self.style, source);
        for _ in 0..added {
            self.surface.append_row();
        }
        added
    }

    /// Materialize a content row, applying its height.
    pub fn place_row(&mut self, state: RowState) {
        let row = state.row;
        let height = state.style.size.height;
        let added = self.rows.place(state, &self.style);
        for _ in 0..added {
            self.surface.append_row();
        }
        if let Some(h) = height {
            self.surface.set_row_height(row, h);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::surface::SheetGrid;

    #[test]
    fn test_pad_and_place() {
        let mut table = RowTable::default();
        assert!(table.is_empty());
        assert_eq!(table.pad_to(3, &Style::default(), RowSource::Sheet), 3);
        assert_eq!(table.pad_to(2, &Style::default(), RowSource::Sheet), 0);
        assert!(table.get(3).unwrap().filler);

        let added = table.place(
            RowState::new(2, 1, Style::default(), RowSource::Sheet),
            &Style::default(),
        );
        assert_eq!(added, 0);
        assert!(!table.get(2).unwrap().filler);
        assert_eq!(table.len(), 3);

        let added = table.place(
            RowState::new(6, 1, Style::default(), RowSource::Sheet),
            &Style::default(),
        );
        assert_eq!(added, 3);
        assert_eq!(table.len(), 6);
        assert!(table.get(5).unwrap().filler);
        assert_eq!(table.get(0), None);
    }

    #[test]
    fn test_place_keeps_content_row_cursor() {
        let mut table = RowTable::default();
        table.place(
            RowState::new(1, 1, Style::default(), RowSource::Sheet),
            &Style::default(),
        );
        table.get_mut(1).unwrap().column = 3;

        let added = table.place(
            RowState::new(1, 1, Style::default(), RowSource::Sheet),
            &Style::default(),
        );
        assert_eq!(added, 0);
        assert_eq!(table.get(1).unwrap().column, 3);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_surface_rows_follow_table() {
        let mut sheet = SheetState::new(SheetGrid::new("S"), Style::default());
        sheet.pad_rows(2, RowSource::Sheet);
        let mut style = Style::default();
        style.size.height = Some(30.0);
        sheet.place_row(RowState::new(4, 1, style, RowSource::Sheet));
        assert_eq!(sheet.surface.row_count(), 4);
        assert_eq!(sheet.surface.row_height(4), Some(30.0));
        assert_eq!(sheet.rows.len(), 4);
    }
}
