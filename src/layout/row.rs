use crate::types::Style;

use super::ContainerId;

/// Who hands out a row and owns the row cursor it advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowSource {
    Sheet,
    /// A `row="R"` wrapper with its own cursor.
    Jump(ContainerId),
}

/// Retained state of one sheet row.
///
/// `row` starts as the row's own index but moves down when a merge wraps the
/// write position past the column budget, so it is the row currently being
/// written, not necessarily the table slot.
#[derive(Debug, Clone, PartialEq)]
pub struct RowState {
    pub row: u32,
    pub column: u32,
    /// Column the row returns to when it wraps.
    pub home_column: u32,
    pub total_columns: Option<u32>,
    pub style: Style,
    /// Materialized only to keep indices contiguous.
    pub filler: bool,
    pub source: RowSource,
}

impl RowState {
    pub fn new(row: u32, home_column: u32, style: Style, source: RowSource) -> Self {
        let home_column = home_column.max(1);
        Self {
            row,
            column: home_column,
            home_column,
            total_columns: style.total_columns,
            style,
            filler: false,
            source,
        }
    }

    pub fn filler(row: u32, style: Style, source: RowSource) -> Self {
        Self {
            filler: true,
            ..Self::new(row, 1, style, source)
        }
    }

    /// Take over a content row for a new requester.
    ///
    /// The write position and the claimed spans stay, so content already
    /// placed on the row is never written over.
    pub fn reuse(&mut self, next: RowState) {
        let (merged_row, merged_col) = (self.style.merged_row, self.style.merged_col);
        *self = RowState {
            row: self.row,
            column: self.column,
            home_column: self.home_column,
            ..next
        };
        self.style.merged_row = merged_row;
        self.style.merged_col = merged_col;
    }

    /// Last column inside the budget, if the row has one.
    pub fn last_column(&self) -> Option<u32> {
        self.total_columns
            .filter(|t| *t > 0)
            .map(|t| self.home_column.saturating_add(t - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_is_relative_to_home() {
        let mut style = Style::default();
        style.total_columns = Some(3);
        let row = RowState::new(4, 5, style, RowSource::Sheet);
        assert_eq!(row.column, 5);
        assert_eq!(row.last_column(), Some(7));
        assert!(!row.filler);

        let open = RowState::filler(2, Style::default(), RowSource::Sheet);
        assert_eq!(open.last_column(), None);
        assert!(open.filler);
    }

    #[test]
    fn test_reuse_keeps_position_and_spans() {
        let mut pinned = RowState::new(1, 2, Style::default(), RowSource::Sheet);
        pinned.column = 4;
        pinned.style.set_merged_col(2, 1);

        let mut style = Style::default();
        style.total_columns = Some(5);
        pinned.reuse(RowState::new(1, 1, style, RowSource::Sheet));

        assert_eq!((pinned.row, pinned.column, pinned.home_column), (1, 4, 2));
        assert!(pinned.style.merged_col.is_between(3));
        assert_eq!(pinned.total_columns, Some(5));
    }
}
