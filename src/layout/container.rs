use crate::types::{CellRange, Style};

use super::ScopeFlags;

/// Index of a container in the layout arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerId(pub(crate) usize);

impl ContainerId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Variant state of a container.
#[derive(Debug, Clone, PartialEq)]
pub enum ContainerKind {
    Workbook,
    Sheet {
        sheet: usize,
    },
    /// Handle onto a retained row; `slot` is its index in the sheet's row table.
    Row {
        sheet: usize,
        slot: u32,
    },
    /// A fixed cell (or merged block) that text is written into.
    Cell {
        range: CellRange,
    },
    /// `table`/`div`/`border` and unknown tags: a start position for new rows.
    Element {
        row: u32,
        column: u32,
    },
    /// Pure passthrough carrying only a style.
    Template,
    /// Row source pinned to an explicit row, with its own cursor.
    Jump {
        sheet: usize,
        cursor: u32,
        column: u32,
        current: Option<u32>,
    },
}

/// One node of the template-to-grid mapping tree.
#[derive(Debug, Clone)]
pub struct Container {
    pub parent: Option<ContainerId>,
    pub style: Style,
    pub flags: ScopeFlags,
    pub kind: ContainerKind,
}
