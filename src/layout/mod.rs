//! Grid layout engine.
//!
//! Template scopes map onto a tree of containers kept in an arena. Each
//! container answers the same contract: hand out the next cell range, claim
//! a merged block, open a row, skip columns or rows. Row tables per sheet
//! keep the state that outlives a scope, so rows reached again by a later
//! span or jump see what earlier siblings claimed.

mod container;
mod engine;
mod flags;
mod row;
mod sheet;
mod workbook;

pub use container::{Container, ContainerId, ContainerKind};
pub use engine::{Layout, LayoutOptions};
pub use flags::ScopeFlags;
pub use row::{RowSource, RowState};
pub use sheet::{RowTable, SheetState};
pub use workbook::Workbook;
