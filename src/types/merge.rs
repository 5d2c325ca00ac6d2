use serde::{Deserialize, Serialize};
use std::ops::BitOr;

/// A claimed contiguous range on the row or column axis.
///
/// `count` is the number of indices claimed after `start`, so a span covers
/// `start..=start + count` and [`MergeSpan::is_between`] answers for the
/// claimed indices other than `start` itself.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MergeSpan {
    pub start: u32,
    pub count: u32,
    pub is_merged: bool,
}

impl MergeSpan {
    pub fn new(start: u32, count: u32) -> Self {
        Self {
            start,
            count,
            is_merged: count > 0,
        }
    }

    /// Last claimed index.
    pub fn end(self) -> u32 {
        self.start.saturating_add(self.count)
    }

    /// `start < value <= start + count`
    pub fn is_between(self, value: u32) -> bool {
        self.start < value && value <= self.end()
    }
}

/// Combining two spans asks whether either one is merged.
impl BitOr for MergeSpan {
    type Output = bool;

    fn bitor(self, rhs: Self) -> bool {
        self.is_merged || rhs.is_merged
    }
}
