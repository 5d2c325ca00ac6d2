use bitflags::bitflags;

bitflags! {
    /// Ancestry scopes of a container.
    ///
    /// A container inherits its parent's flags and adds the one bit of its
    /// own kind, so the render driver asks "am I inside a cell?" with
    /// `in_cell()` instead of looking at concrete container kinds. Style-only
    /// passthroughs add nothing.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ScopeFlags: u8 {
        const WORKBOOK = 1;
        const SHEET = 1 << 1;
        const ROW = 1 << 2;
        const CELL = 1 << 3;
        /// Positioned element or row jump.
        const CONTAINER = 1 << 4;
        const TEXT = 1 << 5;
    }
}

impl ScopeFlags {
    /// Text scopes are cells that take inline runs.
    pub fn in_cell(self) -> bool {
        self.intersects(Self::CELL | Self::TEXT)
    }

    pub fn in_text(self) -> bool {
        self.contains(Self::TEXT)
    }
}
