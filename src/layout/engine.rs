use crate::cell_ref::{MAX_COLUMN, MAX_ROW};
use crate::error::{Result, StructuralError, XltemplateError};
use crate::surface::Surface;
use crate::types::{CellRange, PageStyle, Style};

use super::container::{Container, ContainerId, ContainerKind};
use super::row::{RowSource, RowState};
use super::workbook::Workbook;
use super::ScopeFlags;

/// Tunables of the layout engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutOptions {
    /// Upper bound on merge-skipping retries. With `None` the search runs until
    /// it finds a free cell or leaves the grid.
    pub max_merge_retries: Option<u32>,
}

/// The container arena plus the workbook it lays out.
///
/// Containers are addressed by [`ContainerId`] and refer to their parent by
/// id. They are never removed during a render; the row tables inside the
/// workbook hold the state that outlives a scope.
#[derive(Debug)]
pub struct Layout<S> {
    workbook: Workbook<S>,
    containers: Vec<Container>,
    options: LayoutOptions,
    extents: Vec<Option<CellRange>>,
}

fn union(a: Option<CellRange>, b: CellRange) -> CellRange {
    match a {
        Some(a) => CellRange::new(
            a.start_row.min(b.start_row),
            a.start_col.min(b.start_col),
            a.end_row.max(b.end_row),
            a.end_col.max(b.end_col),
        ),
        None => b,
    }
}

fn no_page() -> XltemplateError {
    StructuralError::NoSheet("content outside of a page".to_string()).into()
}

fn out_of_grid(row: u32, column: u32) -> XltemplateError {
    StructuralError::OutOfGrid { row, column }.into()
}

impl<S: Surface> Layout<S> {
    pub fn new(page_style: PageStyle, options: LayoutOptions) -> Self {
        let workbook = Workbook::new(page_style);
        let root = Container {
            parent: None,
            style: workbook.baseline().clone(),
            flags: ScopeFlags::WORKBOOK,
            kind: ContainerKind::Workbook,
        };
        Self {
            workbook,
            containers: vec![root],
            options,
            extents: Vec::new(),
        }
    }

    /// The workbook container every page hangs off.
    pub fn root(&self) -> ContainerId {
        ContainerId(0)
    }

    pub fn workbook(&self) -> &Workbook<S> {
        &self.workbook
    }

    pub fn into_surfaces(self) -> Vec<S> {
        self.workbook.into_surfaces()
    }

    pub fn container(&self, id: ContainerId) -> Result<&Container> {
        self.containers
            .get(id.0)
            .ok_or_else(|| XltemplateError::Template(format!("unknown container #{}", id.0)))
    }

    fn container_mut(&mut self, id: ContainerId) -> Result<&mut Container> {
        self.containers
            .get_mut(id.0)
            .ok_or_else(|| XltemplateError::Template(format!("unknown container #{}", id.0)))
    }

    pub fn style(&self, id: ContainerId) -> Result<&Style> {
        Ok(&self.container(id)?.style)
    }

    pub fn flags(&self, id: ContainerId) -> Result<ScopeFlags> {
        Ok(self.container(id)?.flags)
    }

    fn push(
        &mut self,
        parent: ContainerId,
        style: Style,
        flags: ScopeFlags,
        kind: ContainerKind,
    ) -> ContainerId {
        self.containers.push(Container {
            parent: Some(parent),
            style,
            flags,
            kind,
        });
        ContainerId(self.containers.len() - 1)
    }

    fn parent(&self, id: ContainerId) -> Result<ContainerId> {
        self.container(id)?
            .parent
            .ok_or_else(no_page)
    }

    // ---- construction -------------------------------------------------

    /// Create a sheet and its container under the workbook.
    pub fn open_sheet(&mut self, name: &str, style: Style) -> ContainerId {
        let sheet = self.workbook.add_sheet(name, style.clone());
        let root = self.root();
        let flags = ScopeFlags::WORKBOOK | ScopeFlags::SHEET;
        self.push(root, style, flags, ContainerKind::Sheet { sheet })
    }

    /// Passthrough element positioned at `row`/`column`, defaulting to the
    /// parent's position.
    pub fn element(
        &mut self,
        parent: ContainerId,
        style: Style,
        row: Option<u32>,
        column: Option<u32>,
    ) -> Result<ContainerId> {
        let row = match row {
            Some(r) => r,
            None => self.row(parent)?,
        };
        let column = match column {
            Some(c) => c,
            None => self.column(parent)?,
        };
        let flags = self.flags(parent)? | ScopeFlags::CONTAINER;
        Ok(self.push(parent, style, flags, ContainerKind::Element { row, column }))
    }

    /// Style-only passthrough. Without a style it inherits the parent's.
    pub fn template(&mut self, parent: ContainerId, style: Option<Style>) -> Result<ContainerId> {
        let style = match style {
            Some(s) => s,
            None => self.style(parent)?.clone(),
        };
        let flags = self.flags(parent)?;
        Ok(self.push(parent, style, flags, ContainerKind::Template))
    }

    /// A fixed cell scope over `range`. Text scopes accept inline runs.
    pub fn cell(
        &mut self,
        parent: ContainerId,
        range: CellRange,
        style: Style,
        text: bool,
    ) -> Result<ContainerId> {
        let own = if text {
            ScopeFlags::TEXT
        } else {
            ScopeFlags::CELL
        };
        let flags = self.flags(parent)? | own;
        Ok(self.push(parent, style, flags, ContainerKind::Cell { range }))
    }

    /// Row-jump wrapper bound to `row`.
    ///
    /// Pads the row table with fillers up to `row - 1` and materializes `row`
    /// itself. The wrapper's own cursor starts at `row`, so its first
    /// `new_row` reuses that slot. The sheet cursor does not move.
    pub fn jump(&mut self, parent: ContainerId, row: u32, style: Style) -> Result<ContainerId> {
        if row == 0 || row > MAX_ROW {
            return Err(out_of_grid(row, 1));
        }
        let sheet = self.sheet_index(parent)?;
        let column = self.column(parent)?.max(1);
        let flags = self.flags(parent)? | ScopeFlags::CONTAINER;
        let id = ContainerId(self.containers.len());
        let source = RowSource::Jump(id);
        let state = self.workbook.sheet_mut(sheet)?;
        state.pad_rows(row.saturating_sub(1), source);
        state.place_row(RowState::new(row, column, style.clone(), source));
        tracing::debug!(sheet, row, column, "row jump");
        Ok(self.push(
            parent,
            style,
            flags,
            ContainerKind::Jump {
                sheet,
                cursor: row,
                column,
                current: Some(row),
            },
        ))
    }

    // ---- queries ------------------------------------------------------

    /// Index of the sheet a container writes into.
    pub fn sheet_index(&self, id: ContainerId) -> Result<usize> {
        let mut cur = id;
        loop {
            match &self.container(cur)?.kind {
                ContainerKind::Sheet { sheet }
                | ContainerKind::Row { sheet, .. }
                | ContainerKind::Jump { sheet, .. } => return Ok(*sheet),
                ContainerKind::Workbook => return self.workbook.current().ok_or_else(no_page),
                ContainerKind::Cell { .. }
                | ContainerKind::Element { .. }
                | ContainerKind::Template => cur = self.parent(cur)?,
            }
        }
    }

    pub fn surface(&self, id: ContainerId) -> Result<&S> {
        let sheet = self.sheet_index(id)?;
        Ok(&self.workbook.sheet(sheet)?.surface)
    }

    pub fn surface_mut(&mut self, id: ContainerId) -> Result<&mut S> {
        let sheet = self.sheet_index(id)?;
        Ok(&mut self.workbook.sheet_mut(sheet)?.surface)
    }

    /// Row the container currently writes on.
    pub fn row(&self, id: ContainerId) -> Result<u32> {
        match &self.container(id)?.kind {
            ContainerKind::Workbook => Ok(1),
            ContainerKind::Sheet { sheet } => Ok(self.workbook.sheet(*sheet)?.cursor),
            ContainerKind::Row { sheet, slot } => Ok(self.row_state(*sheet, *slot)?.row),
            ContainerKind::Cell { range } => Ok(range.start_row),
            ContainerKind::Element { row, .. } => Ok(*row),
            ContainerKind::Template => self.row(self.parent(id)?),
            ContainerKind::Jump {
                cursor, current, ..
            } => Ok(current.unwrap_or(*cursor)),
        }
    }

    /// Column the container currently writes at.
    pub fn column(&self, id: ContainerId) -> Result<u32> {
        match &self.container(id)?.kind {
            ContainerKind::Workbook | ContainerKind::Sheet { .. } => Ok(1),
            ContainerKind::Row { sheet, slot } => Ok(self.row_state(*sheet, *slot)?.column),
            ContainerKind::Cell { range } => Ok(range.start_col),
            ContainerKind::Element { column, .. } | ContainerKind::Jump { column, .. } => {
                Ok(*column)
            }
            ContainerKind::Template => self.column(self.parent(id)?),
        }
    }

    pub fn row_state(&self, sheet: usize, slot: u32) -> Result<&RowState> {
        self.workbook
            .sheet(sheet)?
            .rows
            .get(slot)
            .ok_or_else(|| out_of_grid(slot, 1))
    }

    fn row_state_mut(&mut self, sheet: usize, slot: u32) -> Result<&mut RowState> {
        self.workbook
            .sheet_mut(sheet)?
            .rows
            .get_mut(slot)
            .ok_or_else(|| out_of_grid(slot, 1))
    }

    /// Nearest row source above (or at) a container.
    fn source_of(&self, id: ContainerId) -> Result<(usize, RowSource)> {
        let mut cur = id;
        loop {
            match &self.container(cur)?.kind {
                ContainerKind::Sheet { sheet } => return Ok((*sheet, RowSource::Sheet)),
                ContainerKind::Jump { sheet, .. } => return Ok((*sheet, RowSource::Jump(cur))),
                ContainerKind::Row { sheet, slot } => {
                    return Ok((*sheet, self.row_state(*sheet, *slot)?.source))
                }
                ContainerKind::Workbook => {
                    let sheet = self.workbook.current().ok_or_else(no_page)?;
                    return Ok((sheet, RowSource::Sheet));
                }
                ContainerKind::Cell { .. }
                | ContainerKind::Element { .. }
                | ContainerKind::Template => cur = self.parent(cur)?,
            }
        }
    }

    fn cursor(&self, sheet: usize, source: RowSource) -> Result<u32> {
        match source {
            RowSource::Sheet => Ok(self.workbook.sheet(sheet)?.cursor),
            RowSource::Jump(id) => match &self.container(id)?.kind {
                ContainerKind::Jump { cursor, .. } => Ok(*cursor),
                _ => Err(no_page()),
            },
        }
    }

    fn set_cursor(
        &mut self,
        sheet: usize,
        source: RowSource,
        value: u32,
        current: Option<u32>,
    ) -> Result<()> {
        match source {
            RowSource::Sheet => {
                let state = self.workbook.sheet_mut(sheet)?;
                state.cursor = value;
                state.current_row = current;
            }
            RowSource::Jump(id) => {
                if let ContainerKind::Jump {
                    cursor,
                    current: cur,
                    ..
                } = &mut self.container_mut(id)?.kind
                {
                    *cursor = value;
                    *cur = current;
                }
            }
        }
        Ok(())
    }

    fn current_of(&self, sheet: usize, source: RowSource) -> Result<Option<u32>> {
        match source {
            RowSource::Sheet => Ok(self.workbook.sheet(sheet)?.current_row),
            RowSource::Jump(id) => match &self.container(id)?.kind {
                ContainerKind::Jump { current, .. } => Ok(*current),
                _ => Err(no_page()),
            },
        }
    }

    fn home_of(&self, source: RowSource) -> Result<u32> {
        match source {
            RowSource::Sheet => Ok(1),
            RowSource::Jump(id) => self.column(id),
        }
    }

    fn source_style(&self, sheet: usize, source: RowSource) -> Result<Style> {
        match source {
            RowSource::Sheet => Ok(self.workbook.sheet(sheet)?.style.clone()),
            RowSource::Jump(id) => Ok(self.style(id)?.clone()),
        }
    }

    // ---- extent tracking ----------------------------------------------

    /// Start collecting the bounding box of every range handed out.
    pub fn begin_extent(&mut self) {
        self.extents.push(None);
    }

    /// Stop the innermost collection and fold it into the enclosing one.
    pub fn end_extent(&mut self) -> Option<CellRange> {
        let extent = self.extents.pop().flatten();
        if let (Some(range), Some(outer)) = (extent, self.extents.last_mut()) {
            *outer = Some(union(*outer, range));
        }
        extent
    }

    fn record(&mut self, range: CellRange) {
        if let Some(top) = self.extents.last_mut() {
            *top = Some(union(*top, range));
        }
    }

    // ---- row sources --------------------------------------------------

    /// Materialize `row_span` rows at the source cursor. Returns the first.
    fn materialize_rows(
        &mut self,
        sheet: usize,
        source: RowSource,
        style: &Style,
        row_span: u32,
        home: u32,
    ) -> Result<u32> {
        let start = self.cursor(sheet, source)?;
        let span = row_span.max(1);
        let end = start.saturating_add(span - 1);
        if end > MAX_ROW {
            return Err(out_of_grid(end, home));
        }
        let state = self.workbook.sheet_mut(sheet)?;
        for row in start..=end {
            state.place_row(RowState::new(row, home, style.clone(), source));
        }
        self.set_cursor(sheet, source, end.saturating_add(1), Some(start))?;
        tracing::debug!(sheet, row = start, row_span = span, "new row");
        Ok(start)
    }

    /// The source's current row, created on demand.
    fn current_slot(&mut self, sheet: usize, source: RowSource) -> Result<u32> {
        if let Some(slot) = self.current_of(sheet, source)? {
            return Ok(slot);
        }
        let style = self.source_style(sheet, source)?;
        let home = self.home_of(source)?;
        self.materialize_rows(sheet, source, &style, 1, home)
    }

    fn source_skip_row(
        &mut self,
        sheet: usize,
        source: RowSource,
        target: u32,
        row_span: u32,
    ) -> Result<()> {
        let size = target.saturating_add(row_span);
        let state = self.workbook.sheet_mut(sheet)?;
        if state.rows.len() >= size {
            return Ok(());
        }
        state.pad_rows(size, source);
        let next = state.rows.len().saturating_add(1);
        let cursor = self.cursor(sheet, source)?.max(next);
        let current = self.current_of(sheet, source)?;
        self.set_cursor(sheet, source, cursor, current)
    }

    // ---- row operations -----------------------------------------------

    fn row_get_range(&mut self, sheet: usize, slot: u32, style: Option<&Style>) -> Result<CellRange> {
        let mut state = self.row_state(sheet, slot)?.clone();
        while state.style.merged_col.is_between(state.column) {
            state.column = state.column.saturating_add(1);
            if state.column > MAX_COLUMN {
                return Err(out_of_grid(state.row, state.column));
            }
        }
        let surface = &self.workbook.sheet(sheet)?.surface;
        let range = if surface.merged_at(state.row, state.column).is_some() {
            *self.row_state_mut(sheet, slot)? = state;
            self.row_merged_range(sheet, slot, 1, 1)?
        } else {
            let range = surface.range_at(CellRange::cell(state.row, state.column))?;
            state.column = state.column.saturating_add(1);
            *self.row_state_mut(sheet, slot)? = state;
            range
        };
        let style = match style {
            Some(s) => s.clone(),
            None => self.row_state(sheet, slot)?.style.clone(),
        };
        self.workbook
            .sheet_mut(sheet)?
            .surface
            .set_style(range, &style)?;
        self.record(range);
        Ok(range)
    }

    fn row_merged_range(
        &mut self,
        sheet: usize,
        slot: u32,
        row_span: u32,
        col_span: u32,
    ) -> Result<CellRange> {
        let (row_span, col_span) = (row_span.max(1), col_span.max(1));
        let mut state = self.row_state(sheet, slot)?.clone();
        // every retry moves right or wraps down, so the grid limits end it
        let bound = self.options.max_merge_retries;
        let mut retries = 0u32;
        loop {
            let covering = self
                .workbook
                .sheet(sheet)?
                .surface
                .merged_at(state.row, state.column);
            let Some(merge) = covering else { break };
            retries = retries.saturating_add(1);
            if bound.is_some_and(|b| retries > b) {
                return Err(StructuralError::MergeUnresolvable {
                    row: state.row,
                    column: state.column,
                }
                .into());
            }
            state.column = merge.end_col.saturating_add(1);
            if state.last_column().is_some_and(|last| state.column > last) {
                let consumed = merge.end_row.saturating_sub(state.row).saturating_add(1);
                tracing::debug!(row = state.row, consumed, "merge wraps row");
                state.column = state.home_column;
                self.source_skip_row(sheet, state.source, state.row, consumed)?;
                state.row = state.row.saturating_add(consumed);
            }
            if state.column > MAX_COLUMN || state.row > MAX_ROW {
                return Err(StructuralError::MergeUnresolvable {
                    row: state.row,
                    column: state.column,
                }
                .into());
            }
        }

        let end_row = state.row.saturating_add(row_span - 1);
        let end_col = state.column.saturating_add(col_span - 1);
        let surface = &mut self.workbook.sheet_mut(sheet)?.surface;
        let range = surface.range_at(CellRange::new(state.row, state.column, end_row, end_col))?;
        if row_span > 1 {
            state.style.set_merged_row(state.row, row_span - 1);
        } else if col_span > 1 {
            state.style.set_merged_col(state.column, col_span - 1);
        }
        if !range.is_single() {
            surface.set_merged(range)?;
        }
        state.column = state.column.saturating_add(col_span);
        *self.row_state_mut(sheet, slot)? = state;
        self.record(range);
        Ok(range)
    }

    fn row_skip_column(&mut self, sheet: usize, slot: u32, count: u32) -> Result<()> {
        if count == 0 {
            return Ok(());
        }
        let mut state = self.row_state(sheet, slot)?.clone();
        let start = state.column;
        let end = start.saturating_add(count);
        let range = CellRange::new(state.row, start, state.row, end);
        self.workbook
            .sheet_mut(sheet)?
            .surface
            .set_style(range, &state.style)?;
        state.style.set_merged_col(start, count);
        state.column = end;
        *self.row_state_mut(sheet, slot)? = state;
        self.record(range);
        Ok(())
    }

    // ---- the container contract ---------------------------------------

    /// Next free single cell, styled with `style` (or the row's style).
    pub fn get_range(&mut self, id: ContainerId, style: Option<&Style>) -> Result<CellRange> {
        match self.container(id)?.kind.clone() {
            ContainerKind::Workbook | ContainerKind::Sheet { .. } | ContainerKind::Jump { .. } => {
                let (sheet, source) = self.source_of(id)?;
                let slot = self.current_slot(sheet, source)?;
                self.row_get_range(sheet, slot, style)
            }
            ContainerKind::Row { sheet, slot } => self.row_get_range(sheet, slot, style),
            ContainerKind::Cell { range } => {
                self.record(range);
                Ok(range)
            }
            ContainerKind::Element { .. } | ContainerKind::Template => {
                let parent = self.parent(id)?;
                self.get_range(parent, style)
            }
        }
    }

    /// Claim a `row_span` x `col_span` block at the next free position.
    pub fn get_merged_range(
        &mut self,
        id: ContainerId,
        row_span: u32,
        col_span: u32,
    ) -> Result<CellRange> {
        match self.container(id)?.kind.clone() {
            ContainerKind::Workbook | ContainerKind::Sheet { .. } | ContainerKind::Jump { .. } => {
                let (sheet, source) = self.source_of(id)?;
                let slot = self.current_slot(sheet, source)?;
                self.row_merged_range(sheet, slot, row_span, col_span)
            }
            ContainerKind::Row { sheet, slot } => {
                self.row_merged_range(sheet, slot, row_span, col_span)
            }
            ContainerKind::Cell { range } => {
                self.record(range);
                Ok(range)
            }
            ContainerKind::Element { .. } | ContainerKind::Template => {
                let parent = self.parent(id)?;
                self.get_merged_range(parent, row_span, col_span)
            }
        }
    }

    /// Hand out a new row (or `row_span` rows) and return a row container
    /// for the first.
    ///
    /// Inside a cell no row is created: a styled request opens a nested cell
    /// scope after a line break, an unstyled one only breaks the line.
    pub fn new_row(
        &mut self,
        id: ContainerId,
        style: Option<Style>,
        row_span: u32,
    ) -> Result<ContainerId> {
        let container = self.container(id)?;
        match container.kind.clone() {
            ContainerKind::Row { sheet, slot } => Err(StructuralError::RowInsideRow {
                row: self.row_state(sheet, slot)?.row,
            }
            .into()),
            ContainerKind::Cell { range } => {
                let surface = self.surface_mut(id)?;
                let has_text = surface
                    .cell(range.start_row, range.start_col)
                    .is_some_and(|c| !c.value.is_empty());
                if has_text {
                    surface.append_newline(range.start_row, range.start_col)?;
                }
                match style {
                    Some(style) => {
                        let flags = self.flags(id)?;
                        Ok(self.push(id, style, flags, ContainerKind::Cell { range }))
                    }
                    None => Ok(id),
                }
            }
            ContainerKind::Template => {
                let style = match style {
                    Some(s) => s,
                    None => container.style.clone(),
                };
                let parent = self.parent(id)?;
                self.new_row(parent, Some(style), row_span)
            }
            ContainerKind::Workbook | ContainerKind::Sheet { .. } | ContainerKind::Jump { .. } => {
                let style = style.unwrap_or_else(|| container.style.clone());
                let (sheet, source) = self.source_of(id)?;
                let home = self.home_of(source)?;
                self.open_row(id, sheet, source, style, row_span, home)
            }
            ContainerKind::Element { column, .. } => {
                let style = style.unwrap_or_else(|| container.style.clone());
                let (sheet, source) = self.source_of(id)?;
                self.open_row(id, sheet, source, style, row_span, column)
            }
        }
    }

    fn open_row(
        &mut self,
        requester: ContainerId,
        sheet: usize,
        source: RowSource,
        style: Style,
        row_span: u32,
        home: u32,
    ) -> Result<ContainerId> {
        let slot = self.materialize_rows(sheet, source, &style, row_span, home)?;
        let flags = self.flags(requester)? | ScopeFlags::ROW;
        Ok(self.push(requester, style, flags, ContainerKind::Row { sheet, slot }))
    }

    /// Claim `count` columns at the cursor of the nearest row.
    pub fn skip_column(&mut self, id: ContainerId, count: u32) -> Result<()> {
        match self.container(id)?.kind.clone() {
            ContainerKind::Row { sheet, slot } => self.row_skip_column(sheet, slot, count),
            ContainerKind::Cell { range } => Err(StructuralError::ColumnSkipInCell {
                row: range.start_row,
                column: range.start_col,
            }
            .into()),
            ContainerKind::Workbook | ContainerKind::Sheet { .. } | ContainerKind::Jump { .. } => {
                let (sheet, source) = self.source_of(id)?;
                let slot = self.current_slot(sheet, source)?;
                self.row_skip_column(sheet, slot, count)
            }
            ContainerKind::Element { .. } | ContainerKind::Template => {
                let parent = self.parent(id)?;
                self.skip_column(parent, count)
            }
        }
    }

    /// Make sure rows `target..target + row_span` exist, moving the source
    /// cursor past any fillers it had to add.
    pub fn skip_row(&mut self, id: ContainerId, target: u32, row_span: u32) -> Result<()> {
        let (sheet, source) = self.source_of(id)?;
        self.source_skip_row(sheet, source, target, row_span)
    }

    /// Reposition the container's column cursor.
    pub fn set_column(&mut self, id: ContainerId, value: u32) -> Result<()> {
        let value = value.max(1);
        match self.container(id)?.kind.clone() {
            ContainerKind::Element { row, .. } => {
                self.container_mut(id)?.kind = ContainerKind::Element { row, column: value };
            }
            ContainerKind::Jump { sheet, current, .. } => {
                if let ContainerKind::Jump { column, .. } = &mut self.container_mut(id)?.kind {
                    *column = value;
                }
                if let Some(slot) = current {
                    let state = self.row_state_mut(sheet, slot)?;
                    state.column = value;
                    state.home_column = value;
                }
            }
            ContainerKind::Row { sheet, slot } => {
                self.row_state_mut(sheet, slot)?.column = value;
            }
            ContainerKind::Template => {
                let parent = self.parent(id)?;
                self.set_column(parent, value)?;
            }
            ContainerKind::Workbook | ContainerKind::Sheet { .. } | ContainerKind::Cell { .. } => {}
        }
        Ok(())
    }

    /// Advance the nearest source by `count` blank rows.
    pub fn make_empty_rows(&mut self, id: ContainerId, count: u32) -> Result<()> {
        if count == 0 {
            return Ok(());
        }
        let (sheet, source) = self.source_of(id)?;
        let cursor = self.cursor(sheet, source)?;
        let next = cursor.saturating_add(count);
        if next.saturating_sub(1) > MAX_ROW {
            return Err(out_of_grid(next, 1));
        }
        self.workbook
            .sheet_mut(sheet)?
            .pad_rows(next.saturating_sub(1), source);
        self.set_cursor(sheet, source, next, None)
    }

    /// One visible blank row: a space is written so the row survives export.
    pub fn make_empty_row(&mut self, id: ContainerId) -> Result<()> {
        let (sheet, source) = self.source_of(id)?;
        let row = self.cursor(sheet, source)?;
        let home = self.home_of(source)?;
        check_row(row)?;
        let state = self.workbook.sheet_mut(sheet)?;
        state.pad_rows(row, source);
        state.surface.write_text(row, home, " ", None)?;
        self.set_cursor(sheet, source, row.saturating_add(1), None)
    }

    /// Merge a block that starts on the given row container and move its
    /// cursor past the block's columns.
    pub fn merge_region(
        &mut self,
        id: ContainerId,
        start_row: u32,
        start_col: u32,
        rows: u32,
        cols: u32,
    ) -> Result<CellRange> {
        let range = CellRange::new(
            start_row,
            start_col,
            start_row.saturating_add(rows.max(1) - 1),
            start_col.saturating_add(cols.max(1) - 1),
        );
        if let ContainerKind::Row { sheet, slot } = self.container(id)?.kind {
            self.row_state_mut(sheet, slot)?.column = range.end_col.saturating_add(1);
        }
        let surface = self.surface_mut(id)?;
        let range = surface.range_at(range)?;
        surface.set_merged(range)?;
        Ok(range)
    }
}

fn check_row(row: u32) -> Result<()> {
    if row == 0 || row > MAX_ROW {
        return Err(out_of_grid(row, 1));
    }
    Ok(())
}
