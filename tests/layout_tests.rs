//! Layout tests: where template content lands on the grid.
//!
//! These tests render small templates and check the cursor behavior of the
//! layout engine as seen from markup:
//! - tables hand out one row per `tr` and one column per cell
//! - `row="R"` pins a table with its own cursor and filler rows above it
//! - `skip`, `empty-row` and `br` move the cursors
//! - structural mistakes abort the render
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;
mod fixtures;

use common::{assert_text, first_sheet, merge_refs, render, render_body, render_err};
use fixtures::{single_page, table, table_with, TemplateBuilder};
use test_case::test_case;
use xltemplate::{StructuralError, Surface, XltemplateError};

// ============================================================================
// SEQUENTIAL LAYOUT
// ============================================================================

#[test]
fn test_table_rows_and_columns() {
    let grid = render_body(&table(&[&["a", "b", "c"], &["d", "e"]]));

    assert_text(&grid, 1, 1, "a");
    assert_text(&grid, 1, 2, "b");
    assert_text(&grid, 1, 3, "c");
    assert_text(&grid, 2, 1, "d");
    assert_text(&grid, 2, 2, "e");
    assert_eq!(grid.row_count(), 2);
    assert!(merge_refs(&grid).is_empty());
}

#[test]
fn test_consecutive_tables_stack() {
    let body = format!("{}{}", table(&[&["a"], &["b"]]), table(&[&["c"]]));
    let grid = render_body(&body);

    assert_text(&grid, 3, 1, "c");
    assert_eq!(grid.row_count(), 3);
}

#[test]
fn test_paragraphs_take_one_row_each() {
    let grid = render_body("<p>one</p><p>two</p><p>three</p>");

    assert_text(&grid, 1, 1, "one");
    assert_text(&grid, 2, 1, "two");
    assert_text(&grid, 3, 1, "three");
}

#[test]
fn test_table_column_offset() {
    let grid = render_body(&table_with(&[("column", "3")], &[&["a", "b"], &["c"]]));

    assert_text(&grid, 1, 3, "a");
    assert_text(&grid, 1, 4, "b");
    assert_text(&grid, 2, 3, "c");
    assert_text(&grid, 1, 1, "");
}

#[test]
fn test_list_items_are_rows() {
    let grid = render_body("<ul><li>one</li><li>two</li></ul><ol><li>three</li></ol>");

    assert_text(&grid, 1, 1, "one");
    assert_text(&grid, 2, 1, "two");
    assert_text(&grid, 3, 1, "three");
}

#[test]
fn test_heading_then_table() {
    let grid = render_body(&format!("<h1>Title</h1>{}", table(&[&["x"]])));

    assert_text(&grid, 1, 1, "Title");
    assert_text(&grid, 2, 1, "x");
}

// ============================================================================
// ROW JUMPS
// ============================================================================

#[test]
fn test_pinned_table_pads_fillers() {
    let grid = render_body(&format!(
        "<p>top</p>{}",
        table_with(&[("row", "5")], &[&["x", "y"], &["z"]])
    ));

    assert_text(&grid, 1, 1, "top");
    assert_text(&grid, 5, 1, "x");
    assert_text(&grid, 5, 2, "y");
    assert_text(&grid, 6, 1, "z");
    for row in 2..=4 {
        assert!(grid.cell(row, 1).is_none(), "row {row} should be a filler");
    }
    assert_eq!(grid.row_count(), 6);
}

#[test]
fn test_pinned_table_leaves_sheet_cursor() {
    let grid = render_body(&format!(
        "<p>first</p>{}<p>second</p>",
        table_with(&[("row", "10")], &[&["pinned"]])
    ));

    assert_text(&grid, 10, 1, "pinned");
    assert_text(&grid, 2, 1, "second");
}

#[test]
fn test_pinned_table_with_column() {
    let grid = render_body(&table_with(
        &[("row", "3"), ("column", "2")],
        &[&["a", "b"], &["c"]],
    ));

    assert_text(&grid, 3, 2, "a");
    assert_text(&grid, 3, 3, "b");
    assert_text(&grid, 4, 2, "c");
}

#[test]
fn test_sequential_rows_fill_slots_above_pinned_table() {
    let grid = render_body(&format!(
        "{}{}",
        table_with(&[("row", "3")], &[&["pinned"]]),
        table(&[&["a"], &["b"]])
    ));

    assert_text(&grid, 1, 1, "a");
    assert_text(&grid, 2, 1, "b");
    assert_text(&grid, 3, 1, "pinned");
    assert_eq!(grid.row_count(), 3);
}

#[test]
fn test_sequential_table_keeps_pinned_row_content() {
    let grid = render_body(&format!(
        "{}{}",
        table_with(&[("row", "1")], &[&["x"]]),
        table(&[&["y"], &["z"]])
    ));

    assert_text(&grid, 1, 1, "x");
    assert_text(&grid, 1, 2, "y");
    assert_text(&grid, 2, 1, "z");
    assert_eq!(grid.row_count(), 2);
}

// ============================================================================
// SKIPS AND BLANK ROWS
// ============================================================================

#[test]
fn test_skip_cols_claims_span() {
    let grid = render_body("<table><tr><td>a</td><skip cols=\"2\"/><text>b</text></tr></table>");

    assert_text(&grid, 1, 1, "a");
    assert_text(&grid, 1, 5, "b");
    assert_text(&grid, 1, 4, "");
}

#[test]
fn test_bare_skip_claims_one_column() {
    let grid = render_body("<table><tr><skip/><text>b</text></tr></table>");

    assert_text(&grid, 1, 3, "b");
}

#[test_case("<skip rows=\"2\"/>", 4 ; "skip rows")]
#[test_case("<empty-row rows=\"3\"/>", 5 ; "empty rows")]
#[test_case("<empty-row/>", 3 ; "single empty row")]
#[test_case("<br/>", 3 ; "line break outside cell")]
fn test_blank_rows_move_cursor(between: &str, expected_row: u32) {
    let grid = render_body(&format!("<p>a</p>{between}<p>b</p>"));

    assert_text(&grid, 1, 1, "a");
    assert_text(&grid, expected_row, 1, "b");
}

#[test]
fn test_line_break_row_is_visible() {
    let grid = render_body("<p>a</p><br/><p>b</p>");

    assert_text(&grid, 2, 1, " ");
}

// ============================================================================
// STRUCTURAL ERRORS
// ============================================================================

#[test]
fn test_row_inside_row_fails() {
    let err = render_err(&single_page(
        "<table><tr><tr><td>x</td></tr></tr></table>",
    ));

    assert!(err.is_structural());
    assert!(matches!(
        err,
        XltemplateError::Structural(StructuralError::RowInsideRow { row: 1 })
    ));
}

#[test]
fn test_column_skip_in_cell_fails() {
    let err = render_err(&single_page(
        "<table><tr><td><skip cols=\"2\"/></td></tr></table>",
    ));

    assert!(matches!(
        err,
        XltemplateError::Structural(StructuralError::ColumnSkipInCell { row: 1, column: 1 })
    ));
}

#[test]
fn test_content_before_page_fails() {
    let err = render_err("<document><p>orphan</p></document>");

    assert!(matches!(
        err,
        XltemplateError::Structural(StructuralError::NoSheet(_))
    ));
}

#[test]
fn test_row_past_grid_fails() {
    let err = render_err(&single_page(&table_with(
        &[("row", "2000000")],
        &[&["x"]],
    )));

    assert!(matches!(
        err,
        XltemplateError::Structural(StructuralError::OutOfGrid { .. })
    ));
}

#[test_case("<document><page>" ; "unclosed")]
#[test_case("<document/><document/>" ; "two roots")]
#[test_case("" ; "empty source")]
fn test_malformed_markup_is_not_structural(template: &str) {
    let err = render_err(template);

    assert!(!err.is_structural());
}

// ============================================================================
// SHEETS
// ============================================================================

#[test]
fn test_empty_page() {
    let document = render(&single_page(""));
    let grid = first_sheet(&document);

    assert_eq!(document.sheets.len(), 1);
    assert_eq!(grid.row_count(), 0);
    assert_eq!(grid.cell_count(), 0);
    assert!(grid.merges().is_empty());
    assert_eq!(grid.dimension(), None);
}

#[test]
fn test_pages_are_independent() {
    let template = TemplateBuilder::new()
        .page("First", &table(&[&["a"], &["b"]]))
        .page("Second", &table(&[&["c"]]))
        .build();
    let document = render(&template);

    assert_eq!(document.sheets.len(), 2);
    let second = document.sheet("Second").expect("second sheet");
    assert_text(second, 1, 1, "c");
    assert_eq!(second.row_count(), 1);
}

#[test]
fn test_default_and_duplicate_sheet_names() {
    let template = TemplateBuilder::new()
        .unnamed_page("")
        .page("Data", "")
        .page("data", "")
        .page("a/b", "")
        .unnamed_page("")
        .build();
    let document = render(&template);
    let names: Vec<&str> = document.sheets.iter().map(|s| s.name()).collect();

    assert_eq!(names, vec!["Page1", "Data", "data (2)", "a_b", "Page5"]);
}

#[test]
fn test_bare_page_root() {
    let document = render("<page name=\"Solo\"><p>x</p></page>");

    assert_eq!(document.sheets.len(), 1);
    assert_text(first_sheet(&document), 1, 1, "x");
}
