//! Common test utilities and assertion helpers.
//!
//! This module provides helper functions for testing the xltemplate renderer,
//! including rendering shortcuts, XLSX read-back, and grid assertions.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use xltemplate::cell_ref::{parse_cell_ref, range_name};
use xltemplate::{
    render_document, Document, EmptyModel, RenderOptions, SheetGrid, Surface, XltemplateError,
};

// Re-export fixtures for convenience
pub use super::fixtures::*;

// ============================================================================
// Rendering Helpers
// ============================================================================

/// Render a template against an empty model with default options.
///
/// This is a test helper that panics on render failure.
#[must_use]
pub fn render(template: &str) -> Document {
    render_document(template, &EmptyModel, &RenderOptions::default())
        .unwrap_or_else(|e| panic!("render failed: {e}\n{template}"))
}

/// Render a template against a JSON model.
#[must_use]
pub fn render_with(template: &str, model: &serde_json::Value) -> Document {
    render_document(template, model, &RenderOptions::default())
        .unwrap_or_else(|e| panic!("render failed: {e}\n{template}"))
}

/// Render a template that is expected to fail.
#[must_use]
pub fn render_err(template: &str) -> XltemplateError {
    match render_document(template, &EmptyModel, &RenderOptions::default()) {
        Ok(_) => panic!("render unexpectedly succeeded:\n{template}"),
        Err(e) => e,
    }
}

/// The first sheet of a document.
#[must_use]
pub fn first_sheet(document: &Document) -> &SheetGrid {
    document.sheets.first().expect("document has no sheets")
}

/// Render a single-page body and return its sheet.
#[must_use]
pub fn render_body(body: &str) -> SheetGrid {
    let document = render(&single_page(body));
    first_sheet(&document).clone()
}

/// Merged regions of a sheet as A1 references, in creation order.
#[must_use]
pub fn merge_refs(grid: &SheetGrid) -> Vec<String> {
    grid.merges().iter().map(|m| m.a1()).collect()
}

// ============================================================================
// XLSX Read-back
// ============================================================================

/// Names of every entry in an XLSX archive.
#[must_use]
pub fn zip_names(data: &[u8]) -> Vec<String> {
    let archive = zip::ZipArchive::new(Cursor::new(data)).expect("Failed to open ZIP archive");
    archive.file_names().map(str::to_string).collect()
}

/// Read one archive entry as text.
#[must_use]
pub fn zip_entry(data: &[u8], path: &str) -> Option<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data)).expect("Failed to open ZIP archive");
    let mut file = archive.by_name(path).ok()?;
    let mut out = String::new();
    file.read_to_string(&mut out).ok()?;
    Some(out)
}

/// Parse XLSX bytes into a workbook JSON value.
///
/// Sheets carry their name, cells (`r`, `c`, `t`, `v`, `s`) and merge
/// references. Inline-string runs are concatenated.
#[must_use]
pub fn parse_xlsx_to_json(data: &[u8]) -> serde_json::Value {
    let workbook = zip_entry(data, "xl/workbook.xml").expect("workbook.xml missing");
    let names = sheet_names(&workbook);

    let sheets: Vec<serde_json::Value> = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let path = format!("xl/worksheets/sheet{}.xml", i + 1);
            let xml = zip_entry(data, &path).unwrap_or_else(|| panic!("{path} missing"));
            let mut sheet = parse_sheet_data(&xml);
            sheet["name"] = serde_json::json!(name);
            sheet
        })
        .collect();

    serde_json::json!({ "sheets": sheets })
}

fn attr(e: &quick_xml::events::BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .and_then(|a| a.unescape_value().ok().map(|v| v.to_string()))
}

/// Parse workbook.xml to get sheet names.
fn sheet_names(xml: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    let mut names = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e) | Event::Empty(ref e)) if e.local_name().as_ref() == b"sheet" => {
                if let Some(name) = attr(e, b"name") {
                    names.push(name);
                }
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
    }
    names
}

/// Parse sheet data into JSON.
fn parse_sheet_data(xml: &str) -> serde_json::Value {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut cells: Vec<serde_json::Value> = Vec::new();
    let mut merges: Vec<String> = Vec::new();
    let mut current: Option<serde_json::Value> = None;
    let mut in_value = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"c" => current = Some(cell_json(e)),
                b"v" | b"t" => in_value = current.is_some(),
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"c" => cells.push(cell_json(e)),
                b"mergeCell" => merges.extend(attr(e, b"ref")),
                _ => {}
            },
            Ok(Event::Text(t)) if in_value => {
                if let Some(cell) = current.as_mut() {
                    let text = t.unescape().map(|s| s.to_string()).unwrap_or_default();
                    let previous = cell["v"].as_str().unwrap_or("").to_string();
                    cell["v"] = serde_json::json!(previous + &text);
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"c" => cells.extend(current.take()),
                b"v" | b"t" => in_value = false,
                _ => {}
            },
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
    }

    serde_json::json!({ "cells": cells, "merges": merges })
}

fn cell_json(e: &quick_xml::events::BytesStart) -> serde_json::Value {
    let reference = attr(e, b"r").unwrap_or_default();
    let (row, col) = parse_cell_ref(&reference).unwrap_or((0, 0));
    let style: u32 = attr(e, b"s").and_then(|s| s.parse().ok()).unwrap_or(0);
    serde_json::json!({
        "r": row,
        "c": col,
        "t": attr(e, b"t").unwrap_or_else(|| "n".to_string()),
        "s": style,
    })
}

/// Find a cell in a parsed workbook.
#[must_use]
pub fn get_cell(
    workbook: &serde_json::Value,
    sheet: usize,
    row: u32,
    col: u32,
) -> Option<&serde_json::Value> {
    workbook["sheets"][sheet]["cells"]
        .as_array()?
        .iter()
        .find(|c| c["r"] == row && c["c"] == col)
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert the plain text the grid holds at (row, col).
pub fn assert_text(grid: &SheetGrid, row: u32, col: u32, expected: &str) {
    assert_eq!(
        grid.text(row, col),
        expected,
        "Cell text mismatch at {}",
        range_name(row, col, row, col)
    );
}

/// Assert that the grid has a merge with exactly this A1 reference.
pub fn assert_merged(grid: &SheetGrid, reference: &str) {
    let refs = merge_refs(grid);
    assert!(
        refs.iter().any(|r| r == reference),
        "Expected merge {reference}, found {refs:?}"
    );
}

/// Assert that a cell exists in an exported workbook with the expected value.
pub fn assert_cell_value(
    workbook: &serde_json::Value,
    sheet: usize,
    row: u32,
    col: u32,
    expected: &str,
) {
    let cell = get_cell(workbook, sheet, row, col)
        .unwrap_or_else(|| panic!("Cell at row={row}, col={col} not found"));

    let value = cell["v"]
        .as_str()
        .unwrap_or_else(|| panic!("Cell at row={row}, col={col} has no value"));

    assert_eq!(value, expected, "Cell value mismatch at row={row}, col={col}");
}

/// Assert the exported cell type (`n`, `b`, `inlineStr`).
pub fn assert_cell_type(
    workbook: &serde_json::Value,
    sheet: usize,
    row: u32,
    col: u32,
    expected: &str,
) {
    let cell = get_cell(workbook, sheet, row, col)
        .unwrap_or_else(|| panic!("Cell at row={row}, col={col} not found"));
    assert_eq!(cell["t"], expected, "Cell type mismatch at row={row}, col={col}");
}
