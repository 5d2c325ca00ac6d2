//! Rendering tests: text runs, styles, data binding, page setup and drawings.
//!
//! Each test renders a small template and inspects the resulting
//! [`SheetGrid`] directly. XLSX output is covered by `export_tests.rs`.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;
mod fixtures;

use common::{assert_text, first_sheet, render, render_body, render_with};
use fixtures::{png_data_url, png_model_string, single_page, TemplateBuilder, PNG_1X1};
use serde_json::json;
use test_case::test_case;
use xltemplate::color::Rgb;
use xltemplate::types::{
    CellValue, ChartType, Drawing, HAlign, ImageFormat, ShapeKind, TextAnchor,
};
use xltemplate::{render_document, EmptyModel, RenderOptions, SheetGrid, Surface, UnknownTags};

fn runs(grid: &SheetGrid, row: u32, col: u32) -> Vec<(String, bool, bool)> {
    match &grid.cell(row, col).expect("cell exists").value {
        CellValue::RichText(runs) => runs
            .iter()
            .map(|r| {
                let (bold, italic) = r.font.as_ref().map_or((false, false), |f| (f.bold, f.italic));
                (r.text.clone(), bold, italic)
            })
            .collect(),
        other => panic!("expected rich text, got {other:?}"),
    }
}

fn font_size(grid: &SheetGrid, row: u32, col: u32) -> f64 {
    grid.cell(row, col)
        .and_then(|c| c.format.as_ref())
        .map(|f| f.font.size)
        .expect("cell has a format")
}

// ============================================================================
// TEXT
// ============================================================================

#[test]
fn test_inline_runs_keep_spacing() {
    let grid = render_body("<p>Total: <b>5</b> units</p>");

    assert_text(&grid, 1, 1, "Total: 5 units");
    assert_eq!(
        runs(&grid, 1, 1),
        vec![
            ("Total: ".to_string(), false, false),
            ("5".to_string(), true, false),
            (" units".to_string(), false, false),
        ]
    );
}

#[test]
fn test_indentation_is_trimmed() {
    let grid = render_body("<p>\n        Hello world\n    </p>");

    assert_text(&grid, 1, 1, "Hello world");
}

#[test]
fn test_italic_text_in_table_cell() {
    let grid = render_body("<table><tr><td><i>slanted</i></td><td>plain</td></tr></table>");

    assert_eq!(runs(&grid, 1, 1), vec![("slanted".to_string(), false, true)]);
    assert_eq!(grid.cell(1, 2).unwrap().value, CellValue::Text("plain".into()));
}

#[test_case("h1", 19.0 ; "h1")]
#[test_case("h3", 15.0 ; "h3")]
#[test_case("h6", 11.0 ; "h6")]
fn test_heading_sizes(tag: &str, expected: f64) {
    let grid = render_body(&format!("<{tag}>Title</{tag}>"));

    assert_eq!(font_size(&grid, 1, 1), expected);
    assert!(grid.cell(1, 1).unwrap().format.as_ref().unwrap().font.bold);
}

#[test]
fn test_document_font_is_the_baseline() {
    let template = TemplateBuilder::new()
        .attr("font-size", "10")
        .attr("font-family", "Arial")
        .page("S", "<h1>Big</h1><p>small</p>")
        .build();
    let document = render(&template);
    let grid = first_sheet(&document);

    assert_eq!(font_size(grid, 1, 1), 18.0);
    assert_eq!(font_size(grid, 2, 1), 10.0);
    let font = &grid.cell(2, 1).unwrap().format.as_ref().unwrap().font;
    assert_eq!(font.name, "Arial");
}

#[test]
fn test_options_font_is_overridden_by_document() {
    let options = RenderOptions {
        font_name: Some("Calibri Light".into()),
        font_size: Some(9.0),
        ..RenderOptions::default()
    };
    let template = TemplateBuilder::new()
        .attr("font-size", "12")
        .page("S", "<p>x</p>")
        .build();
    let document = render_document(&template, &EmptyModel, &options).unwrap();
    let grid = first_sheet(&document);
    let font = &grid.cell(1, 1).unwrap().format.as_ref().unwrap().font;

    assert_eq!(font.name, "Calibri Light");
    assert_eq!(font.size, 12.0);
}

#[test]
fn test_space_and_empty() {
    let grid = render_body("<table><tr><empty/><space/><text>x</text></tr></table>");

    assert_text(&grid, 1, 1, "");
    assert_text(&grid, 1, 2, " ");
    assert_text(&grid, 1, 3, "x");
}

#[test]
fn test_number_cells() {
    let grid = render_body(
        "<table><tr><td><number>12.5</number></td><td><number value=\"abc\"/></td></tr></table>\
         <p>n=<number>4</number></p>",
    );

    assert_eq!(grid.cell(1, 1).unwrap().value, CellValue::Number(12.5));
    assert_eq!(grid.cell(1, 2).unwrap().value, CellValue::Text("abc".into()));
    assert_text(&grid, 2, 1, "n=4");
}

// ============================================================================
// STYLE CASCADE
// ============================================================================

#[test]
fn test_table_style_is_inherited() {
    let grid = render_body(
        "<table bgcolor=\"#DDDDDD\" halign=\"center\">\
            <tr><td>a</td><td halign=\"right\">b</td><td halign=\"sideways\">c</td></tr>\
        </table>",
    );
    let format = |col: u32| grid.cell(1, col).unwrap().format.clone().unwrap();

    assert_eq!(format(1).h_align, HAlign::Center);
    assert_eq!(format(1).fill, Some(Rgb::new(0xDD, 0xDD, 0xDD)));
    assert_eq!(format(2).h_align, HAlign::Right);
    assert_eq!(format(2).fill, Some(Rgb::new(0xDD, 0xDD, 0xDD)));
    assert_eq!(format(3).h_align, HAlign::Center);
}

#[test]
fn test_named_font_color() {
    let grid = render_body("<table><tr><td color=\"red\">warn</td></tr></table>");

    let format = grid.cell(1, 1).unwrap().format.clone().unwrap();
    assert_eq!(format.font.color, Rgb::new(255, 0, 0));
}

#[test]
fn test_row_heights() {
    let grid = render_body(
        "<table row-height=\"20\"><tr><td>a</td></tr><tr height=\"35\"><td>b</td></tr></table>",
    );

    assert_eq!(grid.row_height(1), Some(20.0));
    assert_eq!(grid.row_height(2), Some(35.0));
}

#[test]
fn test_cell_widths() {
    let grid = render_body(
        "<table><tr><td width=\"12\">a</td><td width=\"auto\">b</td><td width=\"fit\">c</td></tr></table>",
    );

    assert_eq!(grid.columns()[&1].width, Some(12.0));
    assert_eq!(grid.columns()[&2].autofit, Some((0.0, 0.0)));
    assert!(grid.cell(1, 3).unwrap().format.as_ref().unwrap().shrink_to_fit);
}

#[test]
fn test_column_definitions() {
    let grid = render_body(
        "<columns>\
            <column index=\"2\" width=\"20\"/>\
            <column index=\"3\" width=\"fit\"/>\
            <column index=\"4\" min-width=\"5\" max-width=\"30\"/>\
            <column width=\"9\"/>\
        </columns>",
    );

    assert_eq!(grid.columns().len(), 3);
    assert_eq!(grid.columns()[&2].width, Some(20.0));
    assert!(grid.columns()[&3].best_fit);
    assert_eq!(grid.columns()[&4].autofit, Some((5.0, 30.0)));
    assert_eq!(grid.column_width(2), Some(20.0));
}

// ============================================================================
// REGIONS
// ============================================================================

#[test]
fn test_div_outlines_its_region() {
    let grid = render_body("<div border=\"box\" rows=\"3\" cols=\"2\"></div>");
    let borders = |row: u32, col: u32| grid.cell(row, col).unwrap().format.clone().unwrap().borders;

    assert!(borders(1, 1).top.is_some());
    assert!(borders(1, 1).left.is_some());
    assert!(borders(1, 2).right.is_some());
    assert!(borders(2, 1).left.is_some());
    assert!(borders(2, 1).top.is_none());
    assert!(borders(2, 2).bottom.is_none());
    assert!(borders(3, 2).bottom.is_some());
}

#[test]
fn test_border_fills_its_region() {
    let grid = render_body("<border bgcolor=\"#FFFF00\" rows=\"2\" cols=\"3\"><p>x</p></border>");

    for row in 1..=2 {
        for col in 1..=3 {
            let fill = grid.cell(row, col).and_then(|c| c.format.as_ref()).and_then(|f| f.fill);
            assert_eq!(fill, Some(Rgb::new(255, 255, 0)), "fill at {row},{col}");
        }
    }
    assert_text(&grid, 1, 1, "x");
}

#[test]
fn test_div_region_follows_content() {
    let grid = render_body(
        "<div border=\"box\"><table><tr><td>a</td><td>b</td></tr><tr><td>c</td><td>d</td></tr></table></div>",
    );
    let borders = |row: u32, col: u32| grid.cell(row, col).unwrap().format.clone().unwrap().borders;

    assert!(borders(1, 1).top.is_some());
    assert!(borders(2, 2).bottom.is_some());
    assert!(borders(2, 2).right.is_some());
}

#[test]
fn test_pinned_div() {
    let grid = render_body("<div row=\"4\" column=\"2\" border=\"box\" cols=\"2\"><text>x</text></div>");

    assert_text(&grid, 4, 2, "x");
    let borders = grid.cell(4, 3).unwrap().format.clone().unwrap().borders;
    assert!(borders.right.is_some());
    assert!(grid.cell(4, 1).is_none());
}

// ============================================================================
// DATA BINDING
// ============================================================================

#[test]
fn test_value_binding() {
    let model = json!({ "name": "Ann", "qty": 3, "paid": true });
    let document = render_with(
        &single_page(
            "<table><tr>\
                <td><value name=\"name\"/></td>\
                <td><value name=\"qty\"/></td>\
                <td><value name=\"paid\"/></td>\
                <td><value name=\"missing\"/></td>\
            </tr></table>",
        ),
        &model,
    );
    let grid = first_sheet(&document);

    assert_eq!(grid.cell(1, 1).unwrap().value, CellValue::Text("Ann".into()));
    assert_eq!(grid.cell(1, 2).unwrap().value, CellValue::Number(3.0));
    assert_text(grid, 1, 3, "true");
    assert_text(grid, 1, 4, "");
}

#[test]
fn test_foreach_rows_with_root_fallback() {
    let model = json!({
        "currency": "EUR",
        "lines": [ { "sku": "A-1", "qty": 2 }, { "sku": "B-2", "qty": 5 } ]
    });
    let document = render_with(
        &single_page(
            "<table>\
                <tr><th>SKU</th><th>Qty</th><th>Cur</th></tr>\
                <foreach name=\"lines\">\
                    <tr><td><value name=\"sku\"/></td><td><value name=\"qty\"/></td><td><value name=\"currency\"/></td></tr>\
                </foreach>\
            </table>",
        ),
        &model,
    );
    let grid = first_sheet(&document);

    assert_text(grid, 1, 1, "SKU");
    assert_text(grid, 2, 1, "A-1");
    assert_text(grid, 3, 1, "B-2");
    assert_eq!(grid.cell(3, 2).unwrap().value, CellValue::Number(5.0));
    assert_text(grid, 3, 3, "EUR");
}

#[test]
fn test_foreach_over_scalars() {
    let model = json!({ "tags": ["x", "y", "z"] });
    let document = render_with(
        &single_page("<ul><foreach name=\"tags\"><li><value/></li></foreach></ul>"),
        &model,
    );
    let grid = first_sheet(&document);

    assert_text(grid, 1, 1, "x");
    assert_text(grid, 3, 1, "z");
}

#[test]
fn test_foreach_without_items_renders_nothing() {
    let model = json!({ "empty": [] });
    let document = render_with(
        &single_page("<table><foreach name=\"empty\"><tr><td>x</td></tr></foreach><foreach name=\"absent\"><tr><td>y</td></tr></foreach></table>"),
        &model,
    );

    assert_eq!(first_sheet(&document).row_count(), 0);
}

#[test]
fn test_nested_foreach() {
    let model = json!({
        "groups": [
            { "name": "g1", "items": [1, 2] },
            { "name": "g2", "items": [3] }
        ]
    });
    let document = render_with(
        &single_page(
            "<table><foreach name=\"groups\">\
                <tr><th><value name=\"name\"/></th></tr>\
                <foreach name=\"items\"><tr><td><value/></td></tr></foreach>\
            </foreach></table>",
        ),
        &model,
    );
    let grid = first_sheet(&document);

    let column: Vec<String> = (1..=5).map(|r| grid.text(r, 1)).collect();
    assert_eq!(column, vec!["g1", "1", "2", "g2", "3"]);
}

#[test]
fn test_plain_template_is_a_passthrough() {
    let grid = render_body("<template><p>inside</p></template><p>after</p>");

    assert_text(&grid, 1, 1, "inside");
    assert_text(&grid, 2, 1, "after");
}

// ============================================================================
// PAGE SETUP
// ============================================================================

#[test]
fn test_page_setup_attributes() {
    let template = TemplateBuilder::new()
        .page_with(
            &[
                ("name", "Print"),
                ("protected", "true"),
                ("print-area", "1,1,5,20"),
                ("page-breaks", "12,30-4"),
                ("fit-to-page", "yes"),
                ("row-height", "18"),
            ],
            "<header halign=\"left\">Company</header><footer>Page &amp;P</footer>",
        )
        .build();
    let document = render(&template);
    let setup = first_sheet(&document).page_setup();

    assert!(setup.protected);
    assert!(setup.fit_to_page);
    assert!(setup.page_break_view);
    assert_eq!(setup.print_area.unwrap().bottom, 20);
    assert_eq!(setup.row_breaks, vec![12, 30]);
    assert_eq!(setup.col_breaks, vec![4]);
    assert_eq!(setup.default_row_height, Some(18.0));
    assert_eq!(setup.header.left.as_deref(), Some("Company"));
    assert_eq!(setup.footer.center.as_deref(), Some("Page &P"));
}

#[test]
fn test_page_without_attributes_has_default_setup() {
    let document = render(&single_page("<p>x</p>"));
    let setup = first_sheet(&document).page_setup();

    assert!(!setup.protected);
    assert_eq!(setup.margins, None);
    assert!(setup.header.is_empty());
}

// ============================================================================
// UNKNOWN TAGS
// ============================================================================

#[test]
fn test_unknown_tags_pass_through() {
    let grid = render_body("<section><p>kept</p></section>");

    assert_text(&grid, 1, 1, "kept");
}

#[test]
fn test_unknown_tags_can_be_ignored() {
    let options = RenderOptions {
        unknown_tags: UnknownTags::Ignore,
        ..RenderOptions::default()
    };
    let document = render_document(
        &single_page("<section><p>dropped</p></section><p>kept</p>"),
        &EmptyModel,
        &options,
    )
    .unwrap();
    let grid = first_sheet(&document);

    assert_text(grid, 1, 1, "kept");
    assert_eq!(grid.row_count(), 1);
}

// ============================================================================
// DRAWINGS
// ============================================================================

#[test]
fn test_image_from_model() {
    let model = json!({ "logo": png_model_string() });
    let document = render_with(
        &single_page("<image name=\"logo\" row=\"2\" column=\"3\" width=\"100\" height=\"50\"/>"),
        &model,
    );
    let drawings = first_sheet(&document).drawings();

    assert_eq!(drawings.len(), 1);
    let Drawing::Picture(picture) = &drawings[0] else {
        panic!("expected a picture, got {:?}", drawings[0]);
    };
    assert_eq!(picture.name, "logo");
    assert_eq!(picture.format, ImageFormat::Png);
    assert_eq!(picture.data, PNG_1X1);
    assert_eq!((picture.row, picture.column), (2, 3));
    assert_eq!((picture.width, picture.height), (100, 50));
}

#[test]
fn test_image_from_data_url_anchors_at_cursor() {
    let grid = render_body(&format!("<image src=\"{}\"/>", png_data_url()));

    let Drawing::Picture(picture) = &grid.drawings()[0] else {
        panic!("expected a picture");
    };
    assert_eq!((picture.row, picture.column), (0, 0));
    assert_eq!(picture.name, "Picture1");
    assert_eq!((picture.width, picture.height), (600, 800));
}

#[test]
fn test_image_from_asset_dir() {
    let dir = std::env::temp_dir().join("xltemplate-render-tests");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("logo.png"), PNG_1X1).unwrap();
    let options = RenderOptions {
        asset_dir: Some(dir),
        ..RenderOptions::default()
    };
    let document = render_document(
        &single_page("<image path=\"logo.png\"/>"),
        &EmptyModel,
        &options,
    )
    .unwrap();

    assert_eq!(first_sheet(&document).drawings().len(), 1);
}

#[test_case("<image name=\"absent\"/>" ; "unbound name")]
#[test_case("<image src=\"base64:aGVsbG8=\"/>" ; "unknown format")]
#[test_case("<image path=\"does/not/exist.png\"/>" ; "missing file")]
#[test_case("<chart title=\"empty\"/>" ; "chart without series")]
fn test_drawings_without_data_are_skipped(body: &str) {
    let grid = render_body(body);

    assert!(grid.drawings().is_empty());
}

#[test]
fn test_shape_attributes() {
    let grid = render_body(
        "<shape shape=\"rect\" row=\"1\" column=\"2\" content=\"Hi\" justify=\"top\" \
         fill-color=\"#FF0000\" offset-x=\"4\" row-height=\"40\"/>\
         <shape shape=\"blob\"/>",
    );

    let Drawing::Shape(shape) = &grid.drawings()[0] else {
        panic!("expected a shape");
    };
    assert_eq!(shape.kind, ShapeKind::Rect);
    assert_eq!(shape.text, "Hi");
    assert_eq!(shape.anchor, TextAnchor::Top);
    assert_eq!(shape.fill_color, Rgb::new(255, 0, 0));
    assert_eq!(shape.border_color, Rgb::BLACK);
    assert_eq!((shape.offset_x, shape.width, shape.height), (4, 50, 50));
    assert_eq!(grid.row_height(2), Some(40.0));

    let Drawing::Shape(fallback) = &grid.drawings()[1] else {
        panic!("expected a shape");
    };
    assert_eq!(fallback.kind, ShapeKind::Line);
}

#[test]
fn test_chart_with_series() {
    let grid = render_body(
        "<chart type=\"scatter\" title=\"Trend\" row=\"5\" column=\"1\" legend-enabled=\"false\" y-limit=\"0,100\">\
            <series legend=\"Sales\" line-color=\"#00FF00\" marker=\"circle\">\
                <x-axis start-row=\"2\" end-row=\"4\" start-column=\"1\" end-column=\"1\"/>\
                <y-axis start-row=\"2\" end-row=\"4\" start-column=\"2\" end-column=\"2\"/>\
            </series>\
            <series/>\
        </chart>",
    );

    let Drawing::Chart(chart) = &grid.drawings()[0] else {
        panic!("expected a chart");
    };
    assert_eq!(chart.chart_type, ChartType::Scatter);
    assert_eq!(chart.title.as_deref(), Some("Trend"));
    assert_eq!((chart.row, chart.column), (5, 1));
    assert_eq!(chart.legend, None);
    assert_eq!(chart.y_limit.max, Some(100.0));
    assert_eq!(chart.series.len(), 2);
    assert_eq!(chart.series[0].x_range.unwrap().a1(), "A2:A4");
    assert_eq!(chart.series[0].y_range.unwrap().a1(), "B2:B4");
    assert_eq!(chart.series[0].marker_color, Rgb::new(0, 255, 0));
    assert_eq!(chart.series[1].line_color, Rgb::CADET_BLUE);
}

// ============================================================================
// DOCUMENT
// ============================================================================

#[test]
fn test_document_json() {
    let document = render(&single_page("<table><tr><td>a</td></tr></table>"));
    let json: serde_json::Value = serde_json::from_str(&document.to_json().unwrap()).unwrap();

    assert_eq!(json["sheets"][0]["name"], "Sheet");
    let cell = &json["sheets"][0]["cells"][0];
    assert_eq!(cell["row"], 1);
    assert_eq!(cell["col"], 1);
    assert_eq!(cell["cell"]["value"]["type"], "text");
    assert_eq!(cell["cell"]["value"]["value"], "a");
}
