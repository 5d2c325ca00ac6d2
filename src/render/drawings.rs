//! `image`, `shape` and `chart`: the drawing layer.
//!
//! Drawing anchors are 0-based cell offsets. When a tag gives no position the
//! anchor is the cell the enclosing container is writing at.

use std::path::Path;

use crate::color::{parse_color_or, Rgb};
use crate::error::Result;
use crate::layout::ContainerId;
use crate::model::{decode_bytes, ModelValue};
use crate::surface::Surface;
use crate::template::Node;
use crate::types::{
    AxisLimit, CellRange, Chart, ChartSeries, ChartType, ImageFormat, LegendPosition, Marker,
    Picture, Shape, ShapeKind, TextAnchor,
};
use crate::xml_helpers::{attr_bool, attr_f64, attr_parse, attr_u32};

use super::Renderer;

const PICTURE_WIDTH: u32 = 600;
const PICTURE_HEIGHT: u32 = 800;
const SHAPE_SIZE: u32 = 50;

impl<S: Surface> Renderer<'_, S> {
    /// 0-based anchor from `row`/`column`, defaulting to the container position.
    fn anchor(&self, parent: ContainerId, node: &Node) -> Result<(u32, u32)> {
        let row = match attr_u32(node, "row") {
            Some(r) => r,
            None => self.layout.row(parent)?.saturating_sub(1),
        };
        let column = match attr_u32(node, "column") {
            Some(c) => c,
            None => self.layout.column(parent)?.saturating_sub(1),
        };
        Ok((row, column))
    }

    /// Bytes for a picture: a bound model value, an inline `src`, or a file
    /// under the asset directory.
    fn image_bytes(&self, node: &Node) -> Option<Vec<u8>> {
        if let Some(src) = node.attr("src") {
            return decode_bytes(src);
        }
        if let Some(path) = node.attr("path") {
            let full = match &self.options.asset_dir {
                Some(dir) => dir.join(path),
                None => Path::new(path).to_path_buf(),
            };
            return match std::fs::read(&full) {
                Ok(bytes) => Some(bytes),
                Err(e) => {
                    tracing::warn!(path = %full.display(), "cannot read image: {e}");
                    None
                }
            };
        }
        match node.attr("name").and_then(|name| self.lookup(name)) {
            Some(ModelValue::Bytes(bytes)) => Some(bytes),
            Some(ModelValue::Text(text)) => decode_bytes(&text),
            _ => None,
        }
    }

    pub(super) fn image(&mut self, parent: ContainerId, node: &Node) -> Result<()> {
        let Some(data) = self.image_bytes(node) else {
            tracing::warn!(name = ?node.attr("name"), "image has no data, skipped");
            return Ok(());
        };
        let Some(format) = ImageFormat::detect(&data) else {
            tracing::warn!(name = ?node.attr("name"), "unknown image format, skipped");
            return Ok(());
        };
        let (row, column) = self.anchor(parent, node)?;
        let surface = self.layout.surface_mut(parent)?;
        let name = node
            .attr("name")
            .map_or_else(|| format!("Picture{}", row + 1), str::to_string);
        surface.add_picture(Picture {
            name,
            format,
            data,
            row,
            column,
            width: attr_u32(node, "width").unwrap_or(PICTURE_WIDTH),
            height: attr_u32(node, "height").unwrap_or(PICTURE_HEIGHT),
        });
        Ok(())
    }

    /// `shape`: preset geometry with fill, outline and optional text in the
    /// container's font. `row-height` resizes the anchor row.
    pub(super) fn shape(&mut self, parent: ContainerId, node: &Node) -> Result<()> {
        let (row, column) = self.anchor(parent, node)?;
        let font = self.layout.style(parent)?.font.clone();
        let kind = node.attr("shape").map_or(ShapeKind::Line, |s| {
            s.parse().unwrap_or_else(|_| {
                tracing::warn!(shape = s, "unknown shape, drawing a line");
                ShapeKind::Line
            })
        });
        let shape = Shape {
            name: node
                .attr("name")
                .map_or_else(|| format!("Shape{}", row + 1), str::to_string),
            kind,
            fill_color: node
                .attr("fill-color")
                .map_or(Rgb::WHITE, |c| parse_color_or(c, Rgb::WHITE)),
            border_color: node
                .attr("border-color")
                .map_or(Rgb::BLACK, |c| parse_color_or(c, Rgb::BLACK)),
            text: node.attr("content").unwrap_or_default().to_string(),
            anchor: attr_parse::<TextAnchor>(node, "justify").unwrap_or_default(),
            font,
            row,
            column,
            offset_x: attr_u32(node, "offset-x").unwrap_or(0),
            offset_y: attr_u32(node, "offset-y").unwrap_or(0),
            width: attr_u32(node, "width").unwrap_or(SHAPE_SIZE),
            height: attr_u32(node, "height").unwrap_or(SHAPE_SIZE),
        };
        let surface = self.layout.surface_mut(parent)?;
        if let Some(height) = attr_f64(node, "row-height").filter(|h| *h > 0.0) {
            if row > 0 {
                surface.set_row_height(row + 1, height);
            }
        }
        surface.add_shape(shape);
        Ok(())
    }

    /// `chart` with one `series` child per data series. A chart without
    /// series is not drawn.
    pub(super) fn chart(&mut self, parent: ContainerId, node: &Node) -> Result<()> {
        let mut chart = Chart {
            chart_type: attr_parse::<ChartType>(node, "type").unwrap_or_default(),
            title: node.attr("title").map(str::to_string),
            row: attr_u32(node, "row").unwrap_or(0),
            column: attr_u32(node, "column").unwrap_or(0),
            x_label: node.attr("x-label").map(str::to_string),
            y_label: node.attr("y-label").map(str::to_string),
            x_format: node.attr("x-format").map(str::to_string),
            y_format: node.attr("y-format").map(str::to_string),
            x_limit: attr_parse::<AxisLimit>(node, "x-limit").unwrap_or_default(),
            y_limit: attr_parse::<AxisLimit>(node, "y-limit").unwrap_or_default(),
            rounded_corners: attr_bool(node, "rounded-corner").unwrap_or(false),
            ..Chart::default()
        };
        if let Some(width) = attr_u32(node, "width") {
            chart.width = width;
        }
        if let Some(height) = attr_u32(node, "height") {
            chart.height = height;
        }
        if attr_bool(node, "legend-enabled") == Some(false) {
            chart.legend = None;
        } else if let Some(position) = attr_parse::<LegendPosition>(node, "legend-position") {
            chart.legend = Some(position);
        }

        for child in node.elements().filter(|n| n.name == "series") {
            let series = series(child, &mut chart);
            chart.series.push(series);
        }
        if chart.series.is_empty() {
            tracing::debug!(title = ?chart.title, "chart without series, skipped");
            return Ok(());
        }
        self.layout.surface_mut(parent)?.add_chart(chart);
        Ok(())
    }
}

fn series(node: &Node, chart: &mut Chart) -> ChartSeries {
    let line_color = node
        .attr("line-color")
        .map_or(Rgb::CADET_BLUE, |c| parse_color_or(c, Rgb::CADET_BLUE));
    let marker_color = node
        .attr("marker-color")
        .map_or(line_color, |c| parse_color_or(c, line_color));
    if let Some(v) = attr_f64(node, "x-min") {
        chart.x_limit.min = Some(v);
    }
    if let Some(v) = attr_f64(node, "x-max") {
        chart.x_limit.max = Some(v);
    }
    if let Some(v) = attr_f64(node, "y-min") {
        chart.y_limit.min = Some(v);
    }
    if let Some(v) = attr_f64(node, "y-max") {
        chart.y_limit.max = Some(v);
    }
    let axis = |name: &str| node.elements().find(|n| n.name == name).map(axis_range);
    ChartSeries {
        legend: node.attr("legend").map(str::to_string),
        line_color,
        marker_color,
        marker: attr_parse::<Marker>(node, "marker").unwrap_or_default(),
        x_range: axis("x-axis"),
        y_range: axis("y-axis"),
    }
}

/// `start-row`/`end-row`/`start-column`/`end-column`, each defaulting to 1.
fn axis_range(node: &Node) -> CellRange {
    let get = |key: &str| attr_u32(node, key).filter(|v| *v > 0).unwrap_or(1);
    let (start_row, end_row) = (get("start-row"), get("end-row"));
    let (start_col, end_col) = (get("start-column"), get("end-column"));
    CellRange::new(
        start_row.min(end_row),
        start_col.min(end_col),
        start_row.max(end_row),
        start_col.max(end_col),
    )
}
