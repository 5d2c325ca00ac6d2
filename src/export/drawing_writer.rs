//! DrawingML parts: one drawing per sheet holding its pictures, shapes and
//! chart frames, plus one chart part per chart.
//!
//! Everything is anchored with `oneCellAnchor`: a 0-based cell, a pixel
//! offset inside it and an explicit size.

use crate::cell_ref::sheet_range_name;
use crate::color::Rgb;
use crate::surface::{SheetGrid, Surface};
use crate::types::{
    AxisLimit, CellRange, Chart, ChartSeries, ChartType, Drawing, Font, Picture, Shape,
};

use super::xml_escape;

const EMU_PER_PIXEL: u64 = 9525;

const NS_XDR: &str = "http://schemas.openxmlformats.org/drawingml/2006/spreadsheetDrawing";
const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_C: &str = "http://schemas.openxmlformats.org/drawingml/2006/chart";
pub(crate) const REL_IMAGE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
pub(crate) const REL_CHART: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/chart";

/// Running part numbers across the whole package.
#[derive(Debug, Default)]
pub(crate) struct PartIds {
    image: u32,
    chart: u32,
}

/// A drawing part and everything it references.
#[derive(Debug, Default)]
pub(crate) struct DrawingParts<'a> {
    pub xml: String,
    /// `(id, type, target)` relative to `xl/drawings/`.
    pub rels: Vec<(String, &'static str, String)>,
    /// `(path, content type, bytes)` under `xl/media/`.
    pub media: Vec<(String, &'static str, &'a [u8])>,
    /// `(path, xml)` under `xl/charts/`.
    pub charts: Vec<(String, String)>,
}

fn srgb(color: Rgb) -> String {
    format!("{:02X}{:02X}{:02X}", color.r, color.g, color.b)
}

fn emu(px: u32) -> u64 {
    u64::from(px) * EMU_PER_PIXEL
}

fn anchor_open(out: &mut String, row: u32, col: u32, off_x: u32, off_y: u32, w: u32, h: u32) {
    out.push_str(&format!(
        "<xdr:oneCellAnchor><xdr:from><xdr:col>{col}</xdr:col><xdr:colOff>{}</xdr:colOff><xdr:row>{row}</xdr:row><xdr:rowOff>{}</xdr:rowOff></xdr:from><xdr:ext cx=\"{}\" cy=\"{}\"/>",
        emu(off_x),
        emu(off_y),
        emu(w),
        emu(h)
    ));
}

fn anchor_close(out: &mut String) {
    out.push_str("<xdr:clientData/></xdr:oneCellAnchor>");
}

/// Build the drawing part for a sheet, or `None` when it has no drawings.
pub(crate) fn write_drawing<'a>(sheet: &'a SheetGrid, ids: &mut PartIds) -> Option<DrawingParts<'a>> {
    if sheet.drawings().is_empty() {
        return None;
    }
    let mut parts = DrawingParts::default();
    parts.xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    parts.xml.push('\n');
    parts.xml.push_str(&format!(
        r#"<xdr:wsDr xmlns:xdr="{NS_XDR}" xmlns:a="{NS_A}" xmlns:r="{NS_R}">"#
    ));

    for (idx, drawing) in sheet.drawings().iter().enumerate() {
        let shape_id = idx + 2;
        let rel_id = format!("rId{}", parts.rels.len() + 1);
        match drawing {
            Drawing::Picture(picture) => {
                ids.image += 1;
                let file = format!("image{}.{}", ids.image, picture.format.extension());
                write_picture(&mut parts.xml, picture, shape_id, &rel_id);
                parts.rels.push((rel_id, REL_IMAGE, format!("../media/{file}")));
                parts.media.push((
                    format!("xl/media/{file}"),
                    picture.format.content_type(),
                    picture.data.as_slice(),
                ));
            }
            Drawing::Shape(shape) => write_shape(&mut parts.xml, shape, shape_id),
            Drawing::Chart(chart) => {
                ids.chart += 1;
                let file = format!("chart{}.xml", ids.chart);
                write_chart_frame(&mut parts.xml, chart, shape_id, &rel_id);
                parts.rels.push((rel_id, REL_CHART, format!("../charts/{file}")));
                parts
                    .charts
                    .push((format!("xl/charts/{file}"), write_chart_xml(chart, sheet.name())));
            }
        }
    }
    parts.xml.push_str("</xdr:wsDr>");
    Some(parts)
}

fn write_picture(out: &mut String, picture: &Picture, id: usize, rel_id: &str) {
    anchor_open(out, picture.row, picture.column, 0, 0, picture.width, picture.height);
    out.push_str(&format!(
        r#"<xdr:pic><xdr:nvPicPr><xdr:cNvPr id="{id}" name="{}"/><xdr:cNvPicPr><a:picLocks noChangeAspect="1"/></xdr:cNvPicPr></xdr:nvPicPr><xdr:blipFill><a:blip r:embed="{rel_id}"/><a:stretch><a:fillRect/></a:stretch></xdr:blipFill><xdr:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{}" cy="{}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></xdr:spPr></xdr:pic>"#,
        xml_escape(&picture.name),
        emu(picture.width),
        emu(picture.height)
    ));
    anchor_close(out);
}

fn run_props(font: &Font) -> String {
    format!(
        r#"<a:rPr lang="en-US" sz="{:.0}" b="{}" i="{}"{}><a:solidFill><a:srgbClr val="{}"/></a:solidFill><a:latin typeface="{}"/></a:rPr>"#,
        font.size * 100.0,
        u8::from(font.bold),
        u8::from(font.italic),
        if font.underline { r#" u="sng""# } else { "" },
        srgb(font.color),
        xml_escape(&font.name)
    )
}

fn write_shape(out: &mut String, shape: &Shape, id: usize) {
    anchor_open(
        out,
        shape.row,
        shape.column,
        shape.offset_x,
        shape.offset_y,
        shape.width,
        shape.height,
    );
    out.push_str(&format!(
        r#"<xdr:sp macro="" textlink=""><xdr:nvSpPr><xdr:cNvPr id="{id}" name="{}"/><xdr:cNvSpPr/></xdr:nvSpPr>"#,
        xml_escape(&shape.name)
    ));
    out.push_str(&format!(
        r#"<xdr:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{}" cy="{}"/></a:xfrm><a:prstGeom prst="{}"><a:avLst/></a:prstGeom><a:solidFill><a:srgbClr val="{}"/></a:solidFill><a:ln><a:solidFill><a:srgbClr val="{}"/></a:solidFill></a:ln></xdr:spPr>"#,
        emu(shape.width),
        emu(shape.height),
        shape.kind.preset(),
        srgb(shape.fill_color),
        srgb(shape.border_color)
    ));
    out.push_str(&format!(
        r#"<xdr:txBody><a:bodyPr anchor="{}"/><a:lstStyle/><a:p>"#,
        shape.anchor.as_drawingml()
    ));
    if !shape.text.is_empty() {
        out.push_str("<a:r>");
        out.push_str(&run_props(&shape.font));
        out.push_str(&format!("<a:t>{}</a:t></a:r>", xml_escape(&shape.text)));
    }
    out.push_str("</a:p></xdr:txBody></xdr:sp>");
    anchor_close(out);
}

fn write_chart_frame(out: &mut String, chart: &Chart, id: usize, rel_id: &str) {
    anchor_open(out, chart.row, chart.column, 0, 0, chart.width, chart.height);
    let name = chart
        .title
        .as_deref()
        .map_or_else(|| format!("Chart {id}"), xml_escape);
    out.push_str(&format!(
        r#"<xdr:graphicFrame macro=""><xdr:nvGraphicFramePr><xdr:cNvPr id="{id}" name="{name}"/><xdr:cNvGraphicFramePr/></xdr:nvGraphicFramePr><xdr:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/></xdr:xfrm><a:graphic><a:graphicData uri="{NS_C}"><c:chart xmlns:c="{NS_C}" r:id="{rel_id}"/></a:graphicData></a:graphic></xdr:graphicFrame>"#
    ));
    anchor_close(out);
}

// ---- chart parts ----------------------------------------------------------

fn rich_text(text: &str) -> String {
    format!(
        r#"<c:tx><c:rich><a:bodyPr/><a:lstStyle/><a:p><a:r><a:t>{}</a:t></a:r></a:p></c:rich></c:tx><c:overlay val="0"/>"#,
        xml_escape(text)
    )
}

fn range_ref(sheet: &str, range: &CellRange) -> String {
    xml_escape(&sheet_range_name(
        sheet,
        range.start_row,
        range.start_col,
        range.end_row,
        range.end_col,
    ))
}

fn write_series(out: &mut String, idx: usize, series: &ChartSeries, chart_type: ChartType, sheet: &str) {
    out.push_str(&format!(r#"<c:ser><c:idx val="{idx}"/><c:order val="{idx}"/>"#));
    if let Some(legend) = &series.legend {
        out.push_str(&format!("<c:tx><c:v>{}</c:v></c:tx>", xml_escape(legend)));
    }
    out.push_str(&format!(
        r#"<c:spPr><a:ln><a:solidFill><a:srgbClr val="{}"/></a:solidFill></a:ln></c:spPr>"#,
        srgb(series.line_color)
    ));
    out.push_str(&format!(
        r#"<c:marker><c:symbol val="{}"/><c:spPr><a:solidFill><a:srgbClr val="{1}"/></a:solidFill><a:ln><a:solidFill><a:srgbClr val="{1}"/></a:solidFill></a:ln></c:spPr></c:marker>"#,
        series.marker.as_drawingml(),
        srgb(series.marker_color)
    ));
    let (x_tag, y_tag) = if chart_type.is_scatter() {
        ("c:xVal", "c:yVal")
    } else {
        ("c:cat", "c:val")
    };
    if let Some(range) = &series.x_range {
        out.push_str(&format!(
            "<{x_tag}><c:numRef><c:f>{}</c:f></c:numRef></{x_tag}>",
            range_ref(sheet, range)
        ));
    }
    if let Some(range) = &series.y_range {
        out.push_str(&format!(
            "<{y_tag}><c:numRef><c:f>{}</c:f></c:numRef></{y_tag}>",
            range_ref(sheet, range)
        ));
    }
    let smooth = u8::from(chart_type == ChartType::ScatterSmooth);
    out.push_str(&format!(r#"<c:smooth val="{smooth}"/></c:ser>"#));
}

fn scaling(limit: &AxisLimit) -> String {
    let mut out = String::from(r#"<c:scaling><c:orientation val="minMax"/>"#);
    if let Some(max) = limit.max {
        out.push_str(&format!(r#"<c:max val="{max}"/>"#));
    }
    if let Some(min) = limit.min {
        out.push_str(&format!(r#"<c:min val="{min}"/>"#));
    }
    out.push_str("</c:scaling>");
    out
}

struct Axis<'a> {
    tag: &'static str,
    id: u32,
    cross: u32,
    position: &'static str,
    limit: &'a AxisLimit,
    label: Option<&'a str>,
    format: Option<&'a str>,
}

fn write_axis(out: &mut String, axis: &Axis<'_>) {
    let tag = axis.tag;
    out.push_str(&format!(r#"<{tag}><c:axId val="{}"/>"#, axis.id));
    out.push_str(&scaling(axis.limit));
    out.push_str(&format!(
        r#"<c:delete val="0"/><c:axPos val="{}"/>"#,
        axis.position
    ));
    if let Some(label) = axis.label {
        out.push_str(&format!("<c:title>{}</c:title>", rich_text(label)));
    }
    if let Some(format) = axis.format {
        out.push_str(&format!(
            r#"<c:numFmt formatCode="{}" sourceLinked="0"/>"#,
            xml_escape(format)
        ));
    }
    out.push_str(&format!(r#"<c:crossAx val="{}"/></{tag}>"#, axis.cross));
}

/// A `chartSpace` part for a line or scatter chart.
pub(crate) fn write_chart_xml(chart: &Chart, sheet: &str) -> String {
    let mut out = String::with_capacity(2048);
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push('\n');
    out.push_str(&format!(
        r#"<c:chartSpace xmlns:c="{NS_C}" xmlns:a="{NS_A}" xmlns:r="{NS_R}">"#
    ));
    out.push_str(&format!(
        r#"<c:roundedCorners val="{}"/><c:chart>"#,
        u8::from(chart.rounded_corners)
    ));
    match &chart.title {
        Some(title) => {
            out.push_str(&format!("<c:title>{}</c:title>", rich_text(title)));
            out.push_str(r#"<c:autoTitleDeleted val="0"/>"#);
        }
        None => out.push_str(r#"<c:autoTitleDeleted val="1"/>"#),
    }
    out.push_str("<c:plotArea><c:layout/>");

    let scatter = chart.chart_type.is_scatter();
    if scatter {
        let style = match chart.chart_type {
            ChartType::ScatterSmooth => "smoothMarker",
            _ => "lineMarker",
        };
        out.push_str(&format!(
            r#"<c:scatterChart><c:scatterStyle val="{style}"/><c:varyColors val="0"/>"#
        ));
    } else {
        let grouping = match chart.chart_type {
            ChartType::LineStacked => "stacked",
            _ => "standard",
        };
        out.push_str(&format!(
            r#"<c:lineChart><c:grouping val="{grouping}"/><c:varyColors val="0"/>"#
        ));
    }
    for (idx, series) in chart.series.iter().enumerate() {
        write_series(&mut out, idx, series, chart.chart_type, sheet);
    }
    if scatter {
        out.push_str(r#"<c:axId val="1"/><c:axId val="2"/></c:scatterChart>"#);
    } else {
        out.push_str(r#"<c:marker val="1"/><c:axId val="1"/><c:axId val="2"/></c:lineChart>"#);
    }

    let x_axis = Axis {
        tag: if scatter { "c:valAx" } else { "c:catAx" },
        id: 1,
        cross: 2,
        position: "b",
        limit: &chart.x_limit,
        label: chart.x_label.as_deref(),
        format: chart.x_format.as_deref(),
    };
    let y_axis = Axis {
        tag: "c:valAx",
        id: 2,
        cross: 1,
        position: "l",
        limit: &chart.y_limit,
        label: chart.y_label.as_deref(),
        format: chart.y_format.as_deref(),
    };
    write_axis(&mut out, &x_axis);
    write_axis(&mut out, &y_axis);
    out.push_str("</c:plotArea>");

    if let Some(position) = chart.legend {
        out.push_str(&format!(
            r#"<c:legend><c:legendPos val="{}"/><c:overlay val="0"/></c:legend>"#,
            position.as_drawingml()
        ));
    }
    out.push_str(r#"<c:plotVisOnly val="1"/></c:chart></c:chartSpace>"#);
    out
}
