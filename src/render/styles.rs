//! Template attributes → [`Style`], [`PageStyle`] and [`PageSetup`].
//!
//! Every lookup here is lenient: a value that does not parse leaves the
//! inherited field untouched, and colors fall back to a fixed default.

use crate::color::{parse_color, parse_color_or, Rgb};
use crate::template::Node;
use crate::types::{
    BorderKind, BorderStyle, Dimension, FontStyle, FontVertAlign, HAlign, PageBreaks, PageSetup,
    PagePoint, PageStyle, Style, TextWrap, Thickness, VAlign, MARGIN_SCALE,
};
use crate::xml_helpers::{attr_bool, attr_f64, attr_parse, attr_u32};

use super::RenderOptions;

/// Font-size bump and bold flag for `h1`..`h6`.
pub fn heading_bump(name: &str) -> Option<f64> {
    match name {
        "h1" => Some(8.0),
        "h2" => Some(6.0),
        "h3" => Some(4.0),
        "h4" => Some(2.0),
        "h5" => Some(1.0),
        "h6" => Some(0.0),
        _ => None,
    }
}

fn set_parsed<T: std::str::FromStr>(node: &Node, key: &str, field: &mut T) {
    if let Some(value) = attr_parse(node, key) {
        *field = value;
    }
}

/// Font attributes: `color`, `font-size`, `font-family`/`font-name`,
/// `font-style`, `vert-align`.
pub fn apply_font(node: &Node, style: &mut Style) {
    if let Some(color) = node.attr("color") {
        style.font.color = parse_color_or(color, Rgb::BLACK);
    }
    if let Some(size) = attr_f64(node, "font-size").filter(|s| *s > 0.0) {
        style.font.size = size;
    }
    if let Some(name) = node
        .attr("font-family")
        .or_else(|| node.attr("font-name"))
        .map(str::trim)
        .filter(|n| !n.is_empty())
    {
        style.font.name = name.to_string();
    }
    if let Some(font_style) = attr_parse::<FontStyle>(node, "font-style") {
        font_style.apply(&mut style.font);
    }
    set_parsed::<FontVertAlign>(node, "vert-align", &mut style.font.vert_align);
}

/// Box attributes: `border`, `border-style`, `border-color`, `bgcolor`,
/// `halign`, `valign`, `text-wrap`.
pub fn apply_box(node: &Node, style: &mut Style) {
    set_parsed::<BorderKind>(node, "border", &mut style.border);
    set_parsed::<BorderStyle>(node, "border-style", &mut style.border_style);
    if let Some(color) = node.attr("border-color") {
        style.border_color = parse_color_or(color, Rgb::LIGHT_GRAY);
    }
    if let Some(color) = node.attr("bgcolor") {
        style.bg_color = parse_color(color);
        if style.bg_color.is_none() {
            tracing::debug!(value = color, "unparsable bgcolor, no fill");
        }
    }
    set_parsed::<HAlign>(node, "halign", &mut style.h_align);
    set_parsed::<VAlign>(node, "valign", &mut style.v_align);
    set_parsed::<TextWrap>(node, "text-wrap", &mut style.text_wrap);
}

/// Font and box attributes together, the set most tags accept.
pub fn apply_common(node: &Node, style: &mut Style) {
    apply_font(node, style);
    apply_box(node, style);
}

/// Cell width from `width`: `auto`, `fit` or points.
pub fn apply_width(node: &Node, style: &mut Style) {
    if let Some(width) = attr_parse::<Dimension>(node, "width") {
        style.size.width = Some(width);
    }
}

/// Row height from the given key (`height` or `row-height`).
pub fn apply_height(node: &Node, key: &str, style: &mut Style) {
    if let Some(height) = attr_f64(node, key).filter(|h| *h > 0.0) {
        style.size.height = Some(height);
    }
}

/// Workbook baseline from the options and the `document` element.
pub fn page_style(document: Option<&Node>, options: &RenderOptions) -> PageStyle {
    let mut page = PageStyle::default();
    if let Some(name) = &options.font_name {
        page.font.name.clone_from(name);
    }
    if let Some(size) = options.font_size.filter(|s| *s > 0.0) {
        page.font.size = size;
    }
    let Some(node) = document else { return page };
    let mut probe = Style::from_page(&page);
    apply_font(node, &mut probe);
    set_parsed::<HAlign>(node, "halign", &mut probe.h_align);
    set_parsed::<VAlign>(node, "valign", &mut probe.v_align);
    page.font = probe.font;
    page.h_align = probe.h_align;
    page.v_align = probe.v_align;
    set_parsed::<Thickness>(node, "margin", &mut page.margin);
    page
}

fn scaled(margin: Thickness) -> Thickness {
    Thickness {
        left: margin.left * MARGIN_SCALE,
        top: margin.top * MARGIN_SCALE,
        right: margin.right * MARGIN_SCALE,
        bottom: margin.bottom * MARGIN_SCALE,
    }
}

/// Per-page attributes: the page style plus print/view setup.
pub fn apply_page(node: &Node, page: &PageStyle, style: &mut Style) -> PageSetup {
    let mut setup = PageSetup::default();
    apply_font(node, style);
    set_parsed::<HAlign>(node, "halign", &mut style.h_align);
    set_parsed::<VAlign>(node, "valign", &mut style.v_align);

    let margin = attr_parse::<Thickness>(node, "margin").unwrap_or(page.margin);
    if !margin.is_zero() {
        setup.margins = Some(scaled(margin));
    }
    if let Some(hf) = attr_parse::<Thickness>(node, "header-footer-margin") {
        if !hf.is_zero() {
            setup.header_margin = Some(hf.top * MARGIN_SCALE);
            setup.footer_margin = Some(hf.bottom * MARGIN_SCALE);
        }
    }
    if let Some(area) = attr_parse::<PagePoint>(node, "print-area") {
        if area.is_valid() {
            setup.print_area = Some(area);
        } else {
            tracing::debug!(?area, "ignoring empty print area");
        }
    }
    if let Some(protected) = attr_bool(node, "protected") {
        setup.protected = protected;
    }
    if let Some(breaks) = node.attr("page-breaks").map(PageBreaks::parse) {
        setup.row_breaks = breaks.rows().collect();
        setup.col_breaks = breaks.cols().collect();
        if !breaks.breaks.is_empty() {
            setup.page_break_view = true;
        }
    }
    if let Some(view) = attr_bool(node, "page-break-view") {
        setup.page_break_view = view;
    }
    match attr_parse::<Dimension>(node, "col-width") {
        Some(Dimension::Points(width)) if width > 0.0 => setup.default_col_width = Some(width),
        Some(_) => setup.autofit_columns = true,
        None => {}
    }
    if let Some(height) = attr_f64(node, "row-height").filter(|h| *h > 0.0) {
        setup.default_row_height = Some(height);
    }
    if let Some(fit) = attr_bool(node, "fit-to-page") {
        setup.fit_to_page = fit;
    }
    setup.fit_to_width = attr_u32(node, "fit-to-width");
    setup.fit_to_height = attr_u32(node, "fit-to-height");
    setup
}
