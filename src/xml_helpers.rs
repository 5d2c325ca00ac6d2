//! Shared attribute parsing utilities.
//!
//! Two layers: quick-xml helpers used while building the [`Node`] tree, and
//! typed lookups over finished nodes used by the render driver. The typed
//! lookups return `None` for both missing and malformed values; callers
//! decide the fallback, which is how attribute errors stay non-fatal.

use std::str::FromStr;

use quick_xml::events::BytesStart;

use crate::error::Result;
use crate::template::Node;

/// Get the local element name as an owned string.
///
/// Returns empty string if not valid UTF-8.
#[inline]
pub fn local_name_string(e: &BytesStart) -> String {
    let bytes = e.local_name();
    std::str::from_utf8(bytes.as_ref())
        .unwrap_or("")
        .to_string()
}

/// Collect an element's attributes by local name, skipping namespace declarations.
pub fn element_attrs(e: &BytesStart) -> Result<Vec<(String, String)>> {
    let mut attrs = Vec::new();
    for attr in e.attributes() {
        let attr = attr?;
        let key = attr.key;
        if key.as_namespace_binding().is_some() {
            continue;
        }
        let name = std::str::from_utf8(key.local_name().as_ref())
            .unwrap_or("")
            .to_string();
        let value = attr.unescape_value()?.into_owned();
        attrs.push((name, value));
    }
    Ok(attrs)
}

/// Extract a `u32` attribute value by key.
pub fn attr_u32(node: &Node, key: &str) -> Option<u32> {
    node.attr(key).and_then(|s| s.trim().parse().ok())
}

/// Extract an `f64` attribute value by key. Non-finite values are rejected.
pub fn attr_f64(node: &Node, key: &str) -> Option<f64> {
    node.attr(key)
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Extract a boolean attribute value by key.
///
/// Recognizes `"1"`, `"true"`, `"yes"` as true; `"0"`, `"false"`, `"no"` as false.
pub fn attr_bool(node: &Node, key: &str) -> Option<bool> {
    match node.attr(key)?.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

/// Extract an attribute through its `FromStr` impl.
pub fn attr_parse<T: FromStr>(node: &Node, key: &str) -> Option<T> {
    node.attr(key).and_then(|s| s.trim().parse().ok())
}

/// Span attributes (`colspan`, `rowspan`, `rows`, `cols`): at least 1.
pub fn attr_span(node: &Node, key: &str) -> u32 {
    attr_u32(node, key).unwrap_or(1).max(1)
}
