//! Template traversal.
//!
//! A single depth-first, pre-order walk over the [`Node`] tree. Each element
//! is dispatched on its name to a handler that either writes and stops
//! (terminal tags), or returns a child container whose children are walked
//! next. A few handlers walk their own children because they have work to do
//! afterwards (`p`, `div`, `border`, `foreach`).
//!
//! All coordinate arithmetic happens in [`crate::layout`]; handlers only ask
//! containers for ranges and rows.

mod drawings;
mod elements;
mod options;
pub mod styles;

pub use options::{RenderOptions, UnknownTags};

use serde_json::Value;

use crate::error::Result;
use crate::layout::{ContainerId, Layout, LayoutOptions};
use crate::model::{DataModel, ModelValue};
use crate::surface::Surface;
use crate::template::{Content, Node};
use crate::types::FontStyle;

/// Walk state: the layout being built plus the data-binding scopes.
pub struct Renderer<'a, S> {
    layout: Layout<S>,
    model: &'a dyn DataModel,
    /// `foreach` items, innermost last.
    scopes: Vec<Value>,
    options: &'a RenderOptions,
}

/// Render a template tree into one surface per page.
///
/// A `document` root supplies the workbook baseline; any other root is
/// treated as the only child of an implicit document.
pub fn render<S: Surface>(
    root: &Node,
    model: &dyn DataModel,
    options: &RenderOptions,
) -> Result<Vec<S>> {
    let document = (root.name == "document").then_some(root);
    let page_style = styles::page_style(document, options);
    let layout = Layout::new(
        page_style,
        LayoutOptions {
            max_merge_retries: options.max_merge_retries,
        },
    );
    let mut renderer = Renderer {
        layout,
        model,
        scopes: Vec::new(),
        options,
    };
    let workbook = renderer.layout.root();
    match document {
        Some(doc) => renderer.walk_children(doc, workbook)?,
        None => renderer.visit(root, workbook)?,
    }
    let surfaces = renderer.layout.into_surfaces();
    tracing::debug!(sheets = surfaces.len(), "render finished");
    Ok(surfaces)
}

impl<S: Surface> Renderer<'_, S> {
    fn walk_children(&mut self, node: &Node, parent: ContainerId) -> Result<()> {
        for child in &node.children {
            match child {
                Content::Element(element) => self.visit(element, parent)?,
                Content::Text(text) => self.text_node(parent, text)?,
            }
        }
        Ok(())
    }

    fn visit(&mut self, node: &Node, parent: ContainerId) -> Result<()> {
        if let Some(child) = self.dispatch(node, parent)? {
            self.walk_children(node, child)?;
        }
        Ok(())
    }

    /// Run the handler for `node`. `Some` is the container the node's
    /// children are walked in; `None` means the node is done.
    fn dispatch(&mut self, node: &Node, parent: ContainerId) -> Result<Option<ContainerId>> {
        let name = node.name.as_str();
        if let Some(bump) = styles::heading_bump(name) {
            return self.heading(parent, node, bump);
        }
        match name {
            "document" => self.layout.template(parent, None).map(Some),
            "page" | "sheet" => self.page(node).map(Some),
            "table" => self.table(parent, node).map(Some),
            "tr" | "row" => self.table_row(parent, node).map(Some),
            "td" | "th" => self.table_cell(parent, node),
            "text" => self.text(parent, node, FontStyle::Inherited),
            "b" => self.text(parent, node, FontStyle::Bold),
            "i" => self.text(parent, node, FontStyle::Italic),
            "u" => self.text(parent, node, FontStyle::Underline),
            "p" => self.paragraph(parent, node).map(|()| None),
            "br" => self.line_break(parent).map(|()| None),
            "empty-row" => self.empty_row(parent, node).map(|()| None),
            "space" => self.space(parent).map(|()| None),
            "empty" => self.layout.get_range(parent, None).map(|_| None),
            "skip" => self.skip(parent, node).map(|()| None),
            "number" => self.number(parent, node).map(|()| None),
            "value" => self.value(parent, node).map(|()| None),
            "ul" | "ol" => self.layout.template(parent, None).map(Some),
            "li" => self.list_item(parent, node),
            "div" => self.region(parent, node, false).map(|()| None),
            "border" => self.region(parent, node, true).map(|()| None),
            "header" | "footer" => self.header_footer(parent, node).map(|()| None),
            "columns" => self.columns(parent, node).map(|()| None),
            "column" => self.column_width(parent, node).map(|()| None),
            "image" => self.image(parent, node).map(|()| None),
            "shape" => self.shape(parent, node).map(|()| None),
            "chart" => self.chart(parent, node).map(|()| None),
            "template" | "foreach" => self.data_template(parent, node),
            _ => self.unknown(parent, node),
        }
    }

    fn unknown(&mut self, parent: ContainerId, node: &Node) -> Result<Option<ContainerId>> {
        match self.options.unknown_tags {
            UnknownTags::Passthrough => {
                let style = self.layout.style(parent)?.derive_child();
                self.layout.element(parent, style, None, None).map(Some)
            }
            UnknownTags::Ignore => {
                tracing::debug!(tag = %node.name, "ignoring unknown element");
                Ok(None)
            }
        }
    }

    /// Resolve a binding: innermost `foreach` item first, then the model.
    fn lookup(&self, name: &str) -> Option<ModelValue> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.lookup(name))
            .or_else(|| self.model.lookup(name))
    }

    /// `template`/`foreach name="list"`: children once per item, each item
    /// pushed as the innermost lookup scope. Without `name` the children are
    /// walked once in the current scope.
    fn data_template(&mut self, parent: ContainerId, node: &Node) -> Result<Option<ContainerId>> {
        let Some(name) = node.attr("name") else {
            return self.layout.template(parent, None).map(Some);
        };
        let items = self
            .lookup(name)
            .map(ModelValue::into_items)
            .unwrap_or_default();
        if items.is_empty() {
            tracing::debug!(binding = name, "no items to render");
        }
        for item in items {
            let scope = self.layout.template(parent, None)?;
            self.scopes.push(item);
            let walked = self.walk_children(node, scope);
            self.scopes.pop();
            walked?;
        }
        Ok(None)
    }
}
