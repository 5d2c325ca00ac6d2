//! Template source tree.
//!
//! The layout engine only ever sees [`Node`]s: a name, ordered attributes,
//! mixed text/element children. Raw markup is turned into nodes by
//! [`parse`] and never looked at again.

mod parser;

pub use parser::parse;

/// One child of a template element, in document order.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Element(Node),
    Text(String),
}

/// A template element.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Node {
    /// Local element name (namespace prefix stripped).
    pub name: String,
    /// Attributes by local name, in document order.
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Content>,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder helper: add an attribute.
    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((key.into(), value.into()));
        self
    }

    /// Builder helper: add a child element.
    #[must_use]
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(Content::Element(child));
        self
    }

    /// Builder helper: add a text child.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Content::Text(text.into()));
        self
    }

    /// Look up an attribute value by local name.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attrs(&self) -> bool {
        !self.attrs.is_empty()
    }

    /// True if at least one child is an element.
    pub fn has_elements(&self) -> bool {
        self.children
            .iter()
            .any(|c| matches!(c, Content::Element(_)))
    }

    /// Child elements in order.
    pub fn elements(&self) -> impl Iterator<Item = &Node> {
        self.children.iter().filter_map(|c| match c {
            Content::Element(n) => Some(n),
            Content::Text(_) => None,
        })
    }

    /// Concatenated text of this node and all descendants.
    pub fn inner_text(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }
}

fn collect_text(node: &Node, out: &mut String) {
    for child in &node.children {
        match child {
            Content::Text(t) => out.push_str(t),
            Content::Element(n) => collect_text(n, out),
        }
    }
}
