//! Markup → [`Node`] tree using quick-xml.

use quick_xml::events::Event;
use quick_xml::Reader;

use super::{Content, Node};
use crate::error::{Result, XltemplateError};
use crate::xml_helpers::{element_attrs, local_name_string};

/// Parse template markup into its root node.
///
/// Whitespace-only text between elements is dropped; any other text is kept
/// verbatim so inline runs like `Total: <b>5</b>` keep their spacing.
pub fn parse(xml: &str) -> Result<Node> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Node> = Vec::new();
    let mut root: Option<Node> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let mut node = Node::new(local_name_string(&e));
                node.attrs = element_attrs(&e)?;
                stack.push(node);
            }
            Event::Empty(e) => {
                let mut node = Node::new(local_name_string(&e));
                node.attrs = element_attrs(&e)?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::End(_) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| XltemplateError::Template("unbalanced end tag".into()))?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::Text(t) => {
                let text = t.unescape()?;
                push_text(&mut stack, &text);
            }
            Event::CData(c) => {
                let raw = c.into_inner();
                push_text(&mut stack, &String::from_utf8_lossy(&raw));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(XltemplateError::Template("unclosed element".into()));
    }
    root.ok_or_else(|| XltemplateError::Template("template has no root element".into()))
}

fn attach(stack: &mut [Node], root: &mut Option<Node>, node: Node) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Content::Element(node));
        return Ok(());
    }
    if root.is_some() {
        return Err(XltemplateError::Template(
            "template has more than one root element".into(),
        ));
    }
    *root = Some(node);
    Ok(())
}

fn push_text(stack: &mut [Node], text: &str) {
    if text.trim().is_empty() {
        return;
    }
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Content::Text(text.to_string()));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested() {
        let root = parse(
            r#"<x:document xmlns:x="urn:xl" x:font-size="12">
                 <x:page x:name="Report">
                   <text>Total: <b>5</b></text>
                 </x:page>
               </x:document>"#,
        )
        .unwrap();

        assert_eq!(root.name, "document");
        assert_eq!(root.attr("font-size"), Some("12"));
        assert_eq!(root.attr("xmlns"), None);
        let page = root.elements().next().unwrap();
        assert_eq!(page.name, "page");
        assert_eq!(page.attr("name"), Some("Report"));
        let text = page.elements().next().unwrap();
        assert_eq!(text.children.len(), 2);
        assert_eq!(text.children[0], Content::Text("Total: ".into()));
        assert_eq!(text.inner_text(), "Total: 5");
    }

    #[test]
    fn test_parse_entities_and_cdata() {
        let root = parse("<p>a &amp; b<![CDATA[ <c> ]]></p>").unwrap();
        assert_eq!(root.inner_text(), "a & b <c> ");
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse("").is_err());
        assert!(parse("<a></a><b/>").is_err());
        assert!(parse("<a><b></a>").is_err());
    }
}
