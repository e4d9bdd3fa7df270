use std::fmt;

use html5ever::{LocalName, Namespace, QualName};
use kuchikiki::traits::*;
use kuchikiki::{Attribute, ExpandedName, NodeRef};

use crate::utils::error::ChmError;

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// A single document could not be rewritten
#[derive(Debug, Clone, PartialEq)]
pub struct TransformError {
    pub message: String,
}

impl TransformError {
    pub fn new(message: impl Into<String>) -> Self {
        TransformError { message: message.into() }
    }
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for TransformError {}

impl From<TransformError> for ChmError {
    fn from(err: TransformError) -> Self {
        ChmError::Transform(err.message)
    }
}

/// Parse a full HTML document; missing `html`/`head`/`body` are synthesized
pub fn parse_document(text: &str) -> NodeRef {
    kuchikiki::parse_html().one(text)
}

/// All inclusive descendants of `root` matching a CSS selector, in document order
pub fn select_all(root: &NodeRef, selector: &str) -> Result<Vec<NodeRef>, TransformError> {
    let matches = root
        .select(selector)
        .map_err(|_| TransformError::new(format!("invalid selector: {}", selector)))?;
    Ok(matches.map(|element| element.as_node().clone()).collect())
}

/// First inclusive descendant of `root` matching a CSS selector
pub fn select_first(root: &NodeRef, selector: &str) -> Option<NodeRef> {
    root.select_first(selector).ok().map(|element| element.as_node().clone())
}

/// Serialize a node including its own tag
pub fn outer_html(node: &NodeRef) -> Result<String, TransformError> {
    let mut buf = Vec::new();
    node.serialize(&mut buf)
        .map_err(|e| TransformError::new(format!("serialization failed: {}", e)))?;
    String::from_utf8(buf).map_err(|e| TransformError::new(format!("serialized markup is not UTF-8: {}", e)))
}

/// Serialize the children of a node, without the node's own tag
pub fn inner_html(node: &NodeRef) -> Result<String, TransformError> {
    let mut html = String::new();
    for child in node.children() {
        html.push_str(&outer_html(&child)?);
    }
    Ok(html)
}

pub fn is_tag(node: &NodeRef, name: &str) -> bool {
    node.as_element()
        .map(|element| (&*element.name.local).eq_ignore_ascii_case(name))
        .unwrap_or(false)
}

/// Value of an attribute on an element node
pub fn attr(node: &NodeRef, name: &str) -> Option<String> {
    let element = node.as_element()?;
    let attributes = element.attributes.borrow();
    attributes.get(name).map(|value| value.to_string())
}

/// The `display` value from an element's inline `style`, lowercased.
///
/// Later declarations override earlier ones and `!important` is dropped.
pub fn inline_display(node: &NodeRef) -> Option<String> {
    let style = attr(node, "style")?;
    style
        .split(';')
        .filter_map(|declaration| {
            let (property, value) = declaration.split_once(':')?;
            if property.trim().eq_ignore_ascii_case("display") {
                let value = value.trim().to_ascii_lowercase();
                let value = value.trim_end_matches("!important").trim().to_string();
                Some(value)
            } else {
                None
            }
        })
        .last()
}

/// Create a detached HTML element with the given attributes
pub fn new_element(name: &str, attributes: &[(&str, &str)]) -> NodeRef {
    let qual_name = QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from(name));
    let attributes = attributes.iter().map(|(key, value)| {
        (
            ExpandedName::new(Namespace::from(""), LocalName::from(*key)),
            Attribute { prefix: None, value: value.to_string() },
        )
    });
    NodeRef::new_element(qual_name, attributes)
}

/// Plain text of a subtree, one space between text runs, runs trimmed
pub fn visible_text(root: &NodeRef) -> String {
    root.inclusive_descendants()
        .text_nodes()
        .map(|text| text.borrow().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
