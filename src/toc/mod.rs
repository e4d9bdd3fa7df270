//! Table of contents: data model, tolerant parser and tree utilities.
//!
//! All traversals below use an explicit work stack, so pathologically deep
//! legacy trees cannot exhaust the call stack.

mod lexer;
mod model;
mod parser;

pub use model::{ItemCounts, NodeKind, TocNode, CONTENT_DIR, DEFAULT_TITLE, ROOT_LABEL};
pub use parser::TocParser;

use std::path::Path;

use log::debug;

use crate::encoding::EncodingResolver;
use crate::utils::error::{BoxResult, ChmError};

/// A parsed table of contents, rooted at a synthetic sentinel node
#[derive(Debug, Clone, PartialEq)]
pub struct TocTree {
    root: TocNode,
}

impl TocTree {
    /// An empty tree holding only the sentinel root
    pub fn new() -> Self {
        TocTree { root: TocNode::new(ROOT_LABEL) }
    }

    /// Wrap an already built root
    pub fn from_root(root: TocNode) -> Self {
        TocTree { root }
    }

    /// Build a flat tree whose root children are the given entries
    pub fn from_entries(entries: Vec<TocNode>) -> Self {
        TocTree { root: TocNode::new(ROOT_LABEL).with_children(entries) }
    }

    /// Parse decoded table-of-contents markup
    pub fn parse(markup: &str) -> Self {
        TocParser::new().parse(markup)
    }

    /// Read, decode and parse a table-of-contents file.
    ///
    /// Malformed markup never fails; only an unreadable or undecodable file does.
    pub fn from_file<P: AsRef<Path>>(path: P, resolver: &EncodingResolver) -> BoxResult<Self> {
        let path = path.as_ref();
        let decoded = resolver.read_file(path).map_err(|e| {
            ChmError::Toc(format!("Failed to read {}: {}", path.display(), e))
        })?;
        debug!("Decoded {} as {}", path.display(), decoded.encoding.name());
        Ok(Self::parse(&decoded.text))
    }

    pub fn root(&self) -> &TocNode {
        &self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    /// Title of the document set.
    ///
    /// The first top-level entry not named like the root wins; if every entry
    /// carries the root label the first one is used anyway.
    pub fn title(&self) -> String {
        let children = &self.root.children;
        children
            .iter()
            .find(|child| !child.name.is_empty() && child.name != self.root.name)
            .or_else(|| children.first())
            .map(|child| child.name.clone())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string())
    }

    /// Count folders and files below the root
    pub fn count_items(&self) -> ItemCounts {
        let mut counts = ItemCounts::default();
        let mut stack: Vec<&TocNode> = self.root.children.iter().collect();

        while let Some(node) = stack.pop() {
            if !node.children.is_empty() {
                counts.folders += 1;
            }
            if node.has_document() {
                counts.files += 1;
            }
            stack.extend(node.children.iter());
        }

        counts
    }

    /// Nodes that point at a document, in pre-order
    pub fn files(&self) -> Vec<&TocNode> {
        let mut files = Vec::new();
        let mut stack: Vec<&TocNode> = vec![&self.root];

        while let Some(node) = stack.pop() {
            if node.has_document() {
                files.push(node);
            }
            // Reverse so the first child is visited first
            stack.extend(node.children.iter().rev());
        }

        files
    }

    /// Deepest nesting level below the root; top-level entries are level 1
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack: Vec<(&TocNode, usize)> = self.root.children.iter().map(|c| (c, 1)).collect();

        while let Some((node, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            stack.extend(node.children.iter().map(|c| (c, depth + 1)));
        }

        max_depth
    }

    /// Navigation tree records for the root's children, as compact JSON.
    ///
    /// Each record is `{"title", "path", "type", "children"}`. Written
    /// directly from the nodes with a work stack of sibling lists; a
    /// serializer would recurse once per level.
    pub fn to_tree_data(&self) -> serde_json::Result<String> {
        let mut out = String::from("[");
        let mut stack = vec![(self.root.children.as_slice(), 0usize)];

        while let Some(&(siblings, next)) = stack.last() {
            let node = match siblings.get(next) {
                Some(node) => node,
                None => {
                    stack.pop();
                    out.push(']');
                    if !stack.is_empty() {
                        out.push('}');
                    }
                    continue;
                }
            };
            if let Some(frame) = stack.last_mut() {
                frame.1 += 1;
            }

            if next > 0 {
                out.push(',');
            }
            out.push_str("{\"title\":");
            out.push_str(&serde_json::to_string(&node.name)?);
            out.push_str(",\"path\":");
            out.push_str(&serde_json::to_string(&served_path(&node.local))?);
            out.push_str(",\"type\":\"");
            out.push_str(tree_kind(node));
            out.push_str("\",\"children\":[");
            stack.push((node.children.as_slice(), 0));
        }

        Ok(out)
    }
}

/// `type` of a navigation record
fn tree_kind(node: &TocNode) -> &'static str {
    match node.kind() {
        NodeKind::Folder => "Folder",
        NodeKind::File | NodeKind::Label => "File",
    }
}

impl Default for TocTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Path a document is served under in the generated site, empty for no document
pub fn served_path(local: &str) -> String {
    if local.is_empty() {
        return String::new();
    }
    let local = local.replace('\\', "/");
    format!("{}/{}", CONTENT_DIR, local.trim_start_matches("./").trim_start_matches('/'))
}
