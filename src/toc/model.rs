use serde::{Serialize, Deserialize};

/// Label of the synthetic root node.
///
/// Also the conventional first entry of these tables of contents, which is
/// why title extraction skips entries carrying it.
pub const ROOT_LABEL: &str = "目录";

/// Title used when the table of contents has no entries
pub const DEFAULT_TITLE: &str = "Untitled Document";

/// Prefix of every served document path in the generated site
pub const CONTENT_DIR: &str = "content";

/// One entry of the table of contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocNode {
    /// Display title
    pub name: String,
    /// Path of the content document, relative to the source root; empty for grouping nodes
    pub local: String,
    /// Icon identifier, informational only
    pub image_number: Option<i64>,
    pub children: Vec<TocNode>,
}

/// How a node is presented in the navigation tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Folder,
    File,
    /// No children and no document; parsing normally never produces these
    Label,
}

impl TocNode {
    pub fn new(name: impl Into<String>) -> Self {
        TocNode {
            name: name.into(),
            local: String::new(),
            image_number: None,
            children: Vec::new(),
        }
    }

    /// Create a leaf pointing at a content document
    pub fn file(name: impl Into<String>, local: impl Into<String>) -> Self {
        TocNode {
            name: name.into(),
            local: local.into(),
            image_number: None,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<TocNode>) -> Self {
        self.children = children;
        self
    }

    pub fn has_document(&self) -> bool {
        !self.local.is_empty()
    }

    pub fn kind(&self) -> NodeKind {
        if !self.children.is_empty() {
            NodeKind::Folder
        } else if self.has_document() {
            NodeKind::File
        } else {
            NodeKind::Label
        }
    }
}

// The derived drop would recurse once per level
impl Drop for TocNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// Folder and file tallies over a tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ItemCounts {
    /// Nodes with at least one child
    pub folders: usize,
    /// Nodes with a local path
    pub files: usize,
}
