use log::debug;

use super::lexer::{tokenize, Event};
use super::model::{TocNode, ROOT_LABEL};
use super::TocTree;

/// Attributes collected for the entry being read; later keys overwrite earlier ones
#[derive(Debug, Default)]
struct Scratch {
    name: Option<String>,
    local: Option<String>,
    image_number: Option<i64>,
}

impl Scratch {
    fn set(&mut self, key: &str, value: String) {
        match key {
            "name" => self.name = Some(value),
            "local" => self.local = Some(value),
            "imagenumber" => match value.trim().parse() {
                Ok(number) => self.image_number = Some(number),
                Err(_) => debug!("Ignoring non-numeric ImageNumber {:?}", value),
            },
            _ => {}
        }
    }

    fn into_node(self) -> Option<TocNode> {
        let name = self.name?;
        Some(TocNode {
            name,
            local: self.local.unwrap_or_default(),
            image_number: self.image_number,
            children: Vec::new(),
        })
    }
}

/// One level opened by a list marker
#[derive(Debug)]
enum Frame {
    /// The entry completed just before the marker; taken out of its parent
    /// until the matching close puts it back
    Node(TocNode),
    /// A marker with no completed entry before it; keeps appending to the level below
    Reuse,
}

#[derive(Debug)]
enum State {
    Between,
    InEntry(Scratch),
}

/// Builds a [`TocTree`] from table-of-contents markup.
///
/// An explicit stack tracks the current tree level; the root sits below it
/// and can never be popped. Malformed input never fails:
///
/// - a list open after a completed entry nests under that entry; without
///   one it re-opens the current level,
/// - excess list closes at the root are absorbed,
/// - entries without a name are dropped,
/// - repeated attribute keys keep the last value.
#[derive(Debug)]
pub struct TocParser {
    root: TocNode,
    stack: Vec<Frame>,
    state: State,
    /// Last child of the current level was just completed
    pending: bool,
}

impl TocParser {
    pub fn new() -> Self {
        TocParser {
            root: TocNode::new(ROOT_LABEL),
            stack: Vec::new(),
            state: State::Between,
            pending: false,
        }
    }

    /// Parse markup into a tree
    pub fn parse(mut self, markup: &str) -> TocTree {
        for event in tokenize(markup) {
            self.handle(event);
        }
        self.finish()
    }

    /// Apply one event
    pub(crate) fn handle(&mut self, event: Event) {
        match event {
            Event::ListOpen => self.open_level(),
            Event::ListClose => self.close_level(),
            Event::EntryOpen => self.state = State::InEntry(Scratch::default()),
            Event::Param { key, value } => {
                if let State::InEntry(scratch) = &mut self.state {
                    scratch.set(&key, value);
                }
            }
            Event::EntryClose => self.complete_entry(),
        }
    }

    /// Fold every open level back into its parent and return the tree
    pub(crate) fn finish(mut self) -> TocTree {
        while let Some(frame) = self.stack.pop() {
            if let Frame::Node(node) = frame {
                self.current_level().children.push(node);
            }
        }
        TocTree::from_root(self.root)
    }

    fn open_level(&mut self) {
        let frame = if self.pending {
            match self.current_level().children.pop() {
                Some(node) => Frame::Node(node),
                None => Frame::Reuse,
            }
        } else {
            Frame::Reuse
        };
        self.stack.push(frame);
        self.pending = false;
    }

    fn close_level(&mut self) {
        match self.stack.pop() {
            Some(Frame::Node(node)) => self.current_level().children.push(node),
            Some(Frame::Reuse) => {}
            None => debug!("Ignoring list close at the root level"),
        }
        self.pending = false;
    }

    fn complete_entry(&mut self) {
        let scratch = match std::mem::replace(&mut self.state, State::Between) {
            State::InEntry(scratch) => scratch,
            State::Between => return,
        };

        match scratch.into_node() {
            Some(node) => {
                self.current_level().children.push(node);
                self.pending = true;
            }
            None => debug!("Dropping table-of-contents entry without a name"),
        }
    }

    /// Node new entries are appended to
    fn current_level(&mut self) -> &mut TocNode {
        for frame in self.stack.iter_mut().rev() {
            if let Frame::Node(node) = frame {
                return node;
            }
        }
        &mut self.root
    }
}

impl Default for TocParser {
    fn default() -> Self {
        Self::new()
    }
}
