//! CGM document tree.
//!
//! Nodes live in an arena owned by [`Document`] and refer to each other by
//! [`NodeId`]. A node's parent is fixed when it is appended; nodes are never
//! removed or moved.

use std::borrow::Cow;
use std::fmt;
use std::ops::Index;

use crate::header::SpecialTable;

/// Handle of a node inside its [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One line of the outline.
#[derive(Clone, PartialEq, Eq)]
pub struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    content: Box<[u8]>,
    line: usize,
}

impl Node {
    /// Raw bytes of the line, indentation and newline excluded.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// The content as `&str`, if it is valid UTF-8.
    ///
    /// The decoder accepts surrogates and overlong forms, so this can fail on
    /// input that parsed successfully.
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.content).ok()
    }

    /// The content with invalid sequences replaced by U+FFFD.
    pub fn text_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }

    /// Body line the node came from; zero for the root.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("line", &self.line)
            .field("content", &self.text_lossy())
            .field("children", &self.children)
            .finish()
    }
}

/// A parsed CGM document: a synthetic root plus one node per non-blank line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    nodes: Vec<Node>,
    specials: SpecialTable,
}

impl Document {
    /// An empty document holding only the root.
    pub fn new(specials: SpecialTable) -> Self {
        let root = Node {
            parent: None,
            children: Vec::new(),
            content: Box::default(),
            line: 0,
        };
        Self {
            nodes: vec![root],
            specials,
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// The delimiter table declared by the document's header.
    pub fn specials(&self) -> &SpecialTable {
        &self.specials
    }

    /// Append a leaf as the last child of `parent`, copying `content`.
    pub(crate) fn append(&mut self, parent: NodeId, content: &[u8], line: usize) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: Some(parent),
            children: Vec::new(),
            content: content.into(),
            line,
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Distance from the root; top-level lines have depth 1.
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut cur = self.parent(id);
        while let Some(parent) = cur {
            depth += 1;
            cur = self.parent(parent);
        }
        depth
    }

    /// Number of line nodes, root excluded.
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Depth of the deepest line; zero for an empty document.
    pub fn max_depth(&self) -> usize {
        self.descendants().map(|(depth, _)| depth).max().unwrap_or(0)
    }

    /// Pre-order walk over every line node with its depth, in document order.
    pub fn descendants(&self) -> Descendants<'_> {
        let stack = self
            .children(self.root())
            .iter()
            .rev()
            .map(|&id| (1, id))
            .collect();
        Descendants { doc: self, stack }
    }
}

impl Index<NodeId> for Document {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        self.node(id)
    }
}

/// Iterator returned by [`Document::descendants`].
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<(usize, NodeId)>,
}

impl Iterator for Descendants<'_> {
    type Item = (usize, NodeId);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, id) = self.stack.pop()?;
        self.stack
            .extend(self.doc.children(id).iter().rev().map(|&c| (depth + 1, c)));
        Some((depth, id))
    }
}
