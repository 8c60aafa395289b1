//! Node kinds and the node record stored in the tree

use crate::{NodeId, TextRun};
use serde::{Deserialize, Serialize};

/// Block-level container kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    Document,
    Paragraph,
    Heading { level: u8 },
    Blockquote,
    BulletList,
    OrderedList,
    ListItem,
    CodeBlock,
    Table,
    TableRow,
    TableCell,
}

impl BlockKind {
    /// Whether this block holds inline content (runs and inline leaves)
    /// directly rather than other blocks.
    pub fn is_textblock(&self) -> bool {
        matches!(
            self,
            BlockKind::Paragraph | BlockKind::Heading { .. } | BlockKind::CodeBlock
        )
    }

    /// Whether `child` may be placed inside this block
    pub fn accepts(&self, child: &NodeKind) -> bool {
        match child {
            NodeKind::Block(child_kind) => match self {
                BlockKind::Document | BlockKind::Blockquote | BlockKind::ListItem | BlockKind::TableCell => {
                    !matches!(
                        child_kind,
                        BlockKind::Document | BlockKind::ListItem | BlockKind::TableRow | BlockKind::TableCell
                    )
                }
                BlockKind::BulletList | BlockKind::OrderedList => *child_kind == BlockKind::ListItem,
                BlockKind::Table => *child_kind == BlockKind::TableRow,
                BlockKind::TableRow => *child_kind == BlockKind::TableCell,
                _ => false,
            },
            NodeKind::Text(_) => self.is_textblock(),
            NodeKind::Leaf(LeafKind::HorizontalRule) => {
                matches!(self, BlockKind::Document | BlockKind::Blockquote | BlockKind::ListItem | BlockKind::TableCell)
            }
            NodeKind::Leaf(_) => self.is_textblock(),
        }
    }
}

/// Leaves that carry no text and contribute zero length to the offset space
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeafKind {
    Image { src: String, alt: Option<String> },
    HardBreak,
    HorizontalRule,
}

/// The closed set of node kinds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Block(BlockKind),
    Text(TextRun),
    Leaf(LeafKind),
}

impl NodeKind {
    /// Shorthand for a paragraph block
    pub fn paragraph() -> Self {
        NodeKind::Block(BlockKind::Paragraph)
    }

    /// Shorthand for a plain text run
    pub fn text(text: impl Into<String>) -> Self {
        NodeKind::Text(TextRun::new(text))
    }
}

/// A node record in the document arena
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    id: NodeId,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// What this node is
    pub kind: NodeKind,
    /// Locked nodes (and everything under them) reject text mutations
    #[serde(default)]
    pub locked: bool,
}

impl Node {
    /// Create a detached node with a fresh ID
    pub fn new(kind: NodeKind) -> Self {
        Self {
            id: NodeId::new(),
            parent: None,
            children: Vec::new(),
            kind,
            locked: false,
        }
    }

    /// Get the unique ID of this node
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Get the ID of the parent node (None for root or detached nodes)
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    /// Get the IDs of child nodes in document order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub(crate) fn insert_child(&mut self, index: Option<usize>, child_id: NodeId) {
        match index {
            Some(idx) if idx <= self.children.len() => self.children.insert(idx, child_id),
            _ => self.children.push(child_id),
        }
    }

    pub(crate) fn remove_child(&mut self, child_id: NodeId) -> bool {
        if let Some(pos) = self.children.iter().position(|&id| id == child_id) {
            self.children.remove(pos);
            true
        } else {
            false
        }
    }

    /// Get the text run if this is a text node
    pub fn as_text(&self) -> Option<&TextRun> {
        match &self.kind {
            NodeKind::Text(run) => Some(run),
            _ => None,
        }
    }

    /// Get a mutable text run if this is a text node
    pub fn as_text_mut(&mut self) -> Option<&mut TextRun> {
        match &mut self.kind {
            NodeKind::Text(run) => Some(run),
            _ => None,
        }
    }

    /// Get the block kind if this is a block node
    pub fn block_kind(&self) -> Option<BlockKind> {
        match &self.kind {
            NodeKind::Block(kind) => Some(*kind),
            _ => None,
        }
    }
}
