//! Document tree storage and structural operations

use crate::{BlockKind, DocModelError, LeafKind, Node, NodeId, NodeKind, Result, TextRun, TextRuns};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The complete document tree.
///
/// Nodes live in an arena keyed by [`NodeId`]; structure is expressed through
/// each node's parent and ordered child list. The flat offset space is the
/// concatenation of all text runs in document order (see [`TextRuns`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentTree {
    root: NodeId,
    nodes: HashMap<NodeId, Node>,
    /// Change counter, increased by every mutation
    version: u64,
    /// Whole-document write protection
    #[serde(default)]
    pub read_only: bool,
}

impl DocumentTree {
    /// Create a new tree holding only the document root
    pub fn new() -> Self {
        Self::with_paragraphs(std::iter::empty::<Vec<TextRun>>())
    }

    /// Create a document tree with a single empty paragraph
    pub fn with_empty_paragraph() -> Self {
        Self::with_paragraphs([Vec::new()])
    }

    /// Build a document with one plain-text paragraph per entry
    pub fn from_paragraphs<S: AsRef<str>>(paragraphs: &[S]) -> Self {
        Self::with_paragraphs(paragraphs.iter().map(|text| vec![TextRun::new(text.as_ref())]))
    }

    /// Assemble root, paragraphs and runs directly. Paragraphs under the
    /// document root and runs under a paragraph are always schema-valid, so
    /// no insertion can fail here.
    fn with_paragraphs(paragraphs: impl IntoIterator<Item = Vec<TextRun>>) -> Self {
        let mut root = Node::new(NodeKind::Block(BlockKind::Document));
        let root_id = root.id();
        let mut nodes = HashMap::new();

        for runs in paragraphs {
            let mut para = Node::new(NodeKind::paragraph());
            para.set_parent(Some(root_id));
            for run in runs {
                let mut text = Node::new(NodeKind::Text(run));
                text.set_parent(Some(para.id()));
                para.insert_child(None, text.id());
                nodes.insert(text.id(), text);
            }
            root.insert_child(None, para.id());
            nodes.insert(para.id(), para);
        }
        nodes.insert(root_id, root);

        Self {
            root: root_id,
            nodes,
            version: 0,
            read_only: false,
        }
    }

    /// Get the document root ID
    pub fn root_id(&self) -> NodeId {
        self.root
    }

    /// Get the change counter
    pub fn version(&self) -> u64 {
        self.version
    }

    fn touch(&mut self) {
        self.version += 1;
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Get a text run by node ID
    pub fn get_run(&self, id: NodeId) -> Option<&TextRun> {
        self.nodes.get(&id).and_then(Node::as_text)
    }

    /// Insert a detached node under `parent_id`.
    ///
    /// `index` of `None` appends. The parent must accept the node's kind.
    pub fn insert_node(&mut self, mut node: Node, parent_id: NodeId, index: Option<usize>) -> Result<NodeId> {
        let node_id = node.id();
        let parent = self.nodes.get_mut(&parent_id)
            .ok_or(DocModelError::NodeNotFound(parent_id.as_uuid()))?;

        let parent_kind = parent.block_kind().ok_or_else(|| {
            DocModelError::TreeStructureError(format!("Node {} cannot have children", parent_id))
        })?;
        if !parent_kind.accepts(&node.kind) {
            return Err(DocModelError::TreeStructureError(format!(
                "{:?} cannot contain {:?}",
                parent_kind, node.kind
            )));
        }

        parent.insert_child(index, node_id);
        node.set_parent(Some(parent_id));
        self.nodes.insert(node_id, node);
        self.touch();
        Ok(node_id)
    }

    /// Insert a block node
    pub fn insert_block(&mut self, kind: BlockKind, parent_id: NodeId, index: Option<usize>) -> Result<NodeId> {
        self.insert_node(Node::new(NodeKind::Block(kind)), parent_id, index)
    }

    /// Insert a text run into a text block
    pub fn insert_text(&mut self, run: TextRun, parent_id: NodeId, index: Option<usize>) -> Result<NodeId> {
        self.insert_node(Node::new(NodeKind::Text(run)), parent_id, index)
    }

    /// Insert a non-text leaf (image, break, rule)
    pub fn insert_leaf(&mut self, leaf: LeafKind, parent_id: NodeId, index: Option<usize>) -> Result<NodeId> {
        self.insert_node(Node::new(NodeKind::Leaf(leaf)), parent_id, index)
    }

    /// Append a paragraph with the given runs to the end of the document
    pub fn push_paragraph(&mut self, runs: impl IntoIterator<Item = TextRun>) -> Result<NodeId> {
        let para_id = self.insert_block(BlockKind::Paragraph, self.root, None)?;
        for run in runs {
            self.insert_text(run, para_id, None)?;
        }
        Ok(para_id)
    }

    /// Remove a node and its whole subtree
    pub fn remove_node(&mut self, node_id: NodeId) -> Result<Node> {
        if node_id == self.root {
            return Err(DocModelError::InvalidOperation("Cannot remove the document root".into()));
        }
        let node = self.nodes.remove(&node_id)
            .ok_or(DocModelError::NodeNotFound(node_id.as_uuid()))?;

        if let Some(parent_id) = node.parent() {
            if let Some(parent) = self.nodes.get_mut(&parent_id) {
                parent.remove_child(node_id);
            }
        }

        let mut pending: Vec<NodeId> = node.children().to_vec();
        while let Some(id) = pending.pop() {
            if let Some(child) = self.nodes.remove(&id) {
                pending.extend_from_slice(child.children());
            }
        }

        self.touch();
        Ok(node)
    }

    /// Replace the chars `[start, end)` of a run (run-local offsets) with `insert`
    pub fn splice_run(&mut self, run_id: NodeId, start: usize, end: usize, insert: &str) -> Result<()> {
        if self.is_locked(run_id) {
            return Err(DocModelError::ReadOnly(run_id.as_uuid()));
        }
        let run = self.nodes.get_mut(&run_id)
            .and_then(Node::as_text_mut)
            .ok_or(DocModelError::NodeNotFound(run_id.as_uuid()))?;

        let len = run.char_len();
        if start > end || end > len {
            return Err(DocModelError::InvalidOffset { offset: end.max(start), len });
        }
        run.splice_chars(start, end, insert);
        self.touch();
        Ok(())
    }

    /// Lock or unlock a node against text mutation
    pub fn set_locked(&mut self, node_id: NodeId, locked: bool) -> Result<()> {
        let node = self.nodes.get_mut(&node_id)
            .ok_or(DocModelError::NodeNotFound(node_id.as_uuid()))?;
        node.locked = locked;
        self.touch();
        Ok(())
    }

    /// Whether the node, or any of its ancestors, rejects mutation
    pub fn is_locked(&self, node_id: NodeId) -> bool {
        if self.read_only {
            return true;
        }
        let mut current = Some(node_id);
        while let Some(id) = current {
            match self.nodes.get(&id) {
                Some(node) if node.locked => return true,
                Some(node) => current = node.parent(),
                None => return false,
            }
        }
        false
    }

    /// Nearest ancestor (or the node itself) that holds inline content
    pub fn text_block_of(&self, node_id: NodeId) -> Option<NodeId> {
        let mut current = Some(node_id);
        while let Some(id) = current {
            let node = self.nodes.get(&id)?;
            if node.block_kind().is_some_and(|kind| kind.is_textblock()) {
                return Some(id);
            }
            current = node.parent();
        }
        None
    }

    /// Walk the text runs in document order
    pub fn text_runs(&self) -> TextRuns<'_> {
        TextRuns::new(self)
    }

    /// Total length of the flat offset space
    pub fn text_len(&self) -> usize {
        self.text_runs().map(|segment| segment.len).sum()
    }

    /// All run text concatenated in document order
    pub fn text_content(&self) -> String {
        self.text_runs().map(|segment| segment.text).collect()
    }

    /// Text of a single block, concatenating the runs below it
    pub fn block_text(&self, block_id: NodeId) -> String {
        let mut result = String::new();
        let mut pending = vec![block_id];
        while let Some(id) = pending.pop() {
            let Some(node) = self.nodes.get(&id) else { continue };
            if let Some(run) = node.as_text() {
                result.push_str(&run.text);
            }
            pending.extend(node.children().iter().rev());
        }
        result
    }
}

impl Default for DocumentTree {
    fn default() -> Self {
        Self::with_empty_paragraph()
    }
}
