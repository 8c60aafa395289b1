//! Document-order traversal of text runs
//!
//! This is the only place where flat offsets are derived from tree
//! structure. Every text run contributes its char length; blocks and
//! non-text leaves contribute nothing.

use crate::{DocumentTree, NodeId, NodeKind};

/// A text run as seen during traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSegment<'a> {
    /// The text node
    pub run_id: NodeId,
    /// Nearest enclosing text block (paragraph, heading, code block)
    pub block_id: Option<NodeId>,
    /// The run's text
    pub text: &'a str,
    /// Flat offset of the run's first char
    pub start: usize,
    /// Length in chars
    pub len: usize,
}

impl TextSegment<'_> {
    /// Flat offset just past the run's last char
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// Lazy iterator over the text runs of a [`DocumentTree`].
///
/// Created by [`DocumentTree::text_runs`]. The iterator borrows the tree, so
/// it cannot outlive a mutation; a new walk always starts from offset zero.
pub struct TextRuns<'a> {
    tree: &'a DocumentTree,
    /// Pending nodes with their enclosing text block, top of stack is next
    stack: Vec<(NodeId, Option<NodeId>)>,
    offset: usize,
}

impl<'a> TextRuns<'a> {
    pub(crate) fn new(tree: &'a DocumentTree) -> Self {
        Self {
            tree,
            stack: vec![(tree.root_id(), None)],
            offset: 0,
        }
    }
}

impl<'a> Iterator for TextRuns<'a> {
    type Item = TextSegment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((id, block)) = self.stack.pop() {
            let Some(node) = self.tree.get(id) else { continue };
            match &node.kind {
                NodeKind::Text(run) => {
                    let len = run.char_len();
                    let segment = TextSegment {
                        run_id: id,
                        block_id: block,
                        text: &run.text,
                        start: self.offset,
                        len,
                    };
                    self.offset += len;
                    return Some(segment);
                }
                NodeKind::Block(kind) => {
                    let block = if kind.is_textblock() { Some(id) } else { block };
                    self.stack.extend(node.children().iter().rev().map(|&child| (child, block)));
                }
                NodeKind::Leaf(_) => {}
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use crate::{BlockKind, DocumentTree, LeafKind, Marks, TextRun};

    #[test]
    fn test_offsets_are_contiguous() {
        let mut tree = DocumentTree::new();
        let para = tree.push_paragraph([TextRun::new("he"), TextRun::with_marks("llo", Marks::bold())]).unwrap();
        tree.push_paragraph([TextRun::new(" world")]).unwrap();

        let segments: Vec<_> = tree.text_runs().collect();
        assert_eq!(segments.len(), 3);
        assert_eq!((segments[0].text, segments[0].start), ("he", 0));
        assert_eq!((segments[1].text, segments[1].start), ("llo", 2));
        assert_eq!((segments[2].text, segments[2].start), (" world", 5));
        assert_eq!(segments[0].block_id, Some(para));
        assert_eq!(segments[1].block_id, Some(para));
        assert_ne!(segments[2].block_id, Some(para));
    }

    #[test]
    fn test_leaves_contribute_zero_length() {
        let mut tree = DocumentTree::new();
        let para = tree.push_paragraph([TextRun::new("ab")]).unwrap();
        tree.insert_leaf(LeafKind::Image { src: "a.png".into(), alt: None }, para, None).unwrap();
        tree.insert_leaf(LeafKind::HardBreak, para, None).unwrap();
        tree.insert_text(TextRun::new("cd"), para, None).unwrap();
        tree.insert_leaf(LeafKind::HorizontalRule, tree.root_id(), None).unwrap();
        tree.push_paragraph([TextRun::new("ef")]).unwrap();

        let starts: Vec<_> = tree.text_runs().map(|s| (s.text, s.start)).collect();
        assert_eq!(starts, vec![("ab", 0), ("cd", 2), ("ef", 4)]);
        assert_eq!(tree.text_len(), 6);
    }

    #[test]
    fn test_nested_blocks_in_document_order() {
        let mut tree = DocumentTree::new();
        tree.push_paragraph([TextRun::new("1")]).unwrap();

        let table = tree.insert_block(BlockKind::Table, tree.root_id(), None).unwrap();
        let row = tree.insert_block(BlockKind::TableRow, table, None).unwrap();
        for text in ["2", "3"] {
            let cell = tree.insert_block(BlockKind::TableCell, row, None).unwrap();
            let para = tree.insert_block(BlockKind::Paragraph, cell, None).unwrap();
            tree.insert_text(TextRun::new(text), para, None).unwrap();
        }

        let list = tree.insert_block(BlockKind::BulletList, tree.root_id(), None).unwrap();
        let item = tree.insert_block(BlockKind::ListItem, list, None).unwrap();
        let heading = tree.insert_block(BlockKind::Heading { level: 1 }, item, None).unwrap();
        tree.insert_text(TextRun::new("4"), heading, None).unwrap();

        assert_eq!(tree.text_content(), "1234");
        let last = tree.text_runs().last().unwrap();
        assert_eq!(last.block_id, Some(heading));
        assert_eq!(last.start, 3);
    }

    #[test]
    fn test_restartable() {
        let tree = DocumentTree::from_paragraphs(&["one", "two"]);
        let first: Vec<_> = tree.text_runs().collect();
        let second: Vec<_> = tree.text_runs().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_multibyte_lengths_in_chars() {
        let tree = DocumentTree::from_paragraphs(&["héllo", "wörld"]);
        let segments: Vec<_> = tree.text_runs().collect();
        assert_eq!(segments[0].len, 5);
        assert_eq!(segments[1].start, 5);
        assert_eq!(segments[1].end(), 10);
    }

    mod props {
        use crate::{DocumentTree, TextRun};
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn segments_tile_the_offset_space(
                paragraphs in prop::collection::vec(prop::collection::vec("[a-zé ]{0,6}", 0..4), 0..5)
            ) {
                let mut tree = DocumentTree::new();
                for runs in &paragraphs {
                    tree.push_paragraph(runs.iter().map(|text| TextRun::new(text.as_str()))).unwrap();
                }

                let mut expected_start = 0;
                for segment in tree.text_runs() {
                    prop_assert_eq!(segment.start, expected_start);
                    prop_assert_eq!(segment.len, segment.text.chars().count());
                    expected_start = segment.end();
                }
                let joined: String = paragraphs.iter().flatten().map(String::as_str).collect();
                prop_assert_eq!(tree.text_len(), joined.chars().count());
                prop_assert_eq!(tree.text_content(), joined);
            }
        }
    }
}
