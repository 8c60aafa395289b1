//! Flattened text view of a document

use super::Span;
use doc_model::{DocumentTree, NodeId, TextSegment};

/// Position of one text run inside a [`FlatText`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSpan {
    pub run_id: NodeId,
    pub block_id: Option<NodeId>,
    /// Flat offset of the first char
    pub start: usize,
    /// Length in chars
    pub len: usize,
}

impl RunSpan {
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// All text runs stitched together in document order.
///
/// Built fresh from a traversal each time; holds no reference to the tree,
/// so it describes the document as of the moment it was extracted.
#[derive(Debug, Clone, Default)]
pub struct FlatText {
    text: String,
    chars: Vec<char>,
    runs: Vec<RunSpan>,
}

impl FlatText {
    /// Stitch a traversal into a flat view
    pub fn extract<'a>(segments: impl IntoIterator<Item = TextSegment<'a>>) -> Self {
        let mut flat = Self::default();
        for segment in segments {
            debug_assert_eq!(segment.start, flat.chars.len(), "traversal offsets must be contiguous");
            flat.text.push_str(segment.text);
            flat.chars.extend(segment.text.chars());
            // Empty runs occupy no offsets and can never be part of a match
            if segment.len > 0 {
                flat.runs.push(RunSpan {
                    run_id: segment.run_id,
                    block_id: segment.block_id,
                    start: segment.start,
                    len: segment.len,
                });
            }
        }
        flat
    }

    /// Extract directly from a document tree
    pub fn from_tree(tree: &DocumentTree) -> Self {
        Self::extract(tree.text_runs())
    }

    /// Length of the offset space in chars
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The text as chars, indexable by flat offset
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Non-empty runs in document order
    pub fn runs(&self) -> &[RunSpan] {
        &self.runs
    }

    /// The run holding the char at `offset`
    pub fn run_at(&self, offset: usize) -> Option<&RunSpan> {
        let idx = self.runs.partition_point(|run| run.end() <= offset);
        self.runs.get(idx).filter(|run| run.start <= offset)
    }

    /// The text block holding the char at `offset`
    pub fn block_at(&self, offset: usize) -> Option<NodeId> {
        self.run_at(offset).and_then(|run| run.block_id)
    }

    /// Runs sharing at least one char with `span`, in document order
    pub fn runs_overlapping(&self, span: Span) -> impl Iterator<Item = &RunSpan> {
        let first = self.runs.partition_point(|run| run.end() <= span.from);
        self.runs[first..]
            .iter()
            .take_while(move |run| run.start < span.to)
    }

    /// Text covered by `span`; out-of-range parts are dropped
    pub fn slice(&self, span: Span) -> String {
        let to = span.to.min(self.chars.len());
        let from = span.from.min(to);
        self.chars[from..to].iter().collect()
    }
}
