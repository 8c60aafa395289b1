//! Atomic batch replacement
//!
//! Replacing `[from, to)` shifts every later offset by
//! `text_len - (to - from)`. Applying a batch right-to-left (descending
//! `from`) means each span is applied before anything to its left has
//! moved, so the offsets recorded at scan time stay valid for the whole
//! batch. The batch is applied to a copy of the tree and only returned when
//! every replacement succeeded.

use super::{FlatText, ReplaceOutcome, Replacement, Span};
use crate::{Command, CommandResult, EditError, Result};
use doc_model::{DocumentTree, NodeId, Selection};
use serde::{Deserialize, Serialize};

/// Applies replacement batches to a document tree
pub struct BatchMutator;

impl BatchMutator {
    /// Check a batch against the document and return it in application
    /// order (descending `from`).
    ///
    /// Fails if a span is empty or out of bounds, if two spans overlap, or if
    /// any span touches read-only text.
    pub fn plan(tree: &DocumentTree, flat: &FlatText, edits: &[Replacement]) -> Result<Vec<Replacement>> {
        let len = flat.len();
        for edit in edits {
            let Span { from, to } = edit.span;
            if from >= to || to > len {
                return Err(EditError::SpanOutOfBounds { from, to, len });
            }
        }

        let mut ordered = edits.to_vec();
        ordered.sort_by(|a, b| b.span.from.cmp(&a.span.from));

        for pair in ordered.windows(2) {
            let (right, left) = (&pair[0].span, &pair[1].span);
            if left.overlaps(right) {
                return Err(EditError::OverlappingSpans {
                    first: (left.from, left.to),
                    second: (right.from, right.to),
                });
            }
        }

        if tree.read_only {
            return Err(EditError::MutationRejected("document is read-only".into()));
        }
        for edit in &ordered {
            if let Some(run) = flat.runs_overlapping(edit.span).find(|run| tree.is_locked(run.run_id)) {
                return Err(EditError::MutationRejected(format!(
                    "span {}..{} touches locked text in run {}",
                    edit.span.from, edit.span.to, run.run_id
                )));
            }
        }

        Ok(ordered)
    }

    /// Apply a batch, returning the new tree and a summary.
    ///
    /// `tree` itself is never modified.
    pub fn apply(tree: &DocumentTree, edits: &[Replacement]) -> Result<(DocumentTree, ReplaceOutcome)> {
        let flat = FlatText::from_tree(tree);
        let ordered = Self::plan(tree, &flat, edits)?;

        let mut working = tree.clone();
        let mut touched: Vec<NodeId> = Vec::new();
        for edit in &ordered {
            Self::apply_one(&mut working, &flat, edit, &mut touched)?;
        }

        // Runs emptied by the batch carry no text; drop them
        for run_id in touched {
            if working.get_run(run_id).is_some_and(|run| run.is_empty()) {
                working.remove_node(run_id)?;
            }
        }

        Ok((working, Self::summarize(&ordered)))
    }

    /// Replace one span. Offsets are taken from the pre-batch `flat` view;
    /// they are still valid because every earlier edit lay to the right.
    fn apply_one(
        tree: &mut DocumentTree,
        flat: &FlatText,
        edit: &Replacement,
        touched: &mut Vec<NodeId>,
    ) -> Result<()> {
        let mut inserted = false;
        for run in flat.runs_overlapping(edit.span) {
            let local_start = edit.span.from.saturating_sub(run.start);
            let local_end = edit.span.to.min(run.end()) - run.start;
            // The replacement goes into the first run it touches, taking its marks
            let text = if inserted { "" } else { edit.text.as_str() };
            inserted = true;
            tree.splice_run(run.run_id, local_start, local_end, text)?;
            if !touched.contains(&run.run_id) {
                touched.push(run.run_id);
            }
        }
        Ok(())
    }

    /// Post-mutation positions, computed from the descending plan
    fn summarize(ordered: &[Replacement]) -> ReplaceOutcome {
        let mut inserted = Vec::with_capacity(ordered.len());
        let mut shift: isize = 0;
        for edit in ordered.iter().rev() {
            let from = (edit.span.from as isize + shift) as usize;
            let text_len = edit.text_len();
            inserted.push(Span::new(from, from + text_len));
            shift += text_len as isize - edit.span.len() as isize;
        }
        ReplaceOutcome {
            count: ordered.len(),
            delta: shift,
            inserted,
        }
    }
}

/// Command wrapper so a batch can run through the editing engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaceSpans {
    pub edits: Vec<Replacement>,
}

impl ReplaceSpans {
    pub fn new(edits: Vec<Replacement>) -> Self {
        Self { edits }
    }
}

impl Command for ReplaceSpans {
    fn apply(&self, tree: &DocumentTree, selection: &Selection) -> Result<CommandResult> {
        let (new_tree, outcome) = BatchMutator::apply(tree, &self.edits)?;

        let mut replaced: Vec<Span> = self.edits.iter().map(|edit| edit.span).collect();
        replaced.sort();
        let new_selection = Selection::new(
            outcome.map_offset(selection.anchor, &replaced),
            outcome.map_offset(selection.focus, &replaced),
        );

        Ok(CommandResult {
            tree: new_tree,
            selection: new_selection,
            outcome,
        })
    }

    fn display_name(&self) -> &str {
        if self.edits.len() == 1 {
            "Replace"
        } else {
            "Replace All"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::{BlockKind, Marks, TextRun};

    fn at(from: usize, to: usize, text: &str) -> Replacement {
        Replacement::new(Span::new(from, to), text)
    }

    #[test]
    fn test_replace_all_cat_sat_mat() {
        let tree = DocumentTree::from_paragraphs(&["The cat sat on the mat."]);
        let edits = vec![at(5, 7, "XX"), at(9, 11, "XX"), at(20, 22, "XX")];
        let (new_tree, outcome) = BatchMutator::apply(&tree, &edits).unwrap();

        assert_eq!(new_tree.text_content(), "The cXX sXX on the mXX.");
        assert_eq!(outcome.count, 3);
        assert_eq!(outcome.delta, 0);
        assert_eq!(tree.text_content(), "The cat sat on the mat.");
    }

    #[test]
    fn test_growing_and_shrinking_replacements() {
        let tree = DocumentTree::from_paragraphs(&["a-b-c"]);
        let edits = vec![at(0, 1, "alpha"), at(2, 3, ""), at(4, 5, "gamma")];
        let (new_tree, outcome) = BatchMutator::apply(&tree, &edits).unwrap();

        assert_eq!(new_tree.text_content(), "alpha--gamma");
        assert_eq!(outcome.delta, 7);
        assert_eq!(outcome.inserted, vec![Span::new(0, 5), Span::new(6, 6), Span::new(7, 12)]);
    }

    #[test]
    fn test_order_of_input_does_not_matter() {
        let tree = DocumentTree::from_paragraphs(&["one two three"]);
        let forward = vec![at(0, 3, "1"), at(4, 7, "2"), at(8, 13, "3")];
        let mut shuffled = forward.clone();
        shuffled.swap(0, 2);

        let (a, _) = BatchMutator::apply(&tree, &forward).unwrap();
        let (b, _) = BatchMutator::apply(&tree, &shuffled).unwrap();
        assert_eq!(a.text_content(), "1 2 3");
        assert_eq!(b.text_content(), "1 2 3");
    }

    #[test]
    fn test_span_across_runs_keeps_first_run_marks() {
        let mut tree = DocumentTree::new();
        let para = tree.push_paragraph([
            TextRun::new("he"),
            TextRun::with_marks("ll", Marks::bold()),
            TextRun::new("o!"),
        ]).unwrap();

        let (new_tree, _) = BatchMutator::apply(&tree, &[at(1, 5, "ipp")]).unwrap();
        assert_eq!(new_tree.text_content(), "hipp!");

        // The fully covered bold run was emptied and pruned
        let runs: Vec<_> = new_tree.get(para).unwrap().children().iter()
            .map(|&id| new_tree.get_run(id).unwrap().clone())
            .collect();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].text, "hipp");
        assert!(runs[0].marks.is_plain());
        assert_eq!(runs[1].text, "!");
    }

    #[test]
    fn test_two_matches_in_one_run_and_one_straddling() {
        let mut tree = DocumentTree::new();
        tree.push_paragraph([TextRun::new("ab ab a"), TextRun::with_marks("b", Marks::italic())]).unwrap();

        let edits = vec![at(0, 2, "X"), at(3, 5, "Y"), at(6, 8, "Z")];
        let (new_tree, outcome) = BatchMutator::apply(&tree, &edits).unwrap();
        assert_eq!(new_tree.text_content(), "X Y Z");
        assert_eq!(outcome.inserted, vec![Span::new(0, 1), Span::new(2, 3), Span::new(4, 5)]);
    }

    #[test]
    fn test_rejects_out_of_bounds_and_empty() {
        let tree = DocumentTree::from_paragraphs(&["short"]);
        let err = BatchMutator::apply(&tree, &[at(3, 9, "x")]).unwrap_err();
        assert!(matches!(err, EditError::SpanOutOfBounds { len: 5, .. }));
        let err = BatchMutator::apply(&tree, &[at(2, 2, "x")]).unwrap_err();
        assert!(matches!(err, EditError::SpanOutOfBounds { .. }));
    }

    #[test]
    fn test_rejects_overlap() {
        let tree = DocumentTree::from_paragraphs(&["aaa"]);
        let err = BatchMutator::apply(&tree, &[at(0, 2, "b"), at(1, 3, "b")]).unwrap_err();
        assert!(matches!(err, EditError::OverlappingSpans { first: (0, 2), second: (1, 3) }));
    }

    #[test]
    fn test_locked_block_rejects_whole_batch() {
        let mut tree = DocumentTree::new();
        tree.push_paragraph([TextRun::new("cat ")]).unwrap();
        let locked = tree.push_paragraph([TextRun::new("cat")]).unwrap();
        tree.set_locked(locked, true).unwrap();
        let before = tree.version();

        let err = BatchMutator::apply(&tree, &[at(0, 3, "dog"), at(4, 7, "dog")]).unwrap_err();
        assert!(matches!(err, EditError::MutationRejected(_)));
        assert_eq!(tree.text_content(), "cat cat");
        assert_eq!(tree.version(), before);

        // Edits outside the locked block still go through
        let (new_tree, _) = BatchMutator::apply(&tree, &[at(0, 3, "dog")]).unwrap();
        assert_eq!(new_tree.text_content(), "dog cat");
    }

    #[test]
    fn test_read_only_document() {
        let mut tree = DocumentTree::from_paragraphs(&["text"]);
        tree.read_only = true;
        let err = BatchMutator::apply(&tree, &[at(0, 1, "T")]).unwrap_err();
        assert!(matches!(err, EditError::MutationRejected(_)));
    }

    #[test]
    fn test_replace_inside_table_cell() {
        let mut tree = DocumentTree::from_paragraphs(&["before "]);
        let table = tree.insert_block(BlockKind::Table, tree.root_id(), None).unwrap();
        let row = tree.insert_block(BlockKind::TableRow, table, None).unwrap();
        let cell = tree.insert_block(BlockKind::TableCell, row, None).unwrap();
        let para = tree.insert_block(BlockKind::Paragraph, cell, None).unwrap();
        tree.insert_text(TextRun::new("cell text"), para, None).unwrap();

        let (new_tree, _) = BatchMutator::apply(&tree, &[at(12, 16, "body")]).unwrap();
        assert_eq!(new_tree.block_text(table), "cell body");
    }

    #[test]
    fn test_command_maps_selection() {
        let tree = DocumentTree::from_paragraphs(&["The cat sat"]);
        let command = ReplaceSpans::new(vec![at(4, 7, "tiger")]);
        let result = command.apply(&tree, &Selection::new(8, 11)).unwrap();

        assert_eq!(result.tree.text_content(), "The tiger sat");
        assert_eq!(result.selection, Selection::new(10, 13));
        assert_eq!(command.display_name(), "Replace");
    }
}
