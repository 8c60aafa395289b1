//! Command system for document editing

use crate::{EditError, ReplaceOutcome, Span};
use doc_model::{DocumentTree, Selection};
use serde::{Deserialize, Serialize};

/// Result of applying a command
#[derive(Debug)]
pub struct CommandResult {
    /// The new document tree after the command
    pub tree: DocumentTree,
    /// The new selection after the command
    pub selection: Selection,
    /// What changed, in flat offsets
    pub outcome: ReplaceOutcome,
}

/// Trait for all editing commands.
///
/// A command never touches the tree it is given: it builds a new tree and
/// the executor swaps it in, so a failing command leaves the document as it
/// was.
pub trait Command: std::fmt::Debug + Send + Sync {
    /// Apply this command to a document
    fn apply(&self, tree: &DocumentTree, selection: &Selection) -> crate::Result<CommandResult>;

    /// Get a display name for this command
    fn display_name(&self) -> &str;
}

/// Insert text at a flat offset.
///
/// The text joins the run that ends at, or contains, the offset and takes
/// that run's marks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsertText {
    pub offset: usize,
    pub text: String,
}

impl InsertText {
    pub fn new(offset: usize, text: impl Into<String>) -> Self {
        Self {
            offset,
            text: text.into(),
        }
    }
}

impl Command for InsertText {
    fn apply(&self, tree: &DocumentTree, selection: &Selection) -> crate::Result<CommandResult> {
        let run = tree
            .text_runs()
            .find(|segment| segment.start <= self.offset && self.offset <= segment.end())
            .ok_or_else(|| {
                EditError::InvalidCommand(format!(
                    "No text run at offset {} (document length {})",
                    self.offset,
                    tree.text_len()
                ))
            })?;
        let local = self.offset - run.start;
        let run_id = run.run_id;

        let mut new_tree = tree.clone();
        new_tree.splice_run(run_id, local, local, &self.text)?;

        let inserted_len = self.text.chars().count();
        let shift = |offset: usize| if offset >= self.offset { offset + inserted_len } else { offset };
        let new_selection = Selection::new(shift(selection.anchor), shift(selection.focus));

        Ok(CommandResult {
            tree: new_tree,
            selection: new_selection,
            outcome: ReplaceOutcome {
                count: 1,
                delta: inserted_len as isize,
                inserted: vec![Span::new(self.offset, self.offset + inserted_len)],
            },
        })
    }

    fn display_name(&self) -> &str {
        "Insert Text"
    }
}
