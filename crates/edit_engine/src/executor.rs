//! Command execution engine

use crate::{Command, EditorHost, ReplaceOutcome, ReplaceSpans, Replacement, Result, Span};
use doc_model::{DocumentTree, Selection, TextRuns};

/// The main editing engine that manages document state and command execution
#[derive(Debug)]
pub struct EditingEngine {
    /// Current document tree
    tree: DocumentTree,
    /// Current selection
    selection: Selection,
    /// Last span the view was asked to reveal
    scroll_target: Option<Span>,
}

impl EditingEngine {
    /// Create a new editing engine with an empty document
    pub fn new() -> Self {
        Self::with_tree(DocumentTree::default())
    }

    /// Create an editing engine with a specific document tree
    pub fn with_tree(tree: DocumentTree) -> Self {
        Self {
            tree,
            selection: Selection::collapsed(0),
            scroll_target: None,
        }
    }

    /// Get the current document tree
    pub fn tree(&self) -> &DocumentTree {
        &self.tree
    }

    /// Get the current selection
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Set the selection, clamped to the document length
    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection.clamp(self.tree.text_len());
    }

    pub fn scroll_target(&self) -> Option<Span> {
        self.scroll_target
    }

    /// Execute a command.
    ///
    /// The new tree replaces the current one only if the command succeeds.
    pub fn execute(&mut self, command: &dyn Command) -> Result<ReplaceOutcome> {
        let result = command.apply(&self.tree, &self.selection)?;

        self.tree = result.tree;
        self.selection = result.selection;

        Ok(result.outcome)
    }

    /// Swap in a different document, returning the old one
    pub fn replace_tree(&mut self, tree: DocumentTree) -> DocumentTree {
        self.selection = Selection::collapsed(0);
        self.scroll_target = None;
        std::mem::replace(&mut self.tree, tree)
    }
}

impl Default for EditingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorHost for EditingEngine {
    fn text_runs(&self) -> TextRuns<'_> {
        self.tree.text_runs()
    }

    fn version(&self) -> u64 {
        self.tree.version()
    }

    fn apply_replacements(&mut self, edits: &[Replacement]) -> Result<ReplaceOutcome> {
        self.execute(&ReplaceSpans::new(edits.to_vec()))
    }

    fn set_selection(&mut self, span: Span) {
        EditingEngine::set_selection(self, span.to_selection());
    }

    fn scroll_into_view(&mut self, span: Span) {
        self.scroll_target = Some(span);
    }
}
