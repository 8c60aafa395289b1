//! The editor surface a find/replace session drives

use crate::{ReplaceOutcome, Replacement, Result, Span};
use doc_model::TextRuns;

/// What a find/replace session needs from the editor that owns the document.
///
/// The session never holds on to the document. It reads text through
/// `text_runs` when it scans, and writes only through
/// `apply_replacements`.
pub trait EditorHost {
    /// Document-order traversal of the current text runs
    fn text_runs(&self) -> TextRuns<'_>;

    /// Change counter of the current document; any mutation bumps it
    fn version(&self) -> u64;

    /// Apply a batch atomically. On error the document must be unchanged.
    fn apply_replacements(&mut self, edits: &[Replacement]) -> Result<ReplaceOutcome>;

    /// Select a span in the editor
    fn set_selection(&mut self, span: Span);

    /// Bring a span into view
    fn scroll_into_view(&mut self, span: Span);
}
