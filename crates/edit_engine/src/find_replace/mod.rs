//! Find and Replace Engine
//!
//! Structural find-and-replace over the flat offset space of a
//! [`doc_model::DocumentTree`]:
//! - `extract` stitches text runs into a single searchable view
//! - `scanner` finds case-insensitive literal matches
//! - `cursor` steps through matches with wraparound
//! - `mutator` applies replacement batches right-to-left, atomically
//! - `session` ties the pieces together for a find/replace panel
//! - `settings` holds the serializable search configuration

mod cursor;
mod extract;
mod mutator;
mod scanner;
mod session;
mod settings;

pub use cursor::*;
pub use extract::*;
pub use mutator::*;
pub use scanner::*;
pub use session::*;
pub use settings::*;

use doc_model::Selection;
use serde::{Deserialize, Serialize};

/// A half-open `[from, to)` interval in the flat offset space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    pub from: usize,
    pub to: usize,
}

impl Span {
    /// Create a span. `from` must not exceed `to`.
    pub fn new(from: usize, to: usize) -> Self {
        debug_assert!(from <= to, "span start {} past end {}", from, to);
        Self { from, to }
    }

    /// Length in chars
    pub fn len(&self) -> usize {
        self.to - self.from
    }

    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }

    /// Whether the two spans share at least one offset unit
    pub fn overlaps(&self, other: &Span) -> bool {
        self.from < other.to && other.from < self.to
    }

    /// Selection covering this span
    pub fn to_selection(&self) -> Selection {
        Selection::new(self.from, self.to)
    }
}

/// One replacement target in a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement {
    pub span: Span,
    pub text: String,
}

impl Replacement {
    pub fn new(span: Span, text: impl Into<String>) -> Self {
        Self {
            span,
            text: text.into(),
        }
    }

    /// Length of the replacement text in chars
    pub fn text_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Summary of an applied batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceOutcome {
    /// Number of spans replaced
    pub count: usize,
    /// Net change of the document length in chars
    pub delta: isize,
    /// Where each replacement text ended up, in post-mutation offsets,
    /// ascending
    pub inserted: Vec<Span>,
}

impl ReplaceOutcome {
    /// Map a pre-mutation offset into the post-mutation offset space.
    ///
    /// Offsets inside a replaced span move to the end of its replacement.
    pub fn map_offset(&self, offset: usize, replaced: &[Span]) -> usize {
        let mut shift: isize = 0;
        for (old, new) in replaced.iter().zip(&self.inserted) {
            if offset < old.from {
                break;
            }
            if offset < old.to {
                return new.to;
            }
            shift = new.to as isize - old.to as isize;
        }
        (offset as isize + shift).max(0) as usize
    }
}
