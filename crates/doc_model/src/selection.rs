//! Selection model over the flat offset space

use serde::{Deserialize, Serialize};

/// A selection in the document
///
/// A selection has an anchor (where the selection started) and a focus
/// (where the selection ends / where the caret is). When anchor == focus,
/// the selection is collapsed (just a caret). Both are flat offsets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// Where the selection started
    pub anchor: usize,
    /// Where the selection ends (caret position)
    pub focus: usize,
}

impl Selection {
    /// Create a new selection
    pub fn new(anchor: usize, focus: usize) -> Self {
        Self { anchor, focus }
    }

    /// Create a collapsed selection (caret only)
    pub fn collapsed(offset: usize) -> Self {
        Self {
            anchor: offset,
            focus: offset,
        }
    }

    /// Clamp both ends into `[0, len]`
    pub fn clamp(&self, len: usize) -> Self {
        Self {
            anchor: self.anchor.min(len),
            focus: self.focus.min(len),
        }
    }
}
