//! Text run - a contiguous span of text with consistent formatting

use serde::{Deserialize, Serialize};

/// Inline formatting carried by a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marks {
    pub bold: bool,
    pub italic: bool,
    /// Inline code span
    pub code: bool,
    /// Hyperlink target, if the run is part of a link
    pub link: Option<String>,
}

impl Marks {
    /// Marks with only bold set
    pub fn bold() -> Self {
        Self {
            bold: true,
            ..Default::default()
        }
    }

    /// Marks with only italic set
    pub fn italic() -> Self {
        Self {
            italic: true,
            ..Default::default()
        }
    }

    /// Marks for a hyperlink
    pub fn link(href: impl Into<String>) -> Self {
        Self {
            link: Some(href.into()),
            ..Default::default()
        }
    }

    /// Check whether no formatting is applied
    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }
}

/// A text run - the only node kind that contributes to the offset space
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    /// The text content of this run
    pub text: String,
    /// Formatting applied to the whole run
    #[serde(default)]
    pub marks: Marks,
}

impl TextRun {
    /// Create a plain run
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            marks: Marks::default(),
        }
    }

    /// Create a run with formatting
    pub fn with_marks(text: impl Into<String>, marks: Marks) -> Self {
        Self {
            text: text.into(),
            marks,
        }
    }

    /// Length of the run in offset units (chars)
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Check if this run is empty
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Replace the chars in `[start, end)` (run-local char offsets) with `insert`.
    ///
    /// Offsets past the end of the run are clamped.
    pub fn splice_chars(&mut self, start: usize, end: usize, insert: &str) {
        let start_byte = char_to_byte(&self.text, start);
        let end_byte = char_to_byte(&self.text, end.max(start));
        self.text.replace_range(start_byte..end_byte, insert);
    }
}

/// Convert a char offset into a byte index, clamping to the string length
pub(crate) fn char_to_byte(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}
