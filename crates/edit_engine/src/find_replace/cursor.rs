//! Navigation state over a [`MatchSet`]

use super::{MatchSet, Span};
use serde::{Deserialize, Serialize};

/// Match position for display, e.g. "2/7" or "0/0"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchCount {
    /// One-based index of the current match, 0 when there is none
    pub current: usize,
    pub total: usize,
}

impl std::fmt::Display for MatchCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.current, self.total)
    }
}

/// A match set with a current index.
///
/// Whenever the set is non-empty after a search or navigation, the index
/// points at a valid match; when the set is empty the index is `None`.
#[derive(Debug, Clone, Default)]
pub struct MatchCursor {
    matches: MatchSet,
    index: Option<usize>,
}

impl MatchCursor {
    /// Create a cursor positioned on the first match, if any
    pub fn new(matches: MatchSet) -> Self {
        let mut cursor = Self { matches, index: None };
        cursor.select_first();
        cursor
    }

    /// Install a fresh match set and select its first match
    pub fn reset(&mut self, matches: MatchSet) -> Option<Span> {
        self.matches = matches;
        self.select_first()
    }

    /// Drop all matches
    pub fn clear(&mut self) {
        self.matches = MatchSet::default();
        self.index = None;
    }

    pub fn matches(&self) -> &MatchSet {
        &self.matches
    }

    /// Zero-based index of the current match
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn select_first(&mut self) -> Option<Span> {
        self.index = if self.matches.is_empty() { None } else { Some(0) };
        self.current()
    }

    /// Select the first match starting at or after `offset`, wrapping to
    /// the first match when none does
    pub fn select_at_or_after(&mut self, offset: usize) -> Option<Span> {
        if self.matches.is_empty() {
            self.index = None;
        } else {
            self.index = Some(self.matches.first_at_or_after(offset).unwrap_or(0));
        }
        self.current()
    }

    /// Advance to the next match, wrapping from last to first
    pub fn next(&mut self) -> Option<Span> {
        let total = self.matches.len();
        if total == 0 {
            return None;
        }
        self.index = Some(match self.index {
            Some(idx) => (idx + 1) % total,
            None => 0,
        });
        self.current()
    }

    /// Step back to the previous match, wrapping from first to last
    pub fn previous(&mut self) -> Option<Span> {
        let total = self.matches.len();
        if total == 0 {
            return None;
        }
        self.index = Some(match self.index {
            Some(idx) => (idx + total - 1) % total,
            None => total - 1,
        });
        self.current()
    }

    pub fn current(&self) -> Option<Span> {
        self.index.and_then(|idx| self.matches.get(idx))
    }

    /// Display position; "0/0" when there are no matches
    pub fn position(&self) -> MatchCount {
        MatchCount {
            current: self.index.map_or(0, |idx| idx + 1),
            total: self.matches.len(),
        }
    }
}
