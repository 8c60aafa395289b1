//! Literal, case-insensitive match scanning over a [`FlatText`]

use super::{FindReplaceSettings, FlatText, Span};
use unicode_segmentation::UnicodeSegmentation;

/// Ordered matches for one query, ascending by `from`.
///
/// Starts are strictly increasing. Because the scanner advances one char
/// after each hit, a match may begin inside the previous one ("aa" in "aaa").
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSet {
    spans: Vec<Span>,
}

impl MatchSet {
    /// Build from spans already in scan order
    pub fn from_sorted(spans: Vec<Span>) -> Self {
        debug_assert!(spans.windows(2).all(|w| w[0].from < w[1].from));
        Self { spans }
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Span> {
        self.spans.get(index).copied()
    }

    pub fn as_slice(&self) -> &[Span] {
        &self.spans
    }

    pub fn iter(&self) -> impl Iterator<Item = &Span> {
        self.spans.iter()
    }

    /// Index of the first match starting at or after `offset`
    pub fn first_at_or_after(&self, offset: usize) -> Option<usize> {
        let idx = self.spans.partition_point(|span| span.from < offset);
        (idx < self.spans.len()).then_some(idx)
    }

    /// Greedy left-to-right selection of pairwise disjoint matches
    pub fn non_overlapping(&self) -> Vec<Span> {
        let mut chosen: Vec<Span> = Vec::with_capacity(self.spans.len());
        for span in &self.spans {
            if chosen.last().map_or(true, |last| last.to <= span.from) {
                chosen.push(*span);
            }
        }
        chosen
    }
}

/// Finds every occurrence of a query in a flattened document
#[derive(Debug, Clone, Copy)]
pub struct MatchScanner<'s> {
    settings: &'s FindReplaceSettings,
}

impl<'s> MatchScanner<'s> {
    pub fn new(settings: &'s FindReplaceSettings) -> Self {
        Self { settings }
    }

    /// Find all matches of `query` in `flat`.
    ///
    /// The window slides one char at a time across the stitched text, so
    /// matches may straddle run boundaries. An empty query yields no matches.
    pub fn find_all(&self, flat: &FlatText, query: &str) -> MatchSet {
        let needle: Vec<char> = query.chars().collect();
        let haystack = flat.chars();
        let n = needle.len();
        if n == 0 || haystack.len() < n {
            return MatchSet::default();
        }

        let boundaries = if self.settings.respect_grapheme_boundaries {
            Some(grapheme_boundaries(flat))
        } else {
            None
        };

        let mut spans = Vec::new();
        for start in 0..=haystack.len() - n {
            if let Some(limit) = self.settings.match_limit {
                if spans.len() >= limit {
                    break;
                }
            }
            let window = &haystack[start..start + n];
            if !window.iter().zip(&needle).all(|(&a, &b)| chars_eq_ignore_case(a, b)) {
                continue;
            }
            let end = start + n;
            if let Some(boundaries) = &boundaries {
                if !boundaries[start] || !boundaries[end] {
                    continue;
                }
            }
            if !self.settings.cross_block_matches && flat.block_at(start) != flat.block_at(end - 1) {
                continue;
            }
            spans.push(Span::new(start, end));
        }

        MatchSet::from_sorted(spans)
    }
}

/// Compare two chars by their full lowercase mappings
fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// `result[i]` is true when flat offset `i` sits on a grapheme cluster boundary.
///
/// Each text block is segmented on its own: a block that opens with a
/// combining mark never fuses with the last char of the block before it.
fn grapheme_boundaries(flat: &FlatText) -> Vec<bool> {
    let mut boundaries = vec![false; flat.len() + 1];
    boundaries[flat.len()] = true;

    let runs = flat.runs();
    let mut idx = 0;
    while idx < runs.len() {
        let block = runs[idx].block_id;
        let start = runs[idx].start;
        let mut end = runs[idx].end();
        idx += 1;
        while idx < runs.len() && runs[idx].block_id == block {
            end = runs[idx].end();
            idx += 1;
        }

        let text: String = flat.chars()[start..end].iter().collect();
        let mut offset = start;
        boundaries[offset] = true;
        for grapheme in text.graphemes(true) {
            offset += grapheme.chars().count();
            boundaries[offset] = true;
        }
    }
    boundaries
}
