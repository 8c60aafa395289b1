//! Find/replace session state
//!
//! A session owns the query, the replacement text and the current matches.
//! It borrows the editor only for the duration of each call, so several
//! sessions (or none) can exist over one document.

use super::{FindReplaceSettings, FlatText, MatchCount, MatchCursor, MatchScanner, MatchSet, ReplaceOutcome, Replacement, Span};
use crate::{EditorHost, Result};

/// State behind a find/replace panel
#[derive(Debug, Clone, Default)]
pub struct FindReplaceSession {
    settings: FindReplaceSettings,
    query: String,
    replacement: String,
    cursor: MatchCursor,
    /// Document version the matches were computed against; `None` before
    /// the first search
    scanned_version: Option<u64>,
    /// Set when the host reports an edit, or a replace failed
    stale: bool,
}

impl FindReplaceSession {
    pub fn new(settings: FindReplaceSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> &FindReplaceSettings {
        &self.settings
    }

    /// Change search settings; the matches are rebuilt on next use
    pub fn set_settings(&mut self, settings: FindReplaceSettings) {
        self.settings = settings;
        self.stale = true;
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Set the search text, rescan, and select the first match
    pub fn set_query<H: EditorHost + ?Sized>(&mut self, host: &mut H, text: impl Into<String>) -> MatchCount {
        self.query = text.into();
        self.rescan(host);
        if let Some(span) = self.cursor.select_first() {
            Self::reveal(host, span);
        }
        self.match_count()
    }

    pub fn set_replacement(&mut self, text: impl Into<String>) {
        self.replacement = text.into();
    }

    /// Move to the next match, wrapping to the first
    pub fn go_to_next<H: EditorHost + ?Sized>(&mut self, host: &mut H) -> Option<Span> {
        self.ensure_fresh(host);
        let span = self.cursor.next()?;
        tracing::trace!("Next match {} at {}..{}", self.match_count(), span.from, span.to);
        Self::reveal(host, span);
        Some(span)
    }

    /// Move to the previous match, wrapping to the last
    pub fn go_to_previous<H: EditorHost + ?Sized>(&mut self, host: &mut H) -> Option<Span> {
        self.ensure_fresh(host);
        let span = self.cursor.previous()?;
        tracing::trace!("Previous match {} at {}..{}", self.match_count(), span.from, span.to);
        Self::reveal(host, span);
        Some(span)
    }

    /// Replace the current match.
    ///
    /// Returns `Ok(None)` when there is no current match. On success the
    /// matches are rebuilt and the cursor moves to the first match starting
    /// at or after the replaced position, so a replacement that itself
    /// contains the query is selected next. Past the last match it wraps to
    /// the first.
    pub fn replace_current<H: EditorHost + ?Sized>(&mut self, host: &mut H) -> Result<Option<ReplaceOutcome>> {
        self.ensure_fresh(host);
        let Some(span) = self.cursor.current() else {
            return Ok(None);
        };

        let edits = [Replacement::new(span, self.replacement.clone())];
        let outcome = self.commit(host, &edits)?;

        let resume_at = outcome.inserted.first().map_or(span.from, |inserted| inserted.from);
        self.rescan(host);
        if let Some(next) = self.cursor.select_at_or_after(resume_at) {
            Self::reveal(host, next);
        }
        Ok(Some(outcome))
    }

    /// Replace every match in one atomic batch.
    ///
    /// Overlapping matches are thinned to a disjoint set first. The matches
    /// are rebuilt afterwards; they are only empty if the replacement text
    /// does not bring the query back.
    pub fn replace_all<H: EditorHost + ?Sized>(&mut self, host: &mut H) -> Result<ReplaceOutcome> {
        self.ensure_fresh(host);
        if self.cursor.matches().is_empty() {
            return Ok(ReplaceOutcome::default());
        }

        let edits: Vec<Replacement> = self
            .cursor
            .matches()
            .non_overlapping()
            .into_iter()
            .map(|span| Replacement::new(span, self.replacement.clone()))
            .collect();
        let outcome = self.commit(host, &edits)?;

        self.rescan(host);
        if let Some(span) = self.cursor.select_first() {
            Self::reveal(host, span);
        }
        Ok(outcome)
    }

    /// Display position, e.g. "2/7"
    pub fn match_count(&self) -> MatchCount {
        self.cursor.position()
    }

    pub fn current(&self) -> Option<Span> {
        self.cursor.current()
    }

    pub fn matches(&self) -> &MatchSet {
        self.cursor.matches()
    }

    /// Whether the matches must be rebuilt before they are used again
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Tell the session that something else edited the document
    pub fn notify_document_changed(&mut self) {
        self.stale = true;
    }

    /// The host loaded a different document; drop everything
    pub fn document_replaced(&mut self) {
        self.clear();
    }

    /// The find/replace feature was closed
    pub fn deactivate(&mut self) {
        self.clear();
    }

    /// Rebuild the matches, keeping the cursor near its previous position
    pub fn refresh<H: EditorHost + ?Sized>(&mut self, host: &H) {
        let anchor = self.cursor.current().map(|span| span.from);
        self.rescan(host);
        match anchor {
            Some(offset) => self.cursor.select_at_or_after(offset),
            None => self.cursor.select_first(),
        };
    }

    fn clear(&mut self) {
        self.query.clear();
        self.replacement.clear();
        self.cursor.clear();
        self.scanned_version = None;
        self.stale = false;
    }

    fn commit<H: EditorHost + ?Sized>(&mut self, host: &mut H, edits: &[Replacement]) -> Result<ReplaceOutcome> {
        match host.apply_replacements(edits) {
            Ok(outcome) => {
                tracing::debug!("Replaced {} match(es), length delta {}", outcome.count, outcome.delta);
                Ok(outcome)
            }
            Err(e) => {
                // The old matches stay visible but are rebuilt before next use
                tracing::warn!("Replacement of {} match(es) rejected: {}", edits.len(), e);
                self.stale = true;
                Err(e)
            }
        }
    }

    fn ensure_fresh<H: EditorHost + ?Sized>(&mut self, host: &H) {
        let Some(scanned) = self.scanned_version else {
            return;
        };
        let version = host.version();
        if !self.stale && scanned == version {
            return;
        }
        if !self.stale {
            tracing::warn!(
                "Document changed from version {} to {} without notice, rebuilding matches",
                scanned,
                version
            );
        }
        self.refresh(host);
    }

    fn rescan<H: EditorHost + ?Sized>(&mut self, host: &H) {
        let flat = FlatText::extract(host.text_runs());
        let matches = MatchScanner::new(&self.settings).find_all(&flat, &self.query);
        let version = host.version();
        tracing::debug!(
            "Scanned {} chars for a {}-char query at version {}: {} match(es)",
            flat.len(),
            self.query.chars().count(),
            version,
            matches.len()
        );
        self.cursor.reset(matches);
        self.scanned_version = Some(version);
        self.stale = false;
    }

    fn reveal<H: EditorHost + ?Sized>(host: &mut H, span: Span) {
        host.set_selection(span);
        host.scroll_into_view(span);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EditingEngine, InsertText};
    use doc_model::{DocumentTree, Selection};

    fn engine(text: &str) -> EditingEngine {
        EditingEngine::with_tree(DocumentTree::from_paragraphs(&[text]))
    }

    #[test]
    fn test_set_query_selects_first() {
        let mut host = engine("The cat sat on the mat.");
        let mut session = FindReplaceSession::default();

        assert_eq!(session.set_query(&mut host, "at").to_string(), "1/3");
        assert_eq!(host.selection(), Selection::new(5, 7));
        assert_eq!(host.scroll_target(), Some(Span::new(5, 7)));
    }

    #[test]
    fn test_navigation_moves_selection() {
        let mut host = engine("The cat sat on the mat.");
        let mut session = FindReplaceSession::default();
        session.set_query(&mut host, "at");

        assert_eq!(session.go_to_previous(&mut host), Some(Span::new(20, 22)));
        assert_eq!(session.match_count().to_string(), "3/3");
        assert_eq!(session.go_to_next(&mut host), Some(Span::new(5, 7)));
        assert_eq!(host.selection(), Selection::new(5, 7));
    }

    #[test]
    fn test_navigation_without_search_is_noop() {
        let mut host = engine("text");
        let mut session = FindReplaceSession::default();
        assert_eq!(session.go_to_next(&mut host), None);
        assert_eq!(session.replace_current(&mut host).unwrap(), None);
        assert_eq!(session.match_count().to_string(), "0/0");
    }

    #[test]
    fn test_replace_current_moves_on() {
        let mut host = engine("The cat sat on the mat.");
        let mut session = FindReplaceSession::default();
        session.set_query(&mut host, "at");
        session.go_to_next(&mut host);
        session.set_replacement("og");

        let outcome = session.replace_current(&mut host).unwrap().unwrap();
        assert_eq!(outcome.inserted, vec![Span::new(9, 11)]);
        assert_eq!(host.tree().text_content(), "The cat sog on the mat.");
        assert_eq!(session.current(), Some(Span::new(20, 22)));
        assert_eq!(session.match_count().to_string(), "2/2");
    }

    #[test]
    fn test_replace_current_wraps_after_last() {
        let mut host = engine("cat cat");
        let mut session = FindReplaceSession::default();
        session.set_query(&mut host, "cat");
        session.go_to_previous(&mut host);
        session.set_replacement("dog");

        session.replace_current(&mut host).unwrap();
        assert_eq!(host.tree().text_content(), "cat dog");
        assert_eq!(session.current(), Some(Span::new(0, 3)));
    }

    #[test]
    fn test_replace_current_selects_match_inside_replacement() {
        let mut host = engine("cat dog cat");
        let mut session = FindReplaceSession::default();
        session.set_query(&mut host, "cat");
        session.set_replacement("bobcat");

        session.replace_current(&mut host).unwrap();
        assert_eq!(host.tree().text_content(), "bobcat dog cat");
        assert_eq!(session.current(), Some(Span::new(3, 6)));
        assert_eq!(session.match_count().to_string(), "1/2");
        assert_eq!(host.selection(), Selection::new(3, 6));
    }

    #[test]
    fn test_unannounced_change_is_detected() {
        let mut host = engine("cat");
        let mut session = FindReplaceSession::default();
        session.set_query(&mut host, "cat");

        host.execute(&InsertText::new(0, "cat ")).unwrap();
        assert!(!session.is_stale());
        session.go_to_next(&mut host);
        assert_eq!(session.matches().len(), 2);
    }

    #[test]
    fn test_deactivate_clears_state() {
        let mut host = engine("cat");
        let mut session = FindReplaceSession::default();
        session.set_query(&mut host, "cat");
        session.set_replacement("dog");

        session.deactivate();
        assert_eq!(session.query(), "");
        assert_eq!(session.replacement(), "");
        assert!(session.matches().is_empty());
        assert_eq!(session.match_count(), MatchCount::default());
    }

    #[test]
    fn test_settings_change_marks_stale() {
        let mut host = EditingEngine::with_tree(DocumentTree::from_paragraphs(&["foo", "bar"]));
        let mut session = FindReplaceSession::default();
        assert_eq!(session.set_query(&mut host, "ob").total, 0);

        session.set_settings(FindReplaceSettings::new().cross_block_matches(true));
        assert!(session.is_stale());
        assert_eq!(session.go_to_next(&mut host), Some(Span::new(2, 4)));
    }

    #[test]
    fn test_session_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<FindReplaceSession>();
    }
}
