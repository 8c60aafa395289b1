//! Find/replace configuration

use crate::Result;
use serde::{Deserialize, Serialize};

/// Search behaviour settings.
///
/// Missing fields fall back to their defaults when deserializing, so a
/// partial JSON object such as `{"match_limit": 500}` is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FindReplaceSettings {
    /// Allow a match to continue from one paragraph into the next
    pub cross_block_matches: bool,
    /// Reject matches that start or end inside a grapheme cluster
    pub respect_grapheme_boundaries: bool,
    /// Stop scanning after this many matches
    pub match_limit: Option<usize>,
}

impl Default for FindReplaceSettings {
    fn default() -> Self {
        Self {
            cross_block_matches: false,
            respect_grapheme_boundaries: true,
            match_limit: None,
        }
    }
}

impl FindReplaceSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cross_block_matches(mut self, value: bool) -> Self {
        self.cross_block_matches = value;
        self
    }

    pub fn respect_grapheme_boundaries(mut self, value: bool) -> Self {
        self.respect_grapheme_boundaries = value;
        self
    }

    pub fn match_limit(mut self, value: Option<usize>) -> Self {
        self.match_limit = value;
        self
    }

    /// Parse settings from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize settings to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse settings, falling back to defaults on missing or invalid input
    pub fn load_or_default(json: Option<&str>) -> Self {
        match json.map(Self::from_json) {
            Some(Ok(settings)) => settings,
            Some(Err(e)) => {
                tracing::warn!("Failed to parse find/replace settings, using defaults: {}", e);
                Self::default()
            }
            None => Self::default(),
        }
    }
}
