//! Error types for editing operations

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditError {
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Span {from}..{to} is outside the document (length {len})")]
    SpanOutOfBounds { from: usize, to: usize, len: usize },

    #[error("Replacement spans {first:?} and {second:?} overlap")]
    OverlappingSpans { first: (usize, usize), second: (usize, usize) },

    #[error("Mutation rejected: {0}")]
    MutationRejected(String),

    #[error("Document model error: {0}")]
    DocModel(#[from] doc_model::DocModelError),

    #[error("Invalid find/replace settings: {0}")]
    Settings(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EditError>;
