//! Error types for document model operations

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DocModelError {
    #[error("Node not found: {0}")]
    NodeNotFound(Uuid),

    #[error("Invalid offset {offset} (document length {len})")]
    InvalidOffset { offset: usize, len: usize },

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Tree structure error: {0}")]
    TreeStructureError(String),

    #[error("Node {0} is read-only")]
    ReadOnly(Uuid),
}

pub type Result<T> = std::result::Result<T, DocModelError>;
