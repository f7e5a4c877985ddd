use crate::domain::values::collection::Collection;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Collection not found: {0}")]
    CollectionNotFound(Collection),

    #[error("Insufficient data in {collection}: found {found} documents, need at least {required}")]
    InsufficientData {
        collection: Collection,
        found: usize,
        required: usize,
    },

    #[error("Vector dimension mismatch: expected {expected}, got {found}")]
    VectorDimensionMismatch { expected: usize, found: usize },

    /// A vector that should be unit length is not. Indicates corrupt input
    /// data or a bug upstream; callers should not retry.
    #[error("Vector is not normalized (norm = {norm})")]
    Normalization { norm: f64 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<rusqlite::Error> for DomainError {
    fn from(e: rusqlite::Error) -> Self {
        DomainError::Database(e.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(e: serde_json::Error) -> Self {
        DomainError::Parse(e.to_string())
    }
}
