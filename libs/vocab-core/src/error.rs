//! Error types for vocab-core.

use thiserror::Error;

/// Result type alias using SnapshotError.
pub type Result<T> = std::result::Result<T, SnapshotError>;

/// Errors that can occur while reading an exported snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("progress record {index} has no word ID")]
    MissingWordId { index: usize },

    #[error("duplicate word ID {word_id}")]
    DuplicateWordId { word_id: String },
}
