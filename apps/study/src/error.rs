//! Error types for the study service.

use thiserror::Error;
use vocab_core::SnapshotError;

/// Study service error types
#[derive(Debug, Error)]
pub enum StudyError {
    #[error("Progress not found: {0}")]
    ProgressNotFound(String),

    #[error("Word not found: {0}")]
    WordNotFound(String),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid setting {key}: {value}")]
    InvalidSetting { key: String, value: String },
}

/// Result type alias for study operations
pub type Result<T> = std::result::Result<T, StudyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_progress_not_found() {
        let error = StudyError::ProgressNotFound("w-1".to_string());
        assert_eq!(error.to_string(), "Progress not found: w-1");
    }

    #[test]
    fn test_error_display_invalid_setting() {
        let error = StudyError::InvalidSetting {
            key: "VOCAB_ENFORCE_TONES".to_string(),
            value: "maybe".to_string(),
        };
        assert_eq!(error.to_string(), "Invalid setting VOCAB_ENFORCE_TONES: maybe");
    }

    #[test]
    fn test_snapshot_error_converts() {
        let error: StudyError = SnapshotError::DuplicateWordId {
            word_id: "w-2".to_string(),
        }
        .into();
        assert_eq!(error.to_string(), "Snapshot error: duplicate word ID w-2");
    }
}
