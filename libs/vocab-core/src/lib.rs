//! Core vocabulary learning engine.
//!
//! Provides:
//! - Pinyin syllable parsing, tone-mark rendering and numeric normalization
//! - Pronunciation answer matching with configurable tone strictness
//! - SM-2 review scheduling and next-item selection
//! - Export snapshots with upgrade of pre-SM-2 progress records
//!
//! Everything here is pure: records in, records out.

pub mod algorithm;
pub mod error;
pub mod matching;
pub mod pinyin;
pub mod snapshot;
pub mod types;

pub use algorithm::{
    get_algorithm, review_quality, schedule_next_review, select_next_candidate,
    SpacedRepetitionAlgorithm, Sm2,
};
pub use error::{Result, SnapshotError};
pub use matching::{compare_pronunciation, PronunciationMatch};
pub use pinyin::{parse, to_diacritic, to_numeric};
pub use snapshot::{Snapshot, StoredProgress, StoredSettings};
pub use types::{
    Bucket, CompareOptions, LessonStage, ReviewOutcome, ReviewProgress, ReviewResult,
    StudySettings, Syllable, VocabularyItem, NEUTRAL_TONE,
};
