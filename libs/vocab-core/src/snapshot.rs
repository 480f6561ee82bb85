//! Export snapshots and stored progress records.
//!
//! Stored records use the camelCase layout of the export file. Records
//! written before SM-2 scheduling carry only a bucket; [`StoredProgress::upgrade`]
//! derives SM-2 state for them once, on load.

use crate::error::{Result, SnapshotError};
use crate::types::{Bucket, ReviewProgress, ReviewResult, StudySettings, VocabularyItem};
use chrono::serde::ts_milliseconds;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

const MIN_EASINESS: f64 = 1.3;
const MAX_EASINESS: f64 = 3.5;

/// Progress record as persisted or exported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredProgress {
    pub word_id: String,
    #[serde(default)]
    pub bucket: Bucket,
    #[serde(default)]
    pub streak: u32,
    #[serde(with = "ts_milliseconds")]
    pub last_reviewed_at: DateTime<Utc>,
    #[serde(with = "ts_milliseconds")]
    pub next_due_at: DateTime<Utc>,
    #[serde(default)]
    pub pinyin_attempts: u32,
    #[serde(default)]
    pub writing_attempts: u32,
    #[serde(default)]
    pub last_result: ReviewResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suspended: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sm2_repetitions: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sm2_interval: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sm2_easiness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sm2_last_quality: Option<u8>,
}

impl StoredProgress {
    /// Convert into a scheduler record, filling in missing SM-2 state.
    ///
    /// The bucket is recomputed from the resulting SM-2 state.
    pub fn upgrade(self) -> ReviewProgress {
        let (legacy_repetitions, legacy_interval, legacy_quality) =
            legacy_sm2_state(self.bucket, self.last_result);

        let repetitions = self.sm2_repetitions.unwrap_or(legacy_repetitions);
        let interval_days = self.sm2_interval.unwrap_or(legacy_interval).max(1);
        let easiness = self
            .sm2_easiness
            .filter(|easiness| easiness.is_finite())
            .unwrap_or(ReviewProgress::INITIAL_EASINESS)
            .clamp(MIN_EASINESS, MAX_EASINESS);
        let last_quality = self.sm2_last_quality.unwrap_or(legacy_quality).min(5);

        ReviewProgress {
            word_id: self.word_id,
            bucket: Bucket::classify(repetitions, interval_days, last_quality),
            streak: self.streak,
            last_reviewed_at: self.last_reviewed_at,
            next_due_at: self.next_due_at,
            pinyin_attempts: self.pinyin_attempts,
            writing_attempts: self.writing_attempts,
            last_result: self.last_result,
            review_count: self.review_count.unwrap_or(0),
            suspended: self.suspended.unwrap_or(false),
            repetitions,
            interval_days,
            easiness,
            last_quality,
        }
    }

    /// Whether the record predates SM-2 scheduling.
    pub fn is_legacy(&self) -> bool {
        self.sm2_repetitions.is_none()
            || self.sm2_interval.is_none()
            || self.sm2_easiness.is_none()
            || self.sm2_last_quality.is_none()
    }
}

/// SM-2 state equivalent to a bucket-only record.
fn legacy_sm2_state(bucket: Bucket, last_result: ReviewResult) -> (u32, u32, u8) {
    match bucket {
        Bucket::Learning => match last_result {
            ReviewResult::Success => (1, 1, 3),
            ReviewResult::Failure => (0, 1, 0),
        },
        Bucket::Reinforce => (2, 6, 4),
        Bucket::Known => (3, 15, 4),
    }
}

impl From<&ReviewProgress> for StoredProgress {
    fn from(progress: &ReviewProgress) -> Self {
        Self {
            word_id: progress.word_id.clone(),
            bucket: progress.bucket,
            streak: progress.streak,
            last_reviewed_at: progress.last_reviewed_at,
            next_due_at: progress.next_due_at,
            pinyin_attempts: progress.pinyin_attempts,
            writing_attempts: progress.writing_attempts,
            last_result: progress.last_result,
            review_count: Some(progress.review_count),
            suspended: Some(progress.suspended),
            sm2_repetitions: Some(progress.repetitions),
            sm2_interval: Some(progress.interval_days),
            sm2_easiness: Some(progress.easiness),
            sm2_last_quality: Some(progress.last_quality),
        }
    }
}

/// Settings block of an export file.
///
/// Only the study settings are interpreted; the rest of the app's settings
/// (interface language, learning mode, handwriting leniency) are kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredSettings {
    #[serde(flatten)]
    pub study: StudySettings,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl From<StudySettings> for StoredSettings {
    fn from(study: StudySettings) -> Self {
        Self {
            study,
            other: Map::new(),
        }
    }
}

/// Full export of learner state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub settings: StoredSettings,
    pub progress: Vec<StoredProgress>,
    #[serde(default)]
    pub custom_words: Vec<VocabularyItem>,
    #[serde(with = "ts_milliseconds")]
    pub last_updated: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(
        settings: impl Into<StoredSettings>,
        progress: &[ReviewProgress],
        custom_words: Vec<VocabularyItem>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            settings: settings.into(),
            progress: progress.iter().map(StoredProgress::from).collect(),
            custom_words,
            last_updated: now,
        }
    }

    /// Parse and validate a snapshot.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(SnapshotError::from)
    }

    /// Reject records without a word ID and duplicate IDs.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for (index, record) in self.progress.iter().enumerate() {
            if record.word_id.trim().is_empty() {
                return Err(SnapshotError::MissingWordId { index });
            }
            if !seen.insert(record.word_id.as_str()) {
                return Err(SnapshotError::DuplicateWordId {
                    word_id: record.word_id.clone(),
                });
            }
        }

        let mut seen_words = HashSet::new();
        for word in &self.custom_words {
            if !seen_words.insert(word.id.as_str()) {
                return Err(SnapshotError::DuplicateWordId {
                    word_id: word.id.clone(),
                });
            }
        }
        Ok(())
    }

    /// Progress records converted for the scheduler.
    pub fn upgraded_progress(&self) -> Vec<ReviewProgress> {
        self.progress.iter().cloned().map(StoredProgress::upgrade).collect()
    }
}
