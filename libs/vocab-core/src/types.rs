//! Core types for the vocabulary learning engine.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Tone value for neutral or unmarked syllables.
pub const NEUTRAL_TONE: u8 = 5;

/// A single romanized syllable.
///
/// `letters` is lowercase ASCII where `v` stands for `ü`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Syllable {
    pub letters: String,
    pub tone: u8,
}

impl Syllable {
    pub fn new(letters: impl Into<String>, tone: u8) -> Self {
        Self {
            letters: letters.into(),
            tone,
        }
    }

    /// Whether the syllable carries the neutral tone.
    pub fn is_neutral(&self) -> bool {
        self.tone == NEUTRAL_TONE
    }
}

/// Vocabulary item as supplied by the word store.
///
/// Serialized with the word-pack keys `pinyin`/`alternatePinyin`. Fields the
/// engine does not use (prompt, characters, hints) are carried in `extra` so
/// they survive an import/export cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyItem {
    pub id: String,
    #[serde(rename = "pinyin", alias = "pronunciation")]
    pub pronunciation: String,
    #[serde(
        default,
        rename = "alternatePinyin",
        alias = "alternatePronunciations",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub alternate_pronunciations: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VocabularyItem {
    pub fn new(id: impl Into<String>, pronunciation: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            pronunciation: pronunciation.into(),
            alternate_pronunciations: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn with_alternates<I, S>(mut self, alternates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.alternate_pronunciations = alternates.into_iter().map(Into::into).collect();
        self
    }

    /// Primary pronunciation followed by the alternates, in trial order.
    pub fn candidates(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.pronunciation.as_str())
            .chain(self.alternate_pronunciations.iter().map(String::as_str))
    }
}

/// Coarse mastery classification.
///
/// Variant order is the review priority: `Learning` sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    Learning,
    Reinforce,
    Known,
}

impl Default for Bucket {
    fn default() -> Self {
        Self::Learning
    }
}

impl Bucket {
    /// Derive the bucket from scheduling state.
    pub fn classify(repetitions: u32, interval_days: u32, quality: u8) -> Self {
        if quality < 3 || repetitions <= 1 || interval_days <= 1 {
            Self::Learning
        } else if interval_days < 14 {
            Self::Reinforce
        } else {
            Self::Known
        }
    }

    /// Selection priority (lower is reviewed sooner).
    pub fn priority(self) -> u8 {
        match self {
            Self::Learning => 0,
            Self::Reinforce => 1,
            Self::Known => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Learning => "learning",
            Self::Reinforce => "reinforce",
            Self::Known => "known",
        }
    }
}

/// Result of the most recent review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewResult {
    Success,
    Failure,
}

impl Default for ReviewResult {
    fn default() -> Self {
        Self::Failure
    }
}

/// Furthest stage a lesson reached, in lesson order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LessonStage {
    Pinyin,
    Writing,
    WritingGuidedHalf,
    WritingGuidedFull,
    Complete,
}

/// Review state of one vocabulary item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewProgress {
    pub word_id: String,
    pub bucket: Bucket,
    pub streak: u32,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub last_reviewed_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub next_due_at: DateTime<Utc>,
    pub pinyin_attempts: u32,
    pub writing_attempts: u32,
    pub last_result: ReviewResult,
    pub review_count: u32,
    pub suspended: bool,
    pub repetitions: u32,
    pub interval_days: u32,
    pub easiness: f64,
    pub last_quality: u8,
}

impl ReviewProgress {
    /// Default easiness for a fresh item.
    pub const INITIAL_EASINESS: f64 = 2.5;

    /// Fresh progress for an item imported at `now`.
    pub fn new(word_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            word_id: word_id.into(),
            bucket: Bucket::Learning,
            streak: 0,
            last_reviewed_at: DateTime::UNIX_EPOCH,
            next_due_at: now,
            pinyin_attempts: 0,
            writing_attempts: 0,
            last_result: ReviewResult::Failure,
            review_count: 0,
            suspended: false,
            repetitions: 0,
            interval_days: 1,
            easiness: Self::INITIAL_EASINESS,
            last_quality: 0,
        }
    }

    /// Whether the item is due at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_due_at <= now
    }

    /// Time left until the item becomes due, zero if already due.
    pub fn time_until_due(&self, now: DateTime<Utc>) -> Duration {
        (self.next_due_at - now).max(Duration::zero())
    }
}

/// Outcome of a completed lesson, reported by the quiz flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewOutcome {
    pub word_id: String,
    pub success: bool,
    pub stage_reached: LessonStage,
    pub pinyin_attempts: u32,
    pub writing_attempts: u32,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

/// Learner-facing study settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySettings {
    #[serde(default = "default_true")]
    pub enforce_tones: bool,
    #[serde(default = "default_true")]
    pub allow_neutral_mismatch: bool,
}

fn default_true() -> bool {
    true
}

impl Default for StudySettings {
    fn default() -> Self {
        Self {
            enforce_tones: true,
            allow_neutral_mismatch: true,
        }
    }
}

/// Per-call pronunciation comparison options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompareOptions {
    pub enforce_tone: bool,
    /// Neutral tone on either side never counts as a mismatch.
    pub allow_neutral_mismatch: bool,
}

impl CompareOptions {
    pub fn new(enforce_tone: bool) -> Self {
        Self {
            enforce_tone,
            allow_neutral_mismatch: true,
        }
    }
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self::new(true)
    }
}

impl From<&StudySettings> for CompareOptions {
    fn from(settings: &StudySettings) -> Self {
        Self {
            enforce_tone: settings.enforce_tones,
            allow_neutral_mismatch: settings.allow_neutral_mismatch,
        }
    }
}
