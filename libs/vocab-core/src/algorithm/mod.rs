//! Spaced repetition scheduling and review selection.

pub mod selection;
pub mod sm2;

use crate::types::{ReviewOutcome, ReviewProgress};
use chrono::{DateTime, Utc};

pub use selection::{review_order, review_queue, select_next_candidate};
pub use sm2::{review_quality, Sm2};

/// Trait for spaced repetition algorithms.
pub trait SpacedRepetitionAlgorithm: Send + Sync {
    /// Algorithm identifier.
    fn name(&self) -> &'static str;

    /// Replacement progress after a completed review.
    fn schedule(&self, progress: &ReviewProgress, outcome: &ReviewOutcome) -> ReviewProgress;

    /// Initial progress for a newly imported item.
    fn initial_progress(&self, word_id: &str, now: DateTime<Utc>) -> ReviewProgress;
}

/// Get algorithm by name.
pub fn get_algorithm(name: &str) -> Option<Box<dyn SpacedRepetitionAlgorithm>> {
    match name {
        "sm2" => Some(Box::new(Sm2::default())),
        _ => None,
    }
}

/// Schedule the next review with the default SM-2 parameters.
pub fn schedule_next_review(progress: &ReviewProgress, outcome: &ReviewOutcome) -> ReviewProgress {
    Sm2::default().schedule(progress, outcome)
}
