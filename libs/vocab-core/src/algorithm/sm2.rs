//! SM-2 spaced repetition algorithm.
//!
//! Quality is not self-graded: it is derived from how far the lesson got and
//! how many attempts each stage took.

use super::SpacedRepetitionAlgorithm;
use crate::types::{Bucket, LessonStage, ReviewOutcome, ReviewProgress, ReviewResult};
use chrono::{DateTime, Duration, Utc};

/// SM-2 algorithm with configurable parameters.
#[derive(Debug, Clone)]
pub struct Sm2 {
    pub initial_easiness: f64,
    pub minimum_easiness: f64,
    pub maximum_easiness: f64,
    pub first_interval_days: u32,
    pub second_interval_days: u32,
}

impl Default for Sm2 {
    fn default() -> Self {
        Self {
            initial_easiness: ReviewProgress::INITIAL_EASINESS,
            minimum_easiness: 1.3,
            maximum_easiness: 3.5,
            first_interval_days: 1,
            second_interval_days: 6,
        }
    }
}

/// Derive the 0-5 review quality from a lesson outcome.
pub fn review_quality(outcome: &ReviewOutcome) -> u8 {
    if !outcome.success {
        return match outcome.stage_reached {
            LessonStage::Pinyin => 0,
            LessonStage::Writing => 1,
            _ => 2,
        };
    }

    let pinyin_penalty = match outcome.pinyin_attempts {
        n if n >= 3 => 2,
        2 => 1,
        _ => 0,
    };
    let writing_penalty = match outcome.writing_attempts {
        n if n >= 6 => 2,
        n if n >= 4 => 1,
        _ => 0,
    };

    let mut quality: i32 = 5 - pinyin_penalty - writing_penalty;
    quality = match outcome.stage_reached {
        LessonStage::WritingGuidedHalf => quality.min(4),
        LessonStage::WritingGuidedFull => quality.min(3),
        _ => quality,
    };
    quality.clamp(3, 5) as u8
}

impl SpacedRepetitionAlgorithm for Sm2 {
    fn name(&self) -> &'static str {
        "sm2"
    }

    fn initial_progress(&self, word_id: &str, now: DateTime<Utc>) -> ReviewProgress {
        ReviewProgress {
            easiness: self.initial_easiness,
            interval_days: self.first_interval_days.max(1),
            ..ReviewProgress::new(word_id, now)
        }
    }

    fn schedule(&self, progress: &ReviewProgress, outcome: &ReviewOutcome) -> ReviewProgress {
        let quality = review_quality(outcome);
        let easiness = self.next_easiness(progress.easiness, quality);
        let (repetitions, interval_days) = self.next_interval(progress, quality, easiness);
        let next_due_at = outcome
            .timestamp
            .checked_add_signed(Duration::days(i64::from(interval_days)))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        ReviewProgress {
            word_id: progress.word_id.clone(),
            bucket: Bucket::classify(repetitions, interval_days, quality),
            streak: if quality >= 4 {
                progress.streak.saturating_add(1)
            } else {
                0
            },
            last_reviewed_at: outcome.timestamp,
            next_due_at,
            pinyin_attempts: outcome.pinyin_attempts,
            writing_attempts: outcome.writing_attempts,
            last_result: if quality >= 3 {
                ReviewResult::Success
            } else {
                ReviewResult::Failure
            },
            review_count: progress.review_count.saturating_add(1),
            suspended: false,
            repetitions,
            interval_days,
            easiness,
            last_quality: quality,
        }
    }
}

impl Sm2 {
    fn next_easiness(&self, easiness: f64, quality: u8) -> f64 {
        let previous = if easiness.is_finite() {
            easiness
        } else {
            self.initial_easiness
        };
        let distance = f64::from(5 - quality.min(5));
        let updated = previous + (0.1 - distance * (0.08 + distance * 0.02));
        let easiness = if updated.is_finite() { updated } else { previous };
        easiness.clamp(self.minimum_easiness, self.maximum_easiness)
    }

    fn next_interval(&self, progress: &ReviewProgress, quality: u8, easiness: f64) -> (u32, u32) {
        if quality < 3 {
            return (0, 1);
        }

        let repetitions = progress.repetitions.saturating_add(1);
        let interval = match repetitions {
            1 => self.first_interval_days,
            2 => self.second_interval_days,
            _ => {
                let previous = f64::from(progress.interval_days.max(1));
                (previous * easiness).round() as u32
            }
        };
        (repetitions, interval.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap()
    }

    fn outcome(success: bool, stage: LessonStage, pinyin: u32, writing: u32) -> ReviewOutcome {
        ReviewOutcome {
            word_id: "w-1".to_string(),
            success,
            stage_reached: stage,
            pinyin_attempts: pinyin,
            writing_attempts: writing,
            timestamp: now(),
        }
    }

    fn perfect() -> ReviewOutcome {
        outcome(true, LessonStage::Complete, 0, 0)
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
    }

    #[test]
    fn first_perfect_review() {
        let sm2 = Sm2::default();
        let progress = sm2.initial_progress("w-1", now());
        let next = sm2.schedule(&progress, &perfect());

        assert_eq!(next.last_quality, 5);
        assert_close(next.easiness, 2.6);
        assert_eq!(next.repetitions, 1);
        assert_eq!(next.interval_days, 1);
        assert_eq!(next.bucket, Bucket::Learning);
        assert_eq!(next.next_due_at, now() + Duration::days(1));
        assert_eq!(next.last_result, ReviewResult::Success);
        assert_eq!(next.streak, 1);
        assert_eq!(next.review_count, 1);
    }

    #[test]
    fn interval_progression() {
        let sm2 = Sm2::default();
        let mut progress = sm2.initial_progress("w-1", now());
        let mut intervals = Vec::new();
        for _ in 0..4 {
            progress = sm2.schedule(&progress, &perfect());
            intervals.push(progress.interval_days);
        }
        // 6 * 2.8 = 16.8, then 17 * 2.9 = 49.3
        assert_eq!(intervals, vec![1, 6, 17, 49]);
        assert_eq!(progress.bucket, Bucket::Known);
    }

    #[test]
    fn second_review_reaches_reinforce() {
        let sm2 = Sm2::default();
        let first = sm2.schedule(&sm2.initial_progress("w-1", now()), &perfect());
        let second = sm2.schedule(&first, &perfect());
        assert_eq!(second.interval_days, 6);
        assert_eq!(second.bucket, Bucket::Reinforce);
    }

    #[test]
    fn failure_restarts_curve() {
        let sm2 = Sm2::default();
        let progress = ReviewProgress {
            repetitions: 7,
            interval_days: 120,
            easiness: 2.9,
            bucket: Bucket::Known,
            streak: 6,
            ..ReviewProgress::new("w-1", now())
        };
        for stage in [LessonStage::Pinyin, LessonStage::Writing, LessonStage::Complete] {
            let next = sm2.schedule(&progress, &outcome(false, stage, 3, 2));
            assert_eq!(next.repetitions, 0);
            assert_eq!(next.interval_days, 1);
            assert_eq!(next.bucket, Bucket::Learning);
            assert_eq!(next.streak, 0);
            assert_eq!(next.last_result, ReviewResult::Failure);
        }
    }

    #[test]
    fn failure_quality_by_stage() {
        assert_eq!(review_quality(&outcome(false, LessonStage::Pinyin, 1, 0)), 0);
        assert_eq!(review_quality(&outcome(false, LessonStage::Writing, 1, 2)), 1);
        assert_eq!(review_quality(&outcome(false, LessonStage::WritingGuidedHalf, 1, 2)), 2);
        assert_eq!(review_quality(&outcome(false, LessonStage::Complete, 1, 2)), 2);
    }

    #[test]
    fn success_quality_penalties() {
        assert_eq!(review_quality(&outcome(true, LessonStage::Complete, 1, 1)), 5);
        assert_eq!(review_quality(&outcome(true, LessonStage::Complete, 2, 0)), 4);
        assert_eq!(review_quality(&outcome(true, LessonStage::Complete, 3, 0)), 3);
        assert_eq!(review_quality(&outcome(true, LessonStage::Complete, 0, 4)), 4);
        assert_eq!(review_quality(&outcome(true, LessonStage::Complete, 0, 6)), 3);
        // Penalties never push a success below 3.
        assert_eq!(review_quality(&outcome(true, LessonStage::Complete, 5, 9)), 3);
    }

    #[test]
    fn guided_writing_caps_quality() {
        assert_eq!(review_quality(&outcome(true, LessonStage::WritingGuidedHalf, 0, 0)), 4);
        assert_eq!(review_quality(&outcome(true, LessonStage::WritingGuidedFull, 0, 0)), 3);
    }

    #[test]
    fn easiness_stays_clamped() {
        let sm2 = Sm2::default();
        let mut progress = sm2.initial_progress("w-1", now());
        for _ in 0..20 {
            progress = sm2.schedule(&progress, &outcome(false, LessonStage::Pinyin, 4, 0));
        }
        assert_close(progress.easiness, 1.3);

        for _ in 0..30 {
            progress = sm2.schedule(&progress, &perfect());
        }
        assert_close(progress.easiness, 3.5);
    }

    #[test]
    fn non_finite_easiness_falls_back() {
        let sm2 = Sm2::default();
        let progress = ReviewProgress {
            easiness: f64::NAN,
            ..sm2.initial_progress("w-1", now())
        };
        let next = sm2.schedule(&progress, &outcome(true, LessonStage::Complete, 2, 0));
        // Quality 4 leaves easiness unchanged.
        assert_close(next.easiness, 2.5);
    }

    #[test]
    fn zero_interval_treated_as_one_day() {
        let sm2 = Sm2::default();
        let progress = ReviewProgress {
            repetitions: 4,
            interval_days: 0,
            ..sm2.initial_progress("w-1", now())
        };
        let next = sm2.schedule(&progress, &perfect());
        assert_eq!(next.interval_days, 3);
        assert_eq!(next.repetitions, 5);
    }

    #[test]
    fn review_unsuspends_and_copies_attempts() {
        let sm2 = Sm2::default();
        let progress = ReviewProgress {
            suspended: true,
            ..sm2.initial_progress("w-1", now())
        };
        let next = sm2.schedule(&progress, &outcome(true, LessonStage::Complete, 2, 5));
        assert!(!next.suspended);
        assert_eq!(next.pinyin_attempts, 2);
        assert_eq!(next.writing_attempts, 5);
        assert_eq!(next.last_reviewed_at, now());
    }

    #[test]
    fn quality_three_success_resets_streak() {
        let sm2 = Sm2::default();
        let progress = ReviewProgress {
            streak: 4,
            ..sm2.initial_progress("w-1", now())
        };
        let next = sm2.schedule(&progress, &outcome(true, LessonStage::WritingGuidedFull, 0, 0));
        assert_eq!(next.streak, 0);
        assert_eq!(next.last_result, ReviewResult::Success);
        assert_eq!(next.repetitions, 1);
    }

    #[test]
    fn bucket_always_follows_state() {
        let sm2 = Sm2::default();
        let stages = [
            LessonStage::Pinyin,
            LessonStage::Writing,
            LessonStage::WritingGuidedHalf,
            LessonStage::WritingGuidedFull,
            LessonStage::Complete,
        ];
        let mut progress = sm2.initial_progress("w-1", now());
        for round in 0..60u32 {
            let stage = stages[(round % 5) as usize];
            let success = round % 7 != 3;
            let previous_repetitions = progress.repetitions;
            progress = sm2.schedule(&progress, &outcome(success, stage, round % 4, round % 7));

            assert!(progress.interval_days >= 1);
            assert!((1.3..=3.5).contains(&progress.easiness));
            assert_eq!(
                progress.bucket,
                Bucket::classify(progress.repetitions, progress.interval_days, progress.last_quality)
            );
            if progress.last_quality >= 3 {
                assert_eq!(progress.repetitions, previous_repetitions + 1);
            } else {
                assert_eq!((progress.repetitions, progress.interval_days), (0, 1));
            }
        }
    }
}
