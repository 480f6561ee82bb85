//! Study service: drives the engine against injected repositories.

use crate::error::{Result, StudyError};
use crate::repository::{OutcomeRepository, ProgressRepository, WordRepository};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use vocab_core::algorithm::{review_queue, select_next_candidate, SpacedRepetitionAlgorithm};
use vocab_core::{
    compare_pronunciation, CompareOptions, PronunciationMatch, ReviewOutcome, ReviewProgress,
    Sm2, Snapshot, StoredSettings, StudySettings, VocabularyItem,
};

/// The item to present next, with its progress.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LessonCandidate {
    pub word: VocabularyItem,
    pub progress: ReviewProgress,
}

/// Counts from a snapshot import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub progress_records: usize,
    pub upgraded_records: usize,
    pub words: usize,
}

/// Study service over a repository.
pub struct StudyService<R> {
    repository: R,
    settings: StudySettings,
    /// Imported settings the service does not interpret, written back on export.
    app_settings: Map<String, Value>,
    algorithm: Box<dyn SpacedRepetitionAlgorithm>,
}

impl<R> StudyService<R>
where
    R: WordRepository + ProgressRepository + OutcomeRepository,
{
    pub fn new(repository: R, settings: StudySettings) -> Self {
        Self::with_algorithm(repository, settings, Box::new(Sm2::default()))
    }

    pub fn with_algorithm(
        repository: R,
        settings: StudySettings,
        algorithm: Box<dyn SpacedRepetitionAlgorithm>,
    ) -> Self {
        Self {
            repository,
            settings,
            app_settings: Map::new(),
            algorithm,
        }
    }

    pub fn settings(&self) -> &StudySettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: StudySettings) {
        self.settings = settings;
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn into_repository(self) -> R {
        self.repository
    }

    /// Add or update vocabulary items.
    ///
    /// New items get fresh progress due at `now`; items already known keep
    /// their progress but are un-suspended. Returns the number of new items.
    pub fn register_words(&mut self, items: &[VocabularyItem], now: DateTime<Utc>) -> Result<usize> {
        let mut inserted = 0;
        for item in items {
            let existing_word = self.repository.get_word(&item.id)?;
            self.repository.put_word(item.clone())?;

            match self.repository.get_progress(&item.id)? {
                Some(progress) if progress.suspended => {
                    self.repository.put_progress(ReviewProgress {
                        suspended: false,
                        ..progress
                    })?;
                }
                Some(_) => {}
                None => {
                    let progress = self.algorithm.initial_progress(&item.id, now);
                    self.repository.put_progress(progress)?;
                }
            }

            if existing_word.is_none() {
                inserted += 1;
            }
        }

        tracing::info!(
            "Registered {} words ({} new) using {}",
            items.len(),
            inserted,
            self.algorithm.name()
        );
        Ok(inserted)
    }

    /// Compare a typed pronunciation with the stored item.
    pub fn check_pronunciation(&self, word_id: &str, input: &str) -> Result<PronunciationMatch> {
        let word = self
            .repository
            .get_word(word_id)?
            .ok_or_else(|| StudyError::WordNotFound(word_id.to_string()))?;
        let result = compare_pronunciation(input, &word, CompareOptions::from(&self.settings));
        tracing::debug!(
            word_id,
            is_match = result.is_match,
            tone_mismatch = result.tone_mismatch,
            "pronunciation checked"
        );
        Ok(result)
    }

    /// Reschedule an item after a completed lesson.
    pub fn record_lesson(&mut self, outcome: ReviewOutcome) -> Result<ReviewProgress> {
        let Some(current) = self.repository.get_progress(&outcome.word_id)? else {
            tracing::warn!("No progress for {}, lesson dropped", outcome.word_id);
            return Err(StudyError::ProgressNotFound(outcome.word_id));
        };

        let updated = self.algorithm.schedule(&current, &outcome);
        self.repository.put_progress(updated.clone())?;
        self.repository.append_outcome(outcome)?;

        tracing::info!(
            word_id = %updated.word_id,
            quality = updated.last_quality,
            interval_days = updated.interval_days,
            bucket = updated.bucket.as_str(),
            "lesson recorded"
        );
        Ok(updated)
    }

    /// Items eligible for review: unsuspended, or all when every item is
    /// suspended. Progress without a word record is never eligible.
    fn eligible_progress(&self) -> Result<Vec<ReviewProgress>> {
        let words: HashSet<String> = self
            .repository
            .list_words()?
            .into_iter()
            .map(|word| word.id)
            .collect();
        let (all, orphaned): (Vec<ReviewProgress>, Vec<ReviewProgress>) = self
            .repository
            .list_progress()?
            .into_iter()
            .partition(|p| words.contains(&p.word_id));
        if !orphaned.is_empty() {
            tracing::warn!(
                count = orphaned.len(),
                "Skipping progress records without a word"
            );
        }

        let active: Vec<ReviewProgress> = all.iter().filter(|p| !p.suspended).cloned().collect();
        Ok(if active.is_empty() { all } else { active })
    }

    /// The next item to study at `now`.
    pub fn next_candidate(&self, now: DateTime<Utc>) -> Result<Option<LessonCandidate>> {
        let pool = self.eligible_progress()?;
        let Some(progress) = select_next_candidate(&pool, now) else {
            tracing::debug!("No progress records to review");
            return Ok(None);
        };

        match self.repository.get_word(&progress.word_id)? {
            Some(word) => {
                tracing::debug!(
                    word_id = %progress.word_id,
                    due = progress.is_due(now),
                    due_in_secs = progress.time_until_due(now).num_seconds(),
                    "candidate selected"
                );
                Ok(Some(LessonCandidate {
                    word,
                    progress: progress.clone(),
                }))
            }
            None => {
                tracing::warn!("Progress {} has no word record", progress.word_id);
                Ok(None)
            }
        }
    }

    /// Up to `limit` eligible items in review order.
    pub fn review_queue(&self, now: DateTime<Utc>, limit: usize) -> Result<Vec<ReviewProgress>> {
        let pool = self.eligible_progress()?;
        Ok(review_queue(&pool, now)
            .into_iter()
            .take(limit)
            .cloned()
            .collect())
    }

    pub fn suspend(&mut self, word_id: &str) -> Result<()> {
        self.set_suspended(word_id, true)
    }

    pub fn resume(&mut self, word_id: &str) -> Result<()> {
        self.set_suspended(word_id, false)
    }

    fn set_suspended(&mut self, word_id: &str, suspended: bool) -> Result<()> {
        let progress = self
            .repository
            .get_progress(word_id)?
            .ok_or_else(|| StudyError::ProgressNotFound(word_id.to_string()))?;
        if progress.suspended != suspended {
            self.repository.put_progress(ReviewProgress {
                suspended,
                ..progress
            })?;
            tracing::info!("Set suspended={} for {}", suspended, word_id);
        }
        Ok(())
    }

    pub fn recent_outcomes(&self, limit: usize) -> Result<Vec<ReviewOutcome>> {
        self.repository.recent_outcomes(limit)
    }

    /// Snapshot of settings, progress and words.
    pub fn export_snapshot(&self, now: DateTime<Utc>) -> Result<Snapshot> {
        let progress = self.repository.list_progress()?;
        let words = self.repository.list_words()?;
        let settings = StoredSettings {
            study: self.settings,
            other: self.app_settings.clone(),
        };
        Ok(Snapshot::new(settings, &progress, words, now))
    }

    /// Restore from an exported snapshot, upgrading legacy records.
    pub fn import_snapshot(&mut self, json: &str) -> Result<ImportSummary> {
        let snapshot = Snapshot::from_json(json)?;
        let upgraded_records = snapshot.progress.iter().filter(|p| p.is_legacy()).count();

        self.settings = snapshot.settings.study;
        self.app_settings = snapshot.settings.other.clone();
        for progress in snapshot.upgraded_progress() {
            self.repository.put_progress(progress)?;
        }
        for word in &snapshot.custom_words {
            self.repository.put_word(word.clone())?;
        }

        let summary = ImportSummary {
            progress_records: snapshot.progress.len(),
            upgraded_records,
            words: snapshot.custom_words.len(),
        };
        tracing::info!(
            "Imported snapshot: {} progress records ({} upgraded), {} words",
            summary.progress_records,
            summary.upgraded_records,
            summary.words
        );
        Ok(summary)
    }
}
