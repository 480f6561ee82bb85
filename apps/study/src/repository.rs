//! Repository traits for learner state.
//!
//! The study service only ever reads whole records and writes whole
//! replacements; storage backends implement these traits.

use crate::error::Result;
use std::collections::BTreeMap;
use vocab_core::{ReviewOutcome, ReviewProgress, VocabularyItem};

/// Repository for vocabulary items.
pub trait WordRepository {
    fn get_word(&self, id: &str) -> Result<Option<VocabularyItem>>;
    fn put_word(&mut self, word: VocabularyItem) -> Result<()>;
    fn list_words(&self) -> Result<Vec<VocabularyItem>>;
}

/// Repository for review progress, keyed by word ID.
pub trait ProgressRepository {
    fn get_progress(&self, word_id: &str) -> Result<Option<ReviewProgress>>;
    fn put_progress(&mut self, progress: ReviewProgress) -> Result<()>;
    fn list_progress(&self) -> Result<Vec<ReviewProgress>>;
}

/// Repository for the lesson history.
pub trait OutcomeRepository {
    fn append_outcome(&mut self, outcome: ReviewOutcome) -> Result<()>;
    /// Most recent outcomes first.
    fn recent_outcomes(&self, limit: usize) -> Result<Vec<ReviewOutcome>>;
}

/// In-memory implementation of all repositories.
#[derive(Debug, Default, Clone)]
pub struct MemoryRepository {
    words: BTreeMap<String, VocabularyItem>,
    progress: BTreeMap<String, ReviewProgress>,
    outcomes: Vec<ReviewOutcome>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WordRepository for MemoryRepository {
    fn get_word(&self, id: &str) -> Result<Option<VocabularyItem>> {
        Ok(self.words.get(id).cloned())
    }

    fn put_word(&mut self, word: VocabularyItem) -> Result<()> {
        self.words.insert(word.id.clone(), word);
        Ok(())
    }

    fn list_words(&self) -> Result<Vec<VocabularyItem>> {
        Ok(self.words.values().cloned().collect())
    }
}

impl ProgressRepository for MemoryRepository {
    fn get_progress(&self, word_id: &str) -> Result<Option<ReviewProgress>> {
        Ok(self.progress.get(word_id).cloned())
    }

    fn put_progress(&mut self, progress: ReviewProgress) -> Result<()> {
        self.progress.insert(progress.word_id.clone(), progress);
        Ok(())
    }

    fn list_progress(&self) -> Result<Vec<ReviewProgress>> {
        Ok(self.progress.values().cloned().collect())
    }
}

impl OutcomeRepository for MemoryRepository {
    fn append_outcome(&mut self, outcome: ReviewOutcome) -> Result<()> {
        // Kept sorted by timestamp; in-order appends land at the end.
        let index = self
            .outcomes
            .partition_point(|existing| existing.timestamp <= outcome.timestamp);
        self.outcomes.insert(index, outcome);
        Ok(())
    }

    fn recent_outcomes(&self, limit: usize) -> Result<Vec<ReviewOutcome>> {
        Ok(self.outcomes.iter().rev().take(limit).cloned().collect())
    }
}
