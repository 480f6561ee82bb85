//! Common test utilities for study service integration tests.
//!
//! Provides a fixed clock, a small vocabulary pack and a service backed by
//! the in-memory repository.

pub mod fixtures;

use chrono::{DateTime, TimeZone, Utc};
use vocab_core::StudySettings;
use vocab_study::{MemoryRepository, StudyService};

/// Fixed reference time for deterministic scheduling.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 1, 8, 0, 0).unwrap()
}

/// Service with the fixture pack registered at `now()`.
pub fn seeded_service(settings: StudySettings) -> StudyService<MemoryRepository> {
    let mut service = StudyService::new(MemoryRepository::new(), settings);
    service
        .register_words(&fixtures::word_pack(), now())
        .expect("register fixture words");
    service
}
