//! Study service for the vocabulary engine.
//!
//! Wires the pure engine in `vocab-core` to repositories, settings and
//! logging. This is the orchestration layer a quiz UI talks to.

pub mod error;
pub mod repository;
pub mod service;
pub mod settings;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{Result, StudyError};
pub use repository::{MemoryRepository, OutcomeRepository, ProgressRepository, WordRepository};
pub use service::{ImportSummary, LessonCandidate, StudyService};
pub use settings::{settings_from_env, settings_from_lookup};

/// Install the global tracing subscriber.
///
/// Filter comes from `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;
    Ok(())
}
