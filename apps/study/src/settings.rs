//! Settings loaded from the environment.

use crate::error::{Result, StudyError};
use vocab_core::StudySettings;

pub const ENFORCE_TONES_VAR: &str = "VOCAB_ENFORCE_TONES";
pub const ALLOW_NEUTRAL_MISMATCH_VAR: &str = "VOCAB_ALLOW_NEUTRAL_MISMATCH";

/// Load study settings from the process environment.
///
/// A `.env` file is read first when present. Unset variables keep their
/// defaults.
pub fn settings_from_env() -> Result<StudySettings> {
    dotenvy::dotenv().ok();
    settings_from_lookup(|key| std::env::var(key).ok())
}

/// Build settings from an arbitrary variable lookup.
pub fn settings_from_lookup<F>(lookup: F) -> Result<StudySettings>
where
    F: Fn(&str) -> Option<String>,
{
    let mut settings = StudySettings::default();
    if let Some(value) = lookup(ENFORCE_TONES_VAR) {
        settings.enforce_tones = parse_flag(ENFORCE_TONES_VAR, &value)?;
    }
    if let Some(value) = lookup(ALLOW_NEUTRAL_MISMATCH_VAR) {
        settings.allow_neutral_mismatch = parse_flag(ALLOW_NEUTRAL_MISMATCH_VAR, &value)?;
    }
    Ok(settings)
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(StudyError::InvalidSetting {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}
