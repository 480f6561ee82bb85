//! Test fixtures for vocabulary and lesson outcomes.

use chrono::{DateTime, Utc};
use vocab_core::{LessonStage, ReviewOutcome, VocabularyItem};

pub fn word_pack() -> Vec<VocabularyItem> {
    vec![
        VocabularyItem::new("w-baba", "bàba").with_alternates(["ba4 ba0"]),
        VocabularyItem::new("w-nihao", "nǐ hǎo"),
        VocabularyItem::new("w-pengyou", "péngyou").with_alternates(["peng2 you5"]),
        VocabularyItem::new("w-lvse", "lǜsè"),
    ]
}

pub fn outcome(word_id: &str, success: bool, stage: LessonStage, at: DateTime<Utc>) -> ReviewOutcome {
    ReviewOutcome {
        word_id: word_id.to_string(),
        success,
        stage_reached: stage,
        pinyin_attempts: 1,
        writing_attempts: 1,
        timestamp: at,
    }
}

/// Export file written before SM-2 fields existed.
pub const LEGACY_SNAPSHOT: &str = r#"{
    "settings": {"interfaceLanguage": "de", "learningMode": "prompt-to-pinyin", "enforceTones": false, "showStrokeOrderHints": true, "leniency": 1},
    "progress": [
        {"wordId": "w-xiexie", "bucket": "known", "streak": 4, "lastReviewedAt": 1725000000000, "nextDueAt": 1725400000000, "pinyinAttempts": 1, "writingAttempts": 1, "lastResult": "success", "reviewCount": 6},
        {"wordId": "w-baba", "bucket": "learning", "streak": 0, "lastReviewedAt": 0, "nextDueAt": 1725000000000, "pinyinAttempts": 0, "writingAttempts": 0, "lastResult": "failure"}
    ],
    "customWords": [
        {"id": "w-xiexie", "prompt": "danke", "promptLanguage": "de", "pinyin": "xièxie", "characters": ["谢", "谢"]}
    ],
    "lastUpdated": 1725000000000
}"#;
