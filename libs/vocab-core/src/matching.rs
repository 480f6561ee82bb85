//! Pronunciation answer matching.

use crate::pinyin::{parse, to_numeric};
use crate::types::{CompareOptions, Syllable, VocabularyItem};
use serde::{Deserialize, Serialize};

/// Result of comparing a typed pronunciation to a vocabulary item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PronunciationMatch {
    /// Whether the answer is accepted under the given options.
    pub is_match: bool,
    /// Whether some candidate has the same letters syllable by syllable.
    pub letters_match: bool,
    /// Whether the letter-matching candidate disagrees on a tone.
    pub tone_mismatch: bool,
    pub parsed_input: Vec<Syllable>,
    /// Syllables of the matched candidate, empty when nothing matched.
    pub parsed_target: Vec<Syllable>,
    /// The candidate string whose letters matched.
    pub matched_candidate: Option<String>,
    /// Matched candidate in numeric notation (for display).
    pub normalized_target: String,
}

impl PronunciationMatch {
    fn no_match(parsed_input: Vec<Syllable>) -> Self {
        Self {
            is_match: false,
            letters_match: false,
            tone_mismatch: false,
            parsed_input,
            parsed_target: Vec::new(),
            matched_candidate: None,
            normalized_target: String::new(),
        }
    }
}

/// Compare a typed pronunciation against the item's candidates.
///
/// Candidates are tried in order (primary first) and the first one whose
/// letters match decides the result, even when its tones do not.
pub fn compare_pronunciation(
    input: &str,
    target: &VocabularyItem,
    options: CompareOptions,
) -> PronunciationMatch {
    let parsed_input = parse(input);
    if parsed_input.is_empty() {
        return PronunciationMatch::no_match(parsed_input);
    }

    for candidate in target.candidates() {
        let parsed_target = parse(candidate);
        if !letters_match(&parsed_input, &parsed_target) {
            continue;
        }

        let tone_mismatch = tone_mismatch(&parsed_input, &parsed_target, options);
        return PronunciationMatch {
            is_match: !options.enforce_tone || !tone_mismatch,
            letters_match: true,
            tone_mismatch,
            normalized_target: to_numeric(candidate),
            matched_candidate: Some(candidate.to_string()),
            parsed_input,
            parsed_target,
        };
    }

    PronunciationMatch::no_match(parsed_input)
}

/// Same syllable count and the same letters at every position.
pub fn letters_match(input: &[Syllable], target: &[Syllable]) -> bool {
    input.len() == target.len()
        && input
            .iter()
            .zip(target)
            .all(|(a, b)| a.letters == b.letters)
}

/// Whether any aligned syllable pair disagrees on tone.
pub fn tone_mismatch(input: &[Syllable], target: &[Syllable], options: CompareOptions) -> bool {
    input.iter().zip(target).any(|(a, b)| {
        if options.allow_neutral_mismatch && (a.is_neutral() || b.is_neutral()) {
            return false;
        }
        a.tone != b.tone
    })
}
