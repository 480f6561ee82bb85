//! Romanized pronunciation parsing and rendering.
//!
//! Accepts tone diacritics (`nǐ hǎo`), trailing tone digits (`ni3 hao3`),
//! bare letters, or any mix of them.

mod scanner;

use crate::types::Syllable;
use scanner::{is_vowel, scan, ScannedSyllable, Source, Token, COMBINING_DIAERESIS};
use unicode_normalization::UnicodeNormalization;

/// Parse a pronunciation string into syllables.
///
/// Never fails: empty or punctuation-only input yields an empty vector.
pub fn parse(input: &str) -> Vec<Syllable> {
    scan(&Source::new(input))
        .into_iter()
        .map(|scanned| scanned.syllable)
        .collect()
}

/// Render syllables in numeric notation, e.g. `ni3 hao3` or `ba4 ba`.
pub fn to_numeric(input: &str) -> String {
    parse(input)
        .iter()
        .map(|syllable| {
            if syllable.is_neutral() {
                syllable.letters.clone()
            } else {
                format!("{}{}", syllable.letters, syllable.tone)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Convert digit-toned syllables into their accented form.
///
/// Syllables closed by a tone digit get the matching diacritic; syllables
/// without a digit keep whatever marks they already carry. `v` and `u:` are
/// written as `ü`. Letter case and punctuation are preserved.
pub fn to_diacritic(input: &str) -> String {
    let source = Source::new(input);
    let mut out = String::with_capacity(input.len() + 8);
    let mut cursor = 0;

    for scanned in scan(&source) {
        out.extend(&source.chars[cursor..scanned.start]);
        match scanned.digit {
            Some(tone) => render_toned(&source, &scanned, tone, &mut out),
            None => render_untoned(&source, &scanned, &mut out),
        }
        cursor = scanned.end;
    }
    out.extend(&source.chars[cursor..]);

    out.nfc().collect()
}

fn render_untoned(source: &Source, scanned: &ScannedSyllable, out: &mut String) {
    for index in scanned.start..scanned.end {
        let ch = source.chars[index];
        match (source.tokens[index], ch) {
            (Token::Letter('v'), _) => push_umlaut_u(ch, out),
            (Token::Umlaut, ':') => out.push(COMBINING_DIAERESIS),
            _ => out.push(ch),
        }
    }
}

/// A letter of a syllable being re-rendered.
struct Glyph {
    ch: char,
    umlaut: bool,
}

impl Glyph {
    fn base(&self) -> char {
        if self.umlaut {
            'v'
        } else {
            self.ch.to_ascii_lowercase()
        }
    }
}

enum Piece {
    Letter(Glyph),
    Verbatim(char),
}

fn render_toned(source: &Source, scanned: &ScannedSyllable, tone: u8, out: &mut String) {
    let mut pieces: Vec<Piece> = Vec::new();
    for index in scanned.start..scanned.end {
        let ch = source.chars[index];
        match source.tokens[index] {
            Token::Letter('v') => pieces.push(Piece::Letter(Glyph {
                ch: if ch.is_ascii_uppercase() { 'U' } else { 'u' },
                umlaut: true,
            })),
            Token::Letter(_) => pieces.push(Piece::Letter(Glyph { ch, umlaut: false })),
            Token::Umlaut => {
                if let Some(Piece::Letter(glyph)) = pieces.last_mut() {
                    glyph.umlaut = true;
                }
            }
            Token::ToneMark(_) | Token::Digit(_) => {}
            Token::Separator | Token::Other => pieces.push(Piece::Verbatim(ch)),
        }
    }

    let bases: Vec<char> = pieces
        .iter()
        .filter_map(|piece| match piece {
            Piece::Letter(glyph) => Some(glyph.base()),
            Piece::Verbatim(_) => None,
        })
        .collect();
    let marked = tone_mark(tone).and_then(|_| mark_position(&bases));

    let mut letter_index = 0;
    for piece in &pieces {
        match piece {
            Piece::Letter(glyph) => {
                out.push(glyph.ch);
                if glyph.umlaut {
                    out.push(COMBINING_DIAERESIS);
                }
                if marked == Some(letter_index) {
                    if let Some(mark) = tone_mark(tone) {
                        out.push(mark);
                    }
                }
                letter_index += 1;
            }
            Piece::Verbatim(ch) => out.push(*ch),
        }
    }
}

fn push_umlaut_u(ch: char, out: &mut String) {
    out.push(if ch.is_ascii_uppercase() { 'U' } else { 'u' });
    out.push(COMBINING_DIAERESIS);
}

fn tone_mark(tone: u8) -> Option<char> {
    match tone {
        1 => Some('\u{0304}'),
        2 => Some('\u{0301}'),
        3 => Some('\u{030C}'),
        4 => Some('\u{0300}'),
        _ => None,
    }
}

/// Index of the letter carrying the tone mark.
///
/// `a`, then `e`, then the `o` of `ou`, then the last vowel, then the final
/// letter.
fn mark_position(letters: &[char]) -> Option<usize> {
    letters
        .iter()
        .position(|&c| c == 'a')
        .or_else(|| letters.iter().position(|&c| c == 'e'))
        .or_else(|| letters.windows(2).position(|pair| pair == ['o', 'u']))
        .or_else(|| letters.iter().rposition(|&c| is_vowel(c)))
        .or_else(|| letters.len().checked_sub(1))
}
