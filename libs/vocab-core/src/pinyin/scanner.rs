//! Finite-state syllable scanner.
//!
//! Input is decomposed (NFD) so tone diacritics arrive as combining marks
//! after their base letter. Each character is classified once into a
//! [`Token`]; the scanner then walks the token list with an explicit buffer,
//! pending tone and last letter, recording the source span of every syllable
//! so the renderer can rewrite it in place.

use crate::types::{Syllable, NEUTRAL_TONE};
use unicode_normalization::UnicodeNormalization;

const COMBINING_MACRON: char = '\u{0304}';
const COMBINING_ACUTE: char = '\u{0301}';
const COMBINING_BREVE: char = '\u{0306}';
const COMBINING_CARON: char = '\u{030C}';
const COMBINING_GRAVE: char = '\u{0300}';
pub(crate) const COMBINING_DIAERESIS: char = '\u{0308}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token {
    /// Lowercased ASCII letter.
    Letter(char),
    /// Combining tone diacritic, tone 1-4.
    ToneMark(u8),
    /// Diaeresis or `:` turning the preceding `u` into `ü`.
    Umlaut,
    /// Tone digit, with 0 already mapped to neutral.
    Digit(u8),
    Separator,
    /// Anything else; skipped without ending the syllable.
    Other,
}

/// Decomposed input with one token per character.
#[derive(Debug)]
pub(crate) struct Source {
    pub chars: Vec<char>,
    pub tokens: Vec<Token>,
}

impl Source {
    pub fn new(input: &str) -> Self {
        let chars: Vec<char> = input.nfd().collect();
        let mut tokens = Vec::with_capacity(chars.len());
        for &ch in &chars {
            let previous = tokens.last().copied();
            tokens.push(classify(ch, previous));
        }
        Self { chars, tokens }
    }
}

fn classify(ch: char, previous: Option<Token>) -> Token {
    match ch {
        'a'..='z' | 'A'..='Z' => Token::Letter(ch.to_ascii_lowercase()),
        COMBINING_MACRON => Token::ToneMark(1),
        COMBINING_ACUTE => Token::ToneMark(2),
        COMBINING_CARON | COMBINING_BREVE => Token::ToneMark(3),
        COMBINING_GRAVE => Token::ToneMark(4),
        COMBINING_DIAERESIS | ':' if previous == Some(Token::Letter('u')) => Token::Umlaut,
        '0' => Token::Digit(NEUTRAL_TONE),
        '1'..='5' => Token::Digit(ch as u8 - b'0'),
        '6'..='9' => Token::Separator,
        c if is_separator(c) => Token::Separator,
        _ => Token::Other,
    }
}

fn is_separator(ch: char) -> bool {
    ch.is_whitespace()
        || matches!(
            ch,
            '-' | '\u{2010}'
                | '\u{2013}'
                | '\u{00B7}'
                | '\u{2022}'
                | '\u{30FB}'
                | '.'
                | ','
                | ';'
                | ':'
                | '\''
                | '\u{2018}'
                | '\u{2019}'
                | '\u{02BC}'
                | '`'
        )
}

/// Letters that may begin a syllable.
pub(crate) fn is_initial(letter: char) -> bool {
    matches!(
        letter,
        'b' | 'c'
            | 'd'
            | 'f'
            | 'g'
            | 'h'
            | 'j'
            | 'k'
            | 'l'
            | 'm'
            | 'n'
            | 'p'
            | 'q'
            | 'r'
            | 's'
            | 't'
            | 'w'
            | 'x'
            | 'y'
            | 'z'
    )
}

/// Vowel letters, `v` standing for `ü`.
pub(crate) fn is_vowel(letter: char) -> bool {
    matches!(letter, 'a' | 'e' | 'i' | 'o' | 'u' | 'v')
}

/// One syllable together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScannedSyllable {
    pub syllable: Syllable,
    /// First source index of the syllable.
    pub start: usize,
    /// One past the last source index, including a consumed digit.
    pub end: usize,
    /// Explicit tone digit that closed the syllable.
    pub digit: Option<u8>,
}

struct Scanner<'a> {
    tokens: &'a [Token],
    letters: String,
    pending_tone: Option<u8>,
    last_letter: Option<char>,
    start: usize,
    out: Vec<ScannedSyllable>,
}

impl<'a> Scanner<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            letters: String::new(),
            pending_tone: None,
            last_letter: None,
            start: 0,
            out: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<ScannedSyllable> {
        for (index, token) in self.tokens.iter().copied().enumerate() {
            match token {
                Token::Letter(letter) => self.handle_letter(index, letter),
                Token::ToneMark(tone) => {
                    if !self.letters.is_empty() {
                        self.pending_tone = Some(tone);
                    }
                }
                Token::Umlaut => self.handle_umlaut(),
                Token::Digit(tone) => {
                    if !self.letters.is_empty() {
                        self.pending_tone = Some(tone);
                        self.flush(index + 1, Some(tone));
                    }
                }
                Token::Separator => self.flush(index, None),
                Token::Other => {}
            }
        }
        self.flush(self.tokens.len(), None);
        self.out
    }

    fn handle_letter(&mut self, index: usize, letter: char) {
        let next = self.next_letter(index);
        if self.starts_new_syllable(letter, next) {
            self.flush(index, None);
        }
        if self.letters.is_empty() {
            self.start = index;
        }
        self.letters.push(letter);
        self.last_letter = Some(letter);
    }

    fn handle_umlaut(&mut self) {
        if self.last_letter == Some('u') {
            self.letters.pop();
            self.letters.push('v');
            self.last_letter = Some('v');
        }
    }

    /// Next letter after `index`, looking past combining marks.
    fn next_letter(&self, index: usize) -> Option<char> {
        self.tokens[index + 1..]
            .iter()
            .find(|token| !matches!(token, Token::ToneMark(_) | Token::Umlaut))
            .and_then(|token| match token {
                Token::Letter(letter) => Some(*letter),
                _ => None,
            })
    }

    fn starts_new_syllable(&self, letter: char, next: Option<char>) -> bool {
        if self.letters.is_empty() || self.pending_tone.is_none() || !is_initial(letter) {
            return false;
        }
        match letter {
            'h' => !continues_digraph(self.last_letter),
            'n' | 'm' | 'r' | 'g' => next.is_some_and(is_vowel),
            _ => true,
        }
    }

    fn flush(&mut self, end: usize, digit: Option<u8>) {
        if !self.letters.is_empty() {
            let tone = self.pending_tone.unwrap_or(NEUTRAL_TONE);
            self.out.push(ScannedSyllable {
                syllable: Syllable::new(std::mem::take(&mut self.letters), tone),
                start: self.start,
                end,
                digit,
            });
        }
        self.pending_tone = None;
        self.last_letter = None;
    }
}

/// `h` after `c`, `s` or `z` forms ch/sh/zh.
fn continues_digraph(last_letter: Option<char>) -> bool {
    matches!(last_letter, Some('c' | 's' | 'z'))
}

/// Scan a decomposed source into syllables.
pub(crate) fn scan(source: &Source) -> Vec<ScannedSyllable> {
    Scanner::new(&source.tokens).run()
}
