use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LetterError {
    #[error("'{0}' is not an option letter (expected A-Z)")]
    NotALetter(char),

    #[error("option index {0} has no letter")]
    IndexOutOfRange(usize),
}

//
// ─── LETTER ────────────────────────────────────────────────────────────────────
//

/// Option label. Letters map to option positions: `A` is index 0, `B` index 1, …
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Letter(u8);

impl Letter {
    pub const MAX_OPTIONS: usize = 26;

    /// # Errors
    ///
    /// Returns `LetterError::IndexOutOfRange` past `Z`.
    pub fn from_index(index: usize) -> Result<Self, LetterError> {
        u8::try_from(index)
            .ok()
            .filter(|idx| usize::from(*idx) < Self::MAX_OPTIONS)
            .map(Self)
            .ok_or(LetterError::IndexOutOfRange(index))
    }

    /// Accepts upper- or lowercase ASCII letters.
    ///
    /// # Errors
    ///
    /// Returns `LetterError::NotALetter` for anything outside `A-Z`.
    pub fn from_char(ch: char) -> Result<Self, LetterError> {
        let upper = ch.to_ascii_uppercase();
        if upper.is_ascii_uppercase() {
            Ok(Self(upper as u8 - b'A'))
        } else {
            Err(LetterError::NotALetter(ch))
        }
    }

    #[must_use]
    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    #[must_use]
    pub fn as_char(self) -> char {
        char::from(b'A' + self.0)
    }
}

impl fmt::Debug for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Letter({})", self.as_char())
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl TryFrom<char> for Letter {
    type Error = LetterError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        Self::from_char(value)
    }
}

//
// ─── ANSWER SET ────────────────────────────────────────────────────────────────
//

/// A set of option letters, used both for a question's correct answer and for
/// a learner's selection.
///
/// Encodes to and from the compact string form (`"AC"`) only at the
/// serialization boundary; the encoded form is always sorted.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AnswerSet(BTreeSet<Letter>);

impl AnswerSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn single(letter: Letter) -> Self {
        Self(BTreeSet::from([letter]))
    }

    /// Parses the compact string form. Duplicate letters collapse.
    ///
    /// # Errors
    ///
    /// Returns `LetterError::NotALetter` for any character outside `A-Z`.
    pub fn parse(encoded: &str) -> Result<Self, LetterError> {
        encoded
            .chars()
            .filter(|ch| !ch.is_whitespace())
            .map(Letter::from_char)
            .collect::<Result<BTreeSet<_>, _>>()
            .map(Self)
    }

    /// Sorted, joined string form (`{C, A}` encodes as `"AC"`).
    #[must_use]
    pub fn encode(&self) -> String {
        self.0.iter().map(|letter| letter.as_char()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn contains(&self, letter: Letter) -> bool {
        self.0.contains(&letter)
    }

    pub fn insert(&mut self, letter: Letter) -> bool {
        self.0.insert(letter)
    }

    /// Adds the letter if absent, removes it if present.
    pub fn toggle(&mut self, letter: Letter) {
        if !self.0.remove(&letter) {
            self.0.insert(letter);
        }
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = Letter> + '_ {
        self.0.iter().copied()
    }

    /// Highest option index referenced by this set, if any.
    #[must_use]
    pub fn max_index(&self) -> Option<usize> {
        self.0.last().map(|letter| letter.index())
    }
}

impl fmt::Debug for AnswerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AnswerSet({:?})", self.encode())
    }
}

impl fmt::Display for AnswerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromIterator<Letter> for AnswerSet {
    fn from_iter<I: IntoIterator<Item = Letter>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl TryFrom<String> for AnswerSet {
    type Error = LetterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<AnswerSet> for String {
    fn from(value: AnswerSet) -> Self {
        value.encode()
    }
}
