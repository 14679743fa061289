use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::letter::{AnswerSet, Letter, LetterError};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question {id} has no options")]
    NoOptions { id: QuestionId },

    #[error("question {id} has {count} options (at most 26 are supported)")]
    TooManyOptions { id: QuestionId, count: usize },

    #[error("question {id} has an empty correct answer")]
    EmptyCorrectAnswer { id: QuestionId },

    #[error("question {id} marks {letter} correct but only has {options} options")]
    CorrectAnswerOutOfRange {
        id: QuestionId,
        letter: Letter,
        options: usize,
    },

    #[error("question {id} has a malformed correct answer: {source}")]
    MalformedCorrectAnswer {
        id: QuestionId,
        #[source]
        source: LetterError,
    },
}

//
// ─── RECORD ────────────────────────────────────────────────────────────────────
//

/// Wire shape of a question as shipped in a question bank file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub question_number: u64,
    pub question: String,
    pub answers: Vec<String>,
    pub correct_answer: String,
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A validated multiple-choice question.
///
/// Invariant: `correct` is non-empty and every letter in it names an option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuestionRecord", into = "QuestionRecord")]
pub struct Question {
    id: QuestionId,
    prompt: String,
    options: Vec<String>,
    correct: AnswerSet,
}

impl Question {
    /// # Errors
    ///
    /// Returns `QuestionError` when the options or correct answer break the
    /// question invariant.
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        options: Vec<String>,
        correct: AnswerSet,
    ) -> Result<Self, QuestionError> {
        if options.is_empty() {
            return Err(QuestionError::NoOptions { id });
        }
        if options.len() > Letter::MAX_OPTIONS {
            return Err(QuestionError::TooManyOptions {
                id,
                count: options.len(),
            });
        }
        if correct.is_empty() {
            return Err(QuestionError::EmptyCorrectAnswer { id });
        }
        if let Some(letter) = correct.iter().find(|l| l.index() >= options.len()) {
            return Err(QuestionError::CorrectAnswerOutOfRange {
                id,
                letter,
                options: options.len(),
            });
        }

        Ok(Self {
            id,
            prompt: prompt.into(),
            options,
            correct,
        })
    }

    /// Convenience constructor taking the compact correct-answer form (`"AC"`).
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::MalformedCorrectAnswer` if `correct` contains
    /// non-letters, or any invariant error from [`Question::new`].
    pub fn parse(
        id: QuestionId,
        prompt: impl Into<String>,
        options: Vec<String>,
        correct: &str,
    ) -> Result<Self, QuestionError> {
        let correct = AnswerSet::parse(correct)
            .map_err(|source| QuestionError::MalformedCorrectAnswer { id, source })?;
        Self::new(id, prompt, options, correct)
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct(&self) -> &AnswerSet {
        &self.correct
    }

    /// True when `letter` names one of this question's options.
    #[must_use]
    pub fn has_option(&self, letter: Letter) -> bool {
        letter.index() < self.options.len()
    }

    /// Options paired with their letters, in display order.
    pub fn lettered_options(&self) -> impl Iterator<Item = (Letter, &str)> + '_ {
        self.options
            .iter()
            .enumerate()
            .filter_map(|(idx, text)| Letter::from_index(idx).ok().map(|l| (l, text.as_str())))
    }
}

impl TryFrom<QuestionRecord> for Question {
    type Error = QuestionError;

    fn try_from(record: QuestionRecord) -> Result<Self, Self::Error> {
        Self::parse(
            QuestionId::new(record.question_number),
            record.question,
            record.answers,
            &record.correct_answer,
        )
    }
}

impl From<Question> for QuestionRecord {
    fn from(question: Question) -> Self {
        Self {
            question_number: question.id.value(),
            question: question.prompt,
            answers: question.options,
            correct_answer: question.correct.encode(),
        }
    }
}
