//! Answer history entries and the missed-question review derived from them.

use crate::evaluator::is_correct;
use crate::model::{AnswerSet, Letter, Question};

/// One answered question in an exam's history.
///
/// `chosen` is `None` only for entries created outside the engine (the engine
/// never records an empty selection).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRecord {
    pub question: Question,
    pub chosen: Option<AnswerSet>,
}

impl AnswerRecord {
    #[must_use]
    pub fn new(question: Question, chosen: AnswerSet) -> Self {
        Self {
            question,
            chosen: Some(chosen),
        }
    }

    /// Sorted, joined encoding of the chosen letters (`"AB"`), if any.
    #[must_use]
    pub fn chosen_encoded(&self) -> Option<String> {
        self.chosen.as_ref().map(AnswerSet::encode)
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.chosen
            .as_ref()
            .is_some_and(|chosen| is_correct(&self.question, chosen))
    }
}

/// How an option is marked when reviewing a missed question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewMark {
    CorrectAnswer,
    YourAnswer,
    Unmarked,
}

/// A history entry whose chosen set differs from the correct set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissedEntry {
    pub question: Question,
    pub chosen: Option<AnswerSet>,
}

impl MissedEntry {
    /// Options with their review mark, in display order.
    #[must_use]
    pub fn marked_options(&self) -> Vec<(Letter, &str, ReviewMark)> {
        self.question
            .lettered_options()
            .map(|(letter, text)| {
                let mark = if self.question.correct().contains(letter) {
                    ReviewMark::CorrectAnswer
                } else if self.chosen.as_ref().is_some_and(|c| c.contains(letter)) {
                    ReviewMark::YourAnswer
                } else {
                    ReviewMark::Unmarked
                };
                (letter, text, mark)
            })
            .collect()
    }
}

/// Missed entries in original history order. Pure; never fails.
#[must_use]
pub fn build_missed(history: &[AnswerRecord]) -> Vec<MissedEntry> {
    history
        .iter()
        .filter(|record| !record.is_correct())
        .map(|record| MissedEntry {
            question: record.question.clone(),
            chosen: record.chosen.clone(),
        })
        .collect()
}
