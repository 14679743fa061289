use std::collections::{BTreeSet, HashSet};

use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::question::Question;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BankError {
    #[error("question {0} appears more than once in the bank")]
    DuplicateId(QuestionId),

    #[error("question bank is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Ordered, read-only collection of questions supplied at session start.
///
/// The engine never mutates a bank; it only reads and clones questions out of it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// # Errors
    ///
    /// Returns `BankError::DuplicateId` if two questions share an id.
    pub fn new(questions: Vec<Question>) -> Result<Self, BankError> {
        let mut seen = HashSet::with_capacity(questions.len());
        for question in &questions {
            if !seen.insert(question.id()) {
                return Err(BankError::DuplicateId(question.id()));
            }
        }
        Ok(Self { questions })
    }

    /// Parse a JSON array of question records.
    ///
    /// # Errors
    ///
    /// Returns `BankError::Parse` for malformed JSON or records that violate the
    /// question invariant, and `BankError::DuplicateId` for repeated ids.
    pub fn from_json(json: &str) -> Result<Self, BankError> {
        let questions: Vec<Question> = serde_json::from_str(json)?;
        Self::new(questions)
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id() == id)
    }

    /// Questions whose id is not in `used`, in bank order.
    pub fn unused<'a>(
        &'a self,
        used: &'a BTreeSet<QuestionId>,
    ) -> impl Iterator<Item = &'a Question> + 'a {
        self.questions.iter().filter(move |q| !used.contains(&q.id()))
    }

    /// Number of bank questions whose id is in `used`. Ids unknown to this
    /// bank are not counted.
    #[must_use]
    pub fn used_count(&self, used: &BTreeSet<QuestionId>) -> usize {
        self.questions
            .iter()
            .filter(|q| used.contains(&q.id()))
            .count()
    }
}
