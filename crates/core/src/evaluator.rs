//! Answer evaluation: exact set equality, no partial credit.

use crate::model::{AnswerSet, Question};

/// True iff `chosen` equals the question's correct answer as a set.
#[must_use]
pub fn is_correct(question: &Question, chosen: &AnswerSet) -> bool {
    let correct = question.correct();
    correct.len() == chosen.len() && correct.iter().all(|letter| chosen.contains(letter))
}

/// A question with more than one correct letter.
#[must_use]
pub fn is_multi_answer(question: &Question) -> bool {
    question.correct().len() > 1
}
