use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::BTreeSet;

use exam_core::model::{Question, QuestionBank, QuestionId};

/// Picks the working set of questions for a session from the unused part of a bank.
pub struct SessionBuilder<'a> {
    bank: &'a QuestionBank,
    used: &'a BTreeSet<QuestionId>,
}

impl<'a> SessionBuilder<'a> {
    #[must_use]
    pub fn new(bank: &'a QuestionBank, used: &'a BTreeSet<QuestionId>) -> Self {
        Self { bank, used }
    }

    /// Number of bank questions not yet used.
    #[must_use]
    pub fn available(&self) -> usize {
        self.bank.unused(self.used).count()
    }

    /// Uniformly shuffled unused questions, truncated to `count`.
    ///
    /// Asking for more than is available returns everything available.
    pub fn exam<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<Question> {
        let mut available: Vec<Question> = self.bank.unused(self.used).cloned().collect();
        available.shuffle(rng);
        available.truncate(count);
        available
    }

    /// All unused questions, ascending by id.
    #[must_use]
    pub fn practice(&self) -> Vec<Question> {
        let mut available: Vec<Question> = self.bank.unused(self.used).cloned().collect();
        available.sort_by_key(Question::id);
        available
    }
}
