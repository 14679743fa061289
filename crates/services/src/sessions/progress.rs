use std::collections::BTreeSet;

use exam_core::model::{QuestionBank, QuestionId};

use super::state::ExamState;

/// Aggregated view of exam progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub is_complete: bool,
}

impl SessionProgress {
    pub(crate) fn for_exam(exam: &ExamState) -> Self {
        let total = exam.questions.len();
        let answered = exam.history.len();
        Self {
            total,
            answered,
            remaining: total.saturating_sub(answered),
            is_complete: exam.is_finished(),
        }
    }
}

/// How much of a bank the used-question ledger has consumed.
///
/// `available` is the upper bound a host should apply to an exam's requested
/// question count. Ids in the ledger that are not in the bank are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerProgress {
    pub used: usize,
    pub total: usize,
    pub available: usize,
}

impl LedgerProgress {
    #[must_use]
    pub fn new(bank: &QuestionBank, used: &BTreeSet<QuestionId>) -> Self {
        let total = bank.len();
        let used = bank.used_count(used);
        Self {
            used,
            total,
            available: total - used,
        }
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.available == 0
    }
}
