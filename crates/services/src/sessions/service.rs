use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use exam_core::evaluator::{is_correct, is_multi_answer};
use exam_core::model::{AnswerSet, Letter, Question, QuestionBank, QuestionId};
use exam_core::review::{AnswerRecord, MissedEntry, build_missed};
use exam_core::Clock;
use storage::UsedQuestionLedger;

use super::plan::SessionBuilder;
use super::progress::{LedgerProgress, SessionProgress};
use super::state::{ExamState, PracticeState, Score, SessionMode, SessionState};
use super::view::{ExamResults, QuestionView};
use crate::error::SessionError;

//
// ─── OUTCOMES ──────────────────────────────────────────────────────────────────
//

/// Result of `advance_exam`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// Nothing was selected; the session did not move.
    NothingSelected,
    /// The selection was scored and the pointer moved forward.
    Answered { correct: bool, finished: bool },
}

/// Result of a practice-mode answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PracticeFeedback {
    pub selected: AnswerSet,
    /// The selection is frozen and the question has been recorded as used.
    pub answered: bool,
    pub correct: bool,
}

//
// ─── ENGINE ────────────────────────────────────────────────────────────────────
//

/// Exam session state machine.
///
/// Owns one `SessionState` at a time. The used-question ledger outlives any
/// session and may be shared with other engines: it is reloaded whenever a
/// session starts and written through on every mutation. Persistence failures are logged and never fail an operation.
pub struct SessionEngine {
    bank: Arc<QuestionBank>,
    ledger: UsedQuestionLedger,
    storage_key: String,
    used: BTreeSet<QuestionId>,
    state: SessionState,
    clock: Clock,
    rng: StdRng,
}

impl SessionEngine {
    /// Create an engine over `bank`, loading prior ledger state for `storage_key`.
    #[must_use]
    pub fn new(
        bank: Arc<QuestionBank>,
        ledger: UsedQuestionLedger,
        storage_key: impl Into<String>,
    ) -> Self {
        let storage_key = storage_key.into();
        let used = ledger.load(&storage_key);
        Self {
            bank,
            ledger,
            storage_key,
            used,
            state: SessionState::NotStarted,
            clock: Clock::default(),
            rng: StdRng::from_os_rng(),
        }
    }

    /// Seed exam sampling for reproducible question order.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn mode(&self) -> SessionMode {
        self.state.mode()
    }

    #[must_use]
    pub fn used_ids(&self) -> &BTreeSet<QuestionId> {
        &self.used
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.state.current_question()
    }

    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        match &self.state {
            SessionState::NotStarted => None,
            SessionState::Exam(exam) => Some(exam.current),
            SessionState::Practice(practice) => Some(practice.current),
        }
    }

    #[must_use]
    pub fn selected(&self) -> Option<&AnswerSet> {
        self.state.selected()
    }

    #[must_use]
    pub fn score(&self) -> Option<Score> {
        match &self.state {
            SessionState::Exam(exam) => Some(exam.score),
            _ => None,
        }
    }

    #[must_use]
    pub fn history(&self) -> &[AnswerRecord] {
        match &self.state {
            SessionState::Exam(exam) => &exam.history,
            _ => &[],
        }
    }

    /// True once an exam has moved past its last question.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(&self.state, SessionState::Exam(exam) if exam.is_finished())
    }

    #[must_use]
    pub fn progress(&self) -> Option<SessionProgress> {
        match &self.state {
            SessionState::Exam(exam) => Some(SessionProgress::for_exam(exam)),
            _ => None,
        }
    }

    /// Fresh read of the persisted ledger against the bank.
    #[must_use]
    pub fn ledger_progress(&self) -> LedgerProgress {
        LedgerProgress::new(&self.bank, &self.ledger.load(&self.storage_key))
    }

    #[must_use]
    pub fn question_view(&self) -> Option<QuestionView> {
        QuestionView::from_state(&self.state)
    }

    /// Exam tally so far. `None` outside an exam.
    #[must_use]
    pub fn results(&self) -> Option<ExamResults> {
        match &self.state {
            SessionState::Exam(exam) => Some(ExamResults::from_exam(exam)),
            _ => None,
        }
    }

    //
    // ─── TRANSITIONS ───────────────────────────────────────────────────────────
    //

    /// Start an exam over up to `requested` randomly chosen unused questions.
    ///
    /// Returns the size of the working set, which may be smaller than
    /// `requested` (or zero, in which case the exam is immediately finished).
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidQuestionCount` when `requested` is zero;
    /// the current session is left untouched.
    pub fn start_exam(&mut self, requested: usize) -> Result<usize, SessionError> {
        if requested == 0 {
            return Err(SessionError::InvalidQuestionCount);
        }

        self.reload_used();
        let questions = SessionBuilder::new(&self.bank, &self.used).exam(requested, &mut self.rng);
        let count = questions.len();
        self.state = SessionState::Exam(ExamState::new(questions, self.clock.now()));
        debug!(storage_key = %self.storage_key, requested, count, "exam started");
        Ok(count)
    }

    /// Start practice over every unused question, ascending by id.
    pub fn start_practice(&mut self) -> usize {
        self.reload_used();
        let questions = SessionBuilder::new(&self.bank, &self.used).practice();
        let count = questions.len();
        self.state = SessionState::Practice(PracticeState::new(questions));
        debug!(storage_key = %self.storage_key, count, "practice started");
        count
    }

    /// Exam mode: pick an option for the current question.
    ///
    /// Multi-answer questions toggle the letter. Single-answer questions commit
    /// the first pick and lock until the exam advances.
    ///
    /// # Errors
    ///
    /// Returns `WrongMode` outside an exam, `NoCurrentQuestion` once finished,
    /// `InvalidOption` for a letter past the last option, and `AnswerLocked` for
    /// a second pick on a single-answer question.
    pub fn select_answer(&mut self, letter: Letter) -> Result<(), SessionError> {
        let mode = self.mode();
        let SessionState::Exam(exam) = &mut self.state else {
            return Err(SessionError::WrongMode {
                expected: SessionMode::Exam,
                actual: mode,
            });
        };

        let question = exam
            .questions
            .get(exam.current)
            .ok_or(SessionError::NoCurrentQuestion)?;
        if !question.has_option(letter) {
            return Err(SessionError::InvalidOption(letter));
        }

        if is_multi_answer(question) {
            exam.selected.toggle(letter);
        } else {
            if exam.locked {
                return Err(SessionError::AnswerLocked);
            }
            exam.selected = AnswerSet::single(letter);
            exam.locked = true;
        }
        Ok(())
    }

    /// Exam mode: score the current selection and move to the next question.
    ///
    /// With nothing selected this is a no-op reported as
    /// `AdvanceOutcome::NothingSelected`.
    ///
    /// # Errors
    ///
    /// Returns `WrongMode` outside an exam.
    pub fn advance_exam(&mut self) -> Result<AdvanceOutcome, SessionError> {
        let mode = self.mode();
        let now = self.clock.now();
        let SessionState::Exam(exam) = &mut self.state else {
            return Err(SessionError::WrongMode {
                expected: SessionMode::Exam,
                actual: mode,
            });
        };

        if exam.selected.is_empty() {
            return Ok(AdvanceOutcome::NothingSelected);
        }
        let question = exam
            .questions
            .get(exam.current)
            .cloned()
            .ok_or(SessionError::NoCurrentQuestion)?;

        let chosen = std::mem::take(&mut exam.selected);
        let correct = is_correct(&question, &chosen);
        if correct {
            exam.score.correct += 1;
        } else {
            exam.score.wrong += 1;
        }
        let id = question.id();
        exam.history.push(AnswerRecord::new(question, chosen));
        exam.current += 1;
        exam.locked = false;

        debug!(storage_key = %self.storage_key, question_id = %id, correct, "exam answer committed");

        let finished = exam.is_finished();
        if finished {
            exam.finished_at = Some(now);
            debug!(
                storage_key = %self.storage_key,
                correct = exam.score.correct,
                wrong = exam.score.wrong,
                "exam finished"
            );
        }

        self.record_used(id);
        Ok(AdvanceOutcome::Answered { correct, finished })
    }

    /// Practice mode: answer the current question with immediate feedback.
    ///
    /// Single-answer questions accept only the first pick and are recorded as
    /// used at once. Multi-answer questions toggle until as many letters are
    /// ticked as there are correct answers; at that point the selection freezes
    /// and the question is recorded, whether or not the letters are right.
    ///
    /// # Errors
    ///
    /// Returns `WrongMode` outside practice, `NoCurrentQuestion` for an empty
    /// practice set, `InvalidOption` for a letter past the last option, and
    /// `AnswerLocked` once the selection is frozen.
    pub fn answer_practice(&mut self, letter: Letter) -> Result<PracticeFeedback, SessionError> {
        let mode = self.mode();
        let SessionState::Practice(practice) = &mut self.state else {
            return Err(SessionError::WrongMode {
                expected: SessionMode::Practice,
                actual: mode,
            });
        };

        let question = practice
            .questions
            .get(practice.current)
            .ok_or(SessionError::NoCurrentQuestion)?;
        if !question.has_option(letter) {
            return Err(SessionError::InvalidOption(letter));
        }

        let needed = question.correct().len();
        let answered = if is_multi_answer(question) {
            if practice.selected.len() == needed {
                return Err(SessionError::AnswerLocked);
            }
            practice.selected.toggle(letter);
            practice.selected.len() == needed
        } else {
            if !practice.selected.is_empty() {
                return Err(SessionError::AnswerLocked);
            }
            practice.selected = AnswerSet::single(letter);
            true
        };

        let feedback = PracticeFeedback {
            selected: practice.selected.clone(),
            answered,
            correct: is_correct(question, &practice.selected),
        };
        let id = question.id();

        if answered {
            self.record_used(id);
        }
        Ok(feedback)
    }

    /// Practice mode: move to the next question, clearing the selection.
    ///
    /// At the last question this is a no-op. Returns the resulting index.
    ///
    /// # Errors
    ///
    /// Returns `WrongMode` outside practice.
    pub fn go_next(&mut self) -> Result<usize, SessionError> {
        let practice = self.practice_mut()?;
        if practice.current + 1 < practice.questions.len() {
            practice.current += 1;
            practice.selected.clear();
        }
        Ok(practice.current)
    }

    /// Practice mode: move to the previous question, clearing the selection.
    ///
    /// The index is clamped at zero. Returns the resulting index.
    ///
    /// # Errors
    ///
    /// Returns `WrongMode` outside practice.
    pub fn go_prev(&mut self) -> Result<usize, SessionError> {
        let practice = self.practice_mut()?;
        practice.selected.clear();
        practice.current = practice.current.saturating_sub(1);
        Ok(practice.current)
    }

    /// Discard the session. The ledger is untouched.
    pub fn cancel_session(&mut self) {
        if self.state != SessionState::NotStarted {
            debug!(storage_key = %self.storage_key, mode = ?self.mode(), "session cancelled");
        }
        self.state = SessionState::NotStarted;
    }

    /// Forget every used question for this storage key.
    ///
    /// An in-progress session keeps its own history.
    pub fn reset_used_questions(&mut self) {
        self.used.clear();
        if let Err(err) = self.ledger.reset(&self.storage_key) {
            warn!(storage_key = %self.storage_key, error = %err, "failed to clear used-question ledger");
        }
    }

    /// Missed entries from the exam history, in answer order.
    ///
    /// Empty outside an exam; callable at any point of an exam.
    #[must_use]
    pub fn review_missed(&self) -> Vec<MissedEntry> {
        build_missed(self.history())
    }

    //
    // ─── INTERNALS ─────────────────────────────────────────────────────────────
    //

    fn practice_mut(&mut self) -> Result<&mut PracticeState, SessionError> {
        let mode = self.mode();
        match &mut self.state {
            SessionState::Practice(practice) => Ok(practice),
            _ => Err(SessionError::WrongMode {
                expected: SessionMode::Practice,
                actual: mode,
            }),
        }
    }

    fn reload_used(&mut self) {
        self.used = self.ledger.load(&self.storage_key);
    }

    fn record_used(&mut self, id: QuestionId) {
        self.used.insert(id);
        if let Err(err) = self.ledger.record(&self.storage_key, id) {
            warn!(
                storage_key = %self.storage_key,
                question_id = %id,
                error = %err,
                "failed to persist used question"
            );
        }
    }
}

impl fmt::Debug for SessionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionEngine")
            .field("storage_key", &self.storage_key)
            .field("bank_len", &self.bank.len())
            .field("used_len", &self.used.len())
            .field("mode", &self.mode())
            .field("current_index", &self.current_index())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::time::{fixed_clock, fixed_now};
    use storage::{InMemoryStore, KeyValueStore, StorageError};

    const KEY: &str = "TestUsedQuestions";

    fn letter(c: char) -> Letter {
        Letter::from_char(c).unwrap()
    }

    fn question(id: u64, correct: &str) -> Question {
        Question::parse(
            QuestionId::new(id),
            format!("Question {id}"),
            vec!["w".into(), "x".into(), "y".into(), "z".into()],
            correct,
        )
        .unwrap()
    }

    fn bank(questions: Vec<Question>) -> Arc<QuestionBank> {
        Arc::new(QuestionBank::new(questions).unwrap())
    }

    fn engine_with(questions: Vec<Question>) -> (SessionEngine, UsedQuestionLedger) {
        let ledger = UsedQuestionLedger::new(Arc::new(InMemoryStore::new()));
        let engine = SessionEngine::new(bank(questions), ledger.clone(), KEY)
            .with_seed(42)
            .with_clock(fixed_clock());
        (engine, ledger)
    }

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Connection("offline".into()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Connection("offline".into()))
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Connection("offline".into()))
        }
    }

    #[test]
    fn single_answer_exam_locks_and_finishes() {
        let (mut engine, ledger) = engine_with(vec![question(1, "A")]);
        assert_eq!(engine.start_exam(1), Ok(1));

        engine.select_answer(letter('A')).unwrap();
        assert_eq!(engine.selected().map(AnswerSet::encode).as_deref(), Some("A"));
        assert_eq!(
            engine.select_answer(letter('B')),
            Err(SessionError::AnswerLocked)
        );

        let outcome = engine.advance_exam().unwrap();
        assert_eq!(
            outcome,
            AdvanceOutcome::Answered {
                correct: true,
                finished: true
            }
        );
        assert_eq!(engine.score(), Some(Score { correct: 1, wrong: 0 }));
        assert!(engine.is_finished());
        assert!(engine.current_question().is_none());
        assert!(ledger.load(KEY).contains(&QuestionId::new(1)));

        let results = engine.results().unwrap();
        assert_eq!(results.percent, 100);
        assert_eq!(results.started_at, fixed_now());
        assert_eq!(results.finished_at, Some(fixed_now()));
    }

    #[test]
    fn multi_answer_exam_wrong_pick_is_scored_wrong() {
        let (mut engine, _ledger) = engine_with(vec![question(3, "AC")]);
        engine.start_exam(1).unwrap();

        engine.select_answer(letter('A')).unwrap();
        engine.select_answer(letter('D')).unwrap();
        engine.select_answer(letter('D')).unwrap();
        engine.select_answer(letter('B')).unwrap();
        engine.advance_exam().unwrap();

        assert_eq!(engine.score(), Some(Score { correct: 0, wrong: 1 }));
        assert_eq!(engine.history()[0].chosen_encoded().as_deref(), Some("AB"));
        let missed = engine.review_missed();
        assert_eq!(missed.len(), 1);
        assert_eq!(missed[0].question.id(), QuestionId::new(3));
    }

    #[test]
    fn advance_with_nothing_selected_is_a_no_op() {
        let (mut engine, ledger) = engine_with(vec![question(1, "A"), question(2, "BD")]);
        engine.start_exam(2).unwrap();
        let before = engine.state().clone();

        assert_eq!(engine.advance_exam(), Ok(AdvanceOutcome::NothingSelected));
        assert_eq!(engine.state(), &before);
        assert!(ledger.load(KEY).is_empty());
    }

    #[test]
    fn invalid_requests_leave_state_untouched() {
        let (mut engine, _ledger) = engine_with(vec![question(1, "A")]);
        assert_eq!(engine.start_exam(0), Err(SessionError::InvalidQuestionCount));
        assert_eq!(engine.mode(), SessionMode::NotStarted);

        assert_eq!(
            engine.select_answer(letter('A')),
            Err(SessionError::WrongMode {
                expected: SessionMode::Exam,
                actual: SessionMode::NotStarted
            })
        );
        assert!(matches!(
            engine.go_next(),
            Err(SessionError::WrongMode { .. })
        ));

        engine.start_exam(1).unwrap();
        let before = engine.state().clone();
        assert_eq!(
            engine.select_answer(letter('F')),
            Err(SessionError::InvalidOption(letter('F')))
        );
        assert!(matches!(
            engine.answer_practice(letter('A')),
            Err(SessionError::WrongMode { .. })
        ));
        assert_eq!(engine.start_exam(0), Err(SessionError::InvalidQuestionCount));
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn exam_skips_used_questions_and_caps_count() {
        let ledger = UsedQuestionLedger::new(Arc::new(InMemoryStore::new()));
        ledger.record(KEY, QuestionId::new(2)).unwrap();
        ledger.record(KEY, QuestionId::new(4)).unwrap();
        let questions = (1..=5).map(|id| question(id, "A")).collect();
        let mut engine = SessionEngine::new(bank(questions), ledger, KEY).with_seed(1);

        assert_eq!(engine.ledger_progress().available, 3);
        assert_eq!(engine.start_exam(10), Ok(3));
        let SessionState::Exam(exam) = engine.state() else {
            panic!("expected exam");
        };
        assert!(
            exam.questions()
                .iter()
                .all(|q| q.id() != QuestionId::new(2) && q.id() != QuestionId::new(4))
        );
    }

    #[test]
    fn empty_pool_starts_a_finished_exam_and_empty_practice() {
        let (mut engine, _ledger) = engine_with(vec![question(1, "A")]);
        engine.start_practice();
        engine.answer_practice(letter('A')).unwrap();

        assert_eq!(engine.start_exam(3), Ok(0));
        assert!(engine.is_finished());
        assert_eq!(engine.results().unwrap().percent, 0);

        assert_eq!(engine.start_practice(), 0);
        assert!(engine.question_view().is_none());
        assert_eq!(
            engine.answer_practice(letter('A')),
            Err(SessionError::NoCurrentQuestion)
        );
        assert_eq!(engine.go_next(), Ok(0));
        assert_eq!(engine.go_prev(), Ok(0));
    }

    #[test]
    fn practice_navigation_clears_selection() {
        let (mut engine, _ledger) =
            engine_with(vec![question(7, "A"), question(2, "B"), question(5, "C")]);
        assert_eq!(engine.start_practice(), 3);
        let current = |e: &SessionEngine| e.current_question().map(|q| q.id().value());
        assert_eq!(current(&engine), Some(2));

        engine.answer_practice(letter('A')).unwrap();
        assert_eq!(engine.go_next(), Ok(1));
        assert!(engine.selected().unwrap().is_empty());
        assert_eq!(engine.go_next(), Ok(2));
        assert_eq!(current(&engine), Some(7));
        assert_eq!(engine.go_next(), Ok(2));

        engine.answer_practice(letter('B')).unwrap();
        assert_eq!(engine.go_prev(), Ok(1));
        assert_eq!(current(&engine), Some(5));
        assert!(engine.selected().unwrap().is_empty());

        engine.go_prev().unwrap();
        assert_eq!(engine.go_prev(), Ok(0));
        assert_eq!(current(&engine), Some(2));
    }

    #[test]
    fn practice_single_answer_accepts_only_the_first_pick() {
        let (mut engine, ledger) = engine_with(vec![question(1, "B")]);
        engine.start_practice();

        let feedback = engine.answer_practice(letter('C')).unwrap();
        assert!(feedback.answered);
        assert!(!feedback.correct);
        assert!(ledger.load(KEY).contains(&QuestionId::new(1)));
        assert_eq!(
            engine.answer_practice(letter('B')),
            Err(SessionError::AnswerLocked)
        );
        assert_eq!(engine.selected().map(AnswerSet::encode).as_deref(), Some("C"));
    }

    #[test]
    fn practice_multi_answer_records_once_cardinality_matches() {
        let (mut engine, ledger) = engine_with(vec![question(9, "BD")]);
        engine.start_practice();

        let first = engine.answer_practice(letter('A')).unwrap();
        assert!(!first.answered);
        engine.answer_practice(letter('A')).unwrap();
        assert!(ledger.load(KEY).is_empty());

        engine.answer_practice(letter('B')).unwrap();
        let done = engine.answer_practice(letter('C')).unwrap();
        assert!(done.answered);
        assert!(!done.correct);
        assert_eq!(done.selected.encode(), "BC");
        assert!(ledger.load(KEY).contains(&QuestionId::new(9)));

        assert_eq!(
            engine.answer_practice(letter('C')),
            Err(SessionError::AnswerLocked)
        );
        let view = engine.question_view().unwrap();
        assert!(view.options.iter().all(|o| o.locked));
    }

    #[test]
    fn cancel_discards_session_but_keeps_ledger() {
        let (mut engine, ledger) = engine_with(vec![question(1, "A"), question(2, "A")]);
        engine.start_exam(2).unwrap();
        engine.select_answer(letter('A')).unwrap();
        engine.advance_exam().unwrap();

        engine.cancel_session();
        assert_eq!(engine.mode(), SessionMode::NotStarted);
        assert!(engine.history().is_empty());
        assert!(engine.score().is_none());
        assert_eq!(ledger.load(KEY).len(), 1);
        assert_eq!(engine.used_ids().len(), 1);
    }

    #[test]
    fn reset_makes_questions_available_again() {
        let (mut engine, ledger) =
            engine_with(vec![question(2, "A"), question(5, "A"), question(8, "A")]);
        engine.start_practice();
        engine.answer_practice(letter('A')).unwrap();
        engine.go_next().unwrap();
        engine.answer_practice(letter('A')).unwrap();
        assert_eq!(engine.used_ids().len(), 2);

        engine.reset_used_questions();
        assert!(ledger.load(KEY).is_empty());
        assert_eq!(engine.start_practice(), 3);
    }

    #[test]
    fn reset_keeps_in_progress_history() {
        let (mut engine, _ledger) = engine_with(vec![question(1, "A"), question(2, "A")]);
        engine.start_exam(2).unwrap();
        engine.select_answer(letter('B')).unwrap();
        engine.advance_exam().unwrap();

        engine.reset_used_questions();
        assert_eq!(engine.history().len(), 1);
        assert_eq!(engine.review_missed().len(), 1);
    }

    #[test]
    fn review_keeps_only_wrong_entries_in_order() {
        let (mut engine, _ledger) = engine_with(vec![question(1, "A"), question(2, "B")]);
        engine.start_exam(2).unwrap();
        for _ in 0..2 {
            let correct = engine.current_question().unwrap().id() == QuestionId::new(1);
            engine
                .select_answer(if correct { letter('A') } else { letter('C') })
                .unwrap();
            engine.advance_exam().unwrap();
        }

        let missed = engine.review_missed();
        assert_eq!(missed.len(), 1);
        assert_eq!(missed[0].question.id(), QuestionId::new(2));
        assert_eq!(missed[0].chosen.as_ref().map(AnswerSet::encode).as_deref(), Some("C"));
        assert_eq!(engine.score(), Some(Score { correct: 1, wrong: 1 }));
    }

    #[test]
    fn persistence_failures_do_not_affect_the_session() {
        let ledger = UsedQuestionLedger::new(Arc::new(FailingStore));
        let mut engine = SessionEngine::new(bank(vec![question(1, "A")]), ledger, KEY);
        assert!(engine.used_ids().is_empty());

        engine.start_exam(1).unwrap();
        engine.select_answer(letter('A')).unwrap();
        assert!(matches!(
            engine.advance_exam(),
            Ok(AdvanceOutcome::Answered { correct: true, .. })
        ));
        assert_eq!(engine.used_ids().len(), 1);
        engine.reset_used_questions();
        assert!(engine.used_ids().is_empty());
    }

    #[test]
    fn seeded_engines_sample_identically() {
        let questions: Vec<_> = (1..=12).map(|id| question(id, "A")).collect();
        let order = |seed| {
            let ledger = UsedQuestionLedger::new(Arc::new(InMemoryStore::new()));
            let mut engine =
                SessionEngine::new(bank(questions.clone()), ledger, KEY).with_seed(seed);
            engine.start_exam(6).unwrap();
            match engine.state() {
                SessionState::Exam(exam) => {
                    exam.questions().iter().map(Question::id).collect::<Vec<_>>()
                }
                _ => Vec::new(),
            }
        };
        assert_eq!(order(5), order(5));
    }
}
