use chrono::{DateTime, Utc};

use exam_core::model::{AnswerSet, Question};
use exam_core::review::AnswerRecord;

/// Which variant of the session state machine is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    NotStarted,
    Exam,
    Practice,
}

/// Running exam tally. `correct + wrong` always equals the history length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    pub correct: u32,
    pub wrong: u32,
}

impl Score {
    #[must_use]
    pub fn answered(&self) -> u32 {
        self.correct + self.wrong
    }
}

/// Exam-mode state: sequential, committed answers, scored as it goes.
#[derive(Debug, Clone, PartialEq)]
pub struct ExamState {
    pub(crate) questions: Vec<Question>,
    pub(crate) current: usize,
    pub(crate) selected: AnswerSet,
    pub(crate) locked: bool,
    pub(crate) score: Score,
    pub(crate) history: Vec<AnswerRecord>,
    pub(crate) started_at: DateTime<Utc>,
    pub(crate) finished_at: Option<DateTime<Utc>>,
}

impl ExamState {
    pub(crate) fn new(questions: Vec<Question>, started_at: DateTime<Utc>) -> Self {
        let finished_at = questions.is_empty().then_some(started_at);
        Self {
            questions,
            current: 0,
            selected: AnswerSet::new(),
            locked: false,
            score: Score::default(),
            history: Vec::new(),
            started_at,
            finished_at,
        }
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    #[must_use]
    pub fn selected(&self) -> &AnswerSet {
        &self.selected
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    #[must_use]
    pub fn score(&self) -> Score {
        self.score
    }

    #[must_use]
    pub fn history(&self) -> &[AnswerRecord] {
        &self.history
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// Finished once the pointer has moved past the last question.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.current >= self.questions.len()
    }
}

/// Practice-mode state: freely navigable, immediate feedback, no score.
#[derive(Debug, Clone, PartialEq)]
pub struct PracticeState {
    pub(crate) questions: Vec<Question>,
    pub(crate) current: usize,
    pub(crate) selected: AnswerSet,
}

impl PracticeState {
    pub(crate) fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            current: 0,
            selected: AnswerSet::new(),
        }
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    #[must_use]
    pub fn selected(&self) -> &AnswerSet {
        &self.selected
    }
}

/// The whole session, as one tagged value.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionState {
    #[default]
    NotStarted,
    Exam(ExamState),
    Practice(PracticeState),
}

impl SessionState {
    #[must_use]
    pub fn mode(&self) -> SessionMode {
        match self {
            SessionState::NotStarted => SessionMode::NotStarted,
            SessionState::Exam(_) => SessionMode::Exam,
            SessionState::Practice(_) => SessionMode::Practice,
        }
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        match self {
            SessionState::NotStarted => None,
            SessionState::Exam(exam) => exam.current_question(),
            SessionState::Practice(practice) => practice.current_question(),
        }
    }

    #[must_use]
    pub fn selected(&self) -> Option<&AnswerSet> {
        match self {
            SessionState::NotStarted => None,
            SessionState::Exam(exam) => Some(&exam.selected),
            SessionState::Practice(practice) => Some(&practice.selected),
        }
    }
}
