use chrono::{DateTime, Utc};

use exam_core::evaluator::is_multi_answer;
use exam_core::format::{Block, TextFormatter};
use exam_core::model::{AnswerSet, Letter, Question, QuestionId};
use exam_core::review::{MissedEntry, build_missed};

use super::state::{ExamState, SessionMode, SessionState};

/// Whether options of a question accept further toggling.
///
/// Only practice mode locks options: a multi-answer question once as many
/// options are ticked as there are correct answers, a single-answer question
/// once anything is ticked.
#[must_use]
pub fn options_locked(
    mode: SessionMode,
    multi_answer: bool,
    selected_count: usize,
    correct_count: usize,
) -> bool {
    mode == SessionMode::Practice
        && if multi_answer {
            selected_count == correct_count
        } else {
            selected_count > 0
        }
}

/// Visual hint for a single option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionFeedback {
    Neutral,
    /// Exam mode: picked, correctness withheld.
    Selected,
    /// Practice mode: this option is part of the correct answer.
    Correct,
    /// Practice mode: picked but not part of the correct answer.
    Incorrect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    pub letter: Letter,
    pub text: String,
    pub selected: bool,
    pub locked: bool,
    pub feedback: OptionFeedback,
}

/// Presentation-agnostic snapshot of the current question.
///
/// Holds raw display text; a `TextFormatter` turns it into blocks via
/// [`QuestionView::render`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub mode: SessionMode,
    pub id: QuestionId,
    /// 1-based.
    pub position: usize,
    pub total: usize,
    pub prompt: String,
    pub options: Vec<OptionView>,
    /// Show a "select all that apply" hint.
    pub multi_answer: bool,
    pub selected_count: usize,
    pub correct_count: usize,
    /// Exam mode: a single-answer pick has been committed.
    pub answer_locked: bool,
    pub can_advance: bool,
    pub can_go_prev: bool,
    pub can_go_next: bool,
}

/// Formatted question, ready for a presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedQuestion {
    pub prompt: Vec<Block>,
    pub options: Vec<(Letter, Block)>,
}

impl QuestionView {
    /// View of the current question, if the session has one.
    #[must_use]
    pub fn from_state(state: &SessionState) -> Option<Self> {
        match state {
            SessionState::NotStarted => None,
            SessionState::Exam(exam) => {
                let question = exam.current_question()?;
                let multi_answer = is_multi_answer(question);
                let can_advance = if multi_answer {
                    !exam.selected.is_empty()
                } else {
                    exam.locked
                };
                Some(Self::build(
                    SessionMode::Exam,
                    question,
                    &exam.selected,
                    (exam.current, exam.questions.len()),
                    Nav {
                        answer_locked: exam.locked,
                        can_advance,
                        can_go_prev: false,
                        can_go_next: false,
                    },
                ))
            }
            SessionState::Practice(practice) => {
                let question = practice.current_question()?;
                let total = practice.questions.len();
                Some(Self::build(
                    SessionMode::Practice,
                    question,
                    &practice.selected,
                    (practice.current, total),
                    Nav {
                        answer_locked: false,
                        can_advance: false,
                        can_go_prev: practice.current > 0,
                        can_go_next: practice.current + 1 < total,
                    },
                ))
            }
        }
    }

    fn build(
        mode: SessionMode,
        question: &Question,
        selected: &AnswerSet,
        (index, total): (usize, usize),
        nav: Nav,
    ) -> Self {
        let multi_answer = is_multi_answer(question);
        let correct = question.correct();
        let locked = options_locked(mode, multi_answer, selected.len(), correct.len());
        let revealed = mode == SessionMode::Practice && !selected.is_empty();

        let options = question
            .lettered_options()
            .map(|(letter, text)| {
                let is_selected = selected.contains(letter);
                let feedback = match mode {
                    SessionMode::Practice if revealed => {
                        if correct.contains(letter) {
                            OptionFeedback::Correct
                        } else if is_selected {
                            OptionFeedback::Incorrect
                        } else {
                            OptionFeedback::Neutral
                        }
                    }
                    SessionMode::Exam if is_selected => OptionFeedback::Selected,
                    _ => OptionFeedback::Neutral,
                };
                OptionView {
                    letter,
                    text: text.to_string(),
                    selected: is_selected,
                    locked,
                    feedback,
                }
            })
            .collect();

        Self {
            mode,
            id: question.id(),
            position: index + 1,
            total,
            prompt: question.prompt().to_string(),
            options,
            multi_answer,
            selected_count: selected.len(),
            correct_count: correct.len(),
            answer_locked: nav.answer_locked,
            can_advance: nav.can_advance,
            can_go_prev: nav.can_go_prev,
            can_go_next: nav.can_go_next,
        }
    }

    /// Apply a formatter to the prompt and every option.
    #[must_use]
    pub fn render<F: TextFormatter + ?Sized>(&self, formatter: &F) -> RenderedQuestion {
        RenderedQuestion {
            prompt: formatter.format_question(&self.prompt),
            options: self
                .options
                .iter()
                .map(|option| (option.letter, formatter.format_answer(&option.text)))
                .collect(),
        }
    }
}

struct Nav {
    answer_locked: bool,
    can_advance: bool,
    can_go_prev: bool,
    can_go_next: bool,
}

/// Final (or running) tally of an exam.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamResults {
    pub total: usize,
    pub correct: u32,
    pub wrong: u32,
    /// Rounded half up; 0 for an empty exam.
    pub percent: u32,
    pub missed: Vec<MissedEntry>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl ExamResults {
    #[must_use]
    pub fn from_exam(exam: &ExamState) -> Self {
        let total = exam.questions.len();
        Self {
            total,
            correct: exam.score.correct,
            wrong: exam.score.wrong,
            percent: percent(exam.score.correct, total),
            missed: build_missed(&exam.history),
            started_at: exam.started_at,
            finished_at: exam.finished_at,
        }
    }
}

fn percent(correct: u32, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let correct = u64::from(correct);
    let total = total as u64;
    let rounded = (correct * 200 + total) / (2 * total);
    u32::try_from(rounded).unwrap_or(100)
}
