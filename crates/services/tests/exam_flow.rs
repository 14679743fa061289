use exam_core::format::PlainFormatter;
use exam_core::model::{ExamProfileDraft, Letter, QuestionId};
use exam_core::time::fixed_now;
use services::{AdvanceOutcome, Clock, ExamPrep, OptionFeedback, SessionMode};
use storage::Storage;

const BANK: &str = r#"[
    {"question_number": 1, "question": "Which command lists files?", "answers": ["A. `ls`", "B. `cd`", "C. `pwd`"], "correct_answer": "A"},
    {"question_number": 2, "question": "Pick the two VCS tools.", "answers": ["git", "make", "hg", "gcc"], "correct_answer": "AC"},
    {"question_number": 3, "question": "Steps to deploy", "answers": ["1. build 2. ship", "skip it"], "correct_answer": "A"}
]"#;

fn profile() -> exam_core::model::ExamProfile {
    ExamProfileDraft::new("DevOps Foundations", "DevOpsUsedQuestions")
        .with_description("Practice for the foundations track.")
        .validate()
        .unwrap()
}

fn letter(c: char) -> Letter {
    Letter::from_char(c).unwrap()
}

/// Answers every question correctly except question 2, where `A` and `B` are ticked.
fn run_exam(prep: &ExamPrep) -> services::ExamResults {
    let mut engine = prep.engine().with_seed(11);
    assert_eq!(engine.start_exam(3).unwrap(), 3);

    while let Some(question) = engine.current_question().cloned() {
        if question.id() == QuestionId::new(2) {
            engine.select_answer(letter('A')).unwrap();
            engine.select_answer(letter('B')).unwrap();
        } else {
            engine.select_answer(letter('A')).unwrap();
        }
        let view = engine.question_view().unwrap();
        assert!(view.can_advance);
        assert!(matches!(
            engine.advance_exam().unwrap(),
            AdvanceOutcome::Answered { .. }
        ));
    }

    assert!(engine.is_finished());
    engine.results().unwrap()
}

#[test]
fn exam_flow_scores_and_reviews_missed_questions() {
    let prep = ExamPrep::from_json(profile(), BANK, &Storage::in_memory())
        .unwrap()
        .with_clock(Clock::fixed(fixed_now()));

    let results = run_exam(&prep);
    assert_eq!(results.total, 3);
    assert_eq!((results.correct, results.wrong), (2, 1));
    assert_eq!(results.percent, 67);
    assert_eq!(results.finished_at, Some(fixed_now()));
    assert_eq!(results.missed.len(), 1);
    assert_eq!(results.missed[0].question.id(), QuestionId::new(2));

    let progress = prep.ledger_progress();
    assert_eq!((progress.used, progress.available), (3, 0));
}

#[test]
fn used_questions_persist_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("exam.db");
    let bank = || exam_core::model::QuestionBank::from_json(BANK).unwrap();

    {
        let prep = ExamPrep::sqlite(profile(), bank(), &path).unwrap();
        let mut engine = prep.engine();
        assert_eq!(engine.start_practice(), 3);
        engine.answer_practice(letter('B')).unwrap();
    }

    let prep = ExamPrep::sqlite(profile(), bank(), &path).unwrap();
    assert_eq!(prep.ledger_progress().available, 2);

    let mut engine = prep.engine();
    assert_eq!(engine.start_practice(), 2);
    assert_eq!(
        engine.current_question().map(|q| q.id()),
        Some(QuestionId::new(2))
    );

    engine.reset_used_questions();
    assert_eq!(prep.ledger_progress().available, 3);
    assert_eq!(engine.start_practice(), 3);
}

#[test]
fn practice_view_reports_feedback_and_navigation() {
    let prep = ExamPrep::from_json(profile(), BANK, &Storage::in_memory()).unwrap();
    let mut engine = prep.engine();
    engine.start_practice();
    engine.go_next().unwrap();

    let view = engine.question_view().unwrap();
    assert_eq!(view.mode, SessionMode::Practice);
    assert_eq!(view.position, 2);
    assert!(view.multi_answer);
    assert!(view.can_go_prev && view.can_go_next);

    engine.answer_practice(letter('A')).unwrap();
    let feedback = engine.answer_practice(letter('B')).unwrap();
    assert!(feedback.answered);
    assert!(!feedback.correct);

    let view = engine.question_view().unwrap();
    let marks: Vec<_> = view.options.iter().map(|o| o.feedback).collect();
    assert_eq!(
        marks,
        vec![
            OptionFeedback::Correct,
            OptionFeedback::Incorrect,
            OptionFeedback::Correct,
            OptionFeedback::Neutral
        ]
    );
    assert!(view.options.iter().all(|o| o.locked));

    let rendered = view.render(&PlainFormatter);
    assert_eq!(rendered.options.len(), 4);
    assert_eq!(prep.ledger_progress().used, 1);
}

#[test]
fn malformed_bank_is_rejected() {
    let duplicate = r#"[
        {"question_number": 1, "question": "a", "answers": ["x"], "correct_answer": "A"},
        {"question_number": 1, "question": "b", "answers": ["y"], "correct_answer": "A"}
    ]"#;
    let err = ExamPrep::from_json(profile(), duplicate, &Storage::in_memory()).unwrap_err();
    assert!(matches!(err, services::AppServicesError::Bank(_)));

    let out_of_range = r#"[{"question_number": 1, "question": "a", "answers": ["x"], "correct_answer": "B"}]"#;
    assert!(ExamPrep::from_json(profile(), out_of_range, &Storage::in_memory()).is_err());
}

#[test]
fn engines_from_one_prep_see_each_others_ledger_writes() {
    let prep = ExamPrep::from_json(profile(), BANK, &Storage::in_memory()).unwrap();
    let mut first = prep.engine();
    let mut second = prep.engine();

    first.start_practice();
    first.answer_practice(letter('A')).unwrap();

    assert_eq!(prep.ledger_progress().available, 2);
    assert_eq!(second.ledger_progress().available, 2);
    assert_eq!(second.start_practice(), 2);
    assert_eq!(
        second.current_question().map(|q| q.id()),
        Some(QuestionId::new(2))
    );
    assert_eq!(second.start_exam(3), Ok(2));

    first.reset_used_questions();
    assert_eq!(second.ledger_progress().available, 3);
    assert_eq!(second.start_practice(), 3);
    assert!(second.used_ids().is_empty());
}
