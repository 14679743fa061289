#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod sessions;

pub use exam_core::Clock;
pub use sessions as session;

pub use app_services::ExamPrep;
pub use error::{AppServicesError, SessionError};

pub use sessions::{
    AdvanceOutcome, ExamResults, LedgerProgress, OptionFeedback, OptionView, PracticeFeedback,
    QuestionView, Score, SessionEngine, SessionMode, SessionProgress, SessionState,
};
