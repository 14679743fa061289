mod plan;
mod progress;
mod service;
mod state;
mod view;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use plan::SessionBuilder;
pub use progress::{LedgerProgress, SessionProgress};
pub use service::{AdvanceOutcome, PracticeFeedback, SessionEngine};
pub use state::{ExamState, PracticeState, Score, SessionMode, SessionState};
pub use view::{
    ExamResults, OptionFeedback, OptionView, QuestionView, RenderedQuestion, options_locked,
};
