//! Shared error types for the services crate.

use thiserror::Error;

use exam_core::model::{BankError, Letter};
use storage::SqliteInitError;

use crate::sessions::SessionMode;

/// Errors emitted by the session engine.
///
/// Every variant is a declined operation: the session state is left exactly as
/// it was before the call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("question count must be at least 1")]
    InvalidQuestionCount,
    #[error("operation requires {expected:?} mode, session is {actual:?}")]
    WrongMode {
        expected: SessionMode,
        actual: SessionMode,
    },
    #[error("no current question")]
    NoCurrentQuestion,
    #[error("option {0} does not exist on the current question")]
    InvalidOption(Letter),
    #[error("answer is locked for the current question")]
    AnswerLocked,
}

/// Errors emitted while assembling an exam page.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Bank(#[from] BankError),
}
