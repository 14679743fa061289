use thiserror::Error;

use crate::model::{BankError, LetterError, ProfileError, QuestionError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Letter(#[from] LetterError),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Bank(#[from] BankError),
    #[error(transparent)]
    Profile(#[from] ProfileError),
}
