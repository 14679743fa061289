mod bank;
mod ids;
mod letter;
mod profile;
mod question;

pub use bank::{BankError, QuestionBank};
pub use ids::{ParseIdError, QuestionId};
pub use letter::{AnswerSet, Letter, LetterError};
pub use profile::{ExamProfile, ExamProfileDraft, ProfileError};
pub use question::{Question, QuestionError, QuestionRecord};
