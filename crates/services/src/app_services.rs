use std::path::Path;
use std::sync::Arc;

use exam_core::model::{ExamProfile, QuestionBank};
use storage::{Storage, UsedQuestionLedger};
use tracing::debug;

use crate::Clock;
use crate::error::AppServicesError;
use crate::sessions::{LedgerProgress, SessionEngine};

/// One exam page: a profile, its question bank and the store its ledger lives in.
///
/// Hands out `SessionEngine`s that share the bank and the ledger.
#[derive(Clone)]
pub struct ExamPrep {
    profile: ExamProfile,
    bank: Arc<QuestionBank>,
    ledger: UsedQuestionLedger,
    clock: Clock,
}

impl ExamPrep {
    #[must_use]
    pub fn new(profile: ExamProfile, bank: QuestionBank, storage: &Storage) -> Self {
        Self {
            profile,
            bank: Arc::new(bank),
            ledger: UsedQuestionLedger::new(Arc::clone(&storage.store)),
            clock: Clock::default(),
        }
    }

    /// Ledger kept in memory only; nothing survives the process.
    #[must_use]
    pub fn in_memory(profile: ExamProfile, bank: QuestionBank) -> Self {
        Self::new(profile, bank, &Storage::in_memory())
    }

    /// Build services backed by a `SQLite` file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Sqlite` if the database cannot be opened or migrated.
    pub fn sqlite(
        profile: ExamProfile,
        bank: QuestionBank,
        path: impl AsRef<Path>,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(path.as_ref())?;
        debug!(path = %path.as_ref().display(), storage_key = profile.storage_key(), "opened exam store");
        Ok(Self::new(profile, bank, &storage))
    }

    /// Parse the bank from its JSON record array.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Bank` for malformed records or duplicate ids.
    pub fn from_json(
        profile: ExamProfile,
        bank_json: &str,
        storage: &Storage,
    ) -> Result<Self, AppServicesError> {
        let bank = QuestionBank::from_json(bank_json)?;
        Ok(Self::new(profile, bank, storage))
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn profile(&self) -> &ExamProfile {
        &self.profile
    }

    #[must_use]
    pub fn bank(&self) -> Arc<QuestionBank> {
        Arc::clone(&self.bank)
    }

    /// Fresh read of the persisted ledger against this bank.
    #[must_use]
    pub fn ledger_progress(&self) -> LedgerProgress {
        let used = self.ledger.load(self.profile.storage_key());
        LedgerProgress::new(&self.bank, &used)
    }

    /// New engine in `NotStarted`, seeded from the OS.
    #[must_use]
    pub fn engine(&self) -> SessionEngine {
        SessionEngine::new(
            Arc::clone(&self.bank),
            self.ledger.clone(),
            self.profile.storage_key(),
        )
        .with_clock(self.clock)
    }
}

impl std::fmt::Debug for ExamPrep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExamPrep")
            .field("profile", &self.profile)
            .field("bank_len", &self.bank.len())
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}
