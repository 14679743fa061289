#![forbid(unsafe_code)]

pub mod ledger;
pub mod repository;
pub mod sqlite;

pub use ledger::UsedQuestionLedger;
pub use repository::{InMemoryStore, KeyValueStore, Storage, StorageError};
pub use sqlite::{SqliteInitError, SqliteStore};
