use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rusqlite::Connection;
use thiserror::Error;

use crate::repository::{KeyValueStore, Storage};

mod kv_repo;
mod migrate;

/// SQLite-backed key-value store. Clones share one connection.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SqliteInitError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error("failed to create database directory: {0}")]
    Io(#[from] std::io::Error),
}

impl SqliteStore {
    /// Open (or create) the database file at `path` and apply migrations.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the parent directory cannot be created,
    /// the connection cannot be opened, or migrations fail.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SqliteInitError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        Self::init(Connection::open(path)?)
    }

    /// Open a private in-memory database.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the connection or migrations fail.
    pub fn open_in_memory() -> Result<Self, SqliteInitError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, SqliteInitError> {
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |_row| Ok(()))?;
        migrate::run_migrations(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

impl Storage {
    /// Build a `Storage` backed by the SQLite file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the store cannot be opened.
    pub fn sqlite(path: impl AsRef<Path>) -> Result<Self, SqliteInitError> {
        let store: Arc<dyn KeyValueStore> = Arc::new(SqliteStore::open(path)?);
        Ok(Self::new(store))
    }
}
