use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use exam_core::model::QuestionId;
use tracing::{info, warn};

use crate::repository::{KeyValueStore, StorageError};

/// Serialize an id set as a JSON array of integers, ascending.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if encoding fails.
pub fn encode_ids(ids: &BTreeSet<QuestionId>) -> Result<String, StorageError> {
    serde_json::to_string(ids).map_err(|err| StorageError::Serialization(err.to_string()))
}

/// Parse a JSON array of integers. Duplicates collapse.
///
/// # Errors
///
/// Returns `StorageError::Serialization` for anything that is not an integer array.
pub fn decode_ids(raw: &str) -> Result<BTreeSet<QuestionId>, StorageError> {
    serde_json::from_str(raw).map_err(|err| StorageError::Serialization(err.to_string()))
}

/// Persisted set of answered question ids, one set per storage key.
///
/// Every mutation is written through to the store before returning. Clones
/// share the write lock, so concurrent `record` calls never drop each other's
/// ids.
#[derive(Clone)]
pub struct UsedQuestionLedger {
    store: Arc<dyn KeyValueStore>,
    write_lock: Arc<Mutex<()>>,
}

impl UsedQuestionLedger {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Previously recorded ids for `key`.
    ///
    /// Missing, unreadable or corrupt data yields the empty set.
    #[must_use]
    pub fn load(&self, key: &str) -> BTreeSet<QuestionId> {
        match self.try_load(key) {
            Ok(ids) => ids,
            Err(err) => {
                warn!(storage_key = key, error = %err, "used-question ledger unreadable, treating as empty");
                BTreeSet::new()
            }
        }
    }

    fn try_load(&self, key: &str) -> Result<BTreeSet<QuestionId>, StorageError> {
        match self.store.get(key)? {
            Some(raw) => decode_ids(&raw),
            None => Ok(BTreeSet::new()),
        }
    }

    /// Add `id` to the set for `key`. Returns whether the id was new.
    ///
    /// A corrupt payload is replaced; a failed read aborts without writing so
    /// that prior entries are never overwritten.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read or written.
    pub fn record(&self, key: &str, id: QuestionId) -> Result<bool, StorageError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut ids = match self.try_load(key) {
            Ok(ids) => ids,
            Err(StorageError::Serialization(reason)) => {
                warn!(storage_key = key, %reason, "discarding corrupt used-question ledger");
                BTreeSet::new()
            }
            Err(err) => return Err(err),
        };

        if !ids.insert(id) {
            return Ok(false);
        }
        self.store.set(key, &encode_ids(&ids)?)?;
        Ok(true)
    }

    /// Remove the persisted set for `key` entirely.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    pub fn reset(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        self.store.remove(key)?;
        info!(storage_key = key, "used-question ledger reset");
        Ok(())
    }
}
