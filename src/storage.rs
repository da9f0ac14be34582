//! Local persistence for the link builder
//!
//! Two independent records live in named slots of a [`SlotStore`]:
//!
//! - [`LinkStorage`]: the last successfully built link (`linkly_last_link`)
//! - [`ErrorStorage`]: a rolling log of failures (`linkly_errors`)
//!
//! Both are convenience features. Every operation swallows storage failures
//! and degrades to a no-op or an empty result, logging a warning instead.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use redb::{Database, ReadableDatabase};
use thiserror::Error;
use tracing::warn;

use crate::database::TABLE_SLOTS;
use crate::model::{now_millis, ErrorLogEntry, LinkRequest, StoredLink};

/// Slot holding the last built link.
pub const LAST_LINK_KEY: &str = "linkly_last_link";

/// Slot holding the error log.
pub const ERRORS_KEY: &str = "linkly_errors";

/// Maximum number of entries kept in the error log.
pub const MAX_ERROR_ENTRIES: usize = 50;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend error: {0}")]
    Backend(#[from] redb::Error),

    #[error("failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Text-valued key/value storage, the shape of browser local storage.
pub trait SlotStore: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// [`SlotStore`] persisted in the embedded redb file.
pub struct RedbSlotStore {
    db: Arc<Database>,
}

impl RedbSlotStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    fn read(&self, key: &str) -> Result<Option<String>, redb::Error> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TABLE_SLOTS)?;
        let value = table.get(key)?.map(|guard| guard.value().to_string());
        Ok(value)
    }

    fn write(&self, key: &str, value: Option<&str>) -> Result<(), redb::Error> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(TABLE_SLOTS)?;
            match value {
                Some(value) => {
                    table.insert(key, value)?;
                }
                None => {
                    table.remove(key)?;
                }
            }
        }
        write_txn.commit()?;
        Ok(())
    }
}

impl SlotStore for RedbSlotStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read(key)?)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Ok(self.write(key, Some(value))?)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        Ok(self.write(key, None)?)
    }
}

/// Volatile [`SlotStore`], useful for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemorySlotStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.slots
            .lock()
            .map_err(|_| StorageError::Unavailable("slot map lock poisoned".to_string()))
    }
}

impl SlotStore for MemorySlotStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// Single-slot cache of the last successfully built link.
#[derive(Clone)]
pub struct LinkStorage {
    store: Arc<dyn SlotStore>,
}

impl LinkStorage {
    pub fn new(store: Arc<dyn SlotStore>) -> Self {
        Self { store }
    }

    /// Overwrites the slot, reporting failure to the caller.
    pub fn try_save(&self, request: &LinkRequest, url: &str) -> Result<StoredLink, StorageError> {
        let stored = StoredLink {
            request: request.clone(),
            url: url.to_string(),
            timestamp: now_millis(),
        };
        let json = serde_json::to_string(&stored)?;
        self.store.set_item(LAST_LINK_KEY, &json)?;
        Ok(stored)
    }

    /// Overwrites the slot; failures are logged and otherwise ignored.
    pub fn save(&self, request: &LinkRequest, url: &str) {
        if let Err(err) = self.try_save(request, url) {
            warn!(error = %err, "failed to save link to storage");
        }
    }

    /// The stored link, or `None` when absent or unreadable.
    pub fn get(&self) -> Option<StoredLink> {
        let raw = match self.store.get_item(LAST_LINK_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!(error = %err, "failed to get link from storage");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(stored) => Some(stored),
            Err(err) => {
                warn!(error = %err, "stored link is malformed");
                None
            }
        }
    }

    pub fn has(&self) -> bool {
        self.get().is_some()
    }

    pub fn clear(&self) {
        if let Err(err) = self.store.remove_item(LAST_LINK_KEY) {
            warn!(error = %err, "failed to clear link from storage");
        }
    }
}

/// Rolling log of the most recent [`MAX_ERROR_ENTRIES`] failures, oldest first.
#[derive(Clone)]
pub struct ErrorStorage {
    store: Arc<dyn SlotStore>,
}

impl ErrorStorage {
    pub fn new(store: Arc<dyn SlotStore>) -> Self {
        Self { store }
    }

    /// Appends an entry, evicting the oldest beyond the cap.
    ///
    /// Never fails: a log that cannot be written is only reported through
    /// `tracing`, never back into itself.
    pub fn add(&self, message: &str, context: Option<&str>) {
        let mut entries = self.get_all();
        entries.push(ErrorLogEntry {
            message: message.to_string(),
            timestamp: now_millis(),
            context: context.map(str::to_string),
        });

        if entries.len() > MAX_ERROR_ENTRIES {
            let excess = entries.len() - MAX_ERROR_ENTRIES;
            entries.drain(..excess);
        }

        let written = serde_json::to_string(&entries)
            .map_err(StorageError::from)
            .and_then(|json| self.store.set_item(ERRORS_KEY, &json));
        if let Err(err) = written {
            warn!(error = %err, "failed to save error to storage");
        }
    }

    /// All entries, oldest first; empty when absent or unreadable.
    pub fn get_all(&self) -> Vec<ErrorLogEntry> {
        let raw = match self.store.get_item(ERRORS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!(error = %err, "failed to get errors from storage");
                return Vec::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|err| {
            warn!(error = %err, "error log is malformed");
            Vec::new()
        })
    }

    pub fn count(&self) -> usize {
        self.get_all().len()
    }

    pub fn clear(&self) {
        if let Err(err) = self.store.remove_item(ERRORS_KEY) {
            warn!(error = %err, "failed to clear errors from storage");
        }
    }
}
