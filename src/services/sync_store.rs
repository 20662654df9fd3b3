//! Synchronized key-value store contract.
//!
//! Every read and write moves a whole value; the bookmark collection lives
//! under a single key. Writers get no concurrency control: a write built on a
//! stale read replaces whatever was stored in between (last write wins).

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use serde_json::Value;
use tokio::sync::broadcast;

use crate::types::bookmark::{Bookmark, BOOKMARKS_KEY, SYNC_AREA};
use crate::types::errors::StoreError;

/// Capacity of the change-notification channel per subscriber.
pub const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// A completed write, delivered to every subscriber including the writer.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageChange {
    pub area: String,
    pub key: String,
    pub old_value: Option<Value>,
    pub new_value: Value,
}

impl StorageChange {
    /// Whether this change touched the bookmark collection in `area`.
    pub fn is_bookmarks_in(&self, area: &str) -> bool {
        self.area == area && self.key == BOOKMARKS_KEY
    }
}

/// Trait defining the store operations both sides rely on.
pub trait SyncStore: Send + Sync {
    /// Area name reported in change notifications.
    fn area(&self) -> &str;
    fn is_available(&self) -> bool {
        true
    }
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;
    /// Replaces the value under `key`. Either fully applies or leaves the old value.
    fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;
    fn subscribe(&self) -> broadcast::Receiver<StorageChange>;
}

/// Reads the bookmark collection; a missing key is an empty collection.
pub fn read_bookmarks(store: &dyn SyncStore) -> Result<Vec<Bookmark>, StoreError> {
    match store.get(BOOKMARKS_KEY)? {
        Some(value) => decode_bookmarks(value),
        None => Ok(Vec::new()),
    }
}

/// Writes the whole bookmark collection back.
pub fn write_bookmarks(store: &dyn SyncStore, bookmarks: &[Bookmark]) -> Result<(), StoreError> {
    let value =
        serde_json::to_value(bookmarks).map_err(|e| StoreError::Serialization(e.to_string()))?;
    store.set(BOOKMARKS_KEY, value)
}

/// Decodes a stored value into bookmarks. `null` counts as empty.
pub fn decode_bookmarks(value: Value) -> Result<Vec<Bookmark>, StoreError> {
    if value.is_null() {
        return Ok(Vec::new());
    }
    serde_json::from_value(value).map_err(|e| StoreError::Serialization(e.to_string()))
}

/// Rejects values over the per-item quota.
pub(crate) fn check_quota(key: &str, value: &Value, limit: Option<usize>) -> Result<(), StoreError> {
    let Some(limit) = limit else {
        return Ok(());
    };
    // Quota counts the key plus the JSON encoding of the value.
    let bytes = key.len()
        + serde_json::to_string(value)
            .map_err(|e| StoreError::Serialization(e.to_string()))?
            .len();
    if bytes > limit {
        return Err(StoreError::QuotaExceeded {
            key: key.to_string(),
            bytes,
            limit,
        });
    }
    Ok(())
}

/// In-process store, used by tests and when no database is configured.
pub struct MemorySyncStore {
    area: String,
    items: Mutex<HashMap<String, Value>>,
    available: AtomicBool,
    quota_bytes_per_item: Option<usize>,
    changes: broadcast::Sender<StorageChange>,
}

impl MemorySyncStore {
    pub fn new() -> Self {
        Self::with_area(SYNC_AREA)
    }

    pub fn with_area(area: &str) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            area: area.to_string(),
            items: Mutex::new(HashMap::new()),
            available: AtomicBool::new(true),
            quota_bytes_per_item: None,
            changes,
        }
    }

    pub fn with_quota(mut self, quota_bytes_per_item: usize) -> Self {
        self.quota_bytes_per_item = Some(quota_bytes_per_item);
        self
    }

    /// Switches the backend on or off; while off every call fails with `Unavailable`.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }
}

impl Default for MemorySyncStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncStore for MemorySyncStore {
    fn area(&self) -> &str {
        &self.area
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        if !self.is_available() {
            return Err(StoreError::Unavailable);
        }
        let items = self
            .items
            .lock()
            .map_err(|e| StoreError::ReadFailed(e.to_string()))?;
        Ok(items.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        if !self.is_available() {
            return Err(StoreError::Unavailable);
        }
        check_quota(key, &value, self.quota_bytes_per_item)?;

        let old_value = {
            let mut items = self
                .items
                .lock()
                .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
            items.insert(key.to_string(), value.clone())
        };

        // No subscribers is not an error.
        let _ = self.changes.send(StorageChange {
            area: self.area.clone(),
            key: key.to_string(),
            old_value,
            new_value: value,
        });
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageChange> {
        self.changes.subscribe()
    }
}
