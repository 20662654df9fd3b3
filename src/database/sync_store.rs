//! SQLite-backed [`SyncStore`].
//!
//! Each `set` runs in one transaction: the previous value is read, the new
//! one upserted, and only after commit is the change broadcast.

use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{params, OptionalExtension};
use serde_json::Value;
use tokio::sync::broadcast;

use super::connection::Database;
use crate::services::sync_store::{check_quota, StorageChange, SyncStore, CHANGE_CHANNEL_CAPACITY};
use crate::types::errors::StoreError;

pub struct SqliteSyncStore {
    db: Mutex<Database>,
    area: String,
    quota_bytes_per_item: Option<usize>,
    changes: broadcast::Sender<StorageChange>,
}

impl SqliteSyncStore {
    /// Wraps an opened database, storing items under `area`.
    pub fn new(db: Database, area: &str, quota_bytes_per_item: Option<usize>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            db: Mutex::new(db),
            area: area.to_string(),
            quota_bytes_per_item,
            changes,
        }
    }

    fn now_millis() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as i64
    }

    fn decode(key: &str, raw: &str) -> Result<Value, StoreError> {
        serde_json::from_str(raw)
            .map_err(|e| StoreError::Serialization(format!("value for '{}': {}", key, e)))
    }
}

impl SyncStore for SqliteSyncStore {
    fn area(&self) -> &str {
        &self.area
    }

    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let db = self
            .db
            .lock()
            .map_err(|e| StoreError::ReadFailed(e.to_string()))?;
        let raw: Option<String> = db
            .connection()
            .query_row(
                "SELECT value FROM storage_items WHERE area = ?1 AND key = ?2",
                params![self.area, key],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| StoreError::ReadFailed(e.to_string()))?;

        raw.map(|r| Self::decode(key, &r)).transpose()
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        check_quota(key, &value, self.quota_bytes_per_item)?;
        let encoded =
            serde_json::to_string(&value).map_err(|e| StoreError::Serialization(e.to_string()))?;

        let old_raw = {
            let mut db = self
                .db
                .lock()
                .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
            let tx = db
                .connection_mut()
                .transaction()
                .map_err(|e| StoreError::WriteFailed(e.to_string()))?;

            let old_raw: Option<String> = tx
                .query_row(
                    "SELECT value FROM storage_items WHERE area = ?1 AND key = ?2",
                    params![self.area, key],
                    |row| row.get(0),
                )
                .optional()
                .map_err(|e| StoreError::WriteFailed(e.to_string()))?;

            tx.execute(
                "INSERT INTO storage_items (area, key, value, updated_at) VALUES (?1, ?2, ?3, ?4) \
                 ON CONFLICT(area, key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![self.area, key, encoded, Self::now_millis()],
            )
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;

            tx.commit()
                .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
            old_raw
        };

        // A corrupt previous value must not turn a committed write into an error.
        let old_value = old_raw.and_then(|raw| serde_json::from_str(&raw).ok());
        log::debug!("[STORE] {}.{} written ({} bytes)", self.area, key, encoded.len());

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
