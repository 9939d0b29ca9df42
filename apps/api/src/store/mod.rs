//! Record store: a small key-value interface over JSON documents.
//!
//! Two backends: Postgres (`PgRecordStore`) when `DATABASE_URL` is set, otherwise
//! one-file-per-record JSON under `DATA_DIR` (`JsonFileStore`). Upsert is atomic per
//! key; there are no transactions across keys.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

pub mod file;
pub mod postgres;

pub use file::JsonFileStore;
pub use postgres::PgRecordStore;

// Collections (keyed records).
pub const STARTUPS: &str = "startups";
pub const PITCHES: &str = "pitches";
pub const MATCHES: &str = "matches";

// Append-only logs.
pub const FEEDBACK_LOG: &str = "feedback";
pub const COMMUNICATIONS_LOG: &str = "communications";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("record serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("invalid record key '{0}'")]
    InvalidKey(String),

    #[error("storage task failed: {0}")]
    Task(String),
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError>;

    /// Inserts or fully replaces the record at `(collection, id)`.
    async fn upsert(&self, collection: &str, id: &str, record: &Value) -> Result<(), StoreError>;

    async fn append(&self, log: &str, record: &Value) -> Result<(), StoreError>;
}

/// Collection, log and id names: non-empty, `[A-Za-z0-9_.-]` only, no `..`.
pub(crate) fn validate_key(key: &str) -> Result<(), StoreError> {
    let ok = !key.is_empty()
        && key != "."
        && !key.contains("..")
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));
    if ok {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Typed helpers
// ────────────────────────────────────────────────────────────────────────────

pub async fn load<T: DeserializeOwned>(
    store: &dyn RecordStore,
    collection: &str,
    id: &str,
) -> Result<Option<T>, StoreError> {
    match store.get(collection, id).await? {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}

pub async fn save<T: Serialize>(
    store: &dyn RecordStore,
    collection: &str,
    id: &str,
    record: &T,
) -> Result<(), StoreError> {
    store
        .upsert(collection, id, &serde_json::to_value(record)?)
        .await
}

pub async fn log<T: Serialize>(
    store: &dyn RecordStore,
    log: &str,
    record: &T,
) -> Result<(), StoreError> {
    store.append(log, &serde_json::to_value(record)?).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key_accepts_ids() {
        assert!(validate_key("startups").is_ok());
        assert!(validate_key("5d1c0a3e-8b7f-4f7e-9a51-0c2f1f1d9e21").is_ok());
        assert!(validate_key("acme_ventures__startup.v2").is_ok());
    }

    #[test]
    fn test_validate_key_rejects_paths() {
        for bad in ["", ".", "..", "../etc", "a/b", "a\\b", "sp ace", "naïve"] {
            assert!(
                matches!(validate_key(bad), Err(StoreError::InvalidKey(_))),
                "{bad:?} should be rejected"
            );
        }
    }
}
