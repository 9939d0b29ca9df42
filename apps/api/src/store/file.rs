//! JSON-file record store.
//!
//! Layout under the root directory:
//!   <collection>/<id>.json   one document per key, replaced via temp file + rename
//!   <log>.jsonl              one JSON document per line, append-only

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tempfile::NamedTempFile;
use tokio::sync::Mutex;
use tracing::debug;

use super::{validate_key, RecordStore, StoreError};

#[derive(Clone)]
pub struct JsonFileStore {
    root: Arc<PathBuf>,
    // Serializes log appends so concurrent lines never interleave.
    append_lock: Arc<Mutex<()>>,
}

impl JsonFileStore {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root: Arc::new(root),
            append_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_path(&self, collection: &str, id: &str) -> Result<PathBuf, StoreError> {
        validate_key(collection)?;
        validate_key(id)?;
        Ok(self.root.join(collection).join(format!("{id}.json")))
    }

    fn log_path(&self, log: &str) -> Result<PathBuf, StoreError> {
        validate_key(log)?;
        Ok(self.root.join(format!("{log}.jsonl")))
    }

    /// Reads every entry of a log in append order. Missing log ⇒ empty.
    pub async fn read_log(&self, log: &str) -> Result<Vec<Value>, StoreError> {
        let path = self.log_path(log)?;
        blocking(move || {
            let text = match fs::read_to_string(&path) {
                Ok(text) => text,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
                Err(e) => return Err(e.into()),
            };
            text.lines()
                .filter(|l| !l.trim().is_empty())
                .map(|l| serde_json::from_str(l).map_err(StoreError::from))
                .collect()
        })
        .await
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        let path = self.record_path(collection, id)?;
        blocking(move || match fs::read(&path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        })
        .await
    }

    async fn upsert(&self, collection: &str, id: &str, record: &Value) -> Result<(), StoreError> {
        let path = self.record_path(collection, id)?;
        let bytes = serde_json::to_vec_pretty(record)?;
        debug!("upsert {}", path.display());
        blocking(move || {
            let dir = path
                .parent()
                .ok_or_else(|| StoreError::InvalidKey(path.display().to_string()))?;
            fs::create_dir_all(dir)?;
            // Temp file in the same directory so the rename stays on one filesystem.
            let mut tmp = NamedTempFile::new_in(dir)?;
            tmp.write_all(&bytes)?;
            tmp.as_file().sync_all()?;
            tmp.persist(&path).map_err(|e| StoreError::Io(e.error))?;
            Ok(())
        })
        .await
    }

    async fn append(&self, log: &str, record: &Value) -> Result<(), StoreError> {
        let path = self.log_path(log)?;
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        let _guard = self.append_lock.lock().await;
        blocking(move || {
            let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
            file.write_all(&line)?;
            Ok(())
        })
        .await
    }
}

/// Runs filesystem work off the async executor.
async fn blocking<T, F>(f: F) -> Result<T, StoreError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, StoreError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
}
