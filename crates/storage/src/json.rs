//! History kept as a single JSON array on disk.
//!
//! The file mirrors the browser `quizHistory` local-storage slot: a bare array,
//! most recent first. Entries are kept as raw JSON so fields this build does not
//! know about survive a rewrite.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;
use wonder_core::model::QuizResult;

use crate::repository::{HistoryEntry, HistoryRepository, Storage, StorageError};

/// Local-storage key the history lives under; also the default file stem.
pub const HISTORY_KEY: &str = "quizHistory";

#[derive(Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl JsonFileRepository {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_raw(&self) -> Result<Vec<Value>, StorageError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        match serde_json::from_slice::<Value>(&bytes)
            .map_err(|e| StorageError::Serialization(e.to_string()))?
        {
            Value::Array(items) => Ok(items),
            Value::Null => Ok(Vec::new()),
            other => Err(StorageError::Serialization(format!(
                "expected a JSON array in {}, found {}",
                self.path.display(),
                kind_name(&other)
            ))),
        }
    }

    async fn write_raw(&self, items: &[Value]) -> Result<(), StorageError> {
        let body =
            serde_json::to_vec(items).map_err(|e| StorageError::Serialization(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let staging = self.path.with_extension("json.tmp");
        tokio::fs::write(&staging, body).await?;
        tokio::fs::rename(&staging, &self.path).await?;
        Ok(())
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[async_trait]
impl HistoryRepository for JsonFileRepository {
    async fn record(&self, result: &QuizResult) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut items = self.read_raw().await?;
        let value =
            serde_json::to_value(result).map_err(|e| StorageError::Serialization(e.to_string()))?;
        items.insert(0, value);
        self.write_raw(&items).await?;
        tracing::debug!(path = %self.path.display(), entries = items.len(), "history file updated");
        Ok(())
    }

    async fn list(&self) -> Result<Vec<HistoryEntry>, StorageError> {
        let items = self.read_raw().await?;
        Ok(items.iter().map(HistoryEntry::from_value).collect())
    }
}

impl Storage {
    /// Build a `Storage` whose history lives in a JSON file at `path`.
    #[must_use]
    pub fn json_file(path: impl Into<PathBuf>) -> Self {
        let history: Arc<dyn HistoryRepository> = Arc::new(JsonFileRepository::new(path));
        Self { history }
    }
}
