use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use wonder_core::model::{ActivityType, QuizResult};
use wonder_core::time::{parse_iso8601, to_iso8601};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read model of one persisted result.
///
/// Every field is optional: history written by older builds (or edited by hand)
/// may miss any of them, and readers must never fail on that.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl HistoryEntry {
    /// Lenient conversion from a stored JSON value.
    ///
    /// Accepts both current (`activityType`, `categoryLabel`, `timestamp`) and
    /// legacy (`type`, `category`, `date`) field names. Non-objects yield an
    /// empty entry.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };
        Self {
            activity: text_field(obj, &["activityType", "type"]),
            category_label: text_field(obj, &["categoryLabel", "category"]),
            score: count_field(obj, "score"),
            total: count_field(obj, "total"),
            timestamp: text_field(obj, &["timestamp", "date"]),
        }
    }

    /// Parsed activity, `None` for unknown or missing labels.
    #[must_use]
    pub fn activity_type(&self) -> Option<ActivityType> {
        self.activity.as_deref().and_then(|raw| raw.parse().ok())
    }

    /// Display label for the activity, falling back to the raw stored text.
    #[must_use]
    pub fn activity_label(&self) -> Option<String> {
        match self.activity_type() {
            Some(kind) => Some(kind.label().to_string()),
            None => self.activity.clone(),
        }
    }

    #[must_use]
    pub fn timestamp_utc(&self) -> Option<DateTime<Utc>> {
        self.timestamp.as_deref().and_then(parse_iso8601)
    }

    /// `score / total` when both are present and `total > 0`.
    #[must_use]
    pub fn ratio(&self) -> Option<f64> {
        match (self.score, self.total) {
            (Some(score), Some(total)) if total > 0 => Some(f64::from(score) / f64::from(total)),
            _ => None,
        }
    }

    /// Rebuild a validated result; `None` if anything is missing or inconsistent.
    #[must_use]
    pub fn to_result(&self) -> Option<QuizResult> {
        QuizResult::new(
            self.activity_type()?,
            self.category_label.clone()?,
            self.score?,
            self.total?,
            self.timestamp_utc()?,
        )
        .ok()
    }
}

impl From<&QuizResult> for HistoryEntry {
    fn from(result: &QuizResult) -> Self {
        Self {
            activity: Some(result.activity_type().as_str().to_string()),
            category_label: Some(result.category_label().to_string()),
            score: Some(result.score()),
            total: Some(result.total()),
            timestamp: Some(to_iso8601(result.timestamp())),
        }
    }
}

fn text_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| obj.get(*key))
        .and_then(|value| match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
}

fn count_field(obj: &Map<String, Value>, key: &str) -> Option<u32> {
    match obj.get(key)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0 && f.fract() == 0.0).map(|f| f as u64))
            .and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Append-only history of finished sessions.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Insert `result` at the head of the history.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the result cannot be persisted.
    async fn record(&self, result: &QuizResult) -> Result<(), StorageError>;

    /// All entries, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the history cannot be read.
    async fn list(&self) -> Result<Vec<HistoryEntry>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    entries: Arc<Mutex<Vec<HistoryEntry>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with raw entries, most recent first.
    #[must_use]
    pub fn with_entries(entries: Vec<HistoryEntry>) -> Self {
        Self {
            entries: Arc::new(Mutex::new(entries)),
        }
    }
}

#[async_trait]
impl HistoryRepository for InMemoryRepository {
    async fn record(&self, result: &QuizResult) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(0, HistoryEntry::from(result));
        Ok(())
    }

    async fn list(&self) -> Result<Vec<HistoryEntry>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub history: Arc<dyn HistoryRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let history: Arc<dyn HistoryRepository> = Arc::new(InMemoryRepository::new());
        Self { history }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wonder_core::time::fixed_now;

    fn result(label: &str, score: u32, total: u32) -> QuizResult {
        QuizResult::new(ActivityType::CategoryQuiz, label, score, total, fixed_now()).unwrap()
    }

    #[tokio::test]
    async fn record_inserts_at_head() {
        let repo = InMemoryRepository::new();
        repo.record(&result("Math", 3, 10)).await.unwrap();
        repo.record(&result("History", 7, 10)).await.unwrap();

        let entries = repo.list().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].category_label.as_deref(), Some("History"));
        assert_eq!(entries[1].category_label.as_deref(), Some("Math"));
    }

    #[tokio::test]
    async fn prior_entries_are_untouched() {
        let legacy = HistoryEntry {
            activity: Some("Mystery".into()),
            ..HistoryEntry::default()
        };
        let repo = InMemoryRepository::with_entries(vec![legacy.clone()]);
        repo.record(&result("Math", 1, 1)).await.unwrap();
        let entries = repo.list().await.unwrap();
        assert_eq!(entries[1], legacy);
    }

    #[test]
    fn reads_current_field_names() {
        let entry = HistoryEntry::from_value(&json!({
            "activityType": "NatureLab",
            "categoryLabel": "Nature Lab",
            "score": 4,
            "total": 5,
            "timestamp": "2023-11-14T22:13:20Z"
        }));
        assert_eq!(entry.activity_type(), Some(ActivityType::NatureLab));
        assert_eq!(entry.timestamp_utc(), Some(fixed_now()));
        assert_eq!(entry.to_result().unwrap().percent(), 80);
    }

    #[test]
    fn reads_legacy_field_names() {
        let entry = HistoryEntry::from_value(&json!({
            "type": "Category Quiz",
            "category": "Science",
            "score": "6",
            "total": 10.0,
            "date": "2023-11-14T22:13:20.000Z"
        }));
        assert_eq!(entry.activity_type(), Some(ActivityType::CategoryQuiz));
        assert_eq!(entry.activity_label().as_deref(), Some("Category Quiz"));
        assert_eq!(entry.category_label.as_deref(), Some("Science"));
        assert_eq!(entry.score, Some(6));
        assert_eq!(entry.total, Some(10));
        assert_eq!(entry.timestamp_utc(), Some(fixed_now()));
    }

    #[test]
    fn missing_fields_are_absent_not_errors() {
        let entry = HistoryEntry::from_value(&json!({ "score": -3, "extra": true }));
        assert_eq!(entry, HistoryEntry::default());
        assert_eq!(HistoryEntry::from_value(&json!("junk")), HistoryEntry::default());
        assert!(entry.ratio().is_none());
        assert!(entry.to_result().is_none());
    }

    #[test]
    fn unknown_activity_keeps_raw_label() {
        let entry = HistoryEntry::from_value(&json!({ "type": "Speed Round" }));
        assert!(entry.activity_type().is_none());
        assert_eq!(entry.activity_label().as_deref(), Some("Speed Round"));
    }
}
