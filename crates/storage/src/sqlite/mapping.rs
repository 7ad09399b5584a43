use chrono::{DateTime, Utc};
use sqlx::Row;
use wonder_core::time::to_iso8601;

use crate::repository::{HistoryEntry, StorageError};

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn map_history_row(row: &sqlx::sqlite::SqliteRow) -> Result<HistoryEntry, StorageError> {
    let recorded_at: DateTime<Utc> = row.try_get("recorded_at").map_err(ser)?;
    Ok(HistoryEntry {
        activity: Some(row.try_get("activity_type").map_err(ser)?),
        category_label: Some(row.try_get("category_label").map_err(ser)?),
        score: Some(u32_from_i64("score", row.try_get::<i64, _>("score").map_err(ser)?)?),
        total: Some(u32_from_i64("total", row.try_get::<i64, _>("total").map_err(ser)?)?),
        timestamp: Some(to_iso8601(recorded_at)),
    })
}
