use wonder_core::model::QuizResult;

use super::SqliteRepository;
use super::mapping::map_history_row;
use crate::repository::{HistoryEntry, HistoryRepository, StorageError};

#[async_trait::async_trait]
impl HistoryRepository for SqliteRepository {
    async fn record(&self, result: &QuizResult) -> Result<(), StorageError> {
        let res = sqlx::query(
            r"
                INSERT INTO quiz_history (
                    activity_type, category_label, score, total, recorded_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5)
            ",
        )
        .bind(result.activity_type().as_str())
        .bind(result.category_label())
        .bind(i64::from(result.score()))
        .bind(i64::from(result.total()))
        .bind(result.timestamp())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        tracing::debug!(id = res.last_insert_rowid(), "history row inserted");
        Ok(())
    }

    async fn list(&self) -> Result<Vec<HistoryEntry>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT activity_type, category_label, score, total, recorded_at
                FROM quiz_history
                ORDER BY id DESC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        rows.iter().map(map_history_row).collect()
    }
}
