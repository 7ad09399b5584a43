use chrono::{DateTime, Utc};
use std::sync::Arc;

use storage::repository::{HistoryEntry, HistoryRepository, InMemoryRepository};
use wonder_core::scoring::percent;

use crate::dashboard::{DashboardStats, NO_CATEGORY};
use crate::error::SessionError;

/// Presentation-agnostic row of the history list.
///
/// Fields missing from a stored entry come through as `None` or zero; the UI
/// decides how to render them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryListItem {
    pub activity: String,
    pub category: String,
    pub score: u32,
    pub total: u32,
    pub percent: u32,
    pub completed_at: Option<DateTime<Utc>>,
}

impl HistoryListItem {
    #[must_use]
    pub fn from_entry(entry: &HistoryEntry) -> Self {
        let score = entry.score.unwrap_or(0);
        let total = entry.total.unwrap_or(0);
        Self {
            activity: entry
                .activity_label()
                .unwrap_or_else(|| NO_CATEGORY.to_string()),
            category: entry
                .category_label
                .clone()
                .unwrap_or_else(|| NO_CATEGORY.to_string()),
            score,
            total,
            percent: percent(score, total),
            completed_at: entry.timestamp_utc(),
        }
    }
}

/// Read side of the result history: list rows and dashboard aggregates.
#[derive(Clone)]
pub struct HistoryService {
    history: Arc<dyn HistoryRepository>,
}

impl HistoryService {
    #[must_use]
    pub fn new(history: Arc<dyn HistoryRepository>) -> Self {
        Self { history }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryRepository::new()))
    }

    /// Stored entries, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` on repository failures.
    pub async fn entries(&self) -> Result<Vec<HistoryEntry>, SessionError> {
        Ok(self.history.list().await?)
    }

    /// # Errors
    ///
    /// Returns `SessionError::Storage` on repository failures.
    pub async fn list_items(&self) -> Result<Vec<HistoryListItem>, SessionError> {
        let entries = self.entries().await?;
        Ok(entries.iter().map(HistoryListItem::from_entry).collect())
    }

    /// # Errors
    ///
    /// Returns `SessionError::Storage` on repository failures.
    pub async fn dashboard(&self) -> Result<DashboardStats, SessionError> {
        let entries = self.entries().await?;
        Ok(DashboardStats::from_entries(&entries))
    }
}
