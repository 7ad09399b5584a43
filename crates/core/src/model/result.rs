use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Which game produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActivityType {
    #[serde(alias = "Category Quiz")]
    CategoryQuiz,
    #[serde(alias = "Nature Lab")]
    NatureLab,
}

impl ActivityType {
    /// Human-readable label, also the legacy persisted spelling.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ActivityType::CategoryQuiz => "Category Quiz",
            ActivityType::NatureLab => "Nature Lab",
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityType::CategoryQuiz => "CategoryQuiz",
            ActivityType::NatureLab => "NatureLab",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseActivityTypeError {
    raw: String,
}

impl fmt::Display for ParseActivityTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown activity type: {}", self.raw)
    }
}

impl std::error::Error for ParseActivityTypeError {}

impl FromStr for ActivityType {
    type Err = ParseActivityTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "CategoryQuiz" | "Category Quiz" => Ok(ActivityType::CategoryQuiz),
            "NatureLab" | "Nature Lab" => Ok(ActivityType::NatureLab),
            _ => Err(ParseActivityTypeError { raw: s.to_string() }),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ResultError {
    #[error("score ({score}) exceeds total ({total})")]
    ScoreExceedsTotal { score: u32, total: u32 },
}

/// Summary of a finished session, the only thing that outlives it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    activity_type: ActivityType,
    category_label: String,
    score: u32,
    total: u32,
    #[serde(serialize_with = "serialize_timestamp")]
    timestamp: DateTime<Utc>,
}

fn serialize_timestamp<S: serde::Serializer>(at: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&crate::time::to_iso8601(*at))
}

impl QuizResult {
    /// # Errors
    ///
    /// Returns `ResultError::ScoreExceedsTotal` if `score > total`.
    pub fn new(
        activity_type: ActivityType,
        category_label: impl Into<String>,
        score: u32,
        total: u32,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, ResultError> {
        if score > total {
            return Err(ResultError::ScoreExceedsTotal { score, total });
        }
        Ok(Self {
            activity_type,
            category_label: category_label.into(),
            score,
            total,
            timestamp,
        })
    }

    #[must_use]
    pub fn activity_type(&self) -> ActivityType {
        self.activity_type
    }

    #[must_use]
    pub fn category_label(&self) -> &str {
        &self.category_label
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Rounded percentage of correct answers (0 when `total` is 0).
    #[must_use]
    pub fn percent(&self) -> u32 {
        crate::scoring::percent(self.score, self.total)
    }
}
