//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;
use wonder_core::RoundError;

/// Errors emitted by question sources.
///
/// The session workflow treats every variant the same way: no retry, and the
/// session finishes without presenting anything.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SourceError {
    #[error("question source unavailable: {0}")]
    Unavailable(String),
    #[error("question source returned no questions")]
    EmptyResult,
    #[error("malformed source response: {0}")]
    MalformedResponse(String),
    #[error("source cannot serve topic: {0}")]
    UnsupportedTopic(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SourceError::MalformedResponse(err.to_string())
        } else {
            SourceError::Unavailable(err.to_string())
        }
    }
}

/// Errors emitted by `FactsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FactsError {
    #[error("facts lookup is disabled")]
    Disabled,
    #[error("facts request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("invalid facts endpoint: {0}")]
    InvalidEndpoint(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by `WikiService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WikiError {
    #[error("wikipedia request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("wikipedia topic is empty")]
    EmptyTopic,
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by session services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("session is not finished")]
    NotFinished,
    #[error("session runner has stopped")]
    RunnerClosed,
    #[error(transparent)]
    Round(#[from] RoundError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Invalid configuration values.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Figment(#[from] figment::Error),
    #[error("invalid value for {field}: {raw}")]
    InvalidValue { field: &'static str, raw: String },
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
