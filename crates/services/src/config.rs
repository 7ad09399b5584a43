//! Layered service configuration: built-in defaults overlaid with `WONDER_*`
//! environment variables (`WONDER_QUIZ_SECONDS` -> `quiz_seconds`).

use std::fmt;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::str::FromStr;

use figment::Figment;
use figment::providers::{Env, Serialized};
use figment::value::{Uncased, UncasedStr};
use serde::{Deserialize, Serialize};
use wonder_core::SiteBase;

use crate::error::ConfigError;
use crate::sources::trivia::TriviaConfig;

pub const DEFAULT_DB_URL: &str = "sqlite://dev.sqlite3";
pub const DEFAULT_HISTORY_FILE: &str = "quizHistory.json";
pub const DEFAULT_SPECIMENS_FILE: &str = "data/animals.json";
pub const DEFAULT_WIKI_URL: &str = "https://en.wikipedia.org/api/rest_v1";
pub const DEFAULT_QUIZ_SECONDS: NonZeroU32 = seconds(30);
pub const DEFAULT_NATURE_SECONDS: NonZeroU32 = seconds(20);
pub const DEFAULT_NATURE_ROUNDS: u32 = 5;

const ENV_PREFIX: &str = "WONDER_";

const fn seconds(n: u32) -> NonZeroU32 {
    match NonZeroU32::new(n) {
        Some(n) => n,
        None => NonZeroU32::MIN,
    }
}

/// Where finished-session results are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum HistoryBackend {
    #[default]
    Sqlite,
    Json,
    Memory,
}

impl HistoryBackend {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            HistoryBackend::Sqlite => "sqlite",
            HistoryBackend::Json => "json",
            HistoryBackend::Memory => "memory",
        }
    }
}

impl fmt::Display for HistoryBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HistoryBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(HistoryBackend::Sqlite),
            "json" => Ok(HistoryBackend::Json),
            "memory" => Ok(HistoryBackend::Memory),
            _ => Err(ConfigError::InvalidValue {
                field: "history_backend",
                raw: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for HistoryBackend {
    type Error = ConfigError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

/// Runtime settings for the services layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub db_url: String,
    pub history_backend: HistoryBackend,
    pub history_file: PathBuf,
    pub trivia: TriviaConfig,
    pub quiz_seconds: NonZeroU32,
    pub nature_seconds: NonZeroU32,
    pub nature_rounds: u32,
    pub specimens_file: PathBuf,
    pub site_base: SiteBase,
    /// Page the assets are served from; picks `site_base` when none is set.
    pub site_url: Option<String>,
    /// Repository name that overrides GitHub Pages path detection.
    pub site_repo: Option<String>,
    /// `None` disables the facts lookup.
    pub facts_endpoint: Option<String>,
    pub wiki_url: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            db_url: DEFAULT_DB_URL.to_string(),
            history_backend: HistoryBackend::default(),
            history_file: PathBuf::from(DEFAULT_HISTORY_FILE),
            trivia: TriviaConfig::default(),
            quiz_seconds: DEFAULT_QUIZ_SECONDS,
            nature_seconds: DEFAULT_NATURE_SECONDS,
            nature_rounds: DEFAULT_NATURE_ROUNDS,
            specimens_file: PathBuf::from(DEFAULT_SPECIMENS_FILE),
            site_base: SiteBase::default(),
            site_url: None,
            site_repo: None,
            facts_endpoint: None,
            wiki_url: DEFAULT_WIKI_URL.to_string(),
        }
    }
}

impl ServiceConfig {
    /// Defaults overlaid with `WONDER_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a variable is set but cannot be parsed, or a
    /// count that must be positive is zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// The provider chain, exposed so callers can merge extra layers on top.
    #[must_use]
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Env::prefixed(ENV_PREFIX).map(nest_trivia_keys))
    }

    /// Extract and validate a config from `figment`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` for unparseable values and
    /// `ConfigError::InvalidValue` for zero counts.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let mut config: Self = figment.extract()?;

        if config.trivia.amount == 0 {
            return Err(ConfigError::InvalidValue {
                field: "trivia_amount",
                raw: "0".into(),
            });
        }
        if config.nature_rounds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "nature_rounds",
                raw: "0".into(),
            });
        }

        config.facts_endpoint = config.facts_endpoint.and_then(normalize_endpoint);
        // A non-root `site_base` is explicit and wins over detection.
        if config.site_base == SiteBase::default() {
            if let Some(page) = config.site_url.as_deref().filter(|p| !p.trim().is_empty()) {
                config.site_base = SiteBase::from_page_url(page, config.site_repo.as_deref());
            }
        }

        Ok(config)
    }
}

/// `WONDER_TRIVIA_*` variables fill the nested `trivia` table.
fn nest_trivia_keys(key: &UncasedStr) -> Uncased<'_> {
    match key.as_str().to_ascii_lowercase().as_str() {
        "trivia_url" => "trivia.base_url".into(),
        "trivia_amount" => "trivia.amount".into(),
        "trivia_difficulty" => "trivia.difficulty".into(),
        _ => key.into(),
    }
}

/// `none` (any case) explicitly disables an optional endpoint.
#[must_use]
pub fn normalize_endpoint(raw: String) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(trimmed.to_string())
    }
}
