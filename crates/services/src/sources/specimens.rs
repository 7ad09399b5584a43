//! Nature Lab specimens: a static JSON pool turned into two-option rounds.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use wonder_core::SiteBase;
use wonder_core::model::{Question, Specimen};
use wonder_core::scoring::nature_round;

use super::{QuestionSource, Topic, session_rng};
use crate::error::SourceError;

#[derive(Debug, Deserialize)]
struct SpecimenRecord {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    api: Option<String>,
    #[serde(default)]
    img: Option<String>,
}

/// Usable specimens, image paths already resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecimenPool {
    specimens: Vec<Specimen>,
}

impl SpecimenPool {
    #[must_use]
    pub fn new(specimens: Vec<Specimen>) -> Self {
        Self { specimens }
    }

    /// Parse the pool file. Entries without a title or image are skipped.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::MalformedResponse` if the document is not a JSON array.
    pub fn from_json(raw: &str, base: &SiteBase) -> Result<Self, SourceError> {
        let value: Value =
            serde_json::from_str(raw).map_err(|e| SourceError::MalformedResponse(e.to_string()))?;
        let Value::Array(items) = value else {
            return Err(SourceError::MalformedResponse(
                "specimen pool is not a JSON array".into(),
            ));
        };

        let specimens = items
            .into_iter()
            .filter_map(|item| serde_json::from_value::<SpecimenRecord>(item).ok())
            .filter_map(|record| {
                let title = record.title.filter(|t| !t.trim().is_empty())?;
                let img = record.img.filter(|i| !i.trim().is_empty())?;
                Some(Specimen::new(title, record.api, base.resolve(&img)))
            })
            .collect();

        Ok(Self { specimens })
    }

    /// # Errors
    ///
    /// `Unavailable` if the file cannot be read, `MalformedResponse` if it does not parse.
    pub async fn load(path: &Path, base: &SiteBase) -> Result<Self, SourceError> {
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            SourceError::Unavailable(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json(&raw, base)
    }

    #[must_use]
    pub fn specimens(&self) -> &[Specimen] {
        &self.specimens
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.specimens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.specimens.is_empty()
    }

    #[must_use]
    pub fn find(&self, title: &str) -> Option<&Specimen> {
        self.specimens.iter().find(|s| s.title == title)
    }
}

#[derive(Debug, Clone)]
enum PoolOrigin {
    File { path: PathBuf, base: SiteBase },
    Loaded(SpecimenPool),
}

/// Builds a fixed number of specimen rounds per session.
#[derive(Debug, Clone)]
pub struct SpecimenSource {
    origin: PoolOrigin,
    rounds: u32,
    seed: Option<u64>,
}

impl SpecimenSource {
    /// Re-reads the pool file on every fetch.
    #[must_use]
    pub fn from_file(path: impl Into<PathBuf>, base: SiteBase, rounds: u32) -> Self {
        Self {
            origin: PoolOrigin::File {
                path: path.into(),
                base,
            },
            rounds,
            seed: None,
        }
    }

    #[must_use]
    pub fn from_pool(pool: SpecimenPool, rounds: u32) -> Self {
        Self {
            origin: PoolOrigin::Loaded(pool),
            rounds,
            seed: None,
        }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// # Errors
    ///
    /// Propagates pool loading failures.
    pub async fn pool(&self) -> Result<SpecimenPool, SourceError> {
        match &self.origin {
            PoolOrigin::File { path, base } => SpecimenPool::load(path, base).await,
            PoolOrigin::Loaded(pool) => Ok(pool.clone()),
        }
    }
}

#[async_trait]
impl QuestionSource for SpecimenSource {
    async fn fetch_questions(&self, topic: &Topic) -> Result<Vec<Question>, SourceError> {
        if *topic != Topic::NatureLab {
            return Err(SourceError::UnsupportedTopic(topic.label().to_string()));
        }

        let pool = self.pool().await?;
        let mut rng = session_rng(self.seed);
        let mut questions = Vec::with_capacity(self.rounds as usize);
        for _ in 0..self.rounds {
            let Some(question) = nature_round(pool.specimens(), &mut rng) else {
                tracing::warn!(specimens = pool.len(), "specimen pool too small for a round");
                return Err(SourceError::EmptyResult);
            };
            questions.push(question);
        }
        Ok(questions)
    }
}
