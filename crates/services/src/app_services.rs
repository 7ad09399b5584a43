use std::sync::Arc;

use storage::repository::Storage;
use wonder_core::SiteBase;

use crate::Clock;
use crate::config::{HistoryBackend, ServiceConfig};
use crate::error::AppServicesError;
use crate::facts::FactsService;
use crate::sessions::{HistoryService, QuizLoopService, SessionHandle, spawn_session};
use crate::sources::{QuestionSource, SpecimenSource, Topic, TriviaSource};
use crate::wiki::WikiService;

/// Assembles app-facing services from a [`ServiceConfig`].
#[derive(Clone)]
pub struct AppServices {
    site_base: SiteBase,
    quiz_loop: Arc<QuizLoopService>,
    history: Arc<HistoryService>,
    trivia: Arc<dyn QuestionSource>,
    specimens: Arc<dyn QuestionSource>,
    facts: Arc<FactsService>,
    wiki: Arc<WikiService>,
}

impl AppServices {
    /// Build services with the storage backend named by `config`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the `SQLite` backend cannot be opened or migrated.
    pub async fn from_config(config: &ServiceConfig, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = match config.history_backend {
            HistoryBackend::Sqlite => Storage::sqlite(&config.db_url).await?,
            HistoryBackend::Json => Storage::json_file(&config.history_file),
            HistoryBackend::Memory => Storage::in_memory(),
        };
        tracing::info!(backend = %config.history_backend, "history storage ready");

        let trivia: Arc<dyn QuestionSource> = Arc::new(TriviaSource::new(config.trivia.clone()));
        let specimens: Arc<dyn QuestionSource> = Arc::new(SpecimenSource::from_file(
            &config.specimens_file,
            config.site_base.clone(),
            config.nature_rounds,
        ));
        Ok(Self::assemble(config, clock, storage, trivia, specimens))
    }

    /// In-memory history with caller-provided question sources.
    #[must_use]
    pub fn in_memory(
        config: &ServiceConfig,
        clock: Clock,
        trivia: Arc<dyn QuestionSource>,
        specimens: Arc<dyn QuestionSource>,
    ) -> Self {
        Self::assemble(config, clock, Storage::in_memory(), trivia, specimens)
    }

    fn assemble(
        config: &ServiceConfig,
        clock: Clock,
        storage: Storage,
        trivia: Arc<dyn QuestionSource>,
        specimens: Arc<dyn QuestionSource>,
    ) -> Self {
        let quiz_loop = Arc::new(
            QuizLoopService::new(clock, Arc::clone(&storage.history))
                .with_timers(config.quiz_seconds, config.nature_seconds),
        );
        let history = Arc::new(HistoryService::new(Arc::clone(&storage.history)));
        Self {
            site_base: config.site_base.clone(),
            quiz_loop,
            history,
            trivia,
            specimens,
            facts: Arc::new(FactsService::new(config.facts_endpoint.clone())),
            wiki: Arc::new(WikiService::new(config.wiki_url.clone())),
        }
    }

    /// Source that serves `topic`.
    #[must_use]
    pub fn source_for(&self, topic: &Topic) -> Arc<dyn QuestionSource> {
        match topic {
            Topic::Category { .. } => Arc::clone(&self.trivia),
            Topic::NatureLab => Arc::clone(&self.specimens),
        }
    }

    /// Run a session for `topic` on a background task.
    #[must_use]
    pub fn start(&self, topic: Topic) -> SessionHandle {
        let source = self.source_for(&topic);
        spawn_session(Arc::clone(&self.quiz_loop), source, topic)
    }

    #[must_use]
    pub fn site_base(&self) -> &SiteBase {
        &self.site_base
    }

    #[must_use]
    pub fn history(&self) -> Arc<HistoryService> {
        Arc::clone(&self.history)
    }

    #[must_use]
    pub fn facts(&self) -> Arc<FactsService> {
        Arc::clone(&self.facts)
    }

    #[must_use]
    pub fn wiki(&self) -> Arc<WikiService> {
        Arc::clone(&self.wiki)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::StaticQuestionSource;
    use wonder_core::model::{Category, Question};
    use wonder_core::time::fixed_now;

    #[tokio::test]
    async fn memory_backend_starts_empty() {
        let config = ServiceConfig {
            history_backend: HistoryBackend::Memory,
            ..ServiceConfig::default()
        };
        let services = AppServices::from_config(&config, Clock::fixed(fixed_now()))
            .await
            .unwrap();
        assert!(services.history().list_items().await.unwrap().is_empty());
        assert!(!services.facts().enabled());
        assert_eq!(services.site_base().as_str(), "/");
    }

    #[tokio::test]
    async fn topics_route_to_their_source() {
        let quiz = Question::new("2+2?", "4", vec!["4".into(), "5".into()]).unwrap();
        let nature = Question::new("What animal is this?", "Fox", vec!["Fox".into(), "Owl".into()]).unwrap();
        let services = AppServices::in_memory(
            &ServiceConfig::default(),
            Clock::fixed(fixed_now()),
            Arc::new(StaticQuestionSource::new(vec![quiz.clone()])),
            Arc::new(StaticQuestionSource::new(vec![nature.clone()])),
        );

        let science = Topic::category(&Category::catalog()[0]);
        let fetched = services.source_for(&science).fetch_questions(&science).await.unwrap();
        assert_eq!(fetched, vec![quiz]);
        let fetched = services
            .source_for(&Topic::NatureLab)
            .fetch_questions(&Topic::NatureLab)
            .await
            .unwrap();
        assert_eq!(fetched, vec![nature]);
    }
}
