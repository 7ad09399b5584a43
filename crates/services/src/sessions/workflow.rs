use std::num::NonZeroU32;
use std::sync::Arc;

use storage::repository::HistoryRepository;
use wonder_core::Advance;
use wonder_core::model::QuizResult;

use super::service::QuizSession;
use crate::Clock;
use crate::config::{DEFAULT_NATURE_SECONDS, DEFAULT_QUIZ_SECONDS};
use crate::error::SessionError;
use crate::sources::{QuestionSource, Topic};

/// Shown when a session finishes without questions.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load questions. Please try another category.";

/// Orchestrates session start and persists the result once a session finishes.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    history: Arc<dyn HistoryRepository>,
    quiz_seconds: NonZeroU32,
    nature_seconds: NonZeroU32,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(clock: Clock, history: Arc<dyn HistoryRepository>) -> Self {
        Self {
            clock,
            history,
            quiz_seconds: DEFAULT_QUIZ_SECONDS,
            nature_seconds: DEFAULT_NATURE_SECONDS,
        }
    }

    #[must_use]
    pub fn with_timers(mut self, quiz_seconds: NonZeroU32, nature_seconds: NonZeroU32) -> Self {
        self.quiz_seconds = quiz_seconds;
        self.nature_seconds = nature_seconds;
        self
    }

    /// Per-question countdown for `topic`.
    #[must_use]
    pub fn seconds_for(&self, topic: &Topic) -> NonZeroU32 {
        match topic {
            Topic::Category { .. } => self.quiz_seconds,
            Topic::NatureLab => self.nature_seconds,
        }
    }

    /// Start a session, fetching its questions from `source`.
    ///
    /// Source failures are not retried: the session comes back finished and
    /// empty, and nothing will be recorded for it.
    pub async fn start(&self, source: &dyn QuestionSource, topic: Topic) -> QuizSession {
        let seconds = self.seconds_for(&topic);
        let mut session = QuizSession::new(topic, seconds, self.clock.now());
        match source.fetch_questions(session.topic()).await {
            Ok(questions) => {
                let count = questions.len();
                if let Err(err) = session.load(questions) {
                    tracing::warn!(error = %err, "session load rejected");
                    session.load_failed();
                } else if count == 0 {
                    tracing::info!(topic = %session.topic(), "source returned no questions");
                } else {
                    tracing::info!(topic = %session.topic(), questions = count, "session started");
                }
            }
            Err(err) => {
                tracing::warn!(topic = %session.topic(), error = %err, "question source failed");
                session.load_failed();
            }
        }
        session
    }

    /// Advance past the answered question, recording the result on finish.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Round` for an out-of-order advance and
    /// `SessionError::Storage` if the finished result cannot be written; in the
    /// latter case [`QuizLoopService::finalize_result`] can retry the write.
    pub async fn advance(&self, session: &mut QuizSession) -> Result<Advance, SessionError> {
        let step = session.advance(self.clock.now())?;
        if let Advance::Finished(result) = &step {
            self.persist(session, result).await?;
        }
        Ok(step)
    }

    /// Retry the history write for a finished session. No-op once recorded.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotFinished` if there is no result yet, or
    /// `SessionError::Storage` if persistence fails again.
    pub async fn finalize_result(&self, session: &mut QuizSession) -> Result<QuizResult, SessionError> {
        let result = session.result().cloned().ok_or(SessionError::NotFinished)?;
        if !session.is_recorded() {
            self.persist(session, &result).await?;
        }
        Ok(result)
    }

    async fn persist(&self, session: &mut QuizSession, result: &QuizResult) -> Result<(), SessionError> {
        if let Err(err) = self.history.record(result).await {
            tracing::error!(error = %err, "failed to record session result");
            return Err(err.into());
        }
        session.mark_recorded();
        tracing::info!(
            activity = %result.activity_type(),
            category = result.category_label(),
            score = result.score(),
            total = result.total(),
            "session finished"
        );
        Ok(())
    }
}
