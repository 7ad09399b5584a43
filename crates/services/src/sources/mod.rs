//! Question sources: where a session's questions come from.

use std::fmt;

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use wonder_core::model::{ActivityType, Category, CategoryId, Question};

use crate::error::SourceError;

pub mod specimens;
pub mod trivia;

pub use specimens::{SpecimenPool, SpecimenSource};
pub use trivia::{TriviaConfig, TriviaSource};

/// What a session is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Topic {
    Category { id: CategoryId, name: String },
    NatureLab,
}

impl Topic {
    #[must_use]
    pub fn category(category: &Category) -> Self {
        Topic::Category {
            id: category.id,
            name: category.name.to_string(),
        }
    }

    #[must_use]
    pub fn activity(&self) -> ActivityType {
        match self {
            Topic::Category { .. } => ActivityType::CategoryQuiz,
            Topic::NatureLab => ActivityType::NatureLab,
        }
    }

    /// Label stored with the session result.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Topic::Category { name, .. } => name,
            Topic::NatureLab => ActivityType::NatureLab.label(),
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Supplies the ordered question list for one session.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// # Errors
    ///
    /// Returns `SourceError` when the topic is unsupported or the upstream data
    /// is missing, empty or malformed.
    async fn fetch_questions(&self, topic: &Topic) -> Result<Vec<Question>, SourceError>;
}

/// Fixed question list, for demos and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticQuestionSource {
    questions: Vec<Question>,
}

impl StaticQuestionSource {
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }
}

#[async_trait]
impl QuestionSource for StaticQuestionSource {
    async fn fetch_questions(&self, _topic: &Topic) -> Result<Vec<Question>, SourceError> {
        Ok(self.questions.clone())
    }
}

/// Seeded when `seed` is set, otherwise from OS entropy.
pub(crate) fn session_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_labels_and_activity() {
        let science = Category::catalog()[0];
        let topic = Topic::category(&science);
        assert_eq!(topic.label(), "Science");
        assert_eq!(topic.activity(), ActivityType::CategoryQuiz);
        assert_eq!(Topic::NatureLab.label(), "Nature Lab");
        assert_eq!(Topic::NatureLab.activity(), ActivityType::NatureLab);
    }

    #[tokio::test]
    async fn static_source_returns_its_questions() {
        let q = Question::new("Q", "A", vec!["A".into(), "B".into()]).unwrap();
        let source = StaticQuestionSource::new(vec![q.clone()]);
        assert_eq!(
            source.fetch_questions(&Topic::NatureLab).await.unwrap(),
            vec![q]
        );
    }
}
