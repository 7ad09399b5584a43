//! Open Trivia DB client.

use async_trait::async_trait;
use rand::Rng;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use wonder_core::model::{Difficulty, Question};
use wonder_core::scoring::build_question;
use wonder_core::text::decode_text;

use super::{QuestionSource, Topic, session_rng};
use crate::error::SourceError;

pub const DEFAULT_TRIVIA_URL: &str = "https://opentdb.com/api.php";
pub const DEFAULT_TRIVIA_AMOUNT: u32 = 10;

/// Open Trivia DB `response_code` for "not enough questions".
const CODE_NO_RESULTS: i64 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriviaConfig {
    pub base_url: String,
    pub amount: u32,
    pub difficulty: Option<Difficulty>,
}

impl Default for TriviaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_TRIVIA_URL.to_string(),
            amount: DEFAULT_TRIVIA_AMOUNT,
            difficulty: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TriviaResponse {
    response_code: Option<i64>,
    results: Option<Vec<TriviaRecord>>,
}

#[derive(Debug, Deserialize)]
struct TriviaRecord {
    question: String,
    correct_answer: String,
    #[serde(default)]
    incorrect_answers: Vec<String>,
}

#[derive(Clone)]
pub struct TriviaSource {
    client: Client,
    config: TriviaConfig,
    seed: Option<u64>,
}

impl TriviaSource {
    #[must_use]
    pub fn new(config: TriviaConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    #[must_use]
    pub fn with_client(client: Client, config: TriviaConfig) -> Self {
        Self {
            client,
            config,
            seed: None,
        }
    }

    /// Deterministic option order.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Request URL for a category id.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Unavailable` if the configured base URL is invalid.
    pub fn request_url(&self, category_id: u32) -> Result<Url, SourceError> {
        let amount = self.config.amount.to_string();
        let category = category_id.to_string();
        let mut params = vec![
            ("amount", amount.as_str()),
            ("category", category.as_str()),
            ("type", "multiple"),
            ("encode", "url3986"),
        ];
        if let Some(difficulty) = self.config.difficulty {
            params.push(("difficulty", difficulty.as_str()));
        }
        Url::parse_with_params(&self.config.base_url, &params)
            .map_err(|e| SourceError::Unavailable(format!("invalid trivia url: {e}")))
    }
}

#[async_trait]
impl QuestionSource for TriviaSource {
    async fn fetch_questions(&self, topic: &Topic) -> Result<Vec<Question>, SourceError> {
        let Topic::Category { id, name } = topic else {
            return Err(SourceError::UnsupportedTopic(topic.label().to_string()));
        };

        let url = self.request_url(id.value())?;
        tracing::debug!(category = %name, %url, "fetching trivia questions");

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(SourceError::Unavailable(format!(
                "trivia request failed with status {}",
                response.status()
            )));
        }
        let body = response.text().await?;

        parse_payload(&body, &mut session_rng(self.seed))
    }
}

/// Decode a trivia response body into validated questions.
///
/// # Errors
///
/// `EmptyResult` for "no results" responses or an empty list, and
/// `MalformedResponse` for anything that cannot be turned into questions.
pub fn parse_payload<R: Rng + ?Sized>(body: &str, rng: &mut R) -> Result<Vec<Question>, SourceError> {
    let payload: TriviaResponse =
        serde_json::from_str(body).map_err(|e| SourceError::MalformedResponse(e.to_string()))?;

    match payload.response_code {
        None | Some(0) => {}
        Some(CODE_NO_RESULTS) => return Err(SourceError::EmptyResult),
        Some(code) => {
            return Err(SourceError::MalformedResponse(format!(
                "trivia response_code {code}"
            )));
        }
    }

    let records = payload
        .results
        .ok_or_else(|| SourceError::MalformedResponse("missing results array".into()))?;
    if records.is_empty() {
        return Err(SourceError::EmptyResult);
    }

    records
        .into_iter()
        .map(|record| {
            let incorrect = record
                .incorrect_answers
                .iter()
                .map(|answer| decode_text(answer))
                .collect();
            build_question(
                decode_text(&record.question),
                decode_text(&record.correct_answer),
                incorrect,
                rng,
            )
            .map_err(|e| SourceError::MalformedResponse(e.to_string()))
        })
        .collect()
}
