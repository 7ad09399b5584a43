use reqwest::{Client, Url};
use wonder_core::model::AnimalFacts;

use crate::config::normalize_endpoint;
use crate::error::FactsError;

pub const FACTS_LOADING: &str = "Fetching facts…";
pub const FACTS_EMPTY: &str = "No extra facts available for this animal.";
pub const FACTS_FAILED: &str = "We couldn't fetch facts right now.";
pub const FACTS_DISABLED: &str =
    "Facts are disabled. Set WONDER_FACTS_ENDPOINT to an animals proxy to enable them.";

/// What the facts panel should show after a lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FactsOutcome {
    Disabled,
    Found(Vec<String>),
    Empty,
    Failed,
}

impl FactsOutcome {
    /// Placeholder text for every non-`Found` outcome.
    #[must_use]
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            FactsOutcome::Disabled => Some(FACTS_DISABLED),
            FactsOutcome::Found(_) => None,
            FactsOutcome::Empty => Some(FACTS_EMPTY),
            FactsOutcome::Failed => Some(FACTS_FAILED),
        }
    }
}

/// Client for the animals facts proxy (`GET {endpoint}?name=...`).
#[derive(Clone)]
pub struct FactsService {
    client: Client,
    endpoint: Option<String>,
}

impl FactsService {
    #[must_use]
    pub fn new(endpoint: Option<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.and_then(normalize_endpoint),
        }
    }

    #[must_use]
    pub fn disabled() -> Self {
        Self::new(None)
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.endpoint.is_some()
    }

    /// Fetch the first facts record for `common_name`.
    ///
    /// # Errors
    ///
    /// Returns `FactsError::Disabled` without an endpoint, `HttpStatus` for
    /// non-success responses, and `Http` for transport or decoding failures.
    pub async fn lookup(&self, common_name: &str) -> Result<Option<AnimalFacts>, FactsError> {
        let endpoint = self.endpoint.as_deref().ok_or(FactsError::Disabled)?;
        let url = Url::parse_with_params(endpoint, &[("name", common_name)])
            .map_err(|e| FactsError::InvalidEndpoint(e.to_string()))?;

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(FactsError::HttpStatus(response.status()));
        }

        let records: Vec<AnimalFacts> = response.json().await?;
        Ok(records.into_iter().next())
    }

    /// Lookup folded into display state. Failures never escape.
    pub async fn describe(&self, common_name: &str) -> FactsOutcome {
        match self.lookup(common_name).await {
            Ok(Some(facts)) => {
                let lines = facts.summary_lines();
                if lines.is_empty() {
                    FactsOutcome::Empty
                } else {
                    FactsOutcome::Found(lines)
                }
            }
            Ok(None) => FactsOutcome::Empty,
            Err(FactsError::Disabled) => FactsOutcome::Disabled,
            Err(err) => {
                tracing::warn!(animal = common_name, error = %err, "facts lookup failed");
                FactsOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_endpoint_is_disabled() {
        assert!(!FactsService::new(Some("none".into())).enabled());
        assert!(!FactsService::new(Some("  ".into())).enabled());
        assert!(!FactsService::disabled().enabled());
        assert!(FactsService::new(Some("http://localhost/api/animals".into())).enabled());
    }

    #[tokio::test]
    async fn disabled_lookup_reports_disabled() {
        let service = FactsService::disabled();
        assert!(matches!(service.lookup("fox").await, Err(FactsError::Disabled)));
        let outcome = service.describe("fox").await;
        assert_eq!(outcome, FactsOutcome::Disabled);
        assert_eq!(outcome.placeholder(), Some(FACTS_DISABLED));
    }

    #[tokio::test]
    async fn transport_failure_degrades_to_placeholder() {
        let service = FactsService::new(Some("http://127.0.0.1:9/api/animals".into()));
        let outcome = service.describe("fox").await;
        assert_eq!(outcome, FactsOutcome::Failed);
        assert_eq!(outcome.placeholder(), Some(FACTS_FAILED));
    }

    #[test]
    fn found_has_no_placeholder() {
        assert!(FactsOutcome::Found(vec!["Diet: Carnivore.".into()]).placeholder().is_none());
        assert_eq!(FactsOutcome::Empty.placeholder(), Some(FACTS_EMPTY));
    }
}
