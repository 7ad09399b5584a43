use reqwest::Client;
use serde::Deserialize;

use crate::config::DEFAULT_WIKI_URL;
use crate::error::WikiError;

const ARTICLE_BASE: &str = "https://en.wikipedia.org/wiki/";

/// Normalized page summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiSummary {
    pub title: String,
    /// Plain-text lead section, empty when Wikipedia has none.
    pub extract: String,
    /// Thumbnail or original image URL, empty when absent.
    pub image: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct SummaryPayload {
    title: String,
    #[serde(default)]
    extract: Option<String>,
    #[serde(default)]
    thumbnail: Option<ImageRef>,
    #[serde(default)]
    originalimage: Option<ImageRef>,
}

#[derive(Debug, Deserialize)]
struct ImageRef {
    source: String,
}

impl From<SummaryPayload> for WikiSummary {
    fn from(payload: SummaryPayload) -> Self {
        let image = payload
            .thumbnail
            .or(payload.originalimage)
            .map(|img| img.source)
            .unwrap_or_default();
        Self {
            url: article_url(&payload.title),
            title: payload.title,
            extract: payload.extract.unwrap_or_default(),
            image,
        }
    }
}

/// Public article link for a page title.
#[must_use]
pub fn article_url(title: &str) -> String {
    format!("{ARTICLE_BASE}{}", urlencoding::encode(title))
}

/// Wikipedia REST summary client.
#[derive(Clone)]
pub struct WikiService {
    client: Client,
    base_url: String,
}

impl Default for WikiService {
    fn default() -> Self {
        Self::new(DEFAULT_WIKI_URL)
    }
}

impl WikiService {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    #[must_use]
    pub fn summary_url(&self, topic: &str) -> String {
        format!(
            "{}/page/summary/{}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(topic.trim())
        )
    }

    /// # Errors
    ///
    /// Returns `WikiError` for a blank topic, non-success status or transport failures.
    pub async fn summary(&self, topic: &str) -> Result<WikiSummary, WikiError> {
        if topic.trim().is_empty() {
            return Err(WikiError::EmptyTopic);
        }
        let response = self
            .client
            .get(self.summary_url(topic))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(WikiError::HttpStatus(response.status()));
        }
        let payload: SummaryPayload = response.json().await?;
        Ok(payload.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_url_encodes_title() {
        let wiki = WikiService::new("https://en.wikipedia.org/api/rest_v1/");
        assert_eq!(
            wiki.summary_url("Red fox"),
            "https://en.wikipedia.org/api/rest_v1/page/summary/Red%20fox"
        );
    }

    #[test]
    fn payload_prefers_thumbnail() {
        let payload: SummaryPayload = serde_json::from_str(
            r#"{
                "title": "Red fox",
                "extract": "The red fox is the largest of the true foxes.",
                "thumbnail": {"source": "https://upload.example/thumb.jpg"},
                "originalimage": {"source": "https://upload.example/full.jpg"}
            }"#,
        )
        .unwrap();
        let summary = WikiSummary::from(payload);
        assert_eq!(summary.image, "https://upload.example/thumb.jpg");
        assert_eq!(summary.url, "https://en.wikipedia.org/wiki/Red%20fox");
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let payload: SummaryPayload = serde_json::from_str(r#"{"title": "Ocelot"}"#).unwrap();
        let summary = WikiSummary::from(payload);
        assert_eq!(summary.extract, "");
        assert_eq!(summary.image, "");

        let original: SummaryPayload = serde_json::from_str(
            r#"{"title": "Ocelot", "originalimage": {"source": "https://upload.example/o.jpg"}}"#,
        )
        .unwrap();
        assert_eq!(WikiSummary::from(original).image, "https://upload.example/o.jpg");
    }

    #[tokio::test]
    async fn blank_topic_is_rejected() {
        assert!(matches!(
            WikiService::default().summary("  ").await,
            Err(WikiError::EmptyTopic)
        ));
    }
}
