use services::facts::FACTS_LOADING;
use services::{FactsOutcome, WikiSummary};

const NO_EXTRACT: &str = "No summary available for this topic.";

/// Facts panel content: either bullet lines or a single placeholder sentence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FactsVm {
    Lines(Vec<String>),
    Placeholder(&'static str),
}

impl FactsVm {
    #[must_use]
    pub fn loading() -> Self {
        FactsVm::Placeholder(FACTS_LOADING)
    }
}

impl From<&FactsOutcome> for FactsVm {
    fn from(outcome: &FactsOutcome) -> Self {
        match (outcome, outcome.placeholder()) {
            (FactsOutcome::Found(lines), _) => FactsVm::Lines(lines.clone()),
            (_, Some(text)) => FactsVm::Placeholder(text),
            (_, None) => FactsVm::Lines(Vec::new()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WikiVm {
    pub title: String,
    pub extract: String,
    pub image: Option<String>,
    pub url: String,
}

impl From<&WikiSummary> for WikiVm {
    fn from(summary: &WikiSummary) -> Self {
        let extract = if summary.extract.trim().is_empty() {
            NO_EXTRACT.to_string()
        } else {
            summary.extract.clone()
        };
        Self {
            title: summary.title.clone(),
            extract,
            image: (!summary.image.is_empty()).then(|| summary.image.clone()),
            url: summary.url.clone(),
        }
    }
}
