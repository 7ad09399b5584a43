use std::sync::Arc;

use services::{FactsService, HistoryService, SessionHandle, Topic, WikiService};
use wonder_core::SiteBase;

/// What the views need from the composition root.
pub trait UiApp: Send + Sync {
    fn site_base(&self) -> SiteBase;

    fn history(&self) -> Arc<HistoryService>;
    fn facts(&self) -> Arc<FactsService>;
    fn wiki(&self) -> Arc<WikiService>;

    /// Spawn a session runner for `topic`.
    fn start_session(&self, topic: Topic) -> SessionHandle;
}

#[derive(Clone)]
pub struct AppContext {
    app: Arc<dyn UiApp>,
    site_base: SiteBase,
    history: Arc<HistoryService>,
    facts: Arc<FactsService>,
    wiki: Arc<WikiService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            app: Arc::clone(app),
            site_base: app.site_base(),
            history: app.history(),
            facts: app.facts(),
            wiki: app.wiki(),
        }
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

    #[must_use]
    pub fn start_session(&self, topic: Topic) -> SessionHandle {
        self.app.start_session(topic)
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
