#![forbid(unsafe_code)]

pub mod app_services;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod facts;
pub mod sessions;
pub mod sources;
pub mod wiki;

pub use wonder_core::Clock;

pub use app_services::AppServices;
pub use config::{HistoryBackend, ServiceConfig};
pub use dashboard::DashboardStats;
pub use error::{AppServicesError, ConfigError, FactsError, SessionError, SourceError, WikiError};
pub use facts::{FactsOutcome, FactsService};
pub use sessions::{
    HistoryListItem, HistoryService, PresentedQuestion, QuizLoopService, QuizSession,
    RunnerEvent, SessionControl, SessionEvents, SessionHandle, spawn_session,
};
pub use sources::{QuestionSource, SpecimenSource, StaticQuestionSource, Topic, TriviaSource};
pub use wiki::{WikiService, WikiSummary};
