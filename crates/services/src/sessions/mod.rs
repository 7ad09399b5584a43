mod runner;
mod service;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use runner::{
    PresentedQuestion, RunnerCommand, RunnerEvent, SessionControl, SessionEvents, SessionHandle,
    spawn_session,
};
pub use service::{QuizSession, SessionTick, TickObserver};
pub use view::{HistoryListItem, HistoryService};
pub use workflow::{LOAD_FAILED_MESSAGE, QuizLoopService};
