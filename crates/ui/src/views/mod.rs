mod dashboard;
mod home;
mod quiz;
mod state;
mod wiki;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use dashboard::DashboardView;
pub use home::HomeView;
pub use quiz::{NatureLabView, QuizView};
pub use state::{ViewError, ViewState, view_state_from_resource};
pub use wiki::WikiView;
