mod dashboard_vm;
mod lookup_vm;
mod quiz_vm;
mod time_fmt;

pub use dashboard_vm::{
    BreakdownRowVm, BreakdownVm, DashboardVm, HistoryRowVm, StatTileVm, map_dashboard,
};
pub use lookup_vm::{FactsVm, WikiVm};
pub use quiz_vm::{OptionMark, OptionVm, QuizPhase, QuizVm};
pub use time_fmt::format_datetime;
