use services::HistoryListItem;
use services::dashboard::{ActivityBreakdown, DashboardStats};

use crate::vm::time_fmt::format_optional;

/// Headline tiles above the history table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatTileVm {
    pub label: &'static str,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryRowVm {
    pub activity: String,
    pub category: String,
    pub score_str: String,
    pub percent_str: String,
    pub completed_at_str: String,
}

impl From<&HistoryListItem> for HistoryRowVm {
    fn from(item: &HistoryListItem) -> Self {
        Self {
            activity: item.activity.clone(),
            category: item.category.clone(),
            score_str: format!("{}/{}", item.score, item.total),
            percent_str: format!("{}%", item.percent),
            completed_at_str: format_optional(item.completed_at),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BreakdownRowVm {
    pub category: String,
    pub score_str: String,
    pub percent: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BreakdownVm {
    pub activity: String,
    pub rows: Vec<BreakdownRowVm>,
}

impl From<&ActivityBreakdown> for BreakdownVm {
    fn from(group: &ActivityBreakdown) -> Self {
        Self {
            activity: group.activity.clone(),
            rows: group
                .categories
                .iter()
                .map(|c| BreakdownRowVm {
                    category: c.category.clone(),
                    score_str: format!("{}/{}", c.score, c.total),
                    percent: c.percent(),
                })
                .collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DashboardVm {
    pub tiles: Vec<StatTileVm>,
    pub breakdown: Vec<BreakdownVm>,
    pub rows: Vec<HistoryRowVm>,
    pub is_empty: bool,
}

#[must_use]
pub fn map_dashboard(stats: &DashboardStats, items: &[HistoryListItem]) -> DashboardVm {
    let tiles = vec![
        StatTileVm {
            label: "Sessions",
            value: stats.total_sessions.to_string(),
        },
        StatTileVm {
            label: "Average score",
            value: format!("{}%", stats.average_percent),
        },
        StatTileVm {
            label: "Best category",
            value: stats.best_category.clone(),
        },
        StatTileVm {
            label: "Perfect score",
            value: if stats.perfect_score { "Yes" } else { "Not yet" }.to_string(),
        },
    ];
    DashboardVm {
        tiles,
        breakdown: stats.breakdown.iter().map(BreakdownVm::from).collect(),
        rows: items.iter().map(HistoryRowVm::from).collect(),
        is_empty: stats.is_empty(),
    }
}
