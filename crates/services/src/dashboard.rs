//! Aggregate statistics over the result history.

use storage::repository::HistoryEntry;

/// Shown when there is no best category to name.
pub const NO_CATEGORY: &str = "—";

/// Summed score/total for one category within one activity.
///
/// Sums are `u64` so legacy history with very large counts cannot overflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotals {
    pub category: String,
    pub score: u64,
    pub total: u64,
}

impl CategoryTotals {
    /// Rounded half-up, 0 when `total` is 0.
    #[must_use]
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        let (score, total) = (u128::from(self.score), u128::from(self.total));
        let scaled = (score * 200 + total) / (total * 2);
        u32::try_from(scaled).unwrap_or(u32::MAX)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityBreakdown {
    pub activity: String,
    pub categories: Vec<CategoryTotals>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_sessions: usize,
    pub average_percent: u32,
    pub best_category: String,
    pub perfect_score: bool,
    pub breakdown: Vec<ActivityBreakdown>,
}

impl DashboardStats {
    /// Aggregate entries given most-recent-first.
    ///
    /// Every entry counts towards `total_sessions`. Entries without a usable
    /// score/total pair are left out of the averages and breakdown.
    #[must_use]
    pub fn from_entries(entries: &[HistoryEntry]) -> Self {
        let mut ratio_sum = 0.0_f64;
        let mut ratio_count = 0_u32;
        let mut perfect_score = false;
        let mut per_category: Vec<(String, f64, u32)> = Vec::new();
        let mut breakdown: Vec<ActivityBreakdown> = Vec::new();

        for entry in entries {
            let Some(ratio) = entry.ratio() else {
                continue;
            };
            let (Some(score), Some(total)) = (entry.score, entry.total) else {
                continue;
            };
            ratio_sum += ratio;
            ratio_count += 1;
            perfect_score |= score == total;

            let category = entry
                .category_label
                .clone()
                .unwrap_or_else(|| NO_CATEGORY.to_string());

            match per_category.iter_mut().find(|(name, _, _)| *name == category) {
                Some((_, sum, count)) => {
                    *sum += ratio;
                    *count += 1;
                }
                None => per_category.push((category.clone(), ratio, 1)),
            }

            let activity = entry
                .activity_label()
                .unwrap_or_else(|| NO_CATEGORY.to_string());
            let bucket = match breakdown.iter().position(|b| b.activity == activity) {
                Some(idx) => &mut breakdown[idx],
                None => {
                    breakdown.push(ActivityBreakdown {
                        activity,
                        categories: Vec::new(),
                    });
                    let last = breakdown.len() - 1;
                    &mut breakdown[last]
                }
            };
            match bucket.categories.iter_mut().find(|c| c.category == category) {
                Some(totals) => {
                    totals.score = totals.score.saturating_add(u64::from(score));
                    totals.total = totals.total.saturating_add(u64::from(total));
                }
                None => bucket.categories.push(CategoryTotals {
                    category,
                    score: u64::from(score),
                    total: u64::from(total),
                }),
            }
        }

        let average_percent = if ratio_count == 0 {
            0
        } else {
            rounded_percent(ratio_sum / f64::from(ratio_count))
        };

        let mut best: Option<(&str, f64)> = None;
        for (name, sum, count) in &per_category {
            let avg = sum / f64::from(*count);
            if best.is_none_or(|(_, best_avg)| avg > best_avg) {
                best = Some((name.as_str(), avg));
            }
        }

        Self {
            total_sessions: entries.len(),
            average_percent,
            best_category: best.map_or_else(|| NO_CATEGORY.to_string(), |(name, _)| name.to_string()),
            perfect_score,
            breakdown,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_sessions == 0
    }
}

fn rounded_percent(ratio: f64) -> u32 {
    let scaled = (ratio * 100.0).round();
    if scaled <= 0.0 {
        0
    } else {
        scaled.min(f64::from(u32::MAX)) as u32
    }
}
