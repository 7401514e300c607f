//! Dashboard summary statistics

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{HarvestStatus, Variety};

/// Counts shown above the dashboard grid
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_varieties: usize,
    pub ready_to_harvest: usize,
    pub growing: usize,
    pub overdue: usize,
}

impl DashboardStats {
    /// Tally harvest statuses of `varieties` relative to `today`
    pub fn compute(varieties: &[Variety], today: NaiveDate) -> Self {
        let mut stats = Self {
            total_varieties: varieties.len(),
            ..Self::default()
        };

        for variety in varieties {
            match HarvestStatus::classify(variety.estimated_harvest_date, today) {
                HarvestStatus::ReadySoon => stats.ready_to_harvest += 1,
                HarvestStatus::Growing => stats.growing += 1,
                HarvestStatus::Overdue => stats.overdue += 1,
                HarvestStatus::Planted => {}
            }
        }

        stats
    }
}
