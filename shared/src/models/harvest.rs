//! Harvest date derivation and harvest status

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Date format used on the wire and in form inputs
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Compute the estimated harvest date: the sowing date plus
/// `expected_harvest_days` calendar days.
///
/// Returns `None` when the harvest window is shorter than one day or the
/// result falls outside the representable calendar.
pub fn compute_estimated_harvest_date(
    sowing_date: NaiveDate,
    expected_harvest_days: u32,
) -> Option<NaiveDate> {
    if expected_harvest_days < 1 {
        return None;
    }
    sowing_date.checked_add_days(Days::new(u64::from(expected_harvest_days)))
}

/// Compute the estimated harvest date from raw form input.
///
/// Any input that is not a `YYYY-MM-DD` date or a positive integer produces
/// no value, so a form shows a blank estimate instead of a wrong date.
pub fn estimate_from_input(sowing_date: &str, expected_harvest_days: &str) -> Option<NaiveDate> {
    let sowing_date = NaiveDate::parse_from_str(sowing_date.trim(), DATE_FORMAT).ok()?;
    let days = expected_harvest_days.trim().parse::<u32>().ok()?;
    compute_estimated_harvest_date(sowing_date, days)
}

/// Signed number of days from `today` until `harvest_date`
pub fn days_until_harvest(harvest_date: NaiveDate, today: NaiveDate) -> i64 {
    (harvest_date - today).num_days()
}

/// Where a variety is in its growing cycle relative to today
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HarvestStatus {
    /// Estimated harvest date has passed
    Overdue,
    /// Harvest due within a week
    ReadySoon,
    /// Harvest due within a month
    Growing,
    Planted,
}

impl HarvestStatus {
    /// Classify a harvest date relative to `today`
    pub fn classify(harvest_date: NaiveDate, today: NaiveDate) -> Self {
        match days_until_harvest(harvest_date, today) {
            d if d < 0 => HarvestStatus::Overdue,
            0..=7 => HarvestStatus::ReadySoon,
            8..=30 => HarvestStatus::Growing,
            _ => HarvestStatus::Planted,
        }
    }
}

impl std::fmt::Display for HarvestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HarvestStatus::Overdue => write!(f, "Overdue"),
            HarvestStatus::ReadySoon => write!(f, "Ready Soon"),
            HarvestStatus::Growing => write!(f, "Growing"),
            HarvestStatus::Planted => write!(f, "Planted"),
        }
    }
}
