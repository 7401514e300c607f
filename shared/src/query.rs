//! Dashboard query pipeline
//!
//! Filters a list of varieties by search text, health rating and yield range,
//! then applies one of the sort orders. The stages always run in that order.

use std::cmp::Ordering;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::models::Variety;

/// Lower bound of the dashboard yield slider, in kg
pub const DEFAULT_YIELD_MIN: u32 = 0;
/// Upper bound of the dashboard yield slider, in kg
pub const DEFAULT_YIELD_MAX: u32 = 100;

/// Health rating filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HealthFilter {
    #[default]
    Any,
    Rating(u8),
}

impl HealthFilter {
    pub fn matches(&self, health_rating: u8) -> bool {
        match self {
            HealthFilter::Any => true,
            HealthFilter::Rating(rating) => *rating == health_rating,
        }
    }
}

impl FromStr for HealthFilter {
    type Err = String;

    /// `""` and `"any"` mean no filter; otherwise an exact star rating
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "any" => Ok(HealthFilter::Any),
            other => other
                .parse::<u8>()
                .map(HealthFilter::Rating)
                .map_err(|_| format!("Invalid health filter: {}", other)),
        }
    }
}

impl Serialize for HealthFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            HealthFilter::Any => serializer.serialize_str("any"),
            HealthFilter::Rating(rating) => serializer.serialize_u8(*rating),
        }
    }
}

impl<'de> Deserialize<'de> for HealthFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Rating(u8),
            Text(String),
        }

        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(HealthFilter::Any),
            Some(Raw::Rating(rating)) => Ok(HealthFilter::Rating(rating)),
            Some(Raw::Text(text)) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Sort orders offered by the dashboard
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum SortOrder {
    /// Keep store order
    #[default]
    #[serde(rename = "none", alias = "", alias = "default")]
    None,
    #[serde(rename = "yield-asc", alias = "yield-ascending")]
    YieldAsc,
    #[serde(rename = "yield-desc", alias = "yield-descending")]
    YieldDesc,
    #[serde(rename = "harvest-asc", alias = "harvest-date-ascending")]
    HarvestAsc,
    #[serde(rename = "harvest-desc", alias = "harvest-date-descending")]
    HarvestDesc,
}

impl SortOrder {
    pub fn compare(&self, a: &Variety, b: &Variety) -> Ordering {
        match self {
            SortOrder::None => Ordering::Equal,
            SortOrder::YieldAsc => a.expected_yield.cmp(&b.expected_yield),
            SortOrder::YieldDesc => b.expected_yield.cmp(&a.expected_yield),
            SortOrder::HarvestAsc => a.estimated_harvest_date.cmp(&b.estimated_harvest_date),
            SortOrder::HarvestDesc => b.estimated_harvest_date.cmp(&a.estimated_harvest_date),
        }
    }

    /// Stable sort of `varieties` in place
    pub fn sort(&self, varieties: &mut [Variety]) {
        if *self != SortOrder::None {
            varieties.sort_by(|a, b| self.compare(a, b));
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "none" | "default" => Ok(SortOrder::None),
            "yield-asc" | "yield-ascending" => Ok(SortOrder::YieldAsc),
            "yield-desc" | "yield-descending" => Ok(SortOrder::YieldDesc),
            "harvest-asc" | "harvest-date-ascending" => Ok(SortOrder::HarvestAsc),
            "harvest-desc" | "harvest-date-descending" => Ok(SortOrder::HarvestDesc),
            other => Err(format!("Unknown sort order: {}", other)),
        }
    }
}

/// Query inputs of the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryParams {
    pub search_text: String,
    pub health_filter: HealthFilter,
    #[serde(with = "rust_decimal::serde::float")]
    pub yield_min: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub yield_max: Decimal,
    pub sort_order: SortOrder,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            health_filter: HealthFilter::Any,
            yield_min: Decimal::from(DEFAULT_YIELD_MIN),
            yield_max: Decimal::from(DEFAULT_YIELD_MAX),
            sort_order: SortOrder::None,
        }
    }
}

fn matches_search(variety: &Variety, needle: &str) -> bool {
    needle.is_empty()
        || variety.crop_name.to_lowercase().contains(needle)
        || variety.variety_name.to_lowercase().contains(needle)
}

/// Run the query pipeline: search, health filter, yield range, then sort
pub fn apply_query(records: &[Variety], params: &QueryParams) -> Vec<Variety> {
    let needle = params.search_text.to_lowercase();

    let mut result: Vec<Variety> = records
        .iter()
        .filter(|v| matches_search(v, &needle))
        .filter(|v| params.health_filter.matches(v.health_rating))
        .filter(|v| v.expected_yield >= params.yield_min && v.expected_yield <= params.yield_max)
        .cloned()
        .collect();

    params.sort_order.sort(&mut result);
    result
}
