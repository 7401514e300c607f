//! WebAssembly module for the Crop Variety Tracker
//!
//! Provides client-side computation for:
//! - Estimated harvest date previews
//! - Dashboard search, filter, sort and pagination
//! - Harvest status and dashboard statistics
//! - Form validation
//!
//! Records cross the boundary as JSON strings in the API wire format.

use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Serialize};
use shared::{
    apply_query, estimate_from_input, page_window, paginate, DashboardStats, HarvestStatus,
    QueryParams, Variety, VarietyFormInput, DATE_FORMAT,
};
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::query::*;
pub use shared::types::*;
pub use shared::validation::*;

fn from_json<T: DeserializeOwned>(json: &str, what: &str) -> Result<T, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid {} JSON: {}", what, e))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Failed to serialize result: {}", e))
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| format!("Invalid date: {}", value))
}

/// Today's date from the browser clock
fn browser_today() -> Result<NaiveDate, String> {
    let now = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(
        now.get_full_year() as i32,
        now.get_month() + 1,
        now.get_date(),
    )
    .ok_or_else(|| "Browser returned an invalid date".to_string())
}

fn resolve_today(today: Option<String>) -> Result<NaiveDate, String> {
    match today {
        Some(date) => parse_date(&date),
        None => browser_today(),
    }
}

fn js_error(message: String) -> JsValue {
    web_sys::console::warn_1(&JsValue::from_str(&message));
    JsValue::from_str(&message)
}

fn query_json(varieties_json: &str, params_json: &str) -> Result<String, String> {
    let varieties: Vec<Variety> = from_json(varieties_json, "varieties")?;
    let params: QueryParams = from_json(params_json, "query")?;
    to_json(&apply_query(&varieties, &params))
}

fn paginate_json(varieties_json: &str, page_size: u32, page: u32) -> Result<String, String> {
    let varieties: Vec<Variety> = from_json(varieties_json, "varieties")?;
    to_json(&paginate(&varieties, page_size as usize, page as usize))
}

fn stats_json(varieties_json: &str, today: NaiveDate) -> Result<String, String> {
    let varieties: Vec<Variety> = from_json(varieties_json, "varieties")?;
    to_json(&DashboardStats::compute(&varieties, today))
}

fn form_errors_json(form_json: &str) -> Result<String, String> {
    let form: VarietyFormInput = from_json(form_json, "form")?;
    match form.validate() {
        Ok(()) => Ok("{}".to_string()),
        Err(errors) => to_json(&errors),
    }
}

/// Estimated harvest date as `YYYY-MM-DD`, or an empty string when either
/// input is not usable yet
#[wasm_bindgen]
pub fn estimate_harvest_date(sowing_date: &str, expected_harvest_days: &str) -> String {
    estimate_from_input(sowing_date, expected_harvest_days)
        .map(|date| date.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

/// Run search, health filter, yield range and sort over a JSON array of
/// varieties
#[wasm_bindgen]
pub fn query_varieties(varieties_json: &str, params_json: &str) -> Result<String, JsValue> {
    query_json(varieties_json, params_json).map_err(js_error)
}

/// Slice a JSON array of varieties into one page
#[wasm_bindgen]
pub fn paginate_varieties(varieties_json: &str, page_size: u32, page: u32) -> Result<String, JsValue> {
    paginate_json(varieties_json, page_size, page).map_err(js_error)
}

/// Page links to show around `current_page`
#[wasm_bindgen]
pub fn page_numbers(current_page: u32, total_pages: u32) -> Vec<u32> {
    page_window(current_page as usize, total_pages as usize)
        .into_iter()
        .map(|page| page as u32)
        .collect()
}

/// Harvest status label ("Overdue", "Ready Soon", "Growing", "Planted").
/// `today` defaults to the browser's date.
#[wasm_bindgen]
pub fn classify_harvest_status(harvest_date: &str, today: Option<String>) -> Result<String, JsValue> {
    let harvest_date = parse_date(harvest_date).map_err(js_error)?;
    let today = resolve_today(today).map_err(js_error)?;
    Ok(HarvestStatus::classify(harvest_date, today).to_string())
}

/// Signed days from today until the harvest date
#[wasm_bindgen]
pub fn days_until_harvest(harvest_date: &str, today: Option<String>) -> Result<i32, JsValue> {
    let harvest_date = parse_date(harvest_date).map_err(js_error)?;
    let today = resolve_today(today).map_err(js_error)?;
    Ok(shared::days_until_harvest(harvest_date, today) as i32)
}

/// Total, ready, growing and overdue counts for a JSON array of varieties
#[wasm_bindgen]
pub fn dashboard_stats(varieties_json: &str, today: Option<String>) -> Result<String, JsValue> {
    let today = resolve_today(today).map_err(js_error)?;
    stats_json(varieties_json, today).map_err(js_error)
}

/// Clipboard text for one variety
#[wasm_bindgen]
pub fn variety_summary(variety_json: &str) -> Result<String, JsValue> {
    let variety: Variety = from_json(variety_json, "variety").map_err(js_error)?;
    Ok(variety.summary())
}

/// Validate raw form input; returns a JSON object of field -> message,
/// empty when the form is valid
#[wasm_bindgen]
pub fn validate_variety_form(form_json: &str) -> Result<String, JsValue> {
    form_errors_json(form_json).map_err(js_error)
}
