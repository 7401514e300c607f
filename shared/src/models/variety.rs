//! Crop variety models

use std::borrow::Cow;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationError};

use super::harvest::{compute_estimated_harvest_date, DATE_FORMAT};

/// A tracked crop variety
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variety {
    pub id: String,
    pub crop_name: String,
    pub variety_name: String,
    /// Expected yield in kg
    #[serde(with = "rust_decimal::serde::float")]
    pub expected_yield: Decimal,
    pub sowing_date: NaiveDate,
    pub expected_harvest_days: u32,
    /// Always `sowing_date + expected_harvest_days`
    pub estimated_harvest_date: NaiveDate,
    /// 1 to 5 stars
    pub health_rating: u8,
}

/// Fields supplied when creating a variety
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewVariety {
    #[validate(custom = "validate_crop_name")]
    pub crop_name: String,
    #[validate(custom = "validate_variety_name")]
    pub variety_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[validate(custom = "validate_expected_yield")]
    pub expected_yield: Decimal,
    pub sowing_date: NaiveDate,
    #[validate(range(min = 1, message = "Expected harvest days must be at least 1"))]
    pub expected_harvest_days: u32,
    #[validate(range(min = 1, max = 5, message = "Health rating must be between 1 and 5"))]
    pub health_rating: u8,
    /// Accepted from older clients and ignored; the server derives it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_harvest_date: Option<NaiveDate>,
}

/// Partial update of a variety. Absent fields are preserved.
///
/// `id` and `estimatedHarvestDate` are not patchable: unknown JSON fields are
/// dropped during deserialization and the harvest date is re-derived.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VarietyPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom = "validate_crop_name")]
    pub crop_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom = "validate_variety_name")]
    pub variety_name: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    #[validate(custom = "validate_expected_yield")]
    pub expected_yield: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sowing_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, message = "Expected harvest days must be at least 1"))]
    pub expected_harvest_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 5, message = "Health rating must be between 1 and 5"))]
    pub health_rating: Option<u8>,
}

/// Errors raised while building a variety record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("Harvest window of {days} days from {sowing_date} has no valid harvest date")]
    InvalidHarvestWindow { sowing_date: NaiveDate, days: u32 },
}

fn derive_harvest_date(sowing_date: NaiveDate, days: u32) -> Result<NaiveDate, ModelError> {
    compute_estimated_harvest_date(sowing_date, days)
        .ok_or(ModelError::InvalidHarvestWindow { sowing_date, days })
}

fn required_text(value: &str, message: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("required");
        error.message = Some(Cow::from(message));
        return Err(error);
    }
    Ok(())
}

fn validate_crop_name(value: &str) -> Result<(), ValidationError> {
    required_text(value, "Crop name is required")
}

fn validate_variety_name(value: &str) -> Result<(), ValidationError> {
    required_text(value, "Variety name is required")
}

/// Yield must be zero or more
fn validate_expected_yield(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut error = ValidationError::new("non_negative");
        error.message = Some(Cow::from("Expected yield must be a positive number"));
        return Err(error);
    }
    Ok(())
}

impl Variety {
    /// Build a record from create input, deriving the estimated harvest date
    pub fn from_new(id: impl Into<String>, input: NewVariety) -> Result<Self, ModelError> {
        let estimated_harvest_date =
            derive_harvest_date(input.sowing_date, input.expected_harvest_days)?;

        Ok(Self {
            id: id.into(),
            crop_name: input.crop_name,
            variety_name: input.variety_name,
            expected_yield: input.expected_yield,
            sowing_date: input.sowing_date,
            expected_harvest_days: input.expected_harvest_days,
            estimated_harvest_date,
            health_rating: input.health_rating,
        })
    }

    /// Shallow merge of `patch` onto this record.
    ///
    /// The id never changes. The harvest date is re-derived when the patch
    /// touches the sowing date or the harvest window, and carried over
    /// unchanged otherwise.
    pub fn merged(&self, patch: &VarietyPatch) -> Result<Self, ModelError> {
        let sowing_date = patch.sowing_date.unwrap_or(self.sowing_date);
        let expected_harvest_days = patch
            .expected_harvest_days
            .unwrap_or(self.expected_harvest_days);

        let estimated_harvest_date = if patch.touches_harvest_inputs() {
            derive_harvest_date(sowing_date, expected_harvest_days)?
        } else {
            self.estimated_harvest_date
        };

        Ok(Self {
            id: self.id.clone(),
            crop_name: patch.crop_name.clone().unwrap_or_else(|| self.crop_name.clone()),
            variety_name: patch
                .variety_name
                .clone()
                .unwrap_or_else(|| self.variety_name.clone()),
            expected_yield: patch.expected_yield.unwrap_or(self.expected_yield),
            sowing_date,
            expected_harvest_days,
            estimated_harvest_date,
            health_rating: patch.health_rating.unwrap_or(self.health_rating),
        })
    }

    /// Plain-text summary suitable for copying to the clipboard
    pub fn summary(&self) -> String {
        format!(
            "Crop: {}\nVariety: {}\nExpected Yield: {} kg\nHealth Rating: {}/5\nSowing Date: {}\nEstimated Harvest Date: {}\nDays to Harvest: {}",
            self.crop_name,
            self.variety_name,
            self.expected_yield.normalize(),
            self.health_rating,
            self.sowing_date.format(DATE_FORMAT),
            self.estimated_harvest_date.format(DATE_FORMAT),
            self.expected_harvest_days,
        )
    }
}

impl From<&Variety> for NewVariety {
    fn from(variety: &Variety) -> Self {
        Self {
            crop_name: variety.crop_name.clone(),
            variety_name: variety.variety_name.clone(),
            expected_yield: variety.expected_yield,
            sowing_date: variety.sowing_date,
            expected_harvest_days: variety.expected_harvest_days,
            health_rating: variety.health_rating,
            estimated_harvest_date: None,
        }
    }
}

impl VarietyPatch {
    /// Whether applying this patch changes an input of the derived harvest date
    pub fn touches_harvest_inputs(&self) -> bool {
        self.sowing_date.is_some() || self.expected_harvest_days.is_some()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
