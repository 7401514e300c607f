//! Validation utilities for variety input
//!
//! Form validation works on the raw text a user typed, before anything is
//! parsed into a [`NewVariety`]. The server runs the derived `Validate` rules
//! of the model types, which enforce the same constraints.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::ValidationErrors;

use crate::models::{NewVariety, Variety, DATE_FORMAT};

/// Editable fields of the variety form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    CropName,
    VarietyName,
    ExpectedYield,
    SowingDate,
    ExpectedHarvestDays,
    HealthRating,
}

impl FormField {
    pub const ALL: [FormField; 6] = [
        FormField::CropName,
        FormField::VarietyName,
        FormField::ExpectedYield,
        FormField::SowingDate,
        FormField::ExpectedHarvestDays,
        FormField::HealthRating,
    ];

    /// JSON / form input name
    pub fn name(&self) -> &'static str {
        match self {
            FormField::CropName => "cropName",
            FormField::VarietyName => "varietyName",
            FormField::ExpectedYield => "expectedYield",
            FormField::SowingDate => "sowingDate",
            FormField::ExpectedHarvestDays => "expectedHarvestDays",
            FormField::HealthRating => "healthRating",
        }
    }
}

impl FromStr for FormField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormField::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| format!("Unknown form field: {}", s))
    }
}

/// Per-field error messages
pub type FormErrors = BTreeMap<FormField, String>;

/// Raw text of the variety form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VarietyFormInput {
    pub crop_name: String,
    pub variety_name: String,
    pub expected_yield: String,
    pub sowing_date: String,
    pub expected_harvest_days: String,
    pub health_rating: String,
}

impl VarietyFormInput {
    /// Blank form: yield 0, sown today, 60 days to harvest, 3 stars
    pub fn with_defaults(today: NaiveDate) -> Self {
        Self {
            crop_name: String::new(),
            variety_name: String::new(),
            expected_yield: "0".to_string(),
            sowing_date: today.format(DATE_FORMAT).to_string(),
            expected_harvest_days: "60".to_string(),
            health_rating: "3".to_string(),
        }
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::CropName => &self.crop_name,
            FormField::VarietyName => &self.variety_name,
            FormField::ExpectedYield => &self.expected_yield,
            FormField::SowingDate => &self.sowing_date,
            FormField::ExpectedHarvestDays => &self.expected_harvest_days,
            FormField::HealthRating => &self.health_rating,
        }
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::CropName => self.crop_name = value,
            FormField::VarietyName => self.variety_name = value,
            FormField::ExpectedYield => self.expected_yield = value,
            FormField::SowingDate => self.sowing_date = value,
            FormField::ExpectedHarvestDays => self.expected_harvest_days = value,
            FormField::HealthRating => self.health_rating = value,
        }
    }

    /// Check every field, returning all errors at once
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();

        if self.crop_name.trim().is_empty() {
            errors.insert(FormField::CropName, "Crop name is required".to_string());
        }

        if self.variety_name.trim().is_empty() {
            errors.insert(FormField::VarietyName, "Variety name is required".to_string());
        }

        match Decimal::from_str(self.expected_yield.trim()) {
            Ok(value) if !value.is_sign_negative() || value.is_zero() => {}
            _ => {
                errors.insert(
                    FormField::ExpectedYield,
                    "Expected yield must be a positive number".to_string(),
                );
            }
        }

        if self.sowing_date.trim().is_empty() {
            errors.insert(FormField::SowingDate, "Sowing date is required".to_string());
        } else if NaiveDate::parse_from_str(self.sowing_date.trim(), DATE_FORMAT).is_err() {
            errors.insert(FormField::SowingDate, "Sowing date must be a valid date".to_string());
        }

        match self.expected_harvest_days.trim().parse::<u32>() {
            Ok(days) if days >= 1 => {}
            _ => {
                errors.insert(
                    FormField::ExpectedHarvestDays,
                    "Expected harvest days must be at least 1".to_string(),
                );
            }
        }

        match self.health_rating.trim().parse::<u8>() {
            Ok(rating) if (1..=5).contains(&rating) => {}
            _ => {
                errors.insert(
                    FormField::HealthRating,
                    "Health rating must be between 1 and 5".to_string(),
                );
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate and convert into create input
    pub fn to_new_variety(&self) -> Result<NewVariety, FormErrors> {
        self.validate()?;

        // validate() has already checked every parse below
        let parse_error = || {
            let mut errors = FormErrors::new();
            errors.insert(FormField::ExpectedYield, "Invalid form input".to_string());
            errors
        };

        Ok(NewVariety {
            crop_name: self.crop_name.trim().to_string(),
            variety_name: self.variety_name.trim().to_string(),
            expected_yield: Decimal::from_str(self.expected_yield.trim()).map_err(|_| parse_error())?,
            sowing_date: NaiveDate::parse_from_str(self.sowing_date.trim(), DATE_FORMAT)
                .map_err(|_| parse_error())?,
            expected_harvest_days: self
                .expected_harvest_days
                .trim()
                .parse()
                .map_err(|_| parse_error())?,
            health_rating: self.health_rating.trim().parse().map_err(|_| parse_error())?,
            estimated_harvest_date: None,
        })
    }
}

impl From<&Variety> for VarietyFormInput {
    fn from(variety: &Variety) -> Self {
        Self {
            crop_name: variety.crop_name.clone(),
            variety_name: variety.variety_name.clone(),
            expected_yield: variety.expected_yield.normalize().to_string(),
            sowing_date: variety.sowing_date.format(DATE_FORMAT).to_string(),
            expected_harvest_days: variety.expected_harvest_days.to_string(),
            health_rating: variety.health_rating.to_string(),
        }
    }
}

/// Flatten `validator` errors into one message, ordered by field name
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by_key(|(field, _)| *field);

    fields
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| match &error.message {
                Some(message) => message.to_string(),
                None => format!("{} is invalid", field),
            })
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn filled_form() -> VarietyFormInput {
        VarietyFormInput {
            crop_name: "Carrot".to_string(),
            variety_name: "Nantes".to_string(),
            expected_yield: "15.0".to_string(),
            sowing_date: "2025-04-15".to_string(),
            expected_harvest_days: "70".to_string(),
            health_rating: "4".to_string(),
        }
    }

    #[test]
    fn test_valid_form_converts() {
        let input = filled_form().to_new_variety().unwrap();
        assert_eq!(input.crop_name, "Carrot");
        assert_eq!(input.expected_yield, Decimal::from(15));
        assert_eq!(input.expected_harvest_days, 70);
        assert_eq!(input.health_rating, 4);
    }

    #[test]
    fn test_defaults() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let form = VarietyFormInput::with_defaults(today);
        assert_eq!(form.sowing_date, "2025-06-01");
        assert_eq!(form.expected_harvest_days, "60");
        assert_eq!(form.health_rating, "3");
        assert_eq!(form.expected_yield, "0");
    }

    #[test]
    fn test_blank_form_reports_required_fields() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let errors = VarietyFormInput::with_defaults(today).validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[&FormField::CropName], "Crop name is required");
        assert_eq!(errors[&FormField::VarietyName], "Variety name is required");
    }

    #[test]
    fn test_numeric_field_errors() {
        let mut form = filled_form();
        form.expected_yield = "-2".to_string();
        form.expected_harvest_days = "0".to_string();
        form.health_rating = "9".to_string();
        form.sowing_date = String::new();

        let errors = form.validate().unwrap_err();
        assert!(errors.contains_key(&FormField::ExpectedYield));
        assert!(errors.contains_key(&FormField::ExpectedHarvestDays));
        assert!(errors.contains_key(&FormField::HealthRating));
        assert_eq!(errors[&FormField::SowingDate], "Sowing date is required");
    }

    #[test]
    fn test_whitespace_names_are_missing() {
        let mut form = filled_form();
        form.crop_name = "   ".to_string();
        assert!(form.validate().unwrap_err().contains_key(&FormField::CropName));
    }

    #[test]
    fn test_form_field_names_round_trip() {
        for field in FormField::ALL {
            assert_eq!(field.name().parse::<FormField>().unwrap(), field);
        }
        assert!("colour".parse::<FormField>().is_err());
    }

    #[test]
    fn test_validation_message_lists_model_errors() {
        let mut input = filled_form().to_new_variety().unwrap();
        input.variety_name = String::new();
        input.expected_harvest_days = 0;

        let errors = input.validate().unwrap_err();
        assert_eq!(
            validation_message(&errors),
            "Expected harvest days must be at least 1; Variety name is required"
        );
    }

    #[test]
    fn test_form_loads_from_record() {
        let record = Variety::from_new("7", filled_form().to_new_variety().unwrap()).unwrap();
        let form = VarietyFormInput::from(&record);
        assert_eq!(form.expected_yield, "15");
        assert_eq!(form.sowing_date, "2025-04-15");
        assert_eq!(form.to_new_variety().unwrap(), NewVariety::from(&record));
    }
}
