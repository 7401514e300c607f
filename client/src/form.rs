//! Add/edit variety form controller

use chrono::NaiveDate;
use shared::{
    estimate_from_input, FormErrors, FormField, NewVariety, Variety, VarietyFormInput,
    VarietyPatch,
};
use thiserror::Error;

use crate::api::{ApiError, ApiResult, VarietyApi};
use crate::notification::Notification;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubmitError {
    #[error("Form has {} invalid field(s)", .0.len())]
    Invalid(FormErrors),

    #[error(transparent)]
    Api(#[from] ApiError),
}

pub struct VarietyFormController<A: VarietyApi> {
    api: A,
    mode: FormMode,
    input: VarietyFormInput,
    errors: FormErrors,
    harvest_preview: Option<NaiveDate>,
    submitting: bool,
    loading: bool,
    notifications: Vec<Notification>,
}

impl<A: VarietyApi> VarietyFormController<A> {
    /// Blank form for a new variety
    pub fn create(api: A, today: NaiveDate) -> Self {
        Self::with_mode(api, FormMode::Create, today)
    }

    /// Form for editing an existing variety; call [`Self::load`] to fill it
    pub fn edit(api: A, id: impl Into<String>, today: NaiveDate) -> Self {
        Self::with_mode(api, FormMode::Edit(id.into()), today)
    }

    fn with_mode(api: A, mode: FormMode, today: NaiveDate) -> Self {
        let mut form = Self {
            api,
            mode,
            input: VarietyFormInput::with_defaults(today),
            errors: FormErrors::new(),
            harvest_preview: None,
            submitting: false,
            loading: false,
            notifications: Vec::new(),
        };
        form.update_preview();
        form
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn input(&self) -> &VarietyFormInput {
        &self.input
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    /// Estimated harvest date for the current input, if it can be computed
    pub fn harvest_preview(&self) -> Option<NaiveDate> {
        self.harvest_preview
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Fill the form from the server in edit mode. No-op in create mode.
    pub async fn load(&mut self) -> ApiResult<()> {
        let FormMode::Edit(id) = &self.mode else {
            return Ok(());
        };

        self.loading = true;
        let result = self.api.get_variety(id).await;
        self.loading = false;

        match result {
            Ok(variety) => {
                self.input = VarietyFormInput::from(&variety);
                self.errors.clear();
                self.update_preview();
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to load variety: {}", e);
                self.notifications.push(Notification::error(
                    "Error",
                    "Failed to load variety details. Please try again.",
                ));
                Err(e)
            }
        }
    }

    /// Store raw input for `field` and clear its error
    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        self.input.set(field, value);
        self.errors.remove(&field);

        if matches!(field, FormField::SowingDate | FormField::ExpectedHarvestDays) {
            self.update_preview();
        }
    }

    fn update_preview(&mut self) {
        self.harvest_preview = estimate_from_input(
            self.input.get(FormField::SowingDate),
            self.input.get(FormField::ExpectedHarvestDays),
        );
    }

    /// Check every field. Returns whether the form is valid.
    pub fn validate(&mut self) -> bool {
        match self.input.validate() {
            Ok(()) => {
                self.errors.clear();
                true
            }
            Err(errors) => {
                self.errors = errors;
                false
            }
        }
    }

    /// Validate and save: create in create mode, full patch in edit mode
    pub async fn submit(&mut self) -> Result<Variety, SubmitError> {
        let input = match self.input.to_new_variety() {
            Ok(input) => input,
            Err(errors) => {
                self.errors = errors.clone();
                self.notifications.push(Notification::error(
                    "Validation Error",
                    "Please fix the errors in the form.",
                ));
                return Err(SubmitError::Invalid(errors));
            }
        };

        self.submitting = true;
        let result = self.save(input).await;
        self.submitting = false;

        match result {
            Ok(variety) => {
                let title = match self.mode {
                    FormMode::Create => "Variety added",
                    FormMode::Edit(_) => "Variety updated",
                };
                self.notifications.push(Notification::success(
                    title,
                    format!("{} - {} has been saved", variety.crop_name, variety.variety_name),
                ));
                Ok(variety)
            }
            Err(e) => {
                tracing::warn!("Failed to save variety: {}", e);
                self.notifications.push(Notification::error(
                    "Error",
                    "Failed to save variety. Please try again.",
                ));
                Err(e.into())
            }
        }
    }

    async fn save(&self, input: NewVariety) -> ApiResult<Variety> {
        match &self.mode {
            FormMode::Create => self.api.create_variety(&input).await,
            FormMode::Edit(id) => {
                let patch = VarietyPatch {
                    crop_name: Some(input.crop_name),
                    variety_name: Some(input.variety_name),
                    expected_yield: Some(input.expected_yield),
                    sowing_date: Some(input.sowing_date),
                    expected_harvest_days: Some(input.expected_harvest_days),
                    health_rating: Some(input.health_rating),
                };
                self.api.update_variety(id, &patch).await
            }
        }
    }

    /// Drain queued notifications
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }
}
