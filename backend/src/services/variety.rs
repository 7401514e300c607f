//! Variety management service
//!
//! Validates incoming data, generates ids and delegates storage to the
//! injected [`VarietyStore`].

use std::sync::Arc;

use shared::{NewVariety, Variety, VarietyPatch};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::store::VarietyStore;

/// Variety service for managing tracked crop varieties
#[derive(Clone)]
pub struct VarietyService {
    store: Arc<dyn VarietyStore>,
}

impl VarietyService {
    /// Create a new VarietyService instance
    pub fn new(store: Arc<dyn VarietyStore>) -> Self {
        Self { store }
    }

    /// Get all varieties in insertion order
    pub fn list_varieties(&self) -> AppResult<Vec<Variety>> {
        self.store.get_all()
    }

    /// Get a variety by ID
    pub fn get_variety(&self, id: &str) -> AppResult<Variety> {
        self.store
            .get_by_id(id)?
            .ok_or_else(|| AppError::NotFound("Variety".to_string()))
    }

    /// Create a new variety with a generated ID
    pub fn create_variety(&self, input: NewVariety) -> AppResult<Variety> {
        input.validate()?;

        if input.estimated_harvest_date.is_some() {
            tracing::debug!("ignoring client supplied estimatedHarvestDate");
        }

        let variety = Variety::from_new(Uuid::new_v4().to_string(), input)?;
        let created = self.store.create(variety)?;

        tracing::info!(id = %created.id, crop = %created.crop_name, "variety created");
        Ok(created)
    }

    /// Merge a partial update onto an existing variety
    pub fn update_variety(&self, id: &str, patch: VarietyPatch) -> AppResult<Variety> {
        patch.validate()?;

        let updated = self
            .store
            .update(id, &patch)?
            .ok_or_else(|| AppError::NotFound("Variety".to_string()))?;

        tracing::info!(id = %id, "variety updated");
        Ok(updated)
    }

    /// Delete a variety
    pub fn delete_variety(&self, id: &str) -> AppResult<()> {
        if !self.store.remove(id)? {
            return Err(AppError::NotFound("Variety".to_string()));
        }

        tracing::info!(id = %id, "variety deleted");
        Ok(())
    }
}
