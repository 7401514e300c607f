//! In-memory variety store
//!
//! A `Vec` behind a read/write lock. Lookups are linear scans; nothing
//! survives a restart.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use shared::{Variety, VarietyPatch};

use super::{seed::sample_varieties, VarietyStore};
use crate::error::{AppError, AppResult};

#[derive(Debug, Default)]
pub struct InMemoryVarietyStore {
    varieties: RwLock<Vec<Variety>>,
}

impl InMemoryVarietyStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `varieties` in the given order
    pub fn with_varieties(varieties: Vec<Variety>) -> Self {
        Self {
            varieties: RwLock::new(varieties),
        }
    }

    /// Create a store holding the example varieties
    pub fn seeded() -> AppResult<Self> {
        Ok(Self::with_varieties(sample_varieties()?))
    }

    fn read(&self) -> AppResult<RwLockReadGuard<'_, Vec<Variety>>> {
        self.varieties
            .read()
            .map_err(|_| AppError::StorageError("variety store lock poisoned".to_string()))
    }

    fn write(&self) -> AppResult<RwLockWriteGuard<'_, Vec<Variety>>> {
        self.varieties
            .write()
            .map_err(|_| AppError::StorageError("variety store lock poisoned".to_string()))
    }
}

impl VarietyStore for InMemoryVarietyStore {
    fn get_all(&self) -> AppResult<Vec<Variety>> {
        Ok(self.read()?.clone())
    }

    fn get_by_id(&self, id: &str) -> AppResult<Option<Variety>> {
        Ok(self.read()?.iter().find(|v| v.id == id).cloned())
    }

    fn create(&self, variety: Variety) -> AppResult<Variety> {
        let mut varieties = self.write()?;

        if varieties.iter().any(|v| v.id == variety.id) {
            return Err(AppError::DuplicateEntry(variety.id));
        }

        varieties.push(variety.clone());
        tracing::debug!(id = %variety.id, total = varieties.len(), "variety stored");
        Ok(variety)
    }

    fn update(&self, id: &str, patch: &VarietyPatch) -> AppResult<Option<Variety>> {
        let mut varieties = self.write()?;

        let Some(existing) = varieties.iter_mut().find(|v| v.id == id) else {
            return Ok(None);
        };

        let merged = existing.merged(patch)?;
        *existing = merged.clone();
        tracing::debug!(id = %id, "variety updated");
        Ok(Some(merged))
    }

    fn remove(&self, id: &str) -> AppResult<bool> {
        let mut varieties = self.write()?;

        match varieties.iter().position(|v| v.id == id) {
            Some(index) => {
                varieties.remove(index);
                tracing::debug!(id = %id, total = varieties.len(), "variety removed");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn len(&self) -> AppResult<usize> {
        Ok(self.read()?.len())
    }
}
