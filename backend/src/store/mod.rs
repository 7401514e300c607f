//! Record store abstraction
//!
//! Services depend on [`VarietyStore`] rather than on a concrete backend, so
//! a persistent store can replace the in-memory one without touching the
//! service or HTTP layers.

mod memory;
mod seed;

pub use memory::InMemoryVarietyStore;
pub use seed::sample_varieties;

use shared::{Variety, VarietyPatch};

use crate::error::AppResult;

/// Canonical owner of the variety records
pub trait VarietyStore: Send + Sync {
    /// All varieties in insertion order
    fn get_all(&self) -> AppResult<Vec<Variety>>;

    /// Look up a single variety
    fn get_by_id(&self, id: &str) -> AppResult<Option<Variety>>;

    /// Append a variety whose id the caller already generated
    fn create(&self, variety: Variety) -> AppResult<Variety>;

    /// Merge `patch` onto the variety with `id` and store the result in place.
    /// Returns `None` when no such variety exists; never creates one.
    fn update(&self, id: &str, patch: &VarietyPatch) -> AppResult<Option<Variety>>;

    /// Remove a variety. Returns whether one was found.
    fn remove(&self, id: &str) -> AppResult<bool>;

    fn len(&self) -> AppResult<usize>;

    fn is_empty(&self) -> AppResult<bool> {
        Ok(self.len()? == 0)
    }
}
