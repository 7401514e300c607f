//! Shared types and models for the Crop Variety Tracker
//!
//! This crate contains the domain logic shared between the backend, the
//! client controllers, and the browser (via WASM): the variety record, the
//! estimated harvest date derivation, the query pipeline and pagination.

pub mod models;
pub mod query;
pub mod types;
pub mod validation;

pub use models::*;
pub use query::*;
pub use types::*;
pub use validation::*;
