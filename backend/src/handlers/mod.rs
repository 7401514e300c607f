//! HTTP handlers for the Crop Variety Tracker API

pub mod health;
pub mod variety;

pub use health::*;
pub use variety::*;
