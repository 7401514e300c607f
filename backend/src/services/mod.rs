//! Business logic services for the Crop Variety Tracker

pub mod variety;

pub use variety::VarietyService;
