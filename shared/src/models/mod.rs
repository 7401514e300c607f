//! Domain models for the Crop Variety Tracker

mod harvest;
mod stats;
mod variety;

pub use harvest::*;
pub use stats::*;
pub use variety::*;
