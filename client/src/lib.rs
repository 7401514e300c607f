//! Crop Variety Tracker - Client
//!
//! HTTP access to the variety API plus the state controllers behind the
//! dashboard and the add/edit form. Controllers own their state and are
//! driven by a UI layer; they never render anything themselves.

pub mod api;
pub mod dashboard;
pub mod form;
pub mod notification;

pub use api::{ApiError, ApiResult, HttpVarietyApi, VarietyApi};
pub use dashboard::{DashboardController, DashboardView, FetchTicket};
pub use form::{FormMode, SubmitError, VarietyFormController};
pub use notification::{Notification, NotificationKind};

#[cfg(test)]
mod testing;
