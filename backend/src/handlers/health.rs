//! Health check handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub varieties: usize,
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.len() {
        Ok(count) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                varieties: count,
            }),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Root endpoint
pub async fn root() -> &'static str {
    "Crop Variety Tracker API v1.0"
}
