//! Variety management HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use shared::{NewVariety, VarietyPatch};

use crate::error::AppError;
use crate::services::VarietyService;
use crate::AppState;

/// Body returned by endpoints that only confirm an action
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// List all varieties
pub async fn list_varieties(State(state): State<AppState>) -> impl IntoResponse {
    let service = VarietyService::new(state.store.clone());

    match service.list_varieties() {
        Ok(varieties) => (StatusCode::OK, Json(varieties)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get a specific variety
pub async fn get_variety(
    State(state): State<AppState>,
    Path(variety_id): Path<String>,
) -> impl IntoResponse {
    let service = VarietyService::new(state.store.clone());

    match service.get_variety(&variety_id) {
        Ok(variety) => (StatusCode::OK, Json(variety)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Create a new variety
pub async fn create_variety(
    State(state): State<AppState>,
    WithRejection(Json(input), _): WithRejection<Json<NewVariety>, AppError>,
) -> impl IntoResponse {
    let service = VarietyService::new(state.store.clone());

    match service.create_variety(input) {
        Ok(variety) => (StatusCode::CREATED, Json(variety)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Partially update a variety
pub async fn update_variety(
    State(state): State<AppState>,
    Path(variety_id): Path<String>,
    WithRejection(Json(patch), _): WithRejection<Json<VarietyPatch>, AppError>,
) -> impl IntoResponse {
    let service = VarietyService::new(state.store.clone());

    match service.update_variety(&variety_id, patch) {
        Ok(variety) => (StatusCode::OK, Json(variety)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Delete a variety
pub async fn delete_variety(
    State(state): State<AppState>,
    Path(variety_id): Path<String>,
) -> impl IntoResponse {
    let service = VarietyService::new(state.store.clone());

    match service.delete_variety(&variety_id) {
        Ok(()) => (
            StatusCode::OK,
            Json(MessageResponse {
                message: "Variety deleted successfully".to_string(),
            }),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}
