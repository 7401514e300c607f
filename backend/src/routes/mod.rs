//! Route definitions for the Crop Variety Tracker

use axum::{routing::get, Router};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Variety management
        .nest("/varieties", variety_routes())
}

/// Variety management routes
fn variety_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_varieties).post(handlers::create_variety),
        )
        .route(
            "/:variety_id",
            get(handlers::get_variety)
                .patch(handlers::update_variety)
                .delete(handlers::delete_variety),
        )
}
