//! Crop Variety Tracker - Backend
//!
//! REST API over an in-memory store of crop varieties. Each record carries an
//! estimated harvest date derived from its sowing date and harvest window.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod services;
pub mod store;

pub use config::Config;
pub use error::{AppError, AppResult};
use store::{InMemoryVarietyStore, VarietyStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn VarietyStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn VarietyStore>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}

/// Build the application state, seeding the store when configured
pub fn build_state(config: Config) -> AppResult<AppState> {
    let store = if config.store.seed_sample_data {
        InMemoryVarietyStore::seeded()?
    } else {
        InMemoryVarietyStore::new()
    };

    tracing::info!("Variety store ready with {} records", store.len()?);

    Ok(AppState::new(Arc::new(store), config))
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .nest("/api", routes::api_routes())
        .layer(CatchPanicLayer::custom(error::handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
