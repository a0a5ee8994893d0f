//! Flood API Service Library
//!
//! HTTP front end for the flood overlay pipeline: raster upload, latest map
//! lookup, static serving of the produced overlays, health and metrics.

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod response;
pub mod state;
pub mod workspace;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Extension, Router,
};
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, services::ServeDir, trace::TraceLayer,
};

use crate::state::AppState;

/// Build the application router.
pub fn build_router(state: Arc<AppState>) -> Router {
    let static_files = ServeDir::new(state.config.processed_dir());
    let body_limit = state.config.max_upload_bytes();

    Router::new()
        // Flood pipeline
        .route("/api/upload", post(handlers::upload::upload_handler))
        .route("/api/flood-map", get(handlers::flood_map::flood_map_handler))
        // Produced overlays
        .nest_service("/static", static_files)
        // Health and metrics
        .route("/health", get(handlers::health::health_handler))
        .route("/ready", get(handlers::health::ready_handler))
        .route("/metrics", get(handlers::health::metrics_handler))
        .route("/api/metrics", get(handlers::health::api_metrics_handler))
        // Middleware
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
