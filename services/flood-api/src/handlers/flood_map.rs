//! `GET /api/flood-map`: the most recent overlay.

use std::sync::Arc;

use axum::{extract::Extension, Json};

use crate::error::ApiError;
use crate::response::FloodMapResponse;
use crate::state::AppState;

/// GET /api/flood-map - Latest successfully processed map
pub async fn flood_map_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<FloodMapResponse>, ApiError> {
    state
        .latest
        .read()
        .await
        .clone()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("No map data found".to_string()))
}
