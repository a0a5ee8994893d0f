//! JSON bodies returned by the API.

use chrono::{DateTime, Utc};
use flood_processor::FloodOverlay;
use serde::{Deserialize, Serialize};

/// Flooded-pixel fraction below which severity is `Low`.
const LOW_FRACTION: f64 = 0.05;
/// Flooded-pixel fraction below which severity is `Moderate`.
const MODERATE_FRACTION: f64 = 0.20;

/// Coarse flood severity derived from the share of water pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Moderate,
    High,
}

impl Severity {
    pub fn from_fraction(fraction: f64) -> Self {
        if fraction < LOW_FRACTION {
            Severity::Low
        } else if fraction < MODERATE_FRACTION {
            Severity::Moderate
        } else {
            Severity::High
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloodStats {
    pub flooded_area_km2: f64,
    pub severity: Severity,
    pub water_pixels: usize,
    pub width: usize,
    pub height: usize,
    pub threshold: f32,
}

/// Successful upload response; also what `GET /api/flood-map` replays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloodMapResponse {
    pub status: String,
    pub message: String,
    pub request_id: String,
    pub image_url: String,
    /// `[[lat_max, lon_min], [lat_min, lon_max]]`
    pub bounds: [[f64; 2]; 2],
    pub stats: FloodStats,
    pub processed_at: DateTime<Utc>,
}

impl FloodMapResponse {
    pub fn from_overlay(request_id: &str, image_url: String, overlay: &FloodOverlay) -> Self {
        Self {
            status: "success".to_string(),
            message: "File processed successfully".to_string(),
            request_id: request_id.to_string(),
            image_url,
            bounds: overlay.bounds.to_leaflet(),
            stats: FloodStats {
                flooded_area_km2: overlay.area_km2,
                severity: Severity::from_fraction(overlay.water_fraction()),
                water_pixels: overlay.water_pixels,
                width: overlay.width,
                height: overlay.height,
                threshold: overlay.threshold,
            },
            processed_at: Utc::now(),
        }
    }
}

/// Error envelope: `{"status": "error", "message": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
        }
    }
}
