//! Configuration for the flood pipeline.

use std::fmt;
use std::str::FromStr;

use renderer::Color;
use serde::{Deserialize, Serialize};

/// How the water pixel count of the downsampled mask is turned into area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AreaPolicy {
    /// Divide the per-pixel area by `scale²`, so each downsampled pixel
    /// accounts for the ground it actually covers.
    #[default]
    ScaleCompensated,
    /// Multiply the downsampled count by the full-resolution per-pixel area.
    /// Understates area whenever the raster was downsampled.
    DownsampledRaw,
}

impl AreaPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ScaleCompensated => "scale_compensated",
            Self::DownsampledRaw => "downsampled_raw",
        }
    }
}

impl FromStr for AreaPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "scale_compensated" | "compensated" => Ok(Self::ScaleCompensated),
            "downsampled_raw" | "raw" => Ok(Self::DownsampledRaw),
            other => Err(format!("unknown area policy '{}'", other)),
        }
    }
}

impl fmt::Display for AreaPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Output images are at most this many pixels wide.
    pub max_output_width: usize,

    /// A pixel is water iff `0 < value < water_threshold`.
    pub water_threshold: f32,

    /// Ground area of one full-resolution source pixel in m².
    pub per_pixel_area_m2: f64,

    /// Colour of water pixels in the overlay.
    pub overlay_color: Color,

    /// Area accounting after downsampling.
    pub area_policy: AreaPolicy,

    /// EPSG code of the output grid.
    pub target_epsg: u32,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            max_output_width: 800,
            water_threshold: 40.0,
            per_pixel_area_m2: 100.0,
            overlay_color: Color::FLOOD_RED,
            area_policy: AreaPolicy::ScaleCompensated,
            target_epsg: 4326,
        }
    }
}

impl ProcessingConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparseable variables keep their defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("FLOOD_MAX_OUTPUT_WIDTH") {
            if let Ok(width) = val.parse() {
                config.max_output_width = width;
            }
        }

        if let Ok(val) = std::env::var("FLOOD_WATER_THRESHOLD") {
            if let Ok(threshold) = val.parse() {
                config.water_threshold = threshold;
            }
        }

        if let Ok(val) = std::env::var("FLOOD_PIXEL_AREA_M2") {
            if let Ok(area) = val.parse() {
                config.per_pixel_area_m2 = area;
            }
        }

        if let Ok(val) = std::env::var("FLOOD_OVERLAY_COLOR") {
            if let Ok(color) = val.parse() {
                config.overlay_color = color;
            }
        }

        if let Ok(val) = std::env::var("FLOOD_AREA_POLICY") {
            if let Ok(policy) = val.parse() {
                config.area_policy = policy;
            }
        }

        config
    }

    /// Copy of this configuration with a different water threshold.
    pub fn with_threshold(&self, water_threshold: f32) -> Self {
        Self {
            water_threshold,
            ..self.clone()
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_output_width == 0 {
            return Err("max_output_width must be > 0".to_string());
        }

        if !self.water_threshold.is_finite() || self.water_threshold <= 0.0 {
            return Err(format!(
                "water_threshold must be a positive number, got {}",
                self.water_threshold
            ));
        }

        if !self.per_pixel_area_m2.is_finite() || self.per_pixel_area_m2 <= 0.0 {
            return Err(format!(
                "per_pixel_area_m2 must be a positive number, got {}",
                self.per_pixel_area_m2
            ));
        }

        if self.target_epsg == 0 {
            return Err("target_epsg must be set".to_string());
        }

        Ok(())
    }
}
