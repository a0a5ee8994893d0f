//! Pipeline entry points.
//!
//! `Loaded -> Reprojected -> Downsampled -> Classified`, then area, overlay
//! and bounds are derived independently from the mask and the final grid.

use std::path::Path;
use std::time::Instant;

use geotiff_parser::{read_raster, RasterGrid};
use projection::CrsCode;
use renderer::render_overlay_png;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::area::estimate_area_km2;
use crate::bounds::GeoBounds;
use crate::classify::{classify, ThresholdPolicy};
use crate::config::{AreaPolicy, ProcessingConfig};
use crate::downsample::DownsampleConfig;
use crate::error::{FloodError, FloodResult, Stage};
use crate::output::publish_atomic;
use crate::reproject::WarpedView;

/// Metadata describing a produced overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloodOverlay {
    pub bounds: GeoBounds,
    pub area_km2: f64,
    /// Output image width in pixels.
    pub width: usize,
    /// Output image height in pixels.
    pub height: usize,
    pub water_pixels: usize,
    /// Downsample factor applied after reprojection.
    pub scale: f64,
    pub threshold: f32,
}

impl FloodOverlay {
    /// Fraction of output pixels classified as water.
    pub fn water_fraction(&self) -> f64 {
        let total = self.width * self.height;
        if total == 0 {
            return 0.0;
        }
        self.water_pixels as f64 / total as f64
    }
}

/// An overlay together with its encoded PNG.
#[derive(Debug, Clone)]
pub struct RenderedOverlay {
    pub overlay: FloodOverlay,
    pub png: Vec<u8>,
}

/// Run the in-memory pipeline on an already loaded raster.
pub fn process_raster(grid: &RasterGrid, config: &ProcessingConfig) -> FloodResult<RenderedOverlay> {
    let target = CrsCode::from_epsg(config.target_epsg)
        .map_err(|e| FloodError::reprojection(Stage::Reproject, e))?;

    let view = WarpedView::new(grid, target)?;
    let plan = DownsampleConfig::new(config.max_output_width).plan(
        view.width(),
        view.height(),
        &view.transform(),
    )?;
    let values = plan.resample_view(&view);

    let mask = classify(
        &values,
        plan.width,
        plan.height,
        ThresholdPolicy::new(config.water_threshold),
    );
    let water_pixels = mask.water_count();
    debug!(
        water_pixels,
        total = mask.data.len(),
        threshold = config.water_threshold,
        "Classified mask"
    );

    if config.area_policy == AreaPolicy::DownsampledRaw && plan.scale < 1.0 {
        warn!(
            scale = plan.scale,
            "Downsampled-raw area policy understates area of downsampled rasters"
        );
    }
    let area_km2 = estimate_area_km2(
        water_pixels,
        config.per_pixel_area_m2,
        plan.scale,
        config.area_policy,
    );

    let png = render_overlay_png(&mask.data, plan.width, plan.height, config.overlay_color)
        .map_err(FloodError::render)?;

    let bounds = GeoBounds::from_transform(&plan.transform, plan.width, plan.height);

    Ok(RenderedOverlay {
        overlay: FloodOverlay {
            bounds,
            area_km2,
            width: plan.width,
            height: plan.height,
            water_pixels,
            scale: plan.scale,
            threshold: config.water_threshold,
        },
        png,
    })
}

/// Read `input`, run the pipeline and publish the PNG overlay at `output`.
pub fn process(input: &Path, output: &Path, config: &ProcessingConfig) -> FloodResult<FloodOverlay> {
    let start = Instant::now();

    let grid = read_raster(input).map_err(|e| FloodError::read(input, e))?;
    let rendered = process_raster(&grid, config)?;
    publish_atomic(output, &rendered.png).map_err(|e| FloodError::publish(output, e))?;

    let overlay = rendered.overlay;
    info!(
        input = %input.display(),
        output = %output.display(),
        width = overlay.width,
        height = overlay.height,
        area_km2 = overlay.area_km2,
        north = overlay.bounds.north,
        south = overlay.bounds.south,
        east = overlay.bounds.east,
        west = overlay.bounds.west,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Flood overlay produced"
    );

    Ok(overlay)
}
