//! Flood overlay pipeline.
//!
//! Turns a single-band georeferenced raster into a lat/lon aligned RGBA
//! overlay plus its bounds and an estimate of the flooded area:
//!
//! 1. [`reproject`]: lazy nearest-neighbour view of the source in the
//!    target CRS
//! 2. [`downsample`]: width-capped nearest-neighbour resampling
//! 3. [`classify`]: per-pixel `0 < v < threshold` water mask
//! 4. [`area`], [`bounds`] and the PNG overlay, all derived from the mask
//!    and the final grid
//!
//! [`process`] runs everything and publishes the PNG atomically.

pub mod area;
pub mod bounds;
pub mod classify;
pub mod config;
pub mod downsample;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod reproject;

pub use area::estimate_area_km2;
pub use bounds::GeoBounds;
pub use classify::{classify, FloodMask, ThresholdPolicy};
pub use config::{AreaPolicy, ProcessingConfig};
pub use downsample::{DownsampleConfig, DownsamplePlan};
pub use error::{ErrorKind, FloodError, FloodResult, Stage};
pub use output::publish_atomic;
pub use pipeline::{process, process_raster, FloodOverlay, RenderedOverlay};
pub use reproject::{WarpedView, OUTSIDE_SOURCE};
