//! Coordinate reference system transformations.
//!
//! Provides the affine pixel/world algebra, EPSG-based point transforms and
//! the default destination grid used when reprojecting a raster.

pub mod affine;
pub mod crs;
pub mod error;
pub mod warp;

pub use affine::Affine;
pub use crs::{CrsCode, CrsTransformer};
pub use error::{ProjectionError, ProjectionResult};
pub use warp::{calculate_default_transform, transform_grid_extent, Extent, ReprojectionPlan};
