//! GeoTIFF reader for single-band rasters.
//!
//! Produces a [`RasterGrid`]: band 1 as `f32`, the EPSG code from the GeoKey
//! directory and a pixel-corner [`projection::Affine`]. Only what the flood
//! pipeline needs is interpreted; compression and tiling are handled by the
//! `tiff` crate.

pub mod error;
pub mod geokeys;
pub mod grid;
pub mod reader;
pub mod stats;

pub use error::{GeoTiffError, GeoTiffResult};
pub use geokeys::GeoKeys;
pub use grid::RasterGrid;
pub use reader::{decode_raster, read_raster, read_raster_bytes};
pub use stats::RasterStats;
