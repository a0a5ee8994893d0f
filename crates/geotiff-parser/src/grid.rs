//! In-memory georeferenced raster.

use projection::{Affine, CrsCode, Extent};

use crate::error::{GeoTiffError, GeoTiffResult};

/// A single band of `f32` samples in row-major order, north row first,
/// together with its CRS and pixel-corner affine transform.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterGrid {
    pub data: Vec<f32>,
    pub width: usize,
    pub height: usize,
    pub crs: CrsCode,
    pub transform: Affine,
}

impl RasterGrid {
    /// Build a grid, checking that the buffer matches the dimensions and
    /// the transform is invertible.
    pub fn new(
        data: Vec<f32>,
        width: usize,
        height: usize,
        crs: CrsCode,
        transform: Affine,
    ) -> GeoTiffResult<Self> {
        if width == 0 || height == 0 {
            return Err(GeoTiffError::InvalidGrid(format!(
                "empty raster {}x{}",
                width, height
            )));
        }
        if data.len() != width * height {
            return Err(GeoTiffError::InvalidGrid(format!(
                "{} samples for a {}x{} raster",
                data.len(),
                width,
                height
            )));
        }
        if transform.is_degenerate() {
            return Err(GeoTiffError::DegenerateTransform(format!(
                "{:?}",
                transform
            )));
        }
        Ok(Self {
            data,
            width,
            height,
            crs,
            transform,
        })
    }

    /// Sample at `(col, row)`, `None` outside the grid.
    #[inline]
    pub fn get(&self, col: usize, row: usize) -> Option<f32> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.data.get(row * self.width + col).copied()
    }

    /// Bounding extent of the grid in its own CRS.
    pub fn extent(&self) -> Extent {
        let [ul, ur, lr, ll] = self.transform.corners(self.width, self.height);
        Extent::new(
            ul.0.min(ur.0).min(lr.0).min(ll.0),
            ul.1.min(ur.1).min(lr.1).min(ll.1),
            ul.0.max(ur.0).max(lr.0).max(ll.0),
            ul.1.max(ur.1).max(lr.1).max(ll.1),
        )
    }
}
