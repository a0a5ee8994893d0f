//! Reprojected read view over a source raster.
//!
//! The destination grid comes from [`projection::calculate_default_transform`];
//! samples are pulled on demand with nearest-neighbour lookup, so the full
//! resolution reprojected raster is never allocated unless asked for.

use geotiff_parser::RasterGrid;
use projection::{calculate_default_transform, Affine, CrsCode, CrsTransformer, ReprojectionPlan};
use tracing::debug;

use crate::error::{FloodError, FloodResult, Stage};

/// Value returned for destination pixels that fall outside the source.
pub const OUTSIDE_SOURCE: f32 = 0.0;

/// Lazy nearest-neighbour reprojection of a [`RasterGrid`].
#[derive(Debug)]
pub struct WarpedView<'a> {
    source: &'a RasterGrid,
    plan: ReprojectionPlan,
    /// Destination CRS -> source CRS.
    to_source: CrsTransformer,
    /// Source CRS -> source pixel space.
    source_inverse: Affine,
}

impl<'a> WarpedView<'a> {
    /// Plan the default destination grid in `target` and prepare the view.
    pub fn new(source: &'a RasterGrid, target: CrsCode) -> FloodResult<Self> {
        let plan = calculate_default_transform(
            source.crs,
            target,
            source.width,
            source.height,
            &source.transform,
        )
        .map_err(|e| FloodError::reprojection(Stage::Reproject, e))?;

        if plan.width == 0 || plan.height == 0 {
            return Err(FloodError::Dimension {
                stage: Stage::Reproject,
                width: plan.width,
                height: plan.height,
            });
        }

        let to_source = CrsTransformer::new(target, source.crs)
            .map_err(|e| FloodError::reprojection(Stage::Reproject, e))?;
        let source_inverse = source
            .transform
            .inverse()
            .map_err(|e| FloodError::reprojection(Stage::Reproject, e))?;

        debug!(
            src_crs = %source.crs,
            dst_crs = %target,
            src_width = source.width,
            src_height = source.height,
            dst_width = plan.width,
            dst_height = plan.height,
            "Prepared reprojected view"
        );

        Ok(Self {
            source,
            plan,
            to_source,
            source_inverse,
        })
    }

    pub fn plan(&self) -> &ReprojectionPlan {
        &self.plan
    }

    pub fn width(&self) -> usize {
        self.plan.width
    }

    pub fn height(&self) -> usize {
        self.plan.height
    }

    /// Destination pixel-corner transform.
    pub fn transform(&self) -> Affine {
        self.plan.transform
    }

    /// Nearest source sample for destination pixel `(col, row)`.
    ///
    /// Pixels whose centre maps outside the source, or fails to project,
    /// read as [`OUTSIDE_SOURCE`].
    pub fn get(&self, col: usize, row: usize) -> f32 {
        let (x, y) = self.plan.transform.apply(col as f64 + 0.5, row as f64 + 0.5);
        let Ok((sx, sy)) = self.to_source.transform(x, y) else {
            return OUTSIDE_SOURCE;
        };
        let (src_col, src_row) = self.source_inverse.apply(sx, sy);
        if src_col < 0.0 || src_row < 0.0 {
            return OUTSIDE_SOURCE;
        }
        self.source
            .get(src_col.floor() as usize, src_row.floor() as usize)
            .unwrap_or(OUTSIDE_SOURCE)
    }

    /// Materialize the full destination grid, row-major.
    pub fn to_vec(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.plan.width * self.plan.height);
        for row in 0..self.plan.height {
            for col in 0..self.plan.width {
                out.push(self.get(col, row));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geographic_grid(width: usize, height: usize) -> RasterGrid {
        let data = (0..width * height).map(|i| (i % 97) as f32 + 1.0).collect();
        RasterGrid::new(
            data,
            width,
            height,
            CrsCode::WGS84,
            Affine::from_origin(10.0, 50.0, 0.001, 0.001),
        )
        .unwrap()
    }

    #[test]
    fn test_same_crs_view_is_identity() {
        let grid = geographic_grid(40, 30);
        let view = WarpedView::new(&grid, CrsCode::WGS84).unwrap();
        assert_eq!((view.width(), view.height()), (40, 30));
        assert_eq!(view.to_vec(), grid.data);
    }

    #[test]
    fn test_outside_source_reads_sentinel() {
        // Rotated source: the axis-aligned destination grid has corners
        // that the source never covers.
        let angle = 20f64.to_radians();
        let t = Affine::new(
            0.01 * angle.cos(),
            0.01 * angle.sin(),
            10.0,
            0.01 * angle.sin(),
            -0.01 * angle.cos(),
            50.0,
        );
        let grid = RasterGrid::new(vec![5.0; 50 * 50], 50, 50, CrsCode::WGS84, t).unwrap();
        let view = WarpedView::new(&grid, CrsCode::WGS84).unwrap();

        let data = view.to_vec();
        assert!(data.iter().any(|v| *v == OUTSIDE_SOURCE));
        assert!(data.iter().any(|v| *v == 5.0));
        assert_eq!(view.get(0, 0), OUTSIDE_SOURCE);
    }

    #[test]
    fn test_utm_view_samples_source() {
        let utm = CrsCode::from_epsg(32633).unwrap();
        let t = Affine::from_origin(500_000.0, 5_010_000.0, 100.0, 100.0);
        let mut data = vec![10.0; 100 * 100];
        // Mark the north-west quadrant.
        for row in 0..50 {
            for col in 0..50 {
                data[row * 100 + col] = 99.0;
            }
        }
        let grid = RasterGrid::new(data, 100, 100, utm, t).unwrap();
        let view = WarpedView::new(&grid, CrsCode::WGS84).unwrap();

        let w = view.width();
        let h = view.height();
        assert_eq!(view.get(w / 4, h / 4), 99.0);
        assert_eq!(view.get(3 * w / 4, 3 * h / 4), 10.0);
    }
}
