//! Output-grid planning for reprojection.
//!
//! Mirrors GDAL's "suggested warp output": the source pixel grid's outline is
//! densified and pushed through the CRS transform, the resulting extent is
//! covered with square pixels whose size keeps the number of pixels along the
//! diagonal equal to the source's.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::affine::Affine;
use crate::crs::{CrsCode, CrsTransformer};
use crate::error::{ProjectionError, ProjectionResult};

/// Points sampled along each edge of the source grid.
pub const DENSIFY_POINTS: usize = 21;

/// Slack applied before rounding dimensions up, so that float noise on an
/// exact multiple does not add a spurious row or column.
const SNAP_TOLERANCE: f64 = 1e-9;

/// An axis-aligned rectangle in some CRS.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Extent {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Smallest extent holding all points. `None` for an empty iterator.
    pub fn from_points<I: IntoIterator<Item = (f64, f64)>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let (x0, y0) = iter.next()?;
        let mut extent = Self::new(x0, y0, x0, y0);
        for (x, y) in iter {
            extent.min_x = extent.min_x.min(x);
            extent.min_y = extent.min_y.min(y);
            extent.max_x = extent.max_x.max(x);
            extent.max_y = extent.max_y.max(y);
        }
        Some(extent)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// True when both sides are finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        let w = self.width();
        let h = self.height();
        w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0
    }
}

/// Target grid for reprojecting a raster into another CRS.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReprojectionPlan {
    pub src_crs: CrsCode,
    pub dst_crs: CrsCode,
    pub width: usize,
    pub height: usize,
    pub transform: Affine,
}

impl ReprojectionPlan {
    /// Extent of the planned grid in the destination CRS.
    pub fn extent(&self) -> Option<Extent> {
        Extent::from_points(self.transform.corners(self.width, self.height))
    }
}

/// Sample the outline of a `width x height` pixel grid, `points_per_edge`
/// points per edge, returned in pixel coordinates.
pub fn grid_outline(width: usize, height: usize, points_per_edge: usize) -> Vec<(f64, f64)> {
    let n = points_per_edge.max(2);
    let w = width as f64;
    let h = height as f64;
    let mut points = Vec::with_capacity(n * 4);
    for i in 0..n {
        let t = i as f64 / (n - 1) as f64;
        points.push((t * w, 0.0));
        points.push((t * w, h));
        points.push((0.0, t * h));
        points.push((w, t * h));
    }
    points
}

/// Extent of a source grid in the transformer's target CRS.
///
/// Points that fail to project (e.g. outside a projection's domain) are
/// skipped; if every point fails the first error is returned.
pub fn transform_grid_extent(
    transformer: &CrsTransformer,
    transform: &Affine,
    width: usize,
    height: usize,
    points_per_edge: usize,
) -> ProjectionResult<Extent> {
    let mut projected = Vec::with_capacity(points_per_edge * 4);
    let mut first_error = None;

    for (col, row) in grid_outline(width, height, points_per_edge) {
        let (x, y) = transform.apply(col, row);
        match transformer.transform(x, y) {
            Ok(p) => projected.push(p),
            Err(e) => {
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    match Extent::from_points(projected) {
        Some(extent) => Ok(extent),
        None => Err(first_error.unwrap_or_else(|| {
            ProjectionError::DegenerateExtent("no outline points".to_string())
        })),
    }
}

/// Compute the default destination grid for reprojecting a source grid.
///
/// Fails when the source transform is degenerate, the grid is empty, or the
/// projected extent collapses.
pub fn calculate_default_transform(
    src_crs: CrsCode,
    dst_crs: CrsCode,
    width: usize,
    height: usize,
    src_transform: &Affine,
) -> ProjectionResult<ReprojectionPlan> {
    if width == 0 || height == 0 {
        return Err(ProjectionError::DegenerateExtent(format!(
            "source grid is {}x{}",
            width, height
        )));
    }
    if src_transform.is_degenerate() {
        return Err(ProjectionError::DegenerateTransform(format!(
            "{:?}",
            src_transform
        )));
    }

    let transformer = CrsTransformer::new(src_crs, dst_crs)?;
    let extent =
        transform_grid_extent(&transformer, src_transform, width, height, DENSIFY_POINTS)?;
    if !extent.is_valid() {
        return Err(ProjectionError::DegenerateExtent(format!("{:?}", extent)));
    }

    let dst_diagonal = extent.width().hypot(extent.height());
    let src_diagonal = (width as f64).hypot(height as f64);
    let resolution = dst_diagonal / src_diagonal;

    let dst_width = snap_up(extent.width() / resolution);
    let dst_height = snap_up(extent.height() / resolution);

    let transform = Affine::from_origin(extent.min_x, extent.max_y, resolution, resolution);

    debug!(
        src_crs = %src_crs,
        dst_crs = %dst_crs,
        src_width = width,
        src_height = height,
        dst_width,
        dst_height,
        resolution,
        "Computed default reprojection grid"
    );

    Ok(ReprojectionPlan {
        src_crs,
        dst_crs,
        width: dst_width,
        height: dst_height,
        transform,
    })
}

fn snap_up(pixels: f64) -> usize {
    ((pixels - SNAP_TOLERANCE).ceil() as usize).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_plan_preserves_grid() {
        let src = Affine::from_origin(10.0, 50.0, 0.001, 0.001);
        let plan =
            calculate_default_transform(CrsCode::WGS84, CrsCode::WGS84, 400, 300, &src).unwrap();

        assert_eq!(plan.width, 400);
        assert_eq!(plan.height, 300);
        assert!((plan.transform.c - 10.0).abs() < 1e-9);
        assert!((plan.transform.f - 50.0).abs() < 1e-9);
        assert!((plan.transform.a - 0.001).abs() < 1e-12);
        assert!((plan.transform.e + 0.001).abs() < 1e-12);
    }

    #[test]
    fn test_bottom_up_source_is_flipped_to_north_up() {
        // Positive y resolution: row 0 is the southern edge.
        let src = Affine::new(0.01, 0.0, 20.0, 0.0, 0.01, -5.0);
        let plan =
            calculate_default_transform(CrsCode::WGS84, CrsCode::WGS84, 100, 100, &src).unwrap();
        assert!(plan.transform.e < 0.0);
        assert!((plan.transform.f - (-4.0)).abs() < 1e-9);
        assert_eq!(plan.width, 100);
        assert_eq!(plan.height, 100);
    }

    #[test]
    fn test_utm_plan_covers_projected_extent() {
        let utm = CrsCode::from_epsg(32633).unwrap();
        let src = Affine::from_origin(495_000.0, 5_010_000.0, 10.0, 10.0);
        let plan = calculate_default_transform(utm, CrsCode::WGS84, 1000, 1000, &src).unwrap();

        // 10 km at ~45°N is ~0.127° of longitude and ~0.09° of latitude.
        let extent = plan.extent().unwrap();
        assert!((extent.width() - 0.127).abs() < 0.01, "{:?}", extent);
        assert!((extent.height() - 0.09).abs() < 0.01, "{:?}", extent);
        assert!(plan.width > plan.height);
        assert!(extent.min_x > 14.9 && extent.max_x < 15.1);
        assert!(extent.min_y > 45.0 && extent.max_y < 45.4);

        // Covering grid: planned extent contains the projected source outline.
        let t = CrsTransformer::new(utm, CrsCode::WGS84).unwrap();
        let source_extent = transform_grid_extent(&t, &src, 1000, 1000, DENSIFY_POINTS).unwrap();
        assert!(extent.max_x >= source_extent.max_x - 1e-9);
        assert!(extent.min_y <= source_extent.min_y + 1e-9);
    }

    #[test]
    fn test_degenerate_source_rejected() {
        let src = Affine::new(0.0, 0.0, 0.0, 0.0, -1.0, 0.0);
        let result = calculate_default_transform(CrsCode::WGS84, CrsCode::WGS84, 10, 10, &src);
        assert!(matches!(result, Err(ProjectionError::DegenerateTransform(_))));
    }

    #[test]
    fn test_empty_grid_rejected() {
        let src = Affine::from_origin(0.0, 0.0, 1.0, 1.0);
        let result = calculate_default_transform(CrsCode::WGS84, CrsCode::WGS84, 0, 10, &src);
        assert!(matches!(result, Err(ProjectionError::DegenerateExtent(_))));
    }

    #[test]
    fn test_grid_outline_hits_corners() {
        let outline = grid_outline(10, 20, 5);
        assert_eq!(outline.len(), 20);
        assert!(outline.contains(&(0.0, 0.0)));
        assert!(outline.contains(&(10.0, 20.0)));
    }
}
