//! Integration tests decoding synthetic GeoTIFFs.

use geotiff_parser::{read_raster, read_raster_bytes, GeoTiffError, RasterStats};
use projection::{Affine, CrsCode};
use test_utils::fixtures::scene;
use test_utils::{
    assert_approx_eq, create_grid_with_nans, create_test_grid, temp_test_dir, GeoTiffFixture,
    Georef,
};

#[test]
fn test_read_utm_file() {
    let dir = temp_test_dir();
    let path = dir.path().join("utm.tif");
    let data = create_test_grid(30, 20);
    GeoTiffFixture::utm(30, 20, data.clone()).write_file(&path);

    let grid = read_raster(&path).unwrap();
    assert_eq!((grid.width, grid.height), (30, 20));
    assert_eq!(grid.crs.epsg(), scene::UTM_33N);
    assert_eq!(grid.data, data);
    assert_eq!(
        grid.transform,
        Affine::from_origin(
            scene::UTM_ORIGIN.0,
            scene::UTM_ORIGIN.1,
            scene::UTM_PIXEL_SIZE,
            scene::UTM_PIXEL_SIZE
        )
    );
}

#[test]
fn test_read_geographic_bytes() {
    let bytes = GeoTiffFixture::geographic(5, 4, vec![1.0; 20]).to_bytes();
    let grid = read_raster_bytes(&bytes).unwrap();
    assert_eq!(grid.crs, CrsCode::WGS84);
    let extent = grid.extent();
    assert_approx_eq!(extent.min_x, scene::GEO_ORIGIN.0, 1e-12);
    assert_approx_eq!(extent.max_y, scene::GEO_ORIGIN.1, 1e-12);
    assert_approx_eq!(extent.width(), 5.0 * scene::GEO_PIXEL_SIZE, 1e-12);
}

#[test]
fn test_projected_key_wins_over_geographic() {
    let bytes = GeoTiffFixture::utm(2, 2, vec![1.0; 4])
        .with_extra_geographic(scene::WGS84)
        .to_bytes();
    assert_eq!(read_raster_bytes(&bytes).unwrap().crs.epsg(), scene::UTM_33N);
}

#[test]
fn test_pixel_is_point_shifts_origin() {
    let bytes = GeoTiffFixture::utm(2, 2, vec![1.0; 4])
        .with_pixel_is_point()
        .to_bytes();
    let grid = read_raster_bytes(&bytes).unwrap();
    let half = scene::UTM_PIXEL_SIZE / 2.0;
    assert_eq!(
        grid.transform.apply(0.0, 0.0),
        (scene::UTM_ORIGIN.0 - half, scene::UTM_ORIGIN.1 + half)
    );
}

#[test]
fn test_model_transformation_with_rotation() {
    let coeffs = [8.0, 2.0, 500_000.0, 2.0, -8.0, 5_010_000.0];
    let bytes = GeoTiffFixture::utm(3, 3, vec![1.0; 9])
        .with_georef(Georef::Affine(coeffs))
        .to_bytes();
    let grid = read_raster_bytes(&bytes).unwrap();
    let [a, b, c, d, e, f] = coeffs;
    assert_eq!(grid.transform, Affine::new(a, b, c, d, e, f));
}

#[test]
fn test_nodata_becomes_zero() {
    let bytes = GeoTiffFixture::geographic(3, 1, vec![-9999.0, 15.0, -9999.0])
        .with_nodata("-9999")
        .to_bytes();
    let grid = read_raster_bytes(&bytes).unwrap();
    assert_eq!(grid.data, vec![0.0, 15.0, 0.0]);
}

#[test]
fn test_nan_nodata_becomes_zero() {
    let data = create_grid_with_nans(4, 4, 30.0, &[(0, 0), (3, 3)]);
    let bytes = GeoTiffFixture::geographic(4, 4, data)
        .with_nodata("nan")
        .to_bytes();
    let grid = read_raster_bytes(&bytes).unwrap();
    assert!(grid.data.iter().all(|v| v.is_finite()));
    assert_eq!(grid.data.iter().filter(|v| **v == 0.0).count(), 2);
}

#[test]
fn test_multi_band_keeps_first() {
    let data = vec![1.0, 2.0, 3.0, 4.0];
    let bytes = GeoTiffFixture::geographic(2, 2, data.clone())
        .with_three_bands()
        .to_bytes();
    assert_eq!(read_raster_bytes(&bytes).unwrap().data, data);
}

#[test]
fn test_missing_crs() {
    let bytes = GeoTiffFixture::utm(2, 2, vec![1.0; 4])
        .with_epsg(None)
        .to_bytes();
    assert!(matches!(
        read_raster_bytes(&bytes),
        Err(GeoTiffError::MissingCrs(_))
    ));
}

#[test]
fn test_missing_transform() {
    let bytes = GeoTiffFixture::utm(2, 2, vec![1.0; 4])
        .with_georef(Georef::None)
        .to_bytes();
    assert!(matches!(
        read_raster_bytes(&bytes),
        Err(GeoTiffError::MissingTransform(_))
    ));
}

#[test]
fn test_unknown_epsg_is_projection_error() {
    let bytes = GeoTiffFixture::utm(2, 2, vec![1.0; 4])
        .with_epsg(Some(1))
        .to_bytes();
    assert!(matches!(
        read_raster_bytes(&bytes),
        Err(GeoTiffError::Projection(_))
    ));
}

#[test]
fn test_missing_file() {
    let dir = temp_test_dir();
    let err = read_raster(dir.path().join("absent.tif")).unwrap_err();
    assert!(matches!(err, GeoTiffError::Open { .. }));
    assert!(err.to_string().contains("absent.tif"));
}

#[test]
fn test_not_a_tiff() {
    assert!(matches!(
        read_raster_bytes(b"GIF89a not a tiff"),
        Err(GeoTiffError::Decode(_))
    ));
}

#[test]
fn test_stats_of_decoded_raster() {
    let bytes = GeoTiffFixture::geographic(2, 2, vec![0.0, 10.0, 30.0, 80.0]).to_bytes();
    let grid = read_raster_bytes(&bytes).unwrap();
    let stats = RasterStats::compute(&grid.data).unwrap();
    assert_eq!(stats.min, 0.0);
    assert_eq!(stats.max, 80.0);
    assert_eq!(stats.zero_count, 1);
    assert_eq!(RasterStats::count_below(&grid.data, 40.0), 2);
}
