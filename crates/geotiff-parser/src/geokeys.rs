//! GeoTIFF tag and GeoKey handling.
//!
//! Only the keys needed to recover an EPSG code and the raster-space
//! convention are interpreted; everything else in the directory is skipped.

use projection::{Affine, CrsCode};

use crate::error::{GeoTiffError, GeoTiffResult};

/// ModelPixelScaleTag: `[ScaleX, ScaleY, ScaleZ]`.
pub const TAG_MODEL_PIXEL_SCALE: u16 = 33550;
/// ModelTiepointTag: `[I, J, K, X, Y, Z]` (possibly repeated).
pub const TAG_MODEL_TIEPOINT: u16 = 33922;
/// ModelTransformationTag: 4x4 row-major matrix.
pub const TAG_MODEL_TRANSFORMATION: u16 = 34264;
/// GeoKeyDirectoryTag.
pub const TAG_GEO_KEY_DIRECTORY: u16 = 34735;
/// GDAL_NODATA, an ASCII number.
pub const TAG_GDAL_NODATA: u16 = 42113;

pub const KEY_GT_MODEL_TYPE: u16 = 1024;
pub const KEY_GT_RASTER_TYPE: u16 = 1025;
pub const KEY_GEOGRAPHIC_TYPE: u16 = 2048;
pub const KEY_PROJECTED_CS_TYPE: u16 = 3072;

pub const MODEL_TYPE_PROJECTED: u16 = 1;
pub const MODEL_TYPE_GEOGRAPHIC: u16 = 2;
pub const RASTER_PIXEL_IS_AREA: u16 = 1;
pub const RASTER_PIXEL_IS_POINT: u16 = 2;

/// GeoTIFF marker for a user-defined (non-EPSG) system.
const USER_DEFINED: u16 = 32767;

/// The subset of GeoKeys this reader understands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeoKeys {
    pub model_type: Option<u16>,
    pub raster_type: Option<u16>,
    pub geographic_type: Option<u16>,
    pub projected_cs_type: Option<u16>,
}

impl GeoKeys {
    /// Parse a GeoKeyDirectory.
    ///
    /// Layout: a 4-word header `[version, revision, minor, count]` followed by
    /// `count` entries of `[key_id, tag_location, count, value_or_offset]`.
    /// Only inline (`tag_location == 0`) short values are read.
    pub fn parse(directory: &[u16]) -> GeoTiffResult<Self> {
        if directory.len() < 4 {
            return Err(GeoTiffError::InvalidGeoKeys(format!(
                "directory has {} words, need at least 4",
                directory.len()
            )));
        }
        let count = directory[3] as usize;
        let needed = 4 + count * 4;
        if directory.len() < needed {
            return Err(GeoTiffError::InvalidGeoKeys(format!(
                "{} keys declared but only {} words present",
                count,
                directory.len()
            )));
        }

        let mut keys = GeoKeys::default();
        for entry in directory[4..needed].chunks_exact(4) {
            let (key_id, location, value) = (entry[0], entry[1], entry[3]);
            if location != 0 {
                continue;
            }
            match key_id {
                KEY_GT_MODEL_TYPE => keys.model_type = Some(value),
                KEY_GT_RASTER_TYPE => keys.raster_type = Some(value),
                KEY_GEOGRAPHIC_TYPE => keys.geographic_type = Some(value),
                KEY_PROJECTED_CS_TYPE => keys.projected_cs_type = Some(value),
                _ => {}
            }
        }
        Ok(keys)
    }

    /// Resolve the raster's CRS. A projected code wins over a geographic one.
    pub fn crs(&self) -> GeoTiffResult<CrsCode> {
        let code = match (self.projected_cs_type, self.geographic_type) {
            (Some(p), _) if p != USER_DEFINED && p != 0 => p,
            (_, Some(g)) if g != USER_DEFINED && g != 0 => g,
            (Some(_), _) | (_, Some(_)) => {
                return Err(GeoTiffError::MissingCrs(
                    "user-defined coordinate systems are not supported".to_string(),
                ))
            }
            (None, None) => {
                return Err(GeoTiffError::MissingCrs(
                    "no ProjectedCSType or GeographicType key".to_string(),
                ))
            }
        };
        Ok(CrsCode::from_epsg(code as u32)?)
    }

    /// True when pixel values describe points rather than areas.
    pub fn is_pixel_is_point(&self) -> bool {
        self.raster_type == Some(RASTER_PIXEL_IS_POINT)
    }
}

/// Build the pixel-corner affine from whichever georeferencing tags exist.
pub fn affine_from_tags(
    model_transformation: Option<&[f64]>,
    pixel_scale: Option<&[f64]>,
    tiepoint: Option<&[f64]>,
    pixel_is_point: bool,
) -> GeoTiffResult<Affine> {
    let transform = if let Some(m) = model_transformation {
        if m.len() < 16 {
            return Err(GeoTiffError::MissingTransform(format!(
                "ModelTransformation has {} values, need 16",
                m.len()
            )));
        }
        Affine::new(m[0], m[1], m[3], m[4], m[5], m[7])
    } else {
        match (pixel_scale, tiepoint) {
            (Some(scale), Some(tie)) if scale.len() >= 2 && tie.len() >= 6 => {
                let (sx, sy) = (scale[0], scale[1]);
                let (i, j, x, y) = (tie[0], tie[1], tie[3], tie[4]);
                Affine::new(sx, 0.0, x - i * sx, 0.0, -sy, y + j * sy)
            }
            _ => {
                return Err(GeoTiffError::MissingTransform(
                    "need ModelTransformation or ModelPixelScale + ModelTiepoint".to_string(),
                ))
            }
        }
    };

    if !pixel_is_point {
        return Ok(transform);
    }

    // PixelIsPoint ties the coordinate to the pixel centre; shift to the corner.
    Ok(transform * Affine::translation(-0.5, -0.5))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory(entries: &[[u16; 4]]) -> Vec<u16> {
        let mut dir = vec![1, 1, 0, entries.len() as u16];
        for e in entries {
            dir.extend_from_slice(e);
        }
        dir
    }

    #[test]
    fn test_projected_code_wins() {
        let dir = directory(&[
            [KEY_GT_MODEL_TYPE, 0, 1, MODEL_TYPE_PROJECTED],
            [KEY_GEOGRAPHIC_TYPE, 0, 1, 4326],
            [KEY_PROJECTED_CS_TYPE, 0, 1, 32633],
        ]);
        let keys = GeoKeys::parse(&dir).unwrap();
        assert_eq!(keys.crs().unwrap().epsg(), 32633);
    }

    #[test]
    fn test_geographic_only() {
        let dir = directory(&[[KEY_GEOGRAPHIC_TYPE, 0, 1, 4326]]);
        let keys = GeoKeys::parse(&dir).unwrap();
        assert_eq!(keys.crs().unwrap(), CrsCode::WGS84);
        assert!(!keys.is_pixel_is_point());
    }

    #[test]
    fn test_user_defined_falls_back_to_geographic() {
        let dir = directory(&[
            [KEY_PROJECTED_CS_TYPE, 0, 1, USER_DEFINED],
            [KEY_GEOGRAPHIC_TYPE, 0, 1, 4326],
        ]);
        assert_eq!(GeoKeys::parse(&dir).unwrap().crs().unwrap(), CrsCode::WGS84);
    }

    #[test]
    fn test_missing_crs() {
        let dir = directory(&[[KEY_GT_RASTER_TYPE, 0, 1, RASTER_PIXEL_IS_AREA]]);
        let keys = GeoKeys::parse(&dir).unwrap();
        assert!(matches!(keys.crs(), Err(GeoTiffError::MissingCrs(_))));

        let dir = directory(&[[KEY_PROJECTED_CS_TYPE, 0, 1, USER_DEFINED]]);
        let keys = GeoKeys::parse(&dir).unwrap();
        assert!(matches!(keys.crs(), Err(GeoTiffError::MissingCrs(_))));
    }

    #[test]
    fn test_truncated_directory() {
        assert!(GeoKeys::parse(&[1, 1]).is_err());
        assert!(GeoKeys::parse(&[1, 1, 0, 2, KEY_GEOGRAPHIC_TYPE, 0, 1, 4326]).is_err());
    }

    #[test]
    fn test_offset_values_are_skipped() {
        // Location 34736 means the value lives in GeoDoubleParams.
        let dir = directory(&[
            [KEY_GEOGRAPHIC_TYPE, 34736, 1, 0],
            [KEY_PROJECTED_CS_TYPE, 0, 1, 3857],
        ]);
        let keys = GeoKeys::parse(&dir).unwrap();
        assert_eq!(keys.geographic_type, None);
        assert_eq!(keys.projected_cs_type, Some(3857));
    }

    #[test]
    fn test_affine_from_scale_and_tiepoint() {
        let t = affine_from_tags(
            None,
            Some(&[10.0, 10.0, 0.0]),
            Some(&[0.0, 0.0, 0.0, 500_000.0, 5_010_000.0, 0.0]),
            false,
        )
        .unwrap();
        assert_eq!(t, Affine::from_origin(500_000.0, 5_010_000.0, 10.0, 10.0));
    }

    #[test]
    fn test_affine_from_offset_tiepoint() {
        // Tiepoint anchored at pixel (2, 3) rather than the origin.
        let t = affine_from_tags(
            None,
            Some(&[0.5, 0.25, 0.0]),
            Some(&[2.0, 3.0, 0.0, 101.0, 49.25, 0.0]),
            false,
        )
        .unwrap();
        assert_eq!(t.apply(0.0, 0.0), (100.0, 50.0));
    }

    #[test]
    fn test_affine_from_model_transformation() {
        let m = [
            2.0, 0.5, 0.0, 100.0, //
            0.25, -2.0, 0.0, 200.0, //
            0.0, 0.0, 0.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ];
        let t = affine_from_tags(Some(&m), None, None, false).unwrap();
        assert_eq!(t, Affine::new(2.0, 0.5, 100.0, 0.25, -2.0, 200.0));
    }

    #[test]
    fn test_pixel_is_point_shifts_half_pixel() {
        let t = affine_from_tags(
            None,
            Some(&[1.0, 1.0, 0.0]),
            Some(&[0.0, 0.0, 0.0, 10.0, 20.0, 0.0]),
            true,
        )
        .unwrap();
        assert_eq!(t.apply(0.0, 0.0), (9.5, 20.5));
    }

    #[test]
    fn test_missing_transform() {
        assert!(matches!(
            affine_from_tags(None, Some(&[1.0, 1.0, 0.0]), None, false),
            Err(GeoTiffError::MissingTransform(_))
        ));
    }
}
