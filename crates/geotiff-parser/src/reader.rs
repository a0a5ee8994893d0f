//! GeoTIFF decoding.
//!
//! Band 1 is read into `f32`; the CRS comes from the GeoKey directory and the
//! transform from ModelTransformation or PixelScale + Tiepoint. Samples equal
//! to the GDAL_NODATA value are rewritten to 0 so that downstream code only
//! has one "no data" sentinel to reason about.

use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::tags::Tag;
use tiff::TiffResult;
use tracing::{debug, info, warn};

use crate::error::{GeoTiffError, GeoTiffResult};
use crate::geokeys::{
    affine_from_tags, GeoKeys, TAG_GDAL_NODATA, TAG_GEO_KEY_DIRECTORY, TAG_MODEL_PIXEL_SCALE,
    TAG_MODEL_TIEPOINT, TAG_MODEL_TRANSFORMATION,
};
use crate::grid::RasterGrid;

/// Read band 1 of a GeoTIFF file.
pub fn read_raster(path: impl AsRef<Path>) -> GeoTiffResult<RasterGrid> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| GeoTiffError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let grid = decode_raster(BufReader::new(file))?;
    info!(
        path = %path.display(),
        width = grid.width,
        height = grid.height,
        crs = %grid.crs,
        "Loaded raster"
    );
    Ok(grid)
}

/// Read band 1 of an in-memory GeoTIFF.
pub fn read_raster_bytes(bytes: &[u8]) -> GeoTiffResult<RasterGrid> {
    decode_raster(Cursor::new(bytes))
}

/// Decode band 1 from any seekable reader.
pub fn decode_raster<R: Read + Seek>(reader: R) -> GeoTiffResult<RasterGrid> {
    let mut decoder = Decoder::new(reader)?.with_limits(Limits::unlimited());

    let (width, height) = decoder.dimensions()?;
    let (width, height) = (width as usize, height as usize);

    let geokey_dir = optional_tag(&mut decoder, TAG_GEO_KEY_DIRECTORY, |d, t| {
        d.get_tag_u16_vec(t)
    })?
    .ok_or_else(|| GeoTiffError::MissingCrs("no GeoKeyDirectory tag".to_string()))?;
    let keys = GeoKeys::parse(&geokey_dir)?;
    let crs = keys.crs()?;

    let model_transformation =
        optional_tag(&mut decoder, TAG_MODEL_TRANSFORMATION, |d, t| d.get_tag_f64_vec(t))?;
    let pixel_scale =
        optional_tag(&mut decoder, TAG_MODEL_PIXEL_SCALE, |d, t| d.get_tag_f64_vec(t))?;
    let tiepoint = optional_tag(&mut decoder, TAG_MODEL_TIEPOINT, |d, t| d.get_tag_f64_vec(t))?;
    let transform = affine_from_tags(
        model_transformation.as_deref(),
        pixel_scale.as_deref(),
        tiepoint.as_deref(),
        keys.is_pixel_is_point(),
    )?;

    let nodata = match optional_tag(&mut decoder, TAG_GDAL_NODATA, |d, t| {
        d.get_tag_ascii_string(t)
    })? {
        Some(text) => parse_nodata(&text),
        None => None,
    };

    let samples = decoding_result_to_f32(decoder.read_image()?);
    let mut data = first_band(samples, width, height)?;

    if let Some(nodata) = nodata {
        let replaced = replace_nodata(&mut data, nodata);
        debug!(nodata, replaced, "Replaced nodata samples with 0");
    }

    RasterGrid::new(data, width, height, crs, transform)
}

/// Fetch a tag only if it is present in the current IFD.
fn optional_tag<R, T, F>(decoder: &mut Decoder<R>, code: u16, get: F) -> GeoTiffResult<Option<T>>
where
    R: Read + Seek,
    F: FnOnce(&mut Decoder<R>, Tag) -> TiffResult<T>,
{
    let tag = Tag::from_u16_exhaustive(code);
    if decoder.find_tag(tag)?.is_none() {
        return Ok(None);
    }
    Ok(Some(get(decoder, tag)?))
}

fn parse_nodata(text: &str) -> Option<f32> {
    let trimmed = text.trim_matches(|c: char| c.is_whitespace() || c == '\0');
    match trimmed.parse::<f64>() {
        Ok(v) => Some(v as f32),
        Err(_) => {
            warn!(value = trimmed, "Ignoring unparseable GDAL_NODATA value");
            None
        }
    }
}

fn replace_nodata(data: &mut [f32], nodata: f32) -> usize {
    let mut replaced = 0;
    for v in data.iter_mut() {
        let hit = if nodata.is_nan() { v.is_nan() } else { *v == nodata };
        if hit {
            *v = 0.0;
            replaced += 1;
        }
    }
    replaced
}

fn decoding_result_to_f32(result: DecodingResult) -> Vec<f32> {
    match result {
        DecodingResult::U8(v) => v.into_iter().map(f32::from).collect(),
        DecodingResult::U16(v) => v.into_iter().map(f32::from).collect(),
        DecodingResult::U32(v) => v.into_iter().map(|x| x as f32).collect(),
        DecodingResult::U64(v) => v.into_iter().map(|x| x as f32).collect(),
        DecodingResult::I8(v) => v.into_iter().map(f32::from).collect(),
        DecodingResult::I16(v) => v.into_iter().map(f32::from).collect(),
        DecodingResult::I32(v) => v.into_iter().map(|x| x as f32).collect(),
        DecodingResult::I64(v) => v.into_iter().map(|x| x as f32).collect(),
        DecodingResult::F32(v) => v,
        DecodingResult::F64(v) => v.into_iter().map(|x| x as f32).collect(),
    }
}

/// Keep the first sample of each pixel from a chunky (interleaved) buffer.
fn first_band(samples: Vec<f32>, width: usize, height: usize) -> GeoTiffResult<Vec<f32>> {
    let pixels = width * height;
    if pixels == 0 || samples.len() < pixels || samples.len() % pixels != 0 {
        return Err(GeoTiffError::InvalidGrid(format!(
            "{} samples cannot describe a {}x{} raster",
            samples.len(),
            width,
            height
        )));
    }
    let bands = samples.len() / pixels;
    if bands == 1 {
        return Ok(samples);
    }
    warn!(bands, "Multi-sample raster, keeping band 1");
    Ok(samples.into_iter().step_by(bands).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_band_of_interleaved() {
        let rgb = vec![1.0, 10.0, 100.0, 2.0, 20.0, 200.0];
        assert_eq!(first_band(rgb, 2, 1).unwrap(), vec![1.0, 2.0]);
        assert!(first_band(vec![1.0; 5], 2, 2).is_err());
    }

    #[test]
    fn test_nodata_parsing() {
        assert_eq!(parse_nodata("-9999\0"), Some(-9999.0));
        assert_eq!(parse_nodata(" 0 "), Some(0.0));
        assert!(parse_nodata("nan").unwrap().is_nan());
        assert_eq!(parse_nodata("none"), None);
    }

    #[test]
    fn test_replace_nodata() {
        let mut data = vec![-9999.0, 5.0, -9999.0, 50.0];
        assert_eq!(replace_nodata(&mut data, -9999.0), 2);
        assert_eq!(data, vec![0.0, 5.0, 0.0, 50.0]);

        let mut data = vec![f32::NAN, 1.0];
        assert_eq!(replace_nodata(&mut data, f32::NAN), 1);
        assert_eq!(data, vec![0.0, 1.0]);
    }
}
