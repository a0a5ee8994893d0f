//! Synthetic GeoTIFF writer for tests.
//!
//! Produces small uncompressed float rasters with just enough GeoTIFF tags
//! (pixel scale, tiepoint or model transformation, GeoKey directory and an
//! optional GDAL_NODATA) to exercise the reader.

use std::io::{Cursor, Seek, Write};
use std::path::Path;

use tiff::encoder::colortype::{Gray32Float, RGB32Float};
use tiff::encoder::{DirectoryEncoder, TiffEncoder, TiffKind};
use tiff::tags::Tag;

use crate::fixtures::scene;

const TAG_MODEL_PIXEL_SCALE: u16 = 33550;
const TAG_MODEL_TIEPOINT: u16 = 33922;
const TAG_MODEL_TRANSFORMATION: u16 = 34264;
const TAG_GEO_KEY_DIRECTORY: u16 = 34735;
const TAG_GDAL_NODATA: u16 = 42113;

const KEY_GT_MODEL_TYPE: u16 = 1024;
const KEY_GT_RASTER_TYPE: u16 = 1025;
const KEY_GEOGRAPHIC_TYPE: u16 = 2048;
const KEY_PROJECTED_CS_TYPE: u16 = 3072;

/// How the fixture is georeferenced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Georef {
    /// PixelScale + Tiepoint with `(west, north)` origin and square pixels.
    Origin { west: f64, north: f64, pixel_size: f64 },
    /// A full ModelTransformation `[a, b, c, d, e, f]`.
    Affine([f64; 6]),
    /// No georeferencing tags at all.
    None,
}

/// Builder for a synthetic GeoTIFF.
#[derive(Debug, Clone)]
pub struct GeoTiffFixture {
    pub width: usize,
    pub height: usize,
    pub data: Vec<f32>,
    /// EPSG code; `None` writes no CRS key.
    pub epsg: Option<u16>,
    /// Also write a geographic key alongside a projected one.
    pub extra_geographic: Option<u16>,
    pub georef: Georef,
    pub nodata: Option<String>,
    pub pixel_is_point: bool,
    /// Write three interleaved samples per pixel; band 1 is `data`.
    pub three_bands: bool,
}

impl GeoTiffFixture {
    /// A UTM 33N scene with 10 m pixels anchored at the standard origin.
    pub fn utm(width: usize, height: usize, data: Vec<f32>) -> Self {
        Self {
            width,
            height,
            data,
            epsg: Some(scene::UTM_33N),
            extra_geographic: None,
            georef: Georef::Origin {
                west: scene::UTM_ORIGIN.0,
                north: scene::UTM_ORIGIN.1,
                pixel_size: scene::UTM_PIXEL_SIZE,
            },
            nodata: None,
            pixel_is_point: false,
            three_bands: false,
        }
    }

    /// A WGS84 scene with 0.001° pixels.
    pub fn geographic(width: usize, height: usize, data: Vec<f32>) -> Self {
        Self {
            epsg: Some(scene::WGS84),
            georef: Georef::Origin {
                west: scene::GEO_ORIGIN.0,
                north: scene::GEO_ORIGIN.1,
                pixel_size: scene::GEO_PIXEL_SIZE,
            },
            ..Self::utm(width, height, data)
        }
    }

    pub fn with_epsg(mut self, epsg: Option<u16>) -> Self {
        self.epsg = epsg;
        self
    }

    pub fn with_extra_geographic(mut self, epsg: u16) -> Self {
        self.extra_geographic = Some(epsg);
        self
    }

    pub fn with_georef(mut self, georef: Georef) -> Self {
        self.georef = georef;
        self
    }

    pub fn with_nodata(mut self, nodata: &str) -> Self {
        self.nodata = Some(nodata.to_string());
        self
    }

    pub fn with_pixel_is_point(mut self) -> Self {
        self.pixel_is_point = true;
        self
    }

    pub fn with_three_bands(mut self) -> Self {
        self.three_bands = true;
        self
    }

    /// Encode to an in-memory TIFF.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        self.write_to(&mut cursor);
        cursor.into_inner()
    }

    /// Encode to a file.
    pub fn write_file(&self, path: impl AsRef<Path>) {
        std::fs::write(path, self.to_bytes()).expect("Failed to write GeoTIFF fixture");
    }

    fn write_to<W: Write + Seek>(&self, writer: W) {
        assert_eq!(self.data.len(), self.width * self.height, "fixture size");
        let (w, h) = (self.width as u32, self.height as u32);
        let mut encoder = TiffEncoder::new(writer).expect("Failed to create TIFF encoder");

        if self.three_bands {
            let interleaved: Vec<f32> = self
                .data
                .iter()
                .flat_map(|&v| [v, v + 1000.0, v + 2000.0])
                .collect();
            let mut image = encoder
                .new_image::<RGB32Float>(w, h)
                .expect("Failed to create image");
            self.write_geotiff_tags(image.encoder());
            image.write_data(&interleaved).expect("Failed to write data");
        } else {
            let mut image = encoder
                .new_image::<Gray32Float>(w, h)
                .expect("Failed to create image");
            self.write_geotiff_tags(image.encoder());
            image.write_data(&self.data).expect("Failed to write data");
        }
    }

    fn write_geotiff_tags<W: Write + Seek, K: TiffKind>(&self, dir: &mut DirectoryEncoder<W, K>) {
        match self.georef {
            Georef::Origin {
                west,
                north,
                pixel_size,
            } => {
                let scale = [pixel_size, pixel_size, 0.0];
                let tiepoint = [0.0, 0.0, 0.0, west, north, 0.0];
                dir.write_tag(Tag::from_u16_exhaustive(TAG_MODEL_PIXEL_SCALE), &scale[..])
                    .expect("pixel scale");
                dir.write_tag(Tag::from_u16_exhaustive(TAG_MODEL_TIEPOINT), &tiepoint[..])
                    .expect("tiepoint");
            }
            Georef::Affine([a, b, c, d, e, f]) => {
                let matrix = [
                    a, b, 0.0, c, //
                    d, e, 0.0, f, //
                    0.0, 0.0, 0.0, 0.0, //
                    0.0, 0.0, 0.0, 1.0,
                ];
                dir.write_tag(Tag::from_u16_exhaustive(TAG_MODEL_TRANSFORMATION), &matrix[..])
                    .expect("model transformation");
            }
            Georef::None => {}
        }

        let geokeys = self.geokey_directory();
        dir.write_tag(Tag::from_u16_exhaustive(TAG_GEO_KEY_DIRECTORY), &geokeys[..])
            .expect("geokeys");

        if let Some(nodata) = &self.nodata {
            dir.write_tag(Tag::from_u16_exhaustive(TAG_GDAL_NODATA), nodata.as_str())
                .expect("nodata");
        }
    }

    fn geokey_directory(&self) -> Vec<u16> {
        let geographic = |code: u16| (4000..5000).contains(&code);
        let mut entries: Vec<[u16; 4]> = Vec::new();

        if let Some(code) = self.epsg {
            let model_type = if geographic(code) { 2 } else { 1 };
            entries.push([KEY_GT_MODEL_TYPE, 0, 1, model_type]);
        }
        let raster_type = if self.pixel_is_point { 2 } else { 1 };
        entries.push([KEY_GT_RASTER_TYPE, 0, 1, raster_type]);

        match self.epsg {
            Some(code) if geographic(code) => {
                entries.push([KEY_GEOGRAPHIC_TYPE, 0, 1, code]);
            }
            Some(code) => {
                if let Some(extra) = self.extra_geographic {
                    entries.push([KEY_GEOGRAPHIC_TYPE, 0, 1, extra]);
                }
                entries.push([KEY_PROJECTED_CS_TYPE, 0, 1, code]);
            }
            None => {}
        }

        let mut directory = vec![1, 1, 0, entries.len() as u16];
        for entry in entries {
            directory.extend_from_slice(&entry);
        }
        directory
    }
}
