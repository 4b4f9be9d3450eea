//! Native GeoTIFF reading/writing (without GDAL dependency)
//!
//! Uses the `tiff` crate and writes the GeoTIFF tags GDAL understands:
//! pixel scale, tiepoint, a GeoKey directory carrying the EPSG code,
//! `GDAL_NODATA` and `GDAL_METADATA`. For full GeoTIFF support (arbitrary
//! projections, compression), enable the `gdal` feature.

use super::metadata::{parse_gdal_xml, to_gdal_xml, MetadataItems};
use crate::crs::CRS;
use crate::error::{Error, Result};
use crate::raster::{GeoTransform, Raster, RasterElement};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::encoder::colortype::{Gray32Float, Gray8};
use tiff::encoder::TiffEncoder;
use tiff::tags::Tag;

const MODEL_PIXEL_SCALE: u16 = 33550;
const MODEL_TIEPOINT: u16 = 33922;
const GEO_KEY_DIRECTORY: u16 = 34735;
const GDAL_METADATA: u16 = 42112;
const GDAL_NODATA: u16 = 42113;

const GT_MODEL_TYPE_KEY: u16 = 1024;
const GT_RASTER_TYPE_KEY: u16 = 1025;
const GEOGRAPHIC_TYPE_KEY: u16 = 2048;
const PROJECTED_CS_TYPE_KEY: u16 = 3072;

fn tag(code: u16) -> Tag {
    Tag::from_u16_exhaustive(code)
}

/// Options for writing GeoTIFF files
#[derive(Debug, Clone)]
pub struct GeoTiffOptions {
    /// Compression (ignored by the native writer)
    pub compression: String,
    /// Dataset metadata items, written in order
    pub metadata: MetadataItems,
}

impl GeoTiffOptions {
    /// Add a metadata item
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.push((key.into(), value.into()));
        self
    }
}

impl Default for GeoTiffOptions {
    fn default() -> Self {
        Self {
            compression: "NONE".to_string(),
            metadata: Vec::new(),
        }
    }
}

/// Read a GeoTIFF file into a Raster
///
/// Reads the first band. Transform, EPSG code and no-data value are taken
/// from the GeoTIFF tags when present.
pub fn read_geotiff<T, P>(path: P, band: Option<usize>) -> Result<Raster<T>>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    if band.unwrap_or(1) != 1 {
        return Err(Error::UnsupportedDataType(
            "native reader only supports band 1".to_string(),
        ));
    }

    let mut decoder = open_decoder(path.as_ref())?;

    let (width, height) = decoder.dimensions()?;
    let rows = height as usize;
    let cols = width as usize;

    let data: Vec<T> = match decoder.read_image()? {
        DecodingResult::F32(buf) => cast_all(&buf),
        DecodingResult::F64(buf) => cast_all(&buf),
        DecodingResult::U8(buf) => cast_all(&buf),
        DecodingResult::U16(buf) => cast_all(&buf),
        DecodingResult::U32(buf) => cast_all(&buf),
        DecodingResult::I8(buf) => cast_all(&buf),
        DecodingResult::I16(buf) => cast_all(&buf),
        DecodingResult::I32(buf) => cast_all(&buf),
        _ => return Err(Error::UnsupportedDataType("Unsupported TIFF pixel format".to_string())),
    };

    let mut raster = Raster::from_vec(data, rows, cols)?;

    if let Some(transform) = read_geotransform(&mut decoder) {
        raster.set_transform(transform);
    }
    raster.set_crs(read_crs(&mut decoder));

    if let Ok(text) = decoder.get_tag_ascii_string(tag(GDAL_NODATA)) {
        let nodata = text.trim_end_matches('\0').trim().parse::<f64>().ok();
        raster.set_nodata(nodata.and_then(num_traits::cast));
    }

    Ok(raster)
}

/// Decoder without the `tiff` default size limits
fn open_decoder(path: &Path) -> Result<Decoder<BufReader<File>>> {
    let file = BufReader::new(File::open(path)?);
    Ok(Decoder::new(file)?.with_limits(Limits::unlimited()))
}

fn cast_all<S: Copy + num_traits::NumCast, T: RasterElement>(buf: &[S]) -> Vec<T> {
    buf.iter()
        .map(|&v| num_traits::cast(v).unwrap_or(T::default_nodata()))
        .collect()
}

/// Read the `GDAL_METADATA` items of a GeoTIFF; empty if the tag is absent
pub fn read_geotiff_metadata<P: AsRef<Path>>(path: P) -> Result<MetadataItems> {
    let mut decoder = open_decoder(path.as_ref())?;
    Ok(decoder
        .get_tag_ascii_string(tag(GDAL_METADATA))
        .map(|xml| parse_gdal_xml(&xml))
        .unwrap_or_default())
}

/// GeoTransform from ModelPixelScale + ModelTiepoint
fn read_geotransform<R: std::io::Read + std::io::Seek>(decoder: &mut Decoder<R>) -> Option<GeoTransform> {
    let scale = decoder.get_tag_f64_vec(tag(MODEL_PIXEL_SCALE)).ok()?;
    let tiepoint = decoder.get_tag_f64_vec(tag(MODEL_TIEPOINT)).ok()?;

    if scale.len() >= 2 && tiepoint.len() >= 6 {
        // tiepoint: [I, J, K, X, Y, Z], scale: [ScaleX, ScaleY, ScaleZ]
        let origin_x = tiepoint[3] - tiepoint[0] * scale[0];
        let origin_y = tiepoint[4] + tiepoint[1] * scale[1];
        return Some(GeoTransform::new(origin_x, origin_y, scale[0], -scale[1]));
    }

    None
}

/// EPSG code from ProjectedCSTypeGeoKey or GeographicTypeGeoKey
fn read_crs<R: std::io::Read + std::io::Seek>(decoder: &mut Decoder<R>) -> Option<CRS> {
    let keys = decoder.get_tag_u16_vec(tag(GEO_KEY_DIRECTORY)).ok()?;
    if keys.len() < 4 {
        return None;
    }

    let num_keys = keys[3] as usize;
    let mut geographic = None;
    for entry in keys[4..].chunks_exact(4).take(num_keys) {
        let (key_id, location, value) = (entry[0], entry[1], entry[3]);
        // location 0 means the value is stored inline
        if location != 0 || value == 0 || value == 32767 {
            continue;
        }
        match key_id {
            PROJECTED_CS_TYPE_KEY => return Some(CRS::from_epsg(value as u32)),
            GEOGRAPHIC_TYPE_KEY => geographic = Some(CRS::from_epsg(value as u32)),
            _ => {}
        }
    }

    geographic
}

/// GeoKey directory for a raster's CRS (version 1.1.0)
fn geo_keys(crs: Option<&CRS>) -> Vec<u16> {
    let epsg = crs.and_then(|c| c.epsg()).and_then(|code| u16::try_from(code).ok());
    let geographic = crs.map_or(false, |c| c.is_geographic());

    // GTModelType: 1 = projected, 2 = geographic
    let model_type = if geographic { 2 } else { 1 };
    let mut keys = vec![
        GT_MODEL_TYPE_KEY, 0, 1, model_type,
        GT_RASTER_TYPE_KEY, 0, 1, 1, // RasterPixelIsArea
    ];
    if let Some(code) = epsg {
        let key = if geographic { GEOGRAPHIC_TYPE_KEY } else { PROJECTED_CS_TYPE_KEY };
        keys.extend_from_slice(&[key, 0, 1, code]);
    }

    let count = (keys.len() / 4) as u16;
    let mut directory = vec![1, 1, 0, count];
    directory.extend(keys);
    directory
}

/// Write a Raster to a GeoTIFF file
///
/// Byte rasters are written as a single 8-bit band, everything else as
/// 32-bit float.
pub fn write_geotiff<T, P>(
    raster: &Raster<T>,
    path: P,
    options: Option<GeoTiffOptions>,
) -> Result<()>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let opts = options.unwrap_or_default();
    let file = BufWriter::new(File::create(path.as_ref())?);
    let mut encoder = TiffEncoder::new(file)?;

    let (rows, cols) = raster.shape();
    let gt = raster.transform();
    let scale = [gt.pixel_width, gt.pixel_height.abs(), 0.0];
    let tiepoint = [0.0, 0.0, 0.0, gt.origin_x, gt.origin_y, 0.0];
    let keys = geo_keys(raster.crs());
    let nodata = raster.nodata().and_then(RasterElement::to_f64).map(|v| v.to_string());
    let metadata = (!opts.metadata.is_empty()).then(|| to_gdal_xml(&opts.metadata));

    // The two colour types produce different image encoder types, so the
    // tag block is repeated per branch through a macro.
    macro_rules! encode {
        ($colortype:ty, $data:expr) => {{
            let mut image = encoder.new_image::<$colortype>(cols as u32, rows as u32)?;
            let dir = image.encoder();
            dir.write_tag(tag(MODEL_PIXEL_SCALE), &scale[..])?;
            dir.write_tag(tag(MODEL_TIEPOINT), &tiepoint[..])?;
            dir.write_tag(tag(GEO_KEY_DIRECTORY), keys.as_slice())?;
            if let Some(nd) = &nodata {
                dir.write_tag(tag(GDAL_NODATA), nd.as_str())?;
            }
            if let Some(xml) = &metadata {
                dir.write_tag(tag(GDAL_METADATA), xml.as_str())?;
            }
            image.write_data($data)?;
        }};
    }

    if T::is_byte() {
        let data: Vec<u8> = raster
            .data()
            .iter()
            .map(|&v| num_traits::cast(v).unwrap_or(0))
            .collect();
        encode!(Gray8, &data);
    } else {
        let data: Vec<f32> = raster
            .data()
            .iter()
            .map(|&v| num_traits::cast(v).unwrap_or(f32::NAN))
            .collect();
        encode!(Gray32Float, &data);
    }

    Ok(())
}
