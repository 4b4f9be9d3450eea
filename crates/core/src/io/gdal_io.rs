//! GeoTIFF reading and writing using GDAL

use super::metadata::MetadataItems;
use crate::crs::CRS;
use crate::error::Result;
use crate::raster::{GeoTransform, Raster, RasterElement};
use gdal::raster::GdalType;
use gdal::spatial_ref::SpatialRef;
use gdal::{Dataset, DriverManager, Metadata};
use std::path::Path;

/// Options for writing GeoTIFF files
#[derive(Debug, Clone)]
pub struct GeoTiffOptions {
    /// Compression type: "DEFLATE", "LZW", "ZSTD", "NONE"
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
            compression: "DEFLATE".to_string(),
            metadata: Vec::new(),
        }
    }
}

/// Read a GeoTIFF file into a Raster
///
/// # Arguments
/// * `path` - Path to the GeoTIFF file
/// * `band` - Band number (1-indexed), defaults to 1
pub fn read_geotiff<T, P>(path: P, band: Option<usize>) -> Result<Raster<T>>
where
    T: RasterElement + GdalType,
    P: AsRef<Path>,
{
    let dataset = Dataset::open(path.as_ref())?;
    let rasterband = dataset.rasterband(band.unwrap_or(1))?;

    let (cols, rows) = dataset.raster_size();
    let buffer = rasterband.read_as::<T>((0, 0), (cols, rows), (cols, rows), None)?;
    let mut raster = Raster::from_vec(buffer.data().to_vec(), rows, cols)?;

    if let Ok(gt) = dataset.geo_transform() {
        raster.set_transform(GeoTransform::from_gdal(gt));
    }

    if let Ok(srs) = dataset.spatial_ref() {
        let crs = match srs.auth_code() {
            Ok(code) => Some(CRS::from_epsg(code as u32)),
            Err(_) => srs.to_wkt().ok().map(CRS::from_wkt),
        };
        raster.set_crs(crs);
    }

    if let Ok(Some(nodata)) = rasterband.no_data_value() {
        raster.set_nodata(num_traits::cast(nodata));
    }

    Ok(raster)
}

/// Read the dataset metadata items (default domain) of a GeoTIFF
pub fn read_geotiff_metadata<P: AsRef<Path>>(path: P) -> Result<MetadataItems> {
    let dataset = Dataset::open(path.as_ref())?;
    Ok(dataset
        .metadata()
        .filter(|entry| entry.domain.is_empty())
        .map(|entry| (entry.key, entry.value))
        .collect())
}

/// Write a Raster to a GeoTIFF file
pub fn write_geotiff<T, P>(
    raster: &Raster<T>,
    path: P,
    options: Option<GeoTiffOptions>,
) -> Result<()>
where
    T: RasterElement + GdalType,
    P: AsRef<Path>,
{
    let opts = options.unwrap_or_default();
    let driver = DriverManager::get_driver_by_name("GTiff")?;

    let (rows, cols) = raster.shape();
    let compress = format!("COMPRESS={}", opts.compression);

    let mut dataset = driver.create_with_band_type_with_options::<T, _>(
        path.as_ref(),
        cols as isize,
        rows as isize,
        1,
        &[compress.as_str()],
    )?;

    dataset.set_geo_transform(&raster.transform().to_gdal())?;

    if let Some(crs) = raster.crs() {
        if let Some(epsg) = crs.epsg() {
            dataset.set_spatial_ref(&SpatialRef::from_epsg(epsg)?)?;
        } else if let Some(wkt) = crs.wkt() {
            dataset.set_spatial_ref(&SpatialRef::from_wkt(wkt)?)?;
        }
    }

    for (key, value) in &opts.metadata {
        dataset.set_metadata_item(key, value, "")?;
    }

    let mut band = dataset.rasterband(1)?;
    if let Some(nodata) = raster.nodata() {
        band.set_no_data_value(RasterElement::to_f64(nodata))?;
    }

    let data: Vec<T> = raster.data().iter().copied().collect();
    band.write((0, 0), (cols, rows), &data)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_write_read_roundtrip() {
        let mut raster: Raster<u8> = Raster::filled(40, 40, 254);
        raster.set_transform(GeoTransform::north_up(4_000_000.0, 3_000_000.0, 1000.0));
        raster.set_crs(Some(CRS::laea_europe()));
        raster.set_nodata(Some(255));
        raster.set(10, 10, 0).unwrap();

        let opts = GeoTiffOptions::default().with_metadata("GLAES_PRIOR", "YES");
        let tmp = NamedTempFile::with_suffix(".tif").unwrap();
        write_geotiff(&raster, tmp.path(), Some(opts)).unwrap();

        let loaded: Raster<u8> = read_geotiff(tmp.path(), None).unwrap();
        assert_eq!(loaded.shape(), raster.shape());
        assert_eq!(loaded.get(10, 10).unwrap(), 0);
        assert_eq!(loaded.nodata(), Some(255));

        let meta = read_geotiff_metadata(tmp.path()).unwrap();
        assert!(meta.contains(&("GLAES_PRIOR".to_string(), "YES".to_string())));
    }
}
