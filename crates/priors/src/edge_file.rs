//! Writing proximity results as prior GeoTIFFs

use crate::config::PriorMetadata;
use crate::error::Result;
use priorgen_algorithms::proximity::{NODATA, UNTOUCHED};
use priorgen_algorithms::region::RegionMask;
use priorgen_core::io::{write_geotiff, GeoTiffOptions, MetadataItems};
use priorgen_core::{Error, Raster};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Everything written next to an edge matrix
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeFileMeta {
    pub ftr_id: u32,
    pub name: String,
    /// Unique file name suffix, usually the Unix timestamp
    pub tail: String,
    pub unit: String,
    pub description: String,
    pub source: String,
    pub distances: Vec<f64>,
}

impl EdgeFileMeta {
    pub fn new(metadata: &PriorMetadata, tail: impl Into<String>, distances: &[f64]) -> Self {
        Self {
            ftr_id: metadata.ftr_id,
            name: metadata.name.clone(),
            tail: tail.into(),
            unit: metadata.unit.clone(),
            description: metadata.description.clone(),
            source: metadata.source.clone(),
            distances: distances.to_vec(),
        }
    }

    /// `<name>.<tail>_<ftr_id:05>.tif`
    pub fn file_name(&self) -> String {
        format!("{}.{}_{:05}.tif", self.name, self.tail, self.ftr_id)
    }

    /// JSON legend of the class values
    pub fn value_map(&self) -> String {
        let mut map = Map::new();
        for (i, d) in self.distances.iter().enumerate() {
            map.insert(i.to_string(), Value::String(format!("<={d:.2}")));
        }
        map.insert(UNTOUCHED.to_string(), Value::String("untouched".into()));
        map.insert(NODATA.to_string(), Value::String("noData".into()));
        Value::Object(map).to_string()
    }

    /// Dataset metadata items, in write order
    pub fn metadata_items(&self) -> MetadataItems {
        let distances = Value::from(self.distances.clone()).to_string();
        vec![
            ("GLAES_PRIOR".to_string(), "YES".to_string()),
            ("DISPLAY_NAME".to_string(), self.name.clone()),
            ("ALTERNATE_NAME".to_string(), "NONE".to_string()),
            ("DESCRIPTION".to_string(), self.description.clone()),
            ("UNIT".to_string(), self.unit.clone()),
            ("SOURCE".to_string(), self.source.clone()),
            ("VALUE_MAP".to_string(), self.value_map()),
            ("DISTANCES".to_string(), distances),
            ("FEATURE_ID".to_string(), self.ftr_id.to_string()),
        ]
    }
}

/// Write an edge matrix on `mask`'s grid into `output_dir`
///
/// The directory is created if missing. Returns the written path.
pub fn write_edge_file(
    result: &Raster<u8>,
    mask: &RegionMask,
    meta: &EdgeFileMeta,
    output_dir: &Path,
) -> Result<PathBuf> {
    if result.shape() != mask.shape() {
        let (rows, cols) = result.shape();
        return Err(Error::InvalidDimensions { width: cols, height: rows }.into());
    }

    let mut raster = result.clone();
    raster.set_transform(*mask.transform());
    raster.set_crs(Some(mask.srs().clone()));
    raster.set_nodata(Some(NODATA));

    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(meta.file_name());
    let options = GeoTiffOptions {
        metadata: meta.metadata_items(),
        ..GeoTiffOptions::default()
    };
    write_geotiff(&raster, &path, Some(options))?;

    info!(path = %path.display(), "wrote prior");
    Ok(path)
}
