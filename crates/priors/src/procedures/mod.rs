//! The prior-generation procedures
//!
//! Each procedure is split into a pure layer function (shapes and rasters
//! in, rasters out) and a wrapper that reads sources from and writes the
//! prior to the data tree.

mod interior_shore;
mod natura;
mod shore;

pub use interior_shore::{complement_geometry, create_interior_shore_proximity_prior, interior_shore_layer, InteriorShoreLayer};
pub use natura::{rasterize_natura_features, rasterize_natura_vector};
pub use shore::{create_shore_proximity_prior, shore_proximity_layer, ShoreLayer};

use crate::config::DataPaths;
use crate::error::{PriorError, Result};
use crate::shapes::CountryShape;
use priorgen_algorithms::vector::union_geometries;
use priorgen_core::{SpatialGeometry, CRS};
use std::path::PathBuf;

/// Per-run settings shared by the procedures
#[derive(Debug, Clone)]
pub struct RunContext {
    pub paths: DataPaths,
    /// File name suffix making each run's outputs unique
    pub tail: String,
    /// Directory saved country shapes go to
    pub shapes_cache: PathBuf,
}

impl RunContext {
    pub fn new(paths: DataPaths, tail: impl Into<String>, shapes_cache: PathBuf) -> Self {
        Self {
            paths,
            tail: tail.into(),
            shapes_cache,
        }
    }

    /// A context whose tail is the current Unix timestamp in seconds
    pub fn now(paths: DataPaths, shapes_cache: PathBuf) -> Self {
        let tail = chrono::Utc::now().timestamp().to_string();
        Self::new(paths, tail, shapes_cache)
    }
}

/// Union of country shapes, in the CRS of the first shape
pub fn union_shapes(shapes: &[CountryShape]) -> Result<SpatialGeometry> {
    let crs = shapes
        .first()
        .map(|s| s.geometry.crs.clone())
        .unwrap_or_else(CRS::wgs84);
    let geometries: Vec<SpatialGeometry> = shapes.iter().map(|s| s.geometry.clone()).collect();
    if geometries.iter().all(|g| g.polygons().is_empty()) {
        return Err(PriorError::EmptyGeometry("no country polygons to union".into()));
    }
    Ok(union_geometries(&geometries, &crs)?)
}
