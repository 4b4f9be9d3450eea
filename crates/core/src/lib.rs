//! # Priorgen Core
//!
//! Core types and I/O for generating siting priors.
//!
//! This crate provides:
//! - `Raster<T>`: Generic georeferenced raster grid
//! - `GeoTransform`: Affine transformation for georeferencing
//! - `CRS` and `CoordTransform`: Coordinate reference systems and reprojection
//! - `Extent`: Bounding boxes that snap to pixel grids
//! - I/O for GeoTIFF rasters and ESRI shapefiles

pub mod crs;
pub mod error;
pub mod extent;
pub mod io;
pub mod raster;
pub mod vector;

pub use crs::{CoordTransform, CRS};
pub use error::{Error, Result};
pub use extent::Extent;
pub use raster::{GeoTransform, Raster, RasterElement};
pub use vector::SpatialGeometry;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::crs::{CoordTransform, CRS};
    pub use crate::error::{Error, Result};
    pub use crate::extent::Extent;
    pub use crate::raster::{GeoTransform, Raster, RasterElement};
    pub use crate::vector::{Feature, FeatureCollection, SpatialGeometry};
}
