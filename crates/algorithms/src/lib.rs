//! # Priorgen Algorithms
//!
//! Geospatial building blocks for siting priors.
//!
//! ## Modules
//!
//! - **vector**: union, difference/complement, reprojection, polygonize
//! - **rasterize**: pixel-centre polygon rasterization
//! - **region**: region masks and value indication on the mask grid
//! - **proximity**: classification of pixels by distance to targets

mod maybe_rayon;

pub mod proximity;
pub mod rasterize;
pub mod region;
pub mod vector;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::proximity::{edges_by_proximity, validate_distances, NODATA, UNTOUCHED};
    pub use crate::rasterize::{coverage, rasterize};
    pub use crate::region::{RegionMask, Resampling, ValueRange};
    pub use crate::vector::{
        complement_within, difference, largest_part, polygonize_mask, reproject_densified,
        reproject_geometry, unary_union, union_geometries,
    };
    pub use priorgen_core::prelude::*;
}
