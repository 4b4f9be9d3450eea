//! Vector operations on polygonal geometries
//!
//! - Union: dissolve many polygons into one multipolygon
//! - Overlay: difference and complement within a frame
//! - Reproject: move geometries between supported CRSs
//! - Polygonize: turn a raster mask into polygons

mod overlay;
mod polygonize;
mod reproject;
mod union;

pub use overlay::{complement_within, difference, largest_part};
pub use polygonize::polygonize_mask;
pub use reproject::{densify, reproject_densified, reproject_geometry};
pub use union::{union_geometries, unary_union};
