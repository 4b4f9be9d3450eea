//! # Priorgen
//!
//! Generates renewable-energy siting priors: rasters that classify every
//! pixel of a region by its distance to the shoreline against a list of
//! threshold distances, written as GeoTIFFs with GLAES prior metadata.
//!
//! Procedures:
//! - [`rasterize_natura_vector`]: Natura2000 protected areas on a 100 m grid
//! - [`create_shore_proximity_prior`]: offshore distance to land
//! - [`create_interior_shore_proximity_prior`]: onshore distance to sea
//!
//! ```ignore
//! use priorgen::{DataPaths, PriorgenConfig, RunContext, ShapefileShapes};
//!
//! let config = PriorgenConfig::default();
//! let paths = DataPaths::new("/data");
//! let shapes = ShapefileShapes::new(&config.shapes, &paths);
//! let ctx = RunContext::now(paths.clone(), paths.resolve(&config.shapes.cache_dir));
//! let written = priorgen::create_shore_proximity_prior(&ctx, &shapes, &config.shore)?;
//! ```

pub mod config;
pub mod edge_file;
pub mod error;
pub mod inspect;
pub mod procedures;
pub mod shapes;

pub use config::{
    CodeFormat, ComplementPart, CountryCode, DataPaths, InteriorShoreConfig, NaturaConfig, PriorMetadata,
    PriorgenConfig, ShapesConfig, ShoreConfig, Side,
};
pub use edge_file::{write_edge_file, EdgeFileMeta};
pub use error::{PriorError, Result};
pub use procedures::{
    create_interior_shore_proximity_prior, create_shore_proximity_prior, rasterize_natura_vector,
    RunContext,
};
pub use shapes::{get_shapes, CountryShape, InMemoryShapes, ShapeSource, ShapefileShapes};
