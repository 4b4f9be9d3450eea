//! Offshore shore-proximity prior

use super::{union_shapes, RunContext};
use crate::config::{ShoreConfig, Side};
use crate::edge_file::{write_edge_file, EdgeFileMeta};
use crate::error::Result;
use crate::shapes::{get_shapes, CountryShape, ShapeSource};
use priorgen_algorithms::proximity::edges_by_proximity;
use priorgen_algorithms::region::{RegionMask, Resampling, ValueRange};
use priorgen_algorithms::vector::polygonize_mask;
use priorgen_core::io::read_geotiff;
use priorgen_core::{Raster, SpatialGeometry, CRS};
use std::path::PathBuf;
use tracing::info;

/// Intermediate and final products of the shore-proximity prior
#[derive(Debug, Clone)]
pub struct ShoreLayer {
    pub mask: RegionMask,
    /// Land polygons in the mask CRS
    pub land: SpatialGeometry,
    pub result: Raster<u8>,
}

/// Classify offshore pixels by distance to land
///
/// Land is every bathymetry pixel in the configured range (above sea level
/// by default). The in-range indicator is resampled bilinearly onto the
/// region mask grid, cut at `land_threshold` and polygonized there.
pub fn shore_proximity_layer(
    shapes: &[CountryShape],
    bathymetry: &Raster<f64>,
    config: &ShoreConfig,
) -> Result<ShoreLayer> {
    let region = union_shapes(shapes)?;
    let srs = CRS::from_epsg(config.epsg);
    let mask = RegionMask::from_geometry(&region, config.pixel_size, &srs)?;

    let range: ValueRange = config.land_range.parse()?;
    let indicated = mask.indicate_values(bathymetry, &range, Resampling::Bilinear, false)?;
    let threshold = config.land_threshold;
    let land = polygonize_mask(&indicated, |v| v > threshold);
    info!(range = %range, parts = land.0.len(), "polygonized land");

    let land = SpatialGeometry::new(land, srs);
    let result = edges_by_proximity(&mask, std::slice::from_ref(&land), &config.distances)?;

    Ok(ShoreLayer { mask, land, result })
}

/// Generate the offshore shore-proximity prior into the GLAES output directory
pub fn create_shore_proximity_prior<S: ShapeSource + ?Sized>(
    ctx: &RunContext,
    source: &S,
    config: &ShoreConfig,
) -> Result<PathBuf> {
    let save = config.save_shapes.then_some(ctx.shapes_cache.as_path());
    let shapes = get_shapes(source, &config.countries, Side::Offshore, save)?;

    let bathymetry_path = ctx.paths.potentials_source(&config.bathymetry);
    info!(path = %bathymetry_path.display(), "loading bathymetry");
    let bathymetry: Raster<f64> = read_geotiff(&bathymetry_path, None)?;

    let layer = shore_proximity_layer(&shapes, &bathymetry, config)?;

    let meta = EdgeFileMeta::new(&config.metadata, ctx.tail.as_str(), &config.distances);
    write_edge_file(&layer.result, &layer.mask, &meta, &ctx.paths.glaes_output_dir())
}
