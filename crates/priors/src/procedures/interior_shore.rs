//! Onshore interior shore-proximity prior

use super::{union_shapes, RunContext};
use crate::config::{InteriorShoreConfig, Side};
use crate::edge_file::{write_edge_file, EdgeFileMeta};
use crate::error::{PriorError, Result};
use crate::inspect::write_svg_preview;
use crate::shapes::{get_shapes, CountryShape, ShapeSource};
use priorgen_algorithms::proximity::edges_by_proximity;
use priorgen_algorithms::region::RegionMask;
use priorgen_algorithms::vector::{reproject_densified, reproject_geometry};
use priorgen_core::{Raster, SpatialGeometry, CRS};
use std::path::{Path, PathBuf};
use tracing::info;

/// Intermediate and final products of the interior shore-proximity prior
#[derive(Debug, Clone)]
pub struct InteriorShoreLayer {
    pub mask: RegionMask,
    /// Sea complement, in the configured complement CRS
    pub complement: SpatialGeometry,
    pub result: Raster<u8>,
}

/// Everything in the frame that is not onshore, in the complement CRS
pub fn complement_geometry(onshore: &SpatialGeometry, config: &InteriorShoreConfig) -> Result<SpatialGeometry> {
    let frame_crs = config.frame.crs();
    let land = reproject_geometry(onshore, &frame_crs)?.to_multi_polygon();

    let complement = config.complement_part.select(config.frame.complement(&land));
    if complement.0.is_empty() {
        return Err(PriorError::EmptyGeometry("onshore region covers the whole frame".into()));
    }
    info!(parts = complement.0.len(), part = ?config.complement_part, "computed sea complement");

    let complement = SpatialGeometry::new(complement, frame_crs);
    let target = CRS::from_epsg(config.complement_epsg);
    Ok(reproject_densified(&complement, &target, config.densify)?)
}

/// Classify onshore pixels by distance to the sea complement
pub fn interior_shore_layer(shapes: &[CountryShape], config: &InteriorShoreConfig) -> Result<InteriorShoreLayer> {
    let onshore = union_shapes(shapes)?;
    let srs = CRS::from_epsg(config.epsg);
    let mask = RegionMask::from_geometry(&onshore, config.pixel_size, &srs)?;

    let complement = complement_geometry(&onshore, config)?;
    let result = edges_by_proximity(&mask, std::slice::from_ref(&complement), &config.distances)?;

    Ok(InteriorShoreLayer {
        mask,
        complement,
        result,
    })
}

/// Generate the interior shore-proximity prior into the GLAES output directory
///
/// With `inspect`, an SVG drawing of the sea complement is written there
/// as well.
pub fn create_interior_shore_proximity_prior<S: ShapeSource + ?Sized>(
    ctx: &RunContext,
    source: &S,
    config: &InteriorShoreConfig,
    inspect: Option<&Path>,
) -> Result<PathBuf> {
    let save = config.save_shapes.then_some(ctx.shapes_cache.as_path());
    let shapes = get_shapes(source, &config.countries, Side::Onshore, save)?;

    let layer = interior_shore_layer(&shapes, config)?;

    if let Some(path) = inspect {
        write_svg_preview(&layer.complement.to_multi_polygon(), path)?;
        info!(path = %path.display(), "wrote complement preview");
    }

    let meta = EdgeFileMeta::new(&config.metadata, ctx.tail.as_str(), &config.distances);
    write_edge_file(&layer.result, &layer.mask, &meta, &ctx.paths.glaes_output_dir())
}
