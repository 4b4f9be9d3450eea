//! Natura2000 rasterization

use crate::config::{DataPaths, NaturaConfig};
use crate::error::{PriorError, Result};
use priorgen_algorithms::rasterize::rasterize;
use priorgen_algorithms::vector::reproject_geometry;
use priorgen_core::io::{read_shapefile, write_geotiff};
use priorgen_core::vector::FeatureCollection;
use priorgen_core::{Extent, Raster, SpatialGeometry, CRS};
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// Burn protected-area polygons onto a snapped grid in the configured CRS
///
/// Covered pixels are 1, all others 0. A collection without a CRS is taken
/// to be in the configured CRS already.
pub fn rasterize_natura_features(features: &FeatureCollection, config: &NaturaConfig) -> Result<Raster<u8>> {
    let crs = CRS::from_epsg(config.epsg);
    let source_crs = features.crs.clone().unwrap_or_else(|| crs.clone());

    let mut polygons = Vec::new();
    for geometry in features.geometries() {
        let geometry = SpatialGeometry::new(geometry.clone(), source_crs.clone());
        polygons.extend(reproject_geometry(&geometry, &crs)?.polygons());
    }
    if polygons.is_empty() {
        return Err(PriorError::EmptyGeometry("no protected-area polygons".into()));
    }

    let extent = match features.crs {
        Some(_) => Extent::from_features(features)?,
        None => Extent::from_geometries(features.geometries(), source_crs)?,
    };
    let extent = extent
        .cast_to(&crs)?
        .fit(config.pixel_size)?;
    let raster = rasterize(&polygons, &extent, config.pixel_size)?;

    info!(
        features = features.len(),
        rows = raster.rows(),
        cols = raster.cols(),
        covered = raster.count_where(|v| v == 1),
        "rasterized protected areas"
    );
    Ok(raster)
}

/// Rasterize the Natura2000 shapefile into the GLAES output directory
pub fn rasterize_natura_vector(paths: &DataPaths, config: &NaturaConfig) -> Result<PathBuf> {
    let source = paths.potentials_source(&config.source);
    info!(source = %source.display(), "loading protected areas");
    let features = read_shapefile(&source, &[], Some(CRS::from_epsg(config.epsg)))?;

    let raster = rasterize_natura_features(&features, config)?;

    let output_dir = paths.glaes_output_dir();
    fs::create_dir_all(&output_dir)?;
    let output = output_dir.join(&config.output_name);
    write_geotiff(&raster, &output, None)?;

    info!(path = %output.display(), "wrote protected-area raster");
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::polygon;
    use priorgen_core::vector::Feature;

    #[test]
    fn test_grid_is_snapped_to_pixel_size() {
        let mut features = FeatureCollection::new(Some(CRS::laea_europe()));
        features.push(Feature::new(
            polygon![
                (x: 4_000_030.0, y: 3_000_070.0),
                (x: 4_000_480.0, y: 3_000_070.0),
                (x: 4_000_480.0, y: 3_000_290.0),
                (x: 4_000_030.0, y: 3_000_290.0),
            ]
            .into(),
        ));

        let raster = rasterize_natura_features(&features, &NaturaConfig::default()).unwrap();
        assert_eq!(raster.shape(), (3, 5));
        assert_eq!(raster.cell_size(), 100.0);
        assert_eq!(raster.bounds(), (4_000_000.0, 3_000_000.0, 4_000_500.0, 3_000_300.0));
        // centres at x 50..450 inside [30, 480], y 50/150/250 inside [70, 290] except 50
        assert_eq!(raster.count_where(|v| v == 1), 10);
    }

    #[test]
    fn test_empty_collection_fails() {
        let features = FeatureCollection::new(Some(CRS::laea_europe()));
        assert!(rasterize_natura_features(&features, &NaturaConfig::default()).is_err());
    }
}
