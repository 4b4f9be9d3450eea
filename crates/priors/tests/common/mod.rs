//! Shared fixtures: a scratch data tree, synthetic shapes and bathymetry.
//!
//! Everything is generated around the LAEA Europe projection centre
//! (10°E, 52°N) so distances are easy to reason about.

#![allow(dead_code)]

use geo_types::{polygon, Polygon};
use priorgen::{CountryCode, DataPaths, InMemoryShapes, RunContext, Side};
use priorgen_core::io::write_geotiff;
use priorgen_core::{GeoTransform, Raster, CRS};
use std::path::Path;
use tempfile::TempDir;

pub fn code(c: &str) -> CountryCode {
    CountryCode::new(c).unwrap()
}

/// Lon/lat rectangle
pub fn lonlat_rect(lon0: f64, lat0: f64, lon1: f64, lat1: f64) -> Polygon<f64> {
    polygon![(x: lon0, y: lat0), (x: lon1, y: lat0), (x: lon1, y: lat1), (x: lon0, y: lat1)]
}

/// Scratch data root plus a run context writing into it
pub fn data_tree(tail: &str) -> (TempDir, RunContext) {
    let dir = tempfile::tempdir().unwrap();
    let paths = DataPaths::new(dir.path());
    let cache = paths.resolve("geographics/generated");
    (dir, RunContext::new(paths, tail, cache))
}

/// Offshore shapes "DE" and "DK": two halves of the 9.6..10.4°E, 51.8..52.2°N box
pub fn offshore_shapes() -> InMemoryShapes {
    InMemoryShapes::new()
        .with(Side::Offshore, code("DE"), lonlat_rect(9.6, 51.8, 10.0, 52.2), CRS::wgs84())
        .with(Side::Offshore, code("DK"), lonlat_rect(10.0, 51.8, 10.4, 52.2), CRS::wgs84())
}

/// Onshore shape "LU": 9.8..10.2°E, 51.85..52.15°N
pub fn onshore_shapes() -> InMemoryShapes {
    InMemoryShapes::new().with(Side::Onshore, code("LU"), lonlat_rect(9.8, 51.85, 10.2, 52.15), CRS::wgs84())
}

/// Bathymetry over 9..11°E, 51..53°N at 0.01°: land (+50 m) west of
/// `coast_lon`, sea (-40 m) east of it
pub fn write_bathymetry(path: &Path, coast_lon: f64) {
    let (rows, cols) = (200, 200);
    let transform = GeoTransform::north_up(9.0, 53.0, 0.01);
    let data: Vec<f64> = (0..rows)
        .flat_map(|_| {
            (0..cols).map(move |col| {
                let (lon, _) = transform.pixel_to_geo(col, 0);
                if lon < coast_lon { 50.0 } else { -40.0 }
            })
        })
        .collect();

    let mut raster = Raster::from_vec(data, rows, cols).unwrap();
    raster.set_transform(transform);
    raster.set_crs(Some(CRS::wgs84()));

    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    write_geotiff(&raster, path, None).unwrap();
}
