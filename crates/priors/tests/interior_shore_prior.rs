//! End-to-end runs of the interior shore-proximity prior on synthetic data.

mod common;

use approx::assert_relative_eq;
use common::{code, data_tree, onshore_shapes};
use geo::{Area, Contains};
use geo_types::point;
use priorgen::procedures::{complement_geometry, union_shapes};
use priorgen::{create_interior_shore_proximity_prior, get_shapes, InteriorShoreConfig, Side};
use priorgen_core::io::{find_metadata, read_geotiff, read_geotiff_metadata};
use priorgen_core::{CoordTransform, Raster, CRS};

fn config() -> InteriorShoreConfig {
    InteriorShoreConfig {
        countries: vec![code("LU")],
        pixel_size: 1000.0,
        ..InteriorShoreConfig::default()
    }
}

#[test]
fn complement_is_frame_minus_onshore_union() {
    let shapes = get_shapes(&onshore_shapes(), &[code("LU")], Side::Onshore, None).unwrap();
    let onshore = union_shapes(&shapes).unwrap();

    let config = InteriorShoreConfig {
        complement_epsg: 4326,
        ..config()
    };
    let complement = complement_geometry(&onshore, &config).unwrap();
    let sea = complement.to_multi_polygon();

    assert_eq!(complement.crs, CRS::wgs84());
    // 60° x 45° frame minus the 0.4° x 0.3° country
    assert_relative_eq!(sea.unsigned_area(), 2700.0 - 0.12, epsilon = 1e-6);
    assert!(!sea.contains(&point!(x: 10.0, y: 52.0)));
    assert!(sea.contains(&point!(x: 0.0, y: 40.0)));
}

#[test]
fn complement_defaults_to_web_mercator() {
    let shapes = get_shapes(&onshore_shapes(), &[code("LU")], Side::Onshore, None).unwrap();
    let onshore = union_shapes(&shapes).unwrap();

    let complement = complement_geometry(&onshore, &config()).unwrap();
    assert_eq!(complement.crs, CRS::web_mercator());
}

#[test]
fn border_pixels_are_classified() {
    let (dir, ctx) = data_tree("1700000000");
    let path = create_interior_shore_proximity_prior(&ctx, &onshore_shapes(), &config(), None).unwrap();

    assert_eq!(path.file_name().unwrap(), "interior_shore_proximity.1700000000_00000.tif");
    assert!(path.starts_with(dir.path()));

    let prior: Raster<u8> = read_geotiff(&path, None).unwrap();
    assert_eq!(prior.crs(), Some(&CRS::laea_europe()));
    assert_eq!(prior.cell_size(), 1000.0);

    let counts = prior.value_counts();
    assert!(counts.keys().all(|&v| matches!(v, 0..=4 | 254 | 255)), "{counts:?}");
    assert!(counts.range(0..=4).map(|(_, n)| n).sum::<usize>() > 0);

    // the centre of the country is more than 1500 m from the sea
    let to_laea = CoordTransform::new(&CRS::wgs84(), &CRS::laea_europe()).unwrap();
    let (x, y) = to_laea.transform(10.0, 52.0);
    assert_eq!(prior.sample(x, y), Some(254));

    // walking in from the western border the class never drops
    let (row, centre_col) = prior
        .transform()
        .pixel_at(x, y, prior.rows(), prior.cols())
        .unwrap();
    let walk: Vec<u8> = (0..=centre_col)
        .map(|col| prior.get(row, col).unwrap())
        .filter(|&v| v != 255)
        .collect();
    assert!(walk.windows(2).all(|w| w[0] <= w[1]), "{walk:?}");
}

#[test]
fn metadata_describes_the_prior() {
    let (_dir, ctx) = data_tree("1");
    let path = create_interior_shore_proximity_prior(&ctx, &onshore_shapes(), &config(), None).unwrap();
    let meta = read_geotiff_metadata(&path).unwrap();

    assert_eq!(find_metadata(&meta, "DISPLAY_NAME"), Some("interior_shore_proximity"));
    assert_eq!(find_metadata(&meta, "SOURCE"), Some("NaturalEarth"));
    assert_eq!(
        find_metadata(&meta, "DESCRIPTION"),
        Some("Indicates pixels which are less-than or equal-to X meters from shore inside shore")
    );
    assert_eq!(find_metadata(&meta, "DISTANCES"), Some("[100.0,250.0,500.0,1000.0,1500.0]"));
    assert_eq!(find_metadata(&meta, "FEATURE_ID"), Some("0"));
}

#[test]
fn inspect_writes_preview_and_shapes_are_not_saved() {
    let (dir, ctx) = data_tree("1");
    let preview = dir.path().join("complement.svg");

    create_interior_shore_proximity_prior(&ctx, &onshore_shapes(), &config(), Some(&preview)).unwrap();

    assert!(std::fs::read_to_string(&preview).unwrap().contains("<path"));
    assert!(!ctx.shapes_cache.exists());
}
