//! End-to-end runs of the offshore shore-proximity prior on synthetic data.

mod common;

use common::{code, data_tree, offshore_shapes, write_bathymetry};
use priorgen::{create_shore_proximity_prior, PriorError, ShoreConfig};
use priorgen_core::io::{find_metadata, read_geotiff, read_geotiff_metadata};
use priorgen_core::{Raster, CRS};

/// Small-region variant of the default configuration
fn config() -> ShoreConfig {
    ShoreConfig {
        countries: vec![code("DE"), code("DK")],
        pixel_size: 2000.0,
        ..ShoreConfig::default()
    }
}

fn run(tail: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let (dir, ctx) = data_tree(tail);
    write_bathymetry(&ctx.paths.potentials_source(&config().bathymetry), 9.8);
    let path = create_shore_proximity_prior(&ctx, &offshore_shapes(), &config()).unwrap();
    (dir, path)
}

#[test]
fn writes_prior_with_expected_name_and_grid() {
    let (dir, path) = run("1700000000");

    assert_eq!(path.file_name().unwrap(), "shore_proximity.1700000000_00000.tif");
    assert!(path.starts_with(dir.path().join("generation/vres/potentials/generated/GLAES")));

    let prior: Raster<u8> = read_geotiff(&path, None).unwrap();
    assert_eq!(prior.crs(), Some(&CRS::laea_europe()));
    assert_eq!(prior.cell_size(), 2000.0);
    assert_eq!(prior.nodata(), Some(255));

    let (xmin, ymin, _, _) = prior.bounds();
    assert_eq!(xmin % 2000.0, 0.0);
    assert_eq!(ymin % 2000.0, 0.0);
}

#[test]
fn classes_follow_distance_from_coast() {
    let (_dir, path) = run("1");
    let prior: Raster<u8> = read_geotiff(&path, None).unwrap();

    let to_laea = priorgen_core::CoordTransform::new(&CRS::wgs84(), &CRS::laea_europe()).unwrap();
    let class_at = |lon: f64, lat: f64| {
        let (x, y) = to_laea.transform(lon, lat);
        prior.sample(x, y).unwrap()
    };

    // on land (west of 9.8°E)
    assert_eq!(class_at(9.7, 52.0), 0);
    // ~7 km offshore: within 20 km
    assert_eq!(class_at(9.9, 52.0), 1);
    // ~34 km offshore: within 50 km
    assert_eq!(class_at(10.3, 52.0), 2);
    // outside the offshore region
    let (x, y) = to_laea.transform(10.6, 52.0);
    assert!(prior.sample(x, y).map_or(true, |v| v == 255));

    let counts = prior.value_counts();
    assert!(counts.keys().all(|&v| matches!(v, 0..=7 | 254 | 255)), "{counts:?}");
}

#[test]
fn metadata_describes_the_prior() {
    let (_dir, path) = run("1");
    let meta = read_geotiff_metadata(&path).unwrap();

    assert_eq!(find_metadata(&meta, "GLAES_PRIOR"), Some("YES"));
    assert_eq!(find_metadata(&meta, "DISPLAY_NAME"), Some("shore_proximity"));
    assert_eq!(find_metadata(&meta, "ALTERNATE_NAME"), Some("NONE"));
    assert_eq!(find_metadata(&meta, "UNIT"), Some("meters"));
    assert_eq!(find_metadata(&meta, "SOURCE"), Some("GEBCO"));
    assert_eq!(
        find_metadata(&meta, "DESCRIPTION"),
        Some("Indicates pixels which are less-than or equal-to X meters from shore")
    );
    let value_map = find_metadata(&meta, "VALUE_MAP").unwrap();
    assert!(value_map.starts_with(r#"{"0":"<=0.00","1":"<=20000.00""#));
    assert!(value_map.ends_with(r#""254":"untouched","255":"noData"}"#));
}

#[test]
fn runs_differ_only_by_tail() {
    let (_a, first) = run("100");
    let (_b, second) = run("200");

    assert_ne!(first.file_name(), second.file_name());
    assert_eq!(std::fs::read(&first).unwrap(), std::fs::read(&second).unwrap());
}

#[test]
fn saves_offshore_shapes() {
    let (_dir, ctx) = data_tree("1");
    write_bathymetry(&ctx.paths.potentials_source(&config().bathymetry), 9.8);
    create_shore_proximity_prior(&ctx, &offshore_shapes(), &config()).unwrap();

    assert!(ctx.shapes_cache.join("OFFSHORE_DE.wkt").exists());
    assert!(ctx.shapes_cache.join("OFFSHORE_DK.wkt").exists());
}

#[test]
fn unknown_country_aborts_before_writing() {
    let (_dir, ctx) = data_tree("1");
    write_bathymetry(&ctx.paths.potentials_source(&config().bathymetry), 9.8);
    let config = ShoreConfig {
        countries: vec![code("DE"), code("FR")],
        ..config()
    };

    let err = create_shore_proximity_prior(&ctx, &offshore_shapes(), &config).unwrap_err();
    assert!(matches!(err, PriorError::UnknownCountry { .. }));
    assert!(!ctx.paths.glaes_output_dir().exists());
}

#[test]
fn missing_bathymetry_is_an_error() {
    let (_dir, ctx) = data_tree("1");
    assert!(create_shore_proximity_prior(&ctx, &offshore_shapes(), &config()).is_err());
}
