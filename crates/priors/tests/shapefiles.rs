//! Procedures reading real shapefiles from a scratch data tree.

mod common;

use common::{code, data_tree};
use priorgen::{get_shapes, rasterize_natura_vector, NaturaConfig, PriorError, ShapefileShapes, ShapesConfig, Side};
use priorgen_core::io::read_geotiff;
use priorgen_core::{Raster, CRS};
use shapefile::dbase::{FieldName, FieldValue, Record, TableWriterBuilder};
use shapefile::{Point, PolygonRing};
use std::path::Path;

/// Clockwise outer ring of an axis-aligned rectangle
fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> shapefile::Polygon {
    shapefile::Polygon::new(PolygonRing::Outer(vec![
        Point::new(x0, y0),
        Point::new(x0, y1),
        Point::new(x1, y1),
        Point::new(x1, y0),
        Point::new(x0, y0),
    ]))
}

fn write_layer(path: &Path, field: &str, records: &[(&str, shapefile::Polygon)]) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let table = TableWriterBuilder::new().add_character_field(FieldName::try_from(field).unwrap(), 8);
    let mut writer = shapefile::Writer::from_path(path, table).unwrap();
    for (value, polygon) in records {
        let mut record = Record::default();
        record.insert(field.to_string(), FieldValue::Character(Some(value.to_string())));
        writer.write_shape_and_record(polygon, &record).unwrap();
    }
}

#[test]
fn natura_polygons_are_burned_on_a_100m_grid() {
    let (dir, ctx) = data_tree("1");
    let config = NaturaConfig::default();
    write_layer(
        &ctx.paths.potentials_source(&config.source),
        "SITECODE",
        &[
            ("DE0001", rect(4_000_030.0, 3_000_070.0, 4_000_480.0, 3_000_290.0)),
            ("DE0002", rect(4_000_900.0, 3_000_900.0, 4_001_000.0, 3_001_000.0)),
        ],
    );

    let path = rasterize_natura_vector(&ctx.paths, &config).unwrap();
    assert_eq!(path, dir.path().join("generation/vres/potentials/generated/GLAES/natura2000.tif"));

    let raster: Raster<u8> = read_geotiff(&path, None).unwrap();
    assert_eq!(raster.crs(), Some(&CRS::laea_europe()));
    assert_eq!(raster.cell_size(), 100.0);
    assert_eq!(raster.bounds(), (4_000_000.0, 3_000_000.0, 4_001_000.0, 3_001_000.0));
    assert_eq!(raster.count_where(|v| v == 1), 10 + 1);
    assert_eq!(raster.sample(4_000_950.0, 3_000_950.0), Some(1));
    assert_eq!(raster.sample(4_000_550.0, 3_000_550.0), Some(0));
}

#[test]
fn natura_without_source_is_an_error() {
    let (_dir, ctx) = data_tree("1");
    assert!(rasterize_natura_vector(&ctx.paths, &NaturaConfig::default()).is_err());
}

#[test]
fn country_records_are_merged_by_code() {
    let (_dir, ctx) = data_tree("1");
    let config = ShapesConfig::default();
    write_layer(
        &ctx.paths.resolve(&config.offshore.path),
        &config.offshore.code_field,
        &[
            ("DEU", rect(6.0, 53.5, 7.0, 54.5)),
            ("DNK", rect(7.0, 55.0, 8.0, 56.0)),
            ("DEU", rect(13.0, 54.0, 14.0, 55.0)),
        ],
    );
    write_layer(
        &ctx.paths.resolve(&config.onshore.path),
        &config.onshore.code_field,
        &[("DK", rect(8.0, 55.0, 12.0, 57.5)), ("DNK", rect(0.0, 0.0, 1.0, 1.0))],
    );
    let source = ShapefileShapes::new(&config, &ctx.paths);

    let shapes = get_shapes(&source, &[code("DE")], Side::Offshore, None).unwrap();
    assert_eq!(shapes.len(), 1);
    assert_eq!(shapes[0].geometry.polygons().len(), 2);
    assert_eq!(shapes[0].geometry.crs, CRS::wgs84());

    let err = get_shapes(&source, &[code("DE"), code("FR")], Side::Offshore, None).unwrap_err();
    assert!(matches!(err, PriorError::UnknownCountry { .. }), "{err}");

    // onshore records are keyed by alpha-2 codes
    let shapes = get_shapes(&source, &[code("DK")], Side::Onshore, None).unwrap();
    assert_eq!(shapes[0].geometry.polygons().len(), 1);
    assert_eq!(shapes[0].code, code("DK"));
}
