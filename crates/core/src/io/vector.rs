//! ESRI shapefile reading

use crate::crs::CRS;
use crate::error::{Error, Result};
use crate::vector::{AttributeValue, Feature, FeatureCollection};
use geo::Contains;
use geo_types::{Coord, Geometry, LineString, MultiPolygon, Point, Polygon};
use shapefile::dbase::{FieldValue, Record};
use shapefile::{PolygonRing, Reader, Shape};
use std::path::Path;

/// Read the polygon features of a shapefile
///
/// Only the attribute columns named in `fields` are copied onto the
/// features. Null shapes are skipped; any non-polygon shape is an error.
/// `crs` tags the collection, since `.prj` files are not interpreted.
pub fn read_shapefile<P: AsRef<Path>>(
    path: P,
    fields: &[&str],
    crs: Option<CRS>,
) -> Result<FeatureCollection> {
    let path = path.as_ref();
    let mut reader = Reader::from_path(path)?;
    let mut collection = FeatureCollection::new(crs);

    for result in reader.iter_shapes_and_records() {
        let (shape, record) = result?;
        let geometry = match shape {
            Shape::Polygon(polygon) => polygon_geometry(polygon.rings()),
            Shape::NullShape => continue,
            other => {
                return Err(Error::Shapefile(format!(
                    "{}: unsupported shape type {:?}",
                    path.display(),
                    other.shapetype()
                )))
            }
        };

        let Some(geometry) = geometry else {
            continue;
        };
        let mut feature = Feature::new(geometry);
        for field in fields {
            feature.set_property(*field, attribute(&record, field));
        }
        collection.push(feature);
    }

    Ok(collection)
}

fn attribute(record: &Record, field: &str) -> AttributeValue {
    match record.get(field) {
        Some(FieldValue::Character(Some(s))) => AttributeValue::String(s.trim().to_string()),
        Some(FieldValue::Memo(s)) => AttributeValue::String(s.clone()),
        Some(FieldValue::Numeric(Some(v))) | Some(FieldValue::Double(v)) | Some(FieldValue::Currency(v)) => {
            AttributeValue::Float(*v)
        }
        Some(FieldValue::Float(Some(v))) => AttributeValue::Float(*v as f64),
        Some(FieldValue::Integer(v)) => AttributeValue::Int(*v as i64),
        Some(FieldValue::Logical(Some(b))) => AttributeValue::Bool(*b),
        _ => AttributeValue::Null,
    }
}

/// Assemble shapefile rings into a (multi)polygon
///
/// Each inner ring is attached to the first outer ring containing its
/// first vertex.
fn polygon_geometry(rings: &[PolygonRing<shapefile::Point>]) -> Option<Geometry<f64>> {
    let mut polygons: Vec<Polygon<f64>> = Vec::new();
    let mut holes: Vec<LineString<f64>> = Vec::new();

    for ring in rings {
        let line: LineString<f64> = ring
            .points()
            .iter()
            .map(|p| Coord { x: p.x, y: p.y })
            .collect();
        match ring {
            PolygonRing::Outer(_) => polygons.push(Polygon::new(line, vec![])),
            PolygonRing::Inner(_) => holes.push(line),
        }
    }

    for hole in holes {
        let Some(first) = hole.0.first().copied() else {
            continue;
        };
        let first_point = Point::from(first);
        if let Some(owner) = polygons.iter_mut().find(|p| p.contains(&first_point)) {
            owner.interiors_push(hole);
        }
    }

    match polygons.len() {
        0 => None,
        1 => polygons.pop().map(Geometry::Polygon),
        _ => Some(Geometry::MultiPolygon(MultiPolygon(polygons))),
    }
}
