//! Geometry reprojection

use geo::MapCoords;
use geo_types::{Coord, Geometry, LineString, MultiPolygon, Polygon};
use priorgen_core::{CoordTransform, Result, SpatialGeometry, CRS};

/// Transform every vertex of a geometry into `to`
///
/// Edges stay straight in the target CRS; use [`reproject_densified`]
/// when long edges should follow their curved image.
pub fn reproject_geometry(geometry: &SpatialGeometry, to: &CRS) -> Result<SpatialGeometry> {
    let transform = CoordTransform::new(&geometry.crs, to)?;
    if transform.is_identity() {
        return Ok(SpatialGeometry::new(geometry.geometry.clone(), to.clone()));
    }

    let projected = geometry.geometry.map_coords(|c| {
        let (x, y) = transform.transform(c.x, c.y);
        Coord { x, y }
    });
    Ok(SpatialGeometry::new(projected, to.clone()))
}

/// Densify to `max_segment` (source units), then reproject
pub fn reproject_densified(
    geometry: &SpatialGeometry,
    to: &CRS,
    max_segment: f64,
) -> Result<SpatialGeometry> {
    let dense = SpatialGeometry::new(densify(&geometry.geometry, max_segment), geometry.crs.clone());
    reproject_geometry(&dense, to)
}

/// Insert vertices so no polygon or line edge is longer than `max_segment`
///
/// Point geometries are returned unchanged, as are all geometries when
/// `max_segment` is not positive.
pub fn densify(geometry: &Geometry<f64>, max_segment: f64) -> Geometry<f64> {
    if !(max_segment > 0.0) {
        return geometry.clone();
    }
    match geometry {
        Geometry::LineString(ls) => Geometry::LineString(densify_line(ls, max_segment)),
        Geometry::MultiLineString(mls) => Geometry::MultiLineString(
            mls.0.iter().map(|ls| densify_line(ls, max_segment)).collect(),
        ),
        Geometry::Polygon(p) => Geometry::Polygon(densify_polygon(p, max_segment)),
        Geometry::MultiPolygon(mp) => Geometry::MultiPolygon(MultiPolygon::new(
            mp.0.iter().map(|p| densify_polygon(p, max_segment)).collect(),
        )),
        Geometry::Rect(r) => Geometry::Polygon(densify_polygon(&r.to_polygon(), max_segment)),
        Geometry::GeometryCollection(gc) => Geometry::GeometryCollection(
            gc.0.iter().map(|g| densify(g, max_segment)).collect(),
        ),
        other => other.clone(),
    }
}

fn densify_polygon(polygon: &Polygon<f64>, max_segment: f64) -> Polygon<f64> {
    Polygon::new(
        densify_line(polygon.exterior(), max_segment),
        polygon
            .interiors()
            .iter()
            .map(|ring| densify_line(ring, max_segment))
            .collect(),
    )
}

fn densify_line(line: &LineString<f64>, max_segment: f64) -> LineString<f64> {
    let mut coords = Vec::with_capacity(line.0.len());
    for pair in line.0.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let length = (b.x - a.x).hypot(b.y - a.y);
        let steps = (length / max_segment).ceil().max(1.0) as usize;
        for i in 0..steps {
            let t = i as f64 / steps as f64;
            coords.push(Coord {
                x: a.x + t * (b.x - a.x),
                y: a.y + t * (b.y - a.y),
            });
        }
    }
    if let Some(last) = line.0.last() {
        coords.push(*last);
    }
    LineString::new(coords)
}
