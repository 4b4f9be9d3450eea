//! Polygon union

use super::reproject::reproject_geometry;
use geo::BooleanOps;
use geo_types::{Geometry, MultiPolygon, Polygon};
use priorgen_core::{Error, Result, SpatialGeometry, CRS};
use tracing::debug;

/// Dissolve polygons into a single multipolygon
///
/// Parts are merged pairwise in rounds, so each boolean operation works on
/// operands of similar size. An empty input gives an empty multipolygon.
pub fn unary_union<I>(polygons: I) -> MultiPolygon<f64>
where
    I: IntoIterator<Item = Polygon<f64>>,
{
    let mut parts: Vec<MultiPolygon<f64>> = polygons
        .into_iter()
        .map(|p| MultiPolygon::new(vec![p]))
        .collect();

    while parts.len() > 1 {
        let mut merged = Vec::with_capacity(parts.len() / 2 + 1);
        let mut iter = parts.into_iter();
        while let Some(a) = iter.next() {
            merged.push(match iter.next() {
                Some(b) => a.union(&b),
                None => a,
            });
        }
        parts = merged;
    }

    parts.pop().unwrap_or_else(|| MultiPolygon::new(vec![]))
}

/// Union geometries from possibly different CRSs, expressed in `crs`
pub fn union_geometries(geometries: &[SpatialGeometry], crs: &CRS) -> Result<SpatialGeometry> {
    let mut polygons = Vec::new();
    for geometry in geometries {
        polygons.extend(reproject_geometry(geometry, crs)?.polygons());
    }
    if polygons.is_empty() {
        return Err(Error::InvalidGeometry("union of empty geometry set".into()));
    }

    let count = polygons.len();
    let union = unary_union(polygons);
    debug!(inputs = count, parts = union.0.len(), "dissolved polygons");

    Ok(SpatialGeometry::new(Geometry::MultiPolygon(union), crs.clone()))
}
