//! Vector data structures: features with attributes, and CRS-tagged geometries

use crate::crs::CRS;
use crate::error::{Error, Result};
use crate::extent::Extent;
use geo_types::{Geometry, MultiPolygon, Polygon};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use wkt::{ToWkt, TryFromWkt};

/// Attribute value types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl AttributeValue {
    /// Text content, if this is a non-empty string attribute
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) if !s.is_empty() => Some(s),
            _ => None,
        }
    }
}

/// A geographic feature with geometry and attributes
#[derive(Debug, Clone)]
pub struct Feature {
    /// Feature geometry
    pub geometry: Option<Geometry<f64>>,
    /// Feature attributes
    pub properties: HashMap<String, AttributeValue>,
}

impl Feature {
    /// Create a new feature with geometry
    pub fn new(geometry: Geometry<f64>) -> Self {
        Self {
            geometry: Some(geometry),
            properties: HashMap::new(),
        }
    }

    /// Set an attribute
    pub fn set_property(&mut self, key: impl Into<String>, value: AttributeValue) {
        self.properties.insert(key.into(), value);
    }

    /// Get an attribute
    pub fn get_property(&self, key: &str) -> Option<&AttributeValue> {
        self.properties.get(key)
    }
}

/// Collection of features sharing one CRS
#[derive(Debug, Clone, Default)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
    /// CRS of every geometry in the collection, when known
    pub crs: Option<CRS>,
}

impl FeatureCollection {
    pub fn new(crs: Option<CRS>) -> Self {
        Self {
            features: Vec::new(),
            crs,
        }
    }

    pub fn push(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }

    /// All non-null geometries
    pub fn geometries(&self) -> impl Iterator<Item = &Geometry<f64>> {
        self.features.iter().filter_map(|f| f.geometry.as_ref())
    }
}

impl IntoIterator for FeatureCollection {
    type Item = Feature;
    type IntoIter = std::vec::IntoIter<Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.into_iter()
    }
}

/// A geometry together with the CRS its coordinates are expressed in
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialGeometry {
    pub geometry: Geometry<f64>,
    pub crs: CRS,
}

impl SpatialGeometry {
    pub fn new(geometry: impl Into<Geometry<f64>>, crs: CRS) -> Self {
        Self {
            geometry: geometry.into(),
            crs,
        }
    }

    /// Bounding extent in the geometry's own CRS
    pub fn extent(&self) -> Result<Extent> {
        Extent::from_geometry(&self.geometry, self.crs.clone())
    }

    /// Polygonal parts of the geometry; non-areal parts are dropped
    pub fn polygons(&self) -> Vec<Polygon<f64>> {
        polygons_of(&self.geometry)
    }

    /// The polygonal parts as a single multipolygon
    pub fn to_multi_polygon(&self) -> MultiPolygon<f64> {
        MultiPolygon::new(self.polygons())
    }

    /// Well-known text of the geometry (the CRS is not encoded)
    pub fn to_wkt(&self) -> String {
        self.geometry.wkt_string()
    }

    /// Parse well-known text whose coordinates are in `crs`
    pub fn from_wkt(text: &str, crs: CRS) -> Result<Self> {
        let geometry = Geometry::<f64>::try_from_wkt_str(text)
            .map_err(|e| Error::InvalidGeometry(format!("invalid WKT: {e}")))?;
        Ok(Self { geometry, crs })
    }
}

/// Flatten the polygonal parts of any geometry
pub fn polygons_of(geometry: &Geometry<f64>) -> Vec<Polygon<f64>> {
    match geometry {
        Geometry::Polygon(p) => vec![p.clone()],
        Geometry::MultiPolygon(mp) => mp.0.clone(),
        Geometry::Rect(r) => vec![r.to_polygon()],
        Geometry::Triangle(t) => vec![t.to_polygon()],
        Geometry::GeometryCollection(gc) => gc.0.iter().flat_map(polygons_of).collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{point, polygon, GeometryCollection};

    #[test]
    fn test_polygons_of_collection() {
        let square = polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 1.0)];
        let gc = Geometry::GeometryCollection(GeometryCollection(vec![
            Geometry::Polygon(square.clone()),
            Geometry::Point(point!(x: 3.0, y: 3.0)),
            Geometry::MultiPolygon(MultiPolygon::new(vec![square.clone(), square])),
        ]));
        assert_eq!(polygons_of(&gc).len(), 3);
    }

    #[test]
    fn test_feature_collection_extent() {
        let mut fc = FeatureCollection::new(Some(CRS::laea_europe()));
        let mut f = Feature::new(polygon![(x: 10.0, y: 20.0), (x: 30.0, y: 20.0), (x: 30.0, y: 40.0)].into());
        f.set_property("SITECODE", AttributeValue::String("DE1234".into()));
        fc.push(f);
        fc.push(Feature {
            geometry: None,
            properties: HashMap::new(),
        });

        let ext = Extent::from_features(&fc).unwrap();
        assert_eq!(ext.xy_xy(), (10.0, 20.0, 30.0, 40.0));
        assert_eq!(fc.features[0].get_property("SITECODE").and_then(|v| v.as_str()), Some("DE1234"));
    }

    #[test]
    fn test_wkt_roundtrip_keeps_crs() {
        let square = polygon![(x: 0.0, y: 0.0), (x: 2.0, y: 0.0), (x: 2.0, y: 2.0), (x: 0.0, y: 2.0)];
        let sg = SpatialGeometry::new(square, CRS::wgs84());
        let text = sg.to_wkt();
        assert!(text.starts_with("POLYGON"));

        let parsed = SpatialGeometry::from_wkt(&text, CRS::wgs84()).unwrap();
        assert_eq!(parsed, sg);
        assert!(SpatialGeometry::from_wkt("POLYGON((0 0,", CRS::wgs84()).is_err());
    }
}
