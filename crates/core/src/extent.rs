//! Map extents that snap to pixel grids and move between CRSs

use crate::crs::{CoordTransform, CRS};
use crate::error::{Error, Result};
use crate::raster::GeoTransform;
use crate::vector::FeatureCollection;
use geo::BoundingRect;
use geo_types::{Geometry, LineString, Polygon};
use serde::{Deserialize, Serialize};

/// Points sampled along each edge when reprojecting an extent
const CAST_EDGE_SAMPLES: usize = 64;

/// An axis-aligned bounding box in a known CRS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
    pub crs: CRS,
}

impl Extent {
    /// Create an extent, rejecting inverted or non-finite bounds
    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64, crs: CRS) -> Result<Self> {
        let finite = [xmin, ymin, xmax, ymax].iter().all(|v| v.is_finite());
        if !finite || xmin > xmax || ymin > ymax {
            return Err(Error::InvalidExtent { xmin, ymin, xmax, ymax });
        }
        Ok(Self { xmin, ymin, xmax, ymax, crs })
    }

    /// Bounding extent of a geometry whose coordinates are in `crs`
    pub fn from_geometry(geometry: &Geometry<f64>, crs: CRS) -> Result<Self> {
        let rect = geometry
            .bounding_rect()
            .ok_or_else(|| Error::InvalidGeometry("cannot compute extent of empty geometry".into()))?;
        Self::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y, crs)
    }

    /// Bounding extent of several geometries in the same CRS
    pub fn from_geometries<'a, I>(geometries: I, crs: CRS) -> Result<Self>
    where
        I: IntoIterator<Item = &'a Geometry<f64>>,
    {
        let mut acc: Option<Extent> = None;
        for geometry in geometries {
            let Some(rect) = geometry.bounding_rect() else {
                continue;
            };
            let ext = Self::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y, crs.clone())?;
            acc = Some(match acc {
                Some(a) => a.union(&ext)?,
                None => ext,
            });
        }
        acc.ok_or_else(|| Error::InvalidGeometry("no geometries to compute extent from".into()))
    }

    /// Bounding extent of a feature collection, in the collection's CRS
    pub fn from_features(features: &FeatureCollection) -> Result<Self> {
        let crs = features
            .crs
            .clone()
            .ok_or_else(|| Error::InvalidGeometry("feature collection has no CRS".into()))?;
        Self::from_geometries(features.geometries(), crs)
    }

    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    /// (xmin, ymin, xmax, ymax)
    pub fn xy_xy(&self) -> (f64, f64, f64, f64) {
        (self.xmin, self.ymin, self.xmax, self.ymax)
    }

    /// Whether `other` lies entirely inside this extent (same CRS)
    pub fn contains(&self, other: &Extent) -> bool {
        self.crs.is_equivalent(&other.crs)
            && other.xmin >= self.xmin
            && other.xmax <= self.xmax
            && other.ymin >= self.ymin
            && other.ymax <= self.ymax
    }

    /// Smallest extent covering both
    pub fn union(&self, other: &Extent) -> Result<Extent> {
        if !self.crs.is_equivalent(&other.crs) {
            return Err(Error::CrsMismatch(self.crs.identifier(), other.crs.identifier()));
        }
        Self::new(
            self.xmin.min(other.xmin),
            self.ymin.min(other.ymin),
            self.xmax.max(other.xmax),
            self.ymax.max(other.ymax),
            self.crs.clone(),
        )
    }

    /// Grow the extent outward so every edge is a multiple of `unit`
    pub fn fit(&self, unit: f64) -> Result<Extent> {
        if !(unit > 0.0 && unit.is_finite()) {
            return Err(Error::InvalidParameter {
                name: "unit",
                value: unit.to_string(),
                reason: "must be a positive finite number".into(),
            });
        }
        Self::new(
            (self.xmin / unit).floor() * unit,
            (self.ymin / unit).floor() * unit,
            (self.xmax / unit).ceil() * unit,
            (self.ymax / unit).ceil() * unit,
            self.crs.clone(),
        )
    }

    /// Reproject the extent into `crs`.
    ///
    /// Edges are densified before transforming, so curved edges in the
    /// target CRS are still enclosed.
    pub fn cast_to(&self, crs: &CRS) -> Result<Extent> {
        let transform = CoordTransform::new(&self.crs, crs)?;
        if transform.is_identity() {
            return Ok(Extent { crs: crs.clone(), ..self.clone() });
        }

        let mut bounds = (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
        for i in 0..=CAST_EDGE_SAMPLES {
            let t = i as f64 / CAST_EDGE_SAMPLES as f64;
            let x = self.xmin + t * self.width();
            let y = self.ymin + t * self.height();
            for (px, py) in [(x, self.ymin), (x, self.ymax), (self.xmin, y), (self.xmax, y)] {
                let (tx, ty) = transform.transform(px, py);
                bounds = (bounds.0.min(tx), bounds.1.min(ty), bounds.2.max(tx), bounds.3.max(ty));
            }
        }

        Self::new(bounds.0, bounds.1, bounds.2, bounds.3, crs.clone())
    }

    /// Grid shape (rows, cols) at a square pixel size
    pub fn grid_shape(&self, pixel_size: f64) -> (usize, usize) {
        let rows = (self.height() / pixel_size).round().max(0.0) as usize;
        let cols = (self.width() / pixel_size).round().max(0.0) as usize;
        (rows, cols)
    }

    /// North-up transform for a grid covering this extent
    pub fn geo_transform(&self, pixel_size: f64) -> GeoTransform {
        GeoTransform::north_up(self.xmin, self.ymax, pixel_size)
    }

    /// The extent as a closed rectangular polygon
    pub fn to_polygon(&self) -> Polygon<f64> {
        Polygon::new(
            LineString::from(vec![
                (self.xmin, self.ymin),
                (self.xmax, self.ymin),
                (self.xmax, self.ymax),
                (self.xmin, self.ymax),
                (self.xmin, self.ymin),
            ]),
            vec![],
        )
    }
}
