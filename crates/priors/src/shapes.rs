//! Country shape lookup
//!
//! Shapes are looked up per [`Side`] from a [`ShapeSource`]. The default
//! source reads polygon shapefiles keyed by a country-code attribute; tests
//! and callers with preloaded shapes use [`InMemoryShapes`].

use crate::config::{CountryCode, DataPaths, ShapefileLayer, ShapesConfig, Side};
use crate::error::{PriorError, Result};
use geo_types::{Geometry, MultiPolygon, Polygon};
use priorgen_core::io::read_shapefile;
use priorgen_core::{SpatialGeometry, CRS};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// One country's territory on one side of the shore
#[derive(Debug, Clone, PartialEq)]
pub struct CountryShape {
    pub code: CountryCode,
    pub side: Side,
    pub geometry: SpatialGeometry,
}

impl CountryShape {
    /// File name of the saved shape, e.g. `OFFSHORE_DE.wkt`
    pub fn file_name(&self) -> String {
        format!("{}_{}.wkt", self.side.label(), self.code)
    }
}

/// Anything that can resolve country codes to shapes
pub trait ShapeSource {
    /// Shapes for `countries`, in the requested order
    ///
    /// Fails with [`PriorError::UnknownCountry`] on the first code the
    /// source does not know.
    fn lookup(&self, countries: &[CountryCode], side: Side) -> Result<Vec<CountryShape>>;
}

/// Country shapes read from polygon shapefiles
#[derive(Debug, Clone)]
pub struct ShapefileShapes {
    onshore: ShapefileLayer,
    offshore: ShapefileLayer,
    crs: CRS,
}

impl ShapefileShapes {
    pub fn new(config: &ShapesConfig, paths: &DataPaths) -> Self {
        let layer = |side| {
            let layer = config.layer(side);
            ShapefileLayer {
                path: paths.resolve(&layer.path),
                ..layer.clone()
            }
        };
        Self {
            onshore: layer(Side::Onshore),
            offshore: layer(Side::Offshore),
            crs: CRS::from_epsg(config.epsg),
        }
    }
}

impl ShapeSource for ShapefileShapes {
    fn lookup(&self, countries: &[CountryCode], side: Side) -> Result<Vec<CountryShape>> {
        let layer = match side {
            Side::Onshore => &self.onshore,
            Side::Offshore => &self.offshore,
        };
        let (path, field) = (&layer.path, &layer.code_field);

        let features = read_shapefile(path, &[field.as_str()], Some(self.crs.clone()))?;
        debug!(path = %path.display(), features = features.len(), "read country shapefile");

        // a country may span several records
        let mut by_code: HashMap<&str, Vec<Polygon<f64>>> = HashMap::new();
        for feature in features.iter() {
            let (Some(code), Some(geometry)) = (
                feature.get_property(field).and_then(|v| v.as_str()),
                feature.geometry.as_ref(),
            ) else {
                continue;
            };
            by_code
                .entry(code)
                .or_default()
                .extend(priorgen_core::vector::polygons_of(geometry));
        }

        countries
            .iter()
            .map(|code| {
                let polygons = layer
                    .code_format
                    .spell(code)
                    .and_then(|key| by_code.get(key))
                    .ok_or_else(|| PriorError::UnknownCountry {
                        code: code.to_string(),
                        side,
                    })?;
                Ok(CountryShape {
                    code: code.clone(),
                    side,
                    geometry: SpatialGeometry::new(MultiPolygon::new(polygons.clone()), self.crs.clone()),
                })
            })
            .collect()
    }
}

/// Preloaded country shapes
#[derive(Debug, Clone, Default)]
pub struct InMemoryShapes {
    shapes: HashMap<(Side, CountryCode), SpatialGeometry>,
}

impl InMemoryShapes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, side: Side, code: CountryCode, geometry: SpatialGeometry) {
        self.shapes.insert((side, code), geometry);
    }

    pub fn with(mut self, side: Side, code: CountryCode, geometry: impl Into<Geometry<f64>>, crs: CRS) -> Self {
        self.insert(side, code, SpatialGeometry::new(geometry, crs));
        self
    }
}

impl ShapeSource for InMemoryShapes {
    fn lookup(&self, countries: &[CountryCode], side: Side) -> Result<Vec<CountryShape>> {
        countries
            .iter()
            .map(|code| {
                let geometry = self
                    .shapes
                    .get(&(side, code.clone()))
                    .ok_or_else(|| PriorError::UnknownCountry {
                        code: code.to_string(),
                        side,
                    })?;
                Ok(CountryShape {
                    code: code.clone(),
                    side,
                    geometry: geometry.clone(),
                })
            })
            .collect()
    }
}

/// Fetch country shapes, optionally saving each as WKT into `save`
///
/// Saved files are named `<SIDE>_<CODE>.wkt`; the directory is created if
/// missing.
pub fn get_shapes<S: ShapeSource + ?Sized>(
    source: &S,
    countries: &[CountryCode],
    side: Side,
    save: Option<&Path>,
) -> Result<Vec<CountryShape>> {
    let shapes = source.lookup(countries, side)?;
    info!(side = %side, countries = shapes.len(), "fetched country shapes");

    if let Some(dir) = save {
        fs::create_dir_all(dir)?;
        for shape in &shapes {
            fs::write(dir.join(shape.file_name()), shape.geometry.to_wkt())?;
        }
        debug!(dir = %dir.display(), "saved country shapes");
    }

    Ok(shapes)
}
