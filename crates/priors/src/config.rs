//! Configuration for the prior procedures
//!
//! Every literal of the procedures lives in a `*Config` struct whose
//! `Default` reproduces the reference run, so an empty JSON object `{}`
//! configures the standard priors. Relative paths are resolved against
//! [`DataPaths`].

use crate::error::{PriorError, Result};
use geo_types::{coord, MultiPolygon, Polygon, Rect};
use priorgen_algorithms::vector::{complement_within, largest_part};
use priorgen_core::CRS;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Countries whose offshore territory makes up the shore-proximity region
pub const OFFSHORE_COUNTRIES: [&str; 25] = [
    "AL", "BA", "BE", "BG", "DE", "DK", "EE", "ES", "FI", "FR", "GB", "GR", "HR", "IE", "IT",
    "LT", "LV", "ME", "NL", "NO", "PL", "PT", "RO", "SE", "SI",
];

/// Countries whose onshore territory makes up the interior-shore region
pub const ONSHORE_COUNTRIES: [&str; 33] = [
    "AL", "AT", "BA", "BE", "BG", "CH", "CZ", "DE", "DK", "EE", "ES", "FI", "FR", "GB", "GR",
    "HR", "HU", "IE", "IT", "LT", "LU", "LV", "ME", "MK", "NL", "NO", "PL", "PT", "RO", "RS",
    "SE", "SI", "SK",
];

/// Offshore distance thresholds (m). 111, 185 and 370 km are 60, 100 and
/// 200 nautical miles.
pub const SHORE_DISTANCES: [f64; 8] = [0.0, 20e3, 50e3, 100e3, 111e3, 185e3, 370e3, 500e3];

/// Onshore distance thresholds (m)
pub const INTERIOR_SHORE_DISTANCES: [f64; 5] = [100.0, 250.0, 500.0, 1000.0, 1500.0];

// ─── Identifiers ────────────────────────────────────────────────────────

/// Two-letter uppercase country identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode(String);

impl CountryCode {
    pub fn new(code: &str) -> Result<Self> {
        code.parse()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for CountryCode {
    type Err = PriorError;

    fn from_str(s: &str) -> Result<Self> {
        if s.len() == 2 && s.chars().all(|c| c.is_ascii_uppercase()) {
            Ok(Self(s.to_string()))
        } else {
            Err(PriorError::InvalidCountryCode(s.to_string()))
        }
    }
}

impl TryFrom<String> for CountryCode {
    type Error = PriorError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<CountryCode> for String {
    fn from(code: CountryCode) -> Self {
        code.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// ISO 3166-1 alpha-3 forms of the codes used by the procedures
const ALPHA3: [(&str, &str); 36] = [
    ("AL", "ALB"), ("AT", "AUT"), ("BA", "BIH"), ("BE", "BEL"), ("BG", "BGR"), ("CH", "CHE"),
    ("CY", "CYP"), ("CZ", "CZE"), ("DE", "DEU"), ("DK", "DNK"), ("EE", "EST"), ("ES", "ESP"),
    ("FI", "FIN"), ("FR", "FRA"), ("GB", "GBR"), ("GR", "GRC"), ("HR", "HRV"), ("HU", "HUN"),
    ("IE", "IRL"), ("IS", "ISL"), ("IT", "ITA"), ("LT", "LTU"), ("LU", "LUX"), ("LV", "LVA"),
    ("ME", "MNE"), ("MK", "MKD"), ("MT", "MLT"), ("NL", "NLD"), ("NO", "NOR"), ("PL", "POL"),
    ("PT", "PRT"), ("RO", "ROU"), ("RS", "SRB"), ("SE", "SWE"), ("SI", "SVN"), ("SK", "SVK"),
];

impl CountryCode {
    /// The alpha-3 form, for the European codes the procedures know
    pub fn alpha3(&self) -> Option<&'static str> {
        ALPHA3.iter().find(|(a2, _)| *a2 == self.0).map(|(_, a3)| *a3)
    }
}

fn country_set(codes: &[&str]) -> Vec<CountryCode> {
    codes.iter().map(|c| CountryCode(c.to_string())).collect()
}

/// Which territory of a country a shape covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Onshore,
    Offshore,
}

impl Side {
    /// Upper-case label used in cached shape file names
    pub fn label(&self) -> &'static str {
        match self {
            Side::Onshore => "ONSHORE",
            Side::Offshore => "OFFSHORE",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Onshore => write!(f, "onshore"),
            Side::Offshore => write!(f, "offshore"),
        }
    }
}

// ─── Paths ──────────────────────────────────────────────────────────────

/// The data directory tree all procedures read from and write to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    root: PathBuf,
}

impl DataPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a path relative to the data root; absolute paths pass through
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }

    /// `<root>/generation/vres/potentials`
    pub fn potentials_dir(&self) -> PathBuf {
        self.root.join("generation").join("vres").join("potentials")
    }

    /// A file below `<potentials>/source`
    pub fn potentials_source(&self, path: impl AsRef<Path>) -> PathBuf {
        self.potentials_dir().join("source").join(path)
    }

    /// `<potentials>/generated/GLAES`, where priors are written
    pub fn glaes_output_dir(&self) -> PathBuf {
        self.potentials_dir().join("generated").join("GLAES")
    }
}

// ─── Sections ───────────────────────────────────────────────────────────

/// How a layer spells its country codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeFormat {
    /// ISO 3166-1 alpha-2, e.g. `DE`
    #[default]
    Alpha2,
    /// ISO 3166-1 alpha-3, e.g. `DEU`
    Alpha3,
}

impl CodeFormat {
    /// `code` as it appears in a layer of this format
    pub fn spell(self, code: &CountryCode) -> Option<&str> {
        match self {
            CodeFormat::Alpha2 => Some(code.as_str()),
            CodeFormat::Alpha3 => code.alpha3(),
        }
    }
}

/// A polygon shapefile keyed by a country-code attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapefileLayer {
    /// Path, relative to the data root
    pub path: PathBuf,
    /// Attribute holding the country code
    pub code_field: String,
    #[serde(default)]
    pub code_format: CodeFormat,
}

/// Where country shapes come from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapesConfig {
    pub onshore: ShapefileLayer,
    pub offshore: ShapefileLayer,
    /// EPSG code of the shapefile coordinates
    pub epsg: u32,
    /// Directory for saved `<SIDE>_<CODE>.wkt` shapes, relative to the data root
    pub cache_dir: PathBuf,
}

impl Default for ShapesConfig {
    fn default() -> Self {
        Self {
            onshore: ShapefileLayer {
                path: PathBuf::from("geographics/source/naturalearth/ne_10m_admin_0_countries.shp"),
                code_field: "ISO_A2".to_string(),
                code_format: CodeFormat::Alpha2,
            },
            // Marine Regions EEZ v11 carries alpha-3 territory codes only
            offshore: ShapefileLayer {
                path: PathBuf::from("geographics/source/eez/eez_v11.shp"),
                code_field: "ISO_TER1".to_string(),
                code_format: CodeFormat::Alpha3,
            },
            epsg: 4326,
            cache_dir: PathBuf::from("geographics/generated"),
        }
    }
}

impl ShapesConfig {
    pub fn layer(&self, side: Side) -> &ShapefileLayer {
        match side {
            Side::Onshore => &self.onshore,
            Side::Offshore => &self.offshore,
        }
    }
}

/// Descriptive fields written with a prior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorMetadata {
    pub ftr_id: u32,
    pub name: String,
    pub unit: String,
    pub description: String,
    pub source: String,
}

/// Natura2000 rasterization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NaturaConfig {
    /// Shapefile, relative to `<potentials>/source`
    pub source: PathBuf,
    pub epsg: u32,
    pub pixel_size: f64,
    /// Output file name inside the GLAES output directory
    pub output_name: String,
}

impl Default for NaturaConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from("Natura2000/Natura2000_end2019_epsg3035.shp"),
            epsg: 3035,
            pixel_size: 100.0,
            output_name: "natura2000.tif".to_string(),
        }
    }
}

/// Offshore shore-proximity prior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShoreConfig {
    pub countries: Vec<CountryCode>,
    /// Save the fetched country shapes to the shape cache
    pub save_shapes: bool,
    pub distances: Vec<f64>,
    pub pixel_size: f64,
    /// EPSG code of the region mask
    pub epsg: u32,
    /// Bathymetry raster, relative to `<potentials>/source`
    pub bathymetry: PathBuf,
    /// Bathymetry values counted as land, in interval notation
    pub land_range: String,
    /// Bilinear land fractions above this are land
    pub land_threshold: f64,
    pub metadata: PriorMetadata,
}

impl Default for ShoreConfig {
    fn default() -> Self {
        Self {
            countries: country_set(&OFFSHORE_COUNTRIES),
            save_shapes: true,
            distances: SHORE_DISTANCES.to_vec(),
            pixel_size: 1000.0,
            epsg: 3035,
            bathymetry: PathBuf::from("GEBCO/GEBCO_2019/gebco_2019_n75.0_s30.0_w-20.0_e40.0.tif"),
            land_range: "(0-]".to_string(),
            land_threshold: 0.5,
            metadata: PriorMetadata {
                ftr_id: 0,
                name: "shore_proximity".to_string(),
                unit: "meters".to_string(),
                description: "Indicates pixels which are less-than or equal-to X meters from shore"
                    .to_string(),
                source: "GEBCO".to_string(),
            },
        }
    }
}

/// Which parts of the sea complement feed the interior-shore proximity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplementPart {
    /// Every part of the difference
    #[default]
    All,
    /// Only the part with the largest area
    Largest,
    /// Only the first part produced by the overlay
    First,
}

impl ComplementPart {
    /// Select parts of a complement geometry
    pub fn select(&self, complement: MultiPolygon<f64>) -> MultiPolygon<f64> {
        match self {
            ComplementPart::All => complement,
            ComplementPart::Largest => MultiPolygon::new(largest_part(&complement).into_iter().collect()),
            ComplementPart::First => MultiPolygon::new(complement.0.into_iter().take(1).collect()),
        }
    }
}

/// Axis-aligned frame in which the sea complement is taken
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
    pub epsg: u32,
}

impl Frame {
    pub fn to_polygon(&self) -> Polygon<f64> {
        Rect::new(
            coord! { x: self.xmin, y: self.ymin },
            coord! { x: self.xmax, y: self.ymax },
        )
        .to_polygon()
    }

    pub fn crs(&self) -> CRS {
        CRS::from_epsg(self.epsg)
    }

    /// `frame - geometry`
    pub fn complement(&self, geometry: &MultiPolygon<f64>) -> MultiPolygon<f64> {
        complement_within(&self.to_polygon(), geometry)
    }
}

/// Onshore interior shore-proximity prior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteriorShoreConfig {
    pub countries: Vec<CountryCode>,
    pub save_shapes: bool,
    pub distances: Vec<f64>,
    pub pixel_size: f64,
    /// EPSG code of the region mask
    pub epsg: u32,
    pub frame: Frame,
    /// EPSG code the sea complement is handed over in
    pub complement_epsg: u32,
    pub complement_part: ComplementPart,
    /// Longest complement edge (frame units) before reprojection
    pub densify: f64,
    pub metadata: PriorMetadata,
}

impl Default for InteriorShoreConfig {
    fn default() -> Self {
        Self {
            countries: country_set(&ONSHORE_COUNTRIES),
            save_shapes: false,
            distances: INTERIOR_SHORE_DISTANCES.to_vec(),
            pixel_size: 100.0,
            epsg: 3035,
            frame: Frame {
                xmin: -20.0,
                ymin: 30.0,
                xmax: 40.0,
                ymax: 75.0,
                epsg: 4326,
            },
            complement_epsg: 3857,
            complement_part: ComplementPart::All,
            densify: 0.1,
            metadata: PriorMetadata {
                ftr_id: 0,
                name: "interior_shore_proximity".to_string(),
                unit: "meters".to_string(),
                description:
                    "Indicates pixels which are less-than or equal-to X meters from shore inside shore"
                        .to_string(),
                source: "NaturalEarth".to_string(),
            },
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorgenConfig {
    pub shapes: ShapesConfig,
    pub natura: NaturaConfig,
    pub shore: ShoreConfig,
    pub interior_shore: InteriorShoreConfig,
}

impl PriorgenConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Area;
    use geo_types::polygon;

    #[test]
    fn test_empty_json_is_default() {
        let config = PriorgenConfig::from_json_str("{}").unwrap();
        assert_eq!(config, PriorgenConfig::default());
        assert_eq!(config.shore.countries.len(), 25);
        assert_eq!(config.interior_shore.countries.len(), 33);
        assert_eq!(config.shore.distances, SHORE_DISTANCES.to_vec());
        assert_eq!(config.interior_shore.distances, INTERIOR_SHORE_DISTANCES.to_vec());
    }

    #[test]
    fn test_partial_section_override() {
        let config = PriorgenConfig::from_json_str(
            r#"{"shore": {"countries": ["DE", "DK"], "pixel_size": 500}, "interior_shore": {"complement_part": "largest"}}"#,
        )
        .unwrap();
        assert_eq!(config.shore.countries, country_set(&["DE", "DK"]));
        assert_eq!(config.shore.pixel_size, 500.0);
        assert_eq!(config.shore.distances, SHORE_DISTANCES.to_vec());
        assert_eq!(config.interior_shore.complement_part, ComplementPart::Largest);
    }

    #[test]
    fn test_invalid_country_code_rejected() {
        assert!(PriorgenConfig::from_json_str(r#"{"shore": {"countries": ["de"]}}"#).is_err());
        assert!(CountryCode::new("DEU").is_err());
        assert_eq!(CountryCode::new("NO").unwrap().as_str(), "NO");
    }

    #[test]
    fn test_offshore_layer_uses_alpha3_territory_codes() {
        let shapes = ShapesConfig::default();
        assert_eq!(shapes.offshore.code_field, "ISO_TER1");
        assert_eq!(shapes.offshore.code_format, CodeFormat::Alpha3);
        assert_eq!(shapes.onshore.code_format, CodeFormat::Alpha2);

        for code in OFFSHORE_COUNTRIES.iter().chain(ONSHORE_COUNTRIES.iter()) {
            let code = CountryCode::new(code).unwrap();
            assert!(code.alpha3().is_some(), "{code} has no alpha-3 form");
        }
        let gb = CountryCode::new("GB").unwrap();
        assert_eq!(CodeFormat::Alpha3.spell(&gb), Some("GBR"));
        assert_eq!(CodeFormat::Alpha2.spell(&gb), Some("GB"));
        assert_eq!(CodeFormat::Alpha3.spell(&CountryCode::new("ZZ").unwrap()), None);

        let config = PriorgenConfig::from_json_str(
            r#"{"shapes": {"offshore": {"path": "eez.shp", "code_field": "ISO2"}}}"#,
        )
        .unwrap();
        assert_eq!(config.shapes.offshore.code_format, CodeFormat::Alpha2);
        assert_eq!(config.shapes.onshore, ShapesConfig::default().onshore);
    }

    #[test]
    fn test_distance_lists_are_sorted() {
        assert!(SHORE_DISTANCES.windows(2).all(|w| w[0] <= w[1]));
        assert!(INTERIOR_SHORE_DISTANCES.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_data_paths_layout() {
        let paths = DataPaths::new("/data");
        assert_eq!(
            paths.potentials_source("GEBCO/x.tif"),
            PathBuf::from("/data/generation/vres/potentials/source/GEBCO/x.tif")
        );
        assert_eq!(
            paths.glaes_output_dir(),
            PathBuf::from("/data/generation/vres/potentials/generated/GLAES")
        );
        assert_eq!(paths.resolve("/abs/file.shp"), PathBuf::from("/abs/file.shp"));
    }

    #[test]
    fn test_complement_parts() {
        let frame = Frame { xmin: 0.0, ymin: 0.0, xmax: 10.0, ymax: 10.0, epsg: 4326 };
        let land = MultiPolygon::new(vec![
            polygon![(x: 2.0, y: -1.0), (x: 4.0, y: -1.0), (x: 4.0, y: 11.0), (x: 2.0, y: 11.0)],
        ]);

        let sea = frame.complement(&land);
        assert_eq!(ComplementPart::All.select(sea.clone()).0.len(), 2);
        assert_eq!(ComplementPart::First.select(sea.clone()).0.len(), 1);

        let largest = ComplementPart::Largest.select(sea);
        assert_eq!(largest.0.len(), 1);
        assert!((largest.unsigned_area() - 60.0).abs() < 1e-9);
    }
}
