//! Coordinate Reference System handling

mod transform;

pub use transform::CoordTransform;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coordinate Reference System representation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CRS {
    /// WKT representation, if the CRS came from a file without an EPSG code
    wkt: Option<String>,
    /// EPSG code if known
    epsg: Option<u32>,
}

impl CRS {
    /// Create a CRS from an EPSG code
    pub fn from_epsg(code: u32) -> Self {
        Self {
            wkt: None,
            epsg: Some(code),
        }
    }

    /// Create a CRS from a WKT string
    pub fn from_wkt(wkt: impl Into<String>) -> Self {
        Self {
            wkt: Some(wkt.into()),
            epsg: None,
        }
    }

    /// WGS84 geographic CRS (EPSG:4326)
    pub fn wgs84() -> Self {
        Self::from_epsg(4326)
    }

    /// Web Mercator (EPSG:3857)
    pub fn web_mercator() -> Self {
        Self::from_epsg(3857)
    }

    /// ETRS89 Lambert Azimuthal Equal-Area Europe (EPSG:3035)
    pub fn laea_europe() -> Self {
        Self::from_epsg(3035)
    }

    /// Get EPSG code if known
    pub fn epsg(&self) -> Option<u32> {
        self.epsg
    }

    /// Get WKT representation
    pub fn wkt(&self) -> Option<&str> {
        self.wkt.as_deref()
    }

    /// Check if two CRS are equivalent
    pub fn is_equivalent(&self, other: &CRS) -> bool {
        if let (Some(a), Some(b)) = (self.epsg, other.epsg) {
            return a == b;
        }

        // WKT comparison is textual only
        if let (Some(a), Some(b)) = (&self.wkt, &other.wkt) {
            return a == b;
        }

        false
    }

    /// Whether coordinates in this CRS are longitude/latitude degrees
    pub fn is_geographic(&self) -> bool {
        self.epsg == Some(4326)
    }

    /// Get a string identifier for this CRS
    pub fn identifier(&self) -> String {
        if let Some(code) = self.epsg {
            return format!("EPSG:{}", code);
        }
        if let Some(wkt) = &self.wkt {
            return format!("WKT:{}", wkt.chars().take(50).collect::<String>());
        }
        "Unknown".to_string()
    }
}

impl fmt::Display for CRS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

impl Default for CRS {
    fn default() -> Self {
        Self::laea_europe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crs_epsg() {
        let crs = CRS::from_epsg(3035);
        assert_eq!(crs.epsg(), Some(3035));
        assert_eq!(crs.identifier(), "EPSG:3035");
    }

    #[test]
    fn test_crs_equivalence() {
        assert!(CRS::from_epsg(4326).is_equivalent(&CRS::wgs84()));
        assert!(!CRS::wgs84().is_equivalent(&CRS::web_mercator()));
        assert!(!CRS::wgs84().is_equivalent(&CRS::from_wkt("GEOGCS[...]")));
    }

    #[test]
    fn test_wkt_identifier_truncates_on_characters() {
        // 49 ASCII bytes put the two-byte 'é' across the 50-byte mark
        let wkt = format!("{}é{}", "P".repeat(49), "x".repeat(20));
        let id = CRS::from_wkt(wkt).identifier();
        assert_eq!(id, format!("WKT:{}é", "P".repeat(49)));

        assert_eq!(CRS::from_wkt("GEOGCS[\"Réseau\"]").identifier(), "WKT:GEOGCS[\"Réseau\"]");
    }

    #[test]
    fn test_default_is_european_equal_area() {
        assert_eq!(CRS::default(), CRS::laea_europe());
    }
}
