//! Pure-Rust reprojection between the CRSs used by the prior pipeline.
//!
//! Supports EPSG:4326 (WGS84 lon/lat), EPSG:3857 (spherical Web Mercator)
//! and EPSG:3035 (ETRS89 LAEA Europe, ellipsoidal Lambert Azimuthal
//! Equal-Area on GRS80). Formulas follow Snyder (1987), USGS Prof. Paper
//! 1395, and IOGP Guidance Note 7-2. No libproj, so no C dependency.

use super::CRS;
use crate::error::{Error, Result};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

// ── Web Mercator ─────────────────────────────────────────────────────────

const MERCATOR_RADIUS: f64 = 6_378_137.0;
/// Latitude at which Web Mercator becomes square
const MERCATOR_MAX_LAT: f64 = 85.051_128_779_806_59;

// ── GRS80 / LAEA Europe ─────────────────────────────────────────────────

const GRS80_A: f64 = 6_378_137.0;
const GRS80_F: f64 = 1.0 / 298.257_222_101;
const LAEA_LAT0: f64 = 52.0;
const LAEA_LON0: f64 = 10.0;
const LAEA_FALSE_EASTING: f64 = 4_321_000.0;
const LAEA_FALSE_NORTHING: f64 = 3_210_000.0;

/// Projection supported by [`CoordTransform`]
#[derive(Debug, Clone, Copy, PartialEq)]
enum Projection {
    Geographic,
    WebMercator,
    Laea(LaeaParams),
}

impl Projection {
    fn from_crs(crs: &CRS) -> Option<Self> {
        match crs.epsg()? {
            4326 => Some(Projection::Geographic),
            3857 | 900913 => Some(Projection::WebMercator),
            3035 => Some(Projection::Laea(LaeaParams::europe())),
            _ => None,
        }
    }

    /// Projected (x, y) → (lon, lat) degrees
    fn to_geographic(&self, x: f64, y: f64) -> (f64, f64) {
        match self {
            Projection::Geographic => (x, y),
            Projection::WebMercator => {
                let lon = (x / MERCATOR_RADIUS).to_degrees();
                let lat = (2.0 * (y / MERCATOR_RADIUS).exp().atan() - FRAC_PI_2).to_degrees();
                (lon, lat)
            }
            Projection::Laea(p) => p.inverse(x, y),
        }
    }

    /// (lon, lat) degrees → projected (x, y)
    fn from_geographic(&self, lon: f64, lat: f64) -> (f64, f64) {
        match self {
            Projection::Geographic => (lon, lat),
            Projection::WebMercator => {
                let lat = lat.clamp(-MERCATOR_MAX_LAT, MERCATOR_MAX_LAT);
                let x = MERCATOR_RADIUS * lon.to_radians();
                let y = MERCATOR_RADIUS * (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
                (x, y)
            }
            Projection::Laea(p) => p.forward(lon, lat),
        }
    }
}

/// Precomputed constants of an ellipsoidal LAEA projection (EPSG method 9820)
#[derive(Debug, Clone, Copy, PartialEq)]
struct LaeaParams {
    e: f64,
    e2: f64,
    lon0: f64,
    beta0: f64,
    qp: f64,
    rq: f64,
    d: f64,
    false_easting: f64,
    false_northing: f64,
}

impl LaeaParams {
    fn europe() -> Self {
        Self::new(GRS80_A, GRS80_F, LAEA_LAT0, LAEA_LON0, LAEA_FALSE_EASTING, LAEA_FALSE_NORTHING)
    }

    fn new(a: f64, f: f64, lat0_deg: f64, lon0_deg: f64, fe: f64, fn_: f64) -> Self {
        let e2 = 2.0 * f - f * f;
        let e = e2.sqrt();
        let lat0 = lat0_deg.to_radians();

        let qp = authalic_q(FRAC_PI_2, e, e2);
        let q0 = authalic_q(lat0, e, e2);
        let beta0 = (q0 / qp).asin();
        let rq = a * (qp / 2.0).sqrt();
        let d = a * (lat0.cos() / (1.0 - e2 * lat0.sin().powi(2)).sqrt()) / (rq * beta0.cos());

        Self {
            e,
            e2,
            lon0: lon0_deg.to_radians(),
            beta0,
            qp,
            rq,
            d,
            false_easting: fe,
            false_northing: fn_,
        }
    }

    fn forward(&self, lon_deg: f64, lat_deg: f64) -> (f64, f64) {
        let lat = lat_deg.to_radians();
        let dlon = lon_deg.to_radians() - self.lon0;

        let q = authalic_q(lat, self.e, self.e2);
        let beta = (q / self.qp).clamp(-1.0, 1.0).asin();

        let denom = 1.0 + self.beta0.sin() * beta.sin() + self.beta0.cos() * beta.cos() * dlon.cos();
        let b = self.rq * (2.0 / denom).sqrt();

        let x = self.false_easting + b * self.d * beta.cos() * dlon.sin();
        let y = self.false_northing
            + (b / self.d)
                * (self.beta0.cos() * beta.sin() - self.beta0.sin() * beta.cos() * dlon.cos());
        (x, y)
    }

    fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let de = x - self.false_easting;
        let dn = y - self.false_northing;

        let rho = ((de / self.d).powi(2) + (self.d * dn).powi(2)).sqrt();
        if rho < 1e-9 {
            return (self.lon0.to_degrees(), self.beta0_latitude().to_degrees());
        }

        let c = 2.0 * (rho / (2.0 * self.rq)).clamp(-1.0, 1.0).asin();
        let beta = (c.cos() * self.beta0.sin() + self.d * dn * c.sin() * self.beta0.cos() / rho)
            .clamp(-1.0, 1.0)
            .asin();

        let lon = self.lon0
            + (de * c.sin()).atan2(
                self.d * rho * self.beta0.cos() * c.cos()
                    - self.d * self.d * dn * self.beta0.sin() * c.sin(),
            );

        (lon.to_degrees(), self.authalic_to_geodetic(beta).to_degrees())
    }

    fn beta0_latitude(&self) -> f64 {
        self.authalic_to_geodetic(self.beta0)
    }

    /// Series expansion from authalic latitude back to geodetic latitude
    fn authalic_to_geodetic(&self, beta: f64) -> f64 {
        let e2 = self.e2;
        let e4 = e2 * e2;
        let e6 = e4 * e2;
        beta + (e2 / 3.0 + 31.0 * e4 / 180.0 + 517.0 * e6 / 5040.0) * (2.0 * beta).sin()
            + (23.0 * e4 / 360.0 + 251.0 * e6 / 3780.0) * (4.0 * beta).sin()
            + (761.0 * e6 / 45360.0) * (6.0 * beta).sin()
    }
}

/// Authalic q function (Snyder eq. 3-12)
fn authalic_q(lat: f64, e: f64, e2: f64) -> f64 {
    let s = lat.sin();
    (1.0 - e2) * (s / (1.0 - e2 * s * s) - (1.0 / (2.0 * e)) * ((1.0 - e * s) / (1.0 + e * s)).ln())
}

/// A point transformation between two supported CRSs.
///
/// Every transform goes through geographic coordinates, so any pair of
/// supported CRSs can be combined.
#[derive(Debug, Clone, Copy)]
pub struct CoordTransform {
    source: Projection,
    target: Projection,
    identity: bool,
}

impl CoordTransform {
    /// Build a transform from `from` to `to`.
    ///
    /// Equivalent CRSs always produce an identity transform, even if the
    /// CRS itself is not one of the supported projections.
    pub fn new(from: &CRS, to: &CRS) -> Result<Self> {
        if from.is_equivalent(to) {
            return Ok(Self {
                source: Projection::Geographic,
                target: Projection::Geographic,
                identity: true,
            });
        }

        let unsupported = || Error::UnsupportedCrs {
            from: from.identifier(),
            to: to.identifier(),
        };
        let source = Projection::from_crs(from).ok_or_else(unsupported)?;
        let target = Projection::from_crs(to).ok_or_else(unsupported)?;

        Ok(Self {
            source,
            target,
            identity: false,
        })
    }

    /// Whether the transform leaves coordinates unchanged
    pub fn is_identity(&self) -> bool {
        self.identity
    }

    /// Transform a single coordinate pair
    pub fn transform(&self, x: f64, y: f64) -> (f64, f64) {
        if self.identity {
            return (x, y);
        }
        let (lon, lat) = self.source.to_geographic(x, y);
        self.target.from_geographic(lon, lat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_laea_origin_maps_to_false_origin() {
        let t = CoordTransform::new(&CRS::wgs84(), &CRS::laea_europe()).unwrap();
        let (x, y) = t.transform(10.0, 52.0);
        assert_relative_eq!(x, 4_321_000.0, epsilon = 1e-6);
        assert_relative_eq!(y, 3_210_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_laea_iogp_example() {
        // IOGP Guidance Note 7-2 worked example: 50°N 5°E
        let t = CoordTransform::new(&CRS::wgs84(), &CRS::laea_europe()).unwrap();
        let (x, y) = t.transform(5.0, 50.0);
        assert_relative_eq!(x, 3_962_799.45, epsilon = 0.01);
        assert_relative_eq!(y, 2_999_718.85, epsilon = 0.01);
    }

    #[test]
    fn test_laea_roundtrip() {
        let fwd = CoordTransform::new(&CRS::wgs84(), &CRS::laea_europe()).unwrap();
        let inv = CoordTransform::new(&CRS::laea_europe(), &CRS::wgs84()).unwrap();
        for &(lon, lat) in &[(-20.0, 30.0), (40.0, 75.0), (2.35, 48.85), (24.9, 60.2)] {
            let (x, y) = fwd.transform(lon, lat);
            let (lon2, lat2) = inv.transform(x, y);
            assert_relative_eq!(lon, lon2, epsilon = 1e-7);
            assert_relative_eq!(lat, lat2, epsilon = 1e-7);
        }
    }

    #[test]
    fn test_web_mercator() {
        let t = CoordTransform::new(&CRS::wgs84(), &CRS::web_mercator()).unwrap();
        let (x, y) = t.transform(180.0, 0.0);
        assert_relative_eq!(x, 20_037_508.342789244, epsilon = 1e-6);
        assert_relative_eq!(y, 0.0, epsilon = 1e-6);

        let inv = CoordTransform::new(&CRS::web_mercator(), &CRS::wgs84()).unwrap();
        let (x, y) = t.transform(-20.0, 75.0);
        let (lon, lat) = inv.transform(x, y);
        assert_relative_eq!(lon, -20.0, epsilon = 1e-9);
        assert_relative_eq!(lat, 75.0, epsilon = 1e-9);
    }

    #[test]
    fn test_mercator_to_laea_through_geographic() {
        let merc = CoordTransform::new(&CRS::wgs84(), &CRS::web_mercator()).unwrap();
        let (mx, my) = merc.transform(10.0, 52.0);
        let t = CoordTransform::new(&CRS::web_mercator(), &CRS::laea_europe()).unwrap();
        let (x, y) = t.transform(mx, my);
        assert_relative_eq!(x, 4_321_000.0, epsilon = 1e-4);
        assert_relative_eq!(y, 3_210_000.0, epsilon = 1e-4);
    }

    #[test]
    fn test_identity_and_unsupported() {
        let t = CoordTransform::new(&CRS::from_epsg(32633), &CRS::from_epsg(32633)).unwrap();
        assert!(t.is_identity());
        assert_eq!(t.transform(1.0, 2.0), (1.0, 2.0));

        let err = CoordTransform::new(&CRS::wgs84(), &CRS::from_epsg(32633));
        assert!(matches!(err, Err(Error::UnsupportedCrs { .. })));
    }
}
