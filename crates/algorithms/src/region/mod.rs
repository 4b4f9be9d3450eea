//! Region masks
//!
//! A region mask is the rasterized footprint of a region geometry on a
//! snapped, square-pixel grid. Other layers are brought onto the same grid
//! through it, so every step of a prior shares one pixel layout.

mod value_range;

pub use value_range::ValueRange;

use crate::maybe_rayon::*;
use crate::rasterize::rasterize;
use crate::vector::reproject_geometry;
use ndarray::Array2;
use priorgen_core::{CoordTransform, Error, Extent, GeoTransform, Raster, Result, SpatialGeometry, CRS};
use tracing::{debug, info};

/// Mask value for pixels inside the region
pub const INSIDE: u8 = 1;

/// How source values are brought onto the mask grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Resampling {
    /// Value of the source pixel containing the mask pixel centre
    Nearest,
    /// Bilinear blend of the four nearest source pixel centres
    #[default]
    Bilinear,
}

impl Resampling {
    /// In-range indicator of `source` at map position (x, y)
    fn sample(self, source: &Raster<f64>, range: &ValueRange, x: f64, y: f64) -> f64 {
        let (rows, cols) = source.shape();
        let indicator = |row: usize, col: usize| {
            let v = source.data()[[row, col]];
            if !source.is_nodata(v) && range.contains(v) { 1.0 } else { 0.0 }
        };

        let (fc, fr) = source.geo_to_pixel(x, y);
        if !(fc >= 0.0 && fr >= 0.0 && fc < cols as f64 && fr < rows as f64) {
            return 0.0;
        }

        match self {
            Resampling::Nearest => indicator(fr as usize, fc as usize),
            Resampling::Bilinear => {
                // offsets from the upper-left of the four surrounding centres
                let (u, v) = (fc - 0.5, fr - 0.5);
                let (tx, ty) = (u - u.floor(), v - v.floor());
                let clamp = |i: f64, n: usize| (i.max(0.0) as usize).min(n - 1);
                let (c0, c1) = (clamp(u.floor(), cols), clamp(u.floor() + 1.0, cols));
                let (r0, r1) = (clamp(v.floor(), rows), clamp(v.floor() + 1.0, rows));

                let top = indicator(r0, c0) * (1.0 - tx) + indicator(r0, c1) * tx;
                let bottom = indicator(r1, c0) * (1.0 - tx) + indicator(r1, c1) * tx;
                top * (1.0 - ty) + bottom * ty
            }
        }
    }
}

/// A region rasterized on a pixel grid
#[derive(Debug, Clone)]
pub struct RegionMask {
    mask: Raster<u8>,
    extent: Extent,
    pixel_size: f64,
    geometry: SpatialGeometry,
}

impl RegionMask {
    /// Rasterize `geometry` at `pixel_size` in `srs`
    ///
    /// The geometry is reprojected into `srs` and the grid covers its
    /// extent, grown outward to a multiple of the pixel size.
    pub fn from_geometry(geometry: &SpatialGeometry, pixel_size: f64, srs: &CRS) -> Result<Self> {
        let geometry = reproject_geometry(geometry, srs)?;
        let polygons = geometry.polygons();
        if polygons.is_empty() {
            return Err(Error::InvalidGeometry("region geometry has no polygons".into()));
        }

        let extent = geometry.extent()?.fit(pixel_size)?;
        let mask = rasterize(&polygons, &extent, pixel_size)?;

        info!(
            rows = mask.rows(),
            cols = mask.cols(),
            pixel_size,
            srs = %srs,
            "created region mask"
        );

        Ok(Self {
            mask,
            extent,
            pixel_size,
            geometry,
        })
    }

    /// The 1/0 mask raster
    pub fn mask(&self) -> &Raster<u8> {
        &self.mask
    }

    pub fn extent(&self) -> &Extent {
        &self.extent
    }

    pub fn pixel_size(&self) -> f64 {
        self.pixel_size
    }

    /// The mask's spatial reference
    pub fn srs(&self) -> &CRS {
        &self.extent.crs
    }

    /// The region geometry, in the mask's spatial reference
    pub fn geometry(&self) -> &SpatialGeometry {
        &self.geometry
    }

    /// (rows, cols) of the mask grid
    pub fn shape(&self) -> (usize, usize) {
        self.mask.shape()
    }

    pub fn transform(&self) -> &GeoTransform {
        self.mask.transform()
    }

    /// Whether pixel (row, col) is inside the region
    pub fn is_inside(&self, row: usize, col: usize) -> bool {
        self.mask.data()[[row, col]] == INSIDE
    }

    /// Number of pixels inside the region
    pub fn inside_count(&self) -> usize {
        self.mask.count_where(|v| v == INSIDE)
    }

    /// Indicate which pixels of `source` fall in `range`, on the mask grid
    ///
    /// Each mask pixel centre is transformed into the source CRS, where the
    /// 1/0 in-range indicator of the source is sampled with `resampling`.
    /// Source no-data and everything outside the source grid indicate 0.
    /// Bilinear sampling yields fractions along the range boundary; compare
    /// against a threshold to get a crisp layer. With `apply_mask`, pixels
    /// outside the region are forced to 0.0.
    pub fn indicate_values(
        &self,
        source: &Raster<f64>,
        range: &ValueRange,
        resampling: Resampling,
        apply_mask: bool,
    ) -> Result<Raster<f64>> {
        let source_crs = source
            .crs()
            .ok_or_else(|| Error::Algorithm("source raster has no CRS".into()))?;
        let to_source = CoordTransform::new(self.srs(), source_crs)?;

        let (rows, cols) = self.shape();
        let transform = *self.transform();
        let data: Vec<f64> = (0..rows)
            .into_par_iter()
            .flat_map(|row| {
                let mut line = vec![0.0; cols];
                for (col, cell) in line.iter_mut().enumerate() {
                    if apply_mask && !self.is_inside(row, col) {
                        continue;
                    }
                    let (x, y) = transform.pixel_to_geo(col, row);
                    let (sx, sy) = to_source.transform(x, y);
                    *cell = resampling.sample(source, range, sx, sy);
                }
                line
            })
            .collect();

        let array = Array2::from_shape_vec((rows, cols), data).map_err(|e| Error::Other(e.to_string()))?;
        let mut indicated = self.mask.with_same_meta::<f64>();
        *indicated.data_mut() = array;

        debug!(
            range = %range,
            ?resampling,
            indicated = indicated.count_where(|v| v > 0.5),
            "indicated source values"
        );
        Ok(indicated)
    }
}
