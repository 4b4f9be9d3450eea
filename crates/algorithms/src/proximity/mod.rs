//! Proximity classification ("edges by proximity")
//!
//! Every pixel of a region mask is classified by its distance to a set of
//! target geometries against an ordered list of threshold distances:
//!
//! - `i` (0-based): the first threshold `d_i` with `distance <= d_i`
//! - [`UNTOUCHED`] (254): inside the region but beyond every threshold
//! - [`NODATA`] (255): outside the region
//!
//! Distances are planar, in mask CRS units, from the pixel centre to the
//! nearest target boundary segment; a centre inside a target polygon is at
//! distance 0.

use crate::maybe_rayon::*;
use crate::rasterize::coverage;
use crate::region::RegionMask;
use crate::vector::reproject_geometry;
use ndarray::Array2;
use priorgen_core::{Error, Raster, Result, SpatialGeometry};
use rstar::primitives::Line;
use rstar::{PointDistance, RTree};
use tracing::{debug, info};

/// Value of region pixels farther than every threshold
pub const UNTOUCHED: u8 = 254;

/// Value of pixels outside the region
pub const NODATA: u8 = 255;

/// Most thresholds a byte classification can hold next to the two markers
pub const MAX_THRESHOLDS: usize = UNTOUCHED as usize;

/// Check that thresholds are finite, non-negative and non-decreasing
pub fn validate_distances(distances: &[f64]) -> Result<()> {
    let invalid = |reason: String| Error::InvalidParameter {
        name: "distances",
        value: format!("{distances:?}"),
        reason,
    };

    if distances.len() > MAX_THRESHOLDS {
        return Err(invalid(format!("at most {MAX_THRESHOLDS} thresholds fit a byte raster")));
    }
    if let Some(d) = distances.iter().find(|d| !(d.is_finite() && **d >= 0.0)) {
        return Err(invalid(format!("{d} is not a finite non-negative distance")));
    }
    if let Some(pair) = distances.windows(2).find(|w| w[1] < w[0]) {
        return Err(invalid(format!("{} follows {}", pair[1], pair[0])));
    }
    Ok(())
}

/// Class of a pixel at `distance` from the nearest target
pub fn classify_distance(distance: f64, distances: &[f64]) -> u8 {
    distances
        .iter()
        .position(|&d| distance <= d)
        .map_or(UNTOUCHED, |i| i as u8)
}

/// Classify every region pixel by proximity to `geometries`
///
/// Target geometries are transformed into the mask CRS before distances
/// are measured. With no target polygons, every region pixel is
/// [`UNTOUCHED`].
pub fn edges_by_proximity(
    mask: &RegionMask,
    geometries: &[SpatialGeometry],
    distances: &[f64],
) -> Result<Raster<u8>> {
    validate_distances(distances)?;

    let mut polygons = Vec::new();
    for geometry in geometries {
        polygons.extend(reproject_geometry(geometry, mask.srs())?.polygons());
    }

    let segments: Vec<Line<[f64; 2]>> = polygons
        .iter()
        .flat_map(|p| std::iter::once(p.exterior()).chain(p.interiors()))
        .flat_map(|ring| ring.lines())
        .filter(|l| l.start != l.end)
        .map(|l| Line::new([l.start.x, l.start.y], [l.end.x, l.end.y]))
        .collect();
    let segment_count = segments.len();
    let tree = RTree::bulk_load(segments);

    let (rows, cols) = mask.shape();
    let transform = *mask.transform();
    let inside_target = coverage(&polygons, &transform, rows, cols)?;
    debug!(polygons = polygons.len(), segments = segment_count, "indexed target boundaries");

    let data: Vec<u8> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut line = vec![NODATA; cols];
            for (col, cell) in line.iter_mut().enumerate() {
                if !mask.is_inside(row, col) {
                    continue;
                }
                if inside_target[[row, col]] {
                    *cell = classify_distance(0.0, distances);
                    continue;
                }
                let (x, y) = transform.pixel_to_geo(col, row);
                *cell = match tree.nearest_neighbor(&[x, y]) {
                    Some(segment) => classify_distance(segment.distance_2(&[x, y]).sqrt(), distances),
                    None => UNTOUCHED,
                };
            }
            line
        })
        .collect();

    let array = Array2::from_shape_vec((rows, cols), data).map_err(|e| Error::Other(e.to_string()))?;
    let mut result = mask.mask().with_same_meta::<u8>();
    *result.data_mut() = array;
    result.set_nodata(Some(NODATA));

    info!(
        rows,
        cols,
        thresholds = distances.len(),
        untouched = result.count_where(|v| v == UNTOUCHED),
        "classified proximity"
    );
    Ok(result)
}
