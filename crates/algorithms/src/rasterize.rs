//! Polygon rasterization
//!
//! Scanline fill on a north-up grid: a pixel is covered when its centre
//! lies inside a polygon (exterior ring minus holes). Each polygon is
//! filled on its own, so overlapping polygons never cancel out.

use crate::maybe_rayon::*;
use geo_types::{LineString, Polygon};
use ndarray::Array2;
use priorgen_core::{Error, Extent, GeoTransform, Raster, Result};
use tracing::debug;

/// Polygon edge in fractional pixel coordinates (col, row)
#[derive(Debug, Clone, Copy)]
struct Edge {
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
}

/// A polygon's edges on the grid, with its row span
#[derive(Debug)]
struct GridPolygon {
    edges: Vec<Edge>,
    row_min: f64,
    row_max: f64,
}

impl GridPolygon {
    fn new(polygon: &Polygon<f64>, transform: &GeoTransform) -> Option<Self> {
        let mut edges = Vec::new();
        for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
            push_ring_edges(ring, transform, &mut edges);
        }
        if edges.is_empty() {
            return None;
        }

        let (row_min, row_max) = edges.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), e| {
            (lo.min(e.y0).min(e.y1), hi.max(e.y0).max(e.y1))
        });
        Some(Self { edges, row_min, row_max })
    }

    /// Sorted x positions where the horizontal line `y` crosses the boundary
    fn crossings(&self, y: f64, xs: &mut Vec<f64>) {
        xs.clear();
        for e in &self.edges {
            if (e.y0 <= y) != (e.y1 <= y) {
                xs.push(e.x0 + (y - e.y0) * (e.x1 - e.x0) / (e.y1 - e.y0));
            }
        }
        xs.sort_by(|a, b| a.total_cmp(b));
    }
}

fn push_ring_edges(ring: &LineString<f64>, transform: &GeoTransform, edges: &mut Vec<Edge>) {
    let points: Vec<(f64, f64)> = ring.0.iter().map(|c| transform.geo_to_pixel(c.x, c.y)).collect();
    if points.len() < 3 {
        return;
    }
    // Rings are closed implicitly; a repeated last vertex yields a zero-length edge
    for i in 0..points.len() {
        let (x0, y0) = points[i];
        let (x1, y1) = points[(i + 1) % points.len()];
        if y0 != y1 {
            edges.push(Edge { x0, y0, x1, y1 });
        }
    }
}

/// Pixel-centre coverage of `polygons` on a `rows x cols` grid
pub fn coverage(
    polygons: &[Polygon<f64>],
    transform: &GeoTransform,
    rows: usize,
    cols: usize,
) -> Result<Array2<bool>> {
    let shapes: Vec<GridPolygon> = polygons
        .iter()
        .filter_map(|p| GridPolygon::new(p, transform))
        .collect();

    let data: Vec<bool> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut line = vec![false; cols];
            let mut xs = Vec::new();
            let y = row as f64 + 0.5;

            for shape in shapes.iter().filter(|s| s.row_min <= y && y < s.row_max) {
                shape.crossings(y, &mut xs);
                for pair in xs.chunks_exact(2) {
                    let start = (pair[0] - 0.5).ceil().max(0.0) as usize;
                    let end = ((pair[1] - 0.5).ceil().max(0.0) as usize).min(cols);
                    for cell in line.iter_mut().take(end).skip(start) {
                        *cell = true;
                    }
                }
            }
            line
        })
        .collect();

    Array2::from_shape_vec((rows, cols), data).map_err(|e| Error::Other(e.to_string()))
}

/// Burn polygons into a byte raster covering `extent`
///
/// Covered pixels are 1, all others 0. The grid is anchored at the upper
/// left corner of the extent with square `pixel_size` pixels.
pub fn rasterize(polygons: &[Polygon<f64>], extent: &Extent, pixel_size: f64) -> Result<Raster<u8>> {
    if !(pixel_size > 0.0 && pixel_size.is_finite()) {
        return Err(Error::InvalidParameter {
            name: "pixel_size",
            value: pixel_size.to_string(),
            reason: "must be a positive finite number".into(),
        });
    }

    let (rows, cols) = extent.grid_shape(pixel_size);
    if rows == 0 || cols == 0 {
        return Err(Error::InvalidDimensions { width: cols, height: rows });
    }

    let transform = extent.geo_transform(pixel_size);
    let covered = coverage(polygons, &transform, rows, cols)?;
    debug!(rows, cols, polygons = polygons.len(), "rasterized polygons");

    let mut raster = Raster::from_array(covered.mapv(u8::from));
    raster.set_transform(transform);
    raster.set_crs(Some(extent.crs.clone()));
    Ok(raster)
}
