//! Raster mask to polygons

use geo_types::{coord, MultiPolygon, Polygon, Rect};
use priorgen_core::{Raster, RasterElement};
use std::collections::HashMap;

/// Polygons covering every cell of `mask` for which `is_set` holds
///
/// Cells are grouped into horizontal runs, and runs with the same column
/// span in consecutive rows are merged into one rectangle. The result is a
/// set of non-overlapping rectangles whose union is exactly the set cells,
/// in the raster's map coordinates. No-data cells are never set.
pub fn polygonize_mask<T, F>(mask: &Raster<T>, is_set: F) -> MultiPolygon<f64>
where
    T: RasterElement,
    F: Fn(T) -> bool,
{
    let (rows, cols) = mask.shape();
    let transform = mask.transform();
    let data = mask.data();

    let to_rect = |(col_start, col_end): (usize, usize), row_start: usize, row_end: usize| {
        let (x0, y0) = transform.pixel_to_geo_corner(col_start, row_start);
        let (x1, y1) = transform.pixel_to_geo_corner(col_end, row_end);
        Rect::new(coord! { x: x0, y: y0 }, coord! { x: x1, y: y1 }).to_polygon()
    };

    let mut polygons: Vec<Polygon<f64>> = Vec::new();
    // column span -> first row of the open rectangle
    let mut open: HashMap<(usize, usize), usize> = HashMap::new();

    for row in 0..=rows {
        let mut runs: Vec<(usize, usize)> = Vec::new();
        if row < rows {
            let mut col = 0;
            while col < cols {
                let set = |c: usize| {
                    let v = data[[row, c]];
                    !mask.is_nodata(v) && is_set(v)
                };
                if set(col) {
                    let start = col;
                    while col < cols && set(col) {
                        col += 1;
                    }
                    runs.push((start, col));
                } else {
                    col += 1;
                }
            }
        }

        let mut next: HashMap<(usize, usize), usize> = HashMap::with_capacity(runs.len());
        for span in runs {
            let start_row = open.remove(&span).unwrap_or(row);
            next.insert(span, start_row);
        }
        let mut closed: Vec<_> = open.drain().collect();
        closed.sort_unstable();
        for (span, start_row) in closed {
            polygons.push(to_rect(span, start_row, row));
        }
        open = next;
    }

    MultiPolygon::new(polygons)
}
