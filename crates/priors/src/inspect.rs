//! Diagnostic previews of intermediate geometries

use crate::error::{PriorError, Result};
use geo::BoundingRect;
use geo_types::{LineString, MultiPolygon};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Longest side of the preview, in SVG user units
const PREVIEW_SIZE: f64 = 1000.0;

/// Write an SVG drawing of `geometry` to `path`
///
/// The drawing is scaled to fit a 1000-unit square, north up, with holes
/// rendered through the even-odd fill rule.
pub fn write_svg_preview(geometry: &MultiPolygon<f64>, path: &Path) -> Result<()> {
    let rect = geometry
        .bounding_rect()
        .ok_or_else(|| PriorError::EmptyGeometry("nothing to preview".into()))?;

    let (width, height) = (rect.width(), rect.height());
    let scale = PREVIEW_SIZE / width.max(height).max(f64::MIN_POSITIVE);
    let (min_x, max_y) = (rect.min().x, rect.max().y);
    let project = |x: f64, y: f64| ((x - min_x) * scale, (max_y - y) * scale);

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {:.1} {:.1}">"#,
        width * scale,
        height * scale
    );
    for polygon in geometry {
        let mut d = String::new();
        for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
            ring_path(ring, &project, &mut d);
        }
        let _ = writeln!(
            svg,
            r##"  <path d="{d}" fill="#3a7bd5" fill-opacity="0.6" fill-rule="evenodd" stroke="#1d3d6b" stroke-width="0.5"/>"##
        );
    }
    svg.push_str("</svg>\n");

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, svg)?;
    Ok(())
}

fn ring_path<F: Fn(f64, f64) -> (f64, f64)>(ring: &LineString<f64>, project: &F, d: &mut String) {
    for (i, c) in ring.0.iter().enumerate() {
        let (x, y) = project(c.x, c.y);
        let _ = write!(d, "{}{:.2},{:.2} ", if i == 0 { 'M' } else { 'L' }, x, y);
    }
    d.push('Z');
}
