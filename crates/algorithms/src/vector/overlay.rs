//! Polygon overlay

use geo::{Area, BooleanOps};
use geo_types::{MultiPolygon, Polygon};

/// Area of `a` not covered by `b`
pub fn difference(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    a.difference(b)
}

/// Everything inside `frame` that is not covered by `geometry`
pub fn complement_within(frame: &Polygon<f64>, geometry: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    difference(&MultiPolygon::new(vec![frame.clone()]), geometry)
}

/// The part with the largest area, if any
pub fn largest_part(geometry: &MultiPolygon<f64>) -> Option<Polygon<f64>> {
    geometry
        .0
        .iter()
        .max_by(|a, b| a.unsigned_area().total_cmp(&b.unsigned_area()))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::Contains;
    use geo_types::{point, polygon};

    #[test]
    fn test_complement_excludes_geometry() {
        let frame = polygon![(x: 0.0, y: 0.0), (x: 10.0, y: 0.0), (x: 10.0, y: 10.0), (x: 0.0, y: 10.0)];
        let land = MultiPolygon::new(vec![
            polygon![(x: 2.0, y: 2.0), (x: 4.0, y: 2.0), (x: 4.0, y: 4.0), (x: 2.0, y: 4.0)],
        ]);

        let sea = complement_within(&frame, &land);
        assert_relative_eq!(sea.unsigned_area(), 96.0, epsilon = 1e-9);
        assert!(!sea.contains(&point!(x: 3.0, y: 3.0)));
        assert!(sea.contains(&point!(x: 8.0, y: 8.0)));
    }

    #[test]
    fn test_largest_part() {
        // land splits the frame into a 2x10 strip and a 6x10 strip
        let frame = polygon![(x: 0.0, y: 0.0), (x: 10.0, y: 0.0), (x: 10.0, y: 10.0), (x: 0.0, y: 10.0)];
        let land = MultiPolygon::new(vec![
            polygon![(x: 2.0, y: -1.0), (x: 4.0, y: -1.0), (x: 4.0, y: 11.0), (x: 2.0, y: 11.0)],
        ]);

        let parts = complement_within(&frame, &land);
        assert_eq!(parts.0.len(), 2);
        let largest = largest_part(&parts).unwrap();
        assert_relative_eq!(largest.unsigned_area(), 60.0, epsilon = 1e-9);
        assert!(largest_part(&MultiPolygon::new(vec![])).is_none());
    }
}
