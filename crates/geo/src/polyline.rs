//! Distances to open polylines.

use crate::{haversine_distance, Coordinate};

/// Meters per degree of latitude and longitude at `latitude_deg` (WGS-84 series).
pub fn meters_per_degree(latitude_deg: f64) -> (f64, f64) {
    let lat0 = latitude_deg.to_radians();
    let per_lat = 111_132.92 - 559.82 * (2.0 * lat0).cos() + 1.175 * (4.0 * lat0).cos();
    let per_lng = std::f64::consts::PI / 180.0 * 6_378_137.0 * lat0.cos();
    (per_lat, per_lng)
}

/// Minimum distance in kilometers from `point` to any segment of `line`.
///
/// Uses a local equirectangular projection centred on the point's latitude.
/// An empty line is infinitely far away; a single vertex has no segments and
/// is also infinitely far away.
pub fn distance_point_to_polyline_km(point: &Coordinate, line: &[Coordinate]) -> f64 {
    let (per_lat, per_lng) = meters_per_degree(point.latitude);
    let project = |c: &Coordinate| (c.longitude * per_lng, c.latitude * per_lat);
    let (px, py) = project(point);

    let min_m = line
        .windows(2)
        .map(|segment| {
            let (ax, ay) = project(&segment[0]);
            let (bx, by) = project(&segment[1]);
            let (abx, aby) = (bx - ax, by - ay);
            let ab2 = abx * abx + aby * aby;
            let t = if ab2 == 0.0 {
                0.0
            } else {
                (((px - ax) * abx + (py - ay) * aby) / ab2).clamp(0.0, 1.0)
            };
            let (dx, dy) = (px - (ax + t * abx), py - (ay + t * aby));
            (dx * dx + dy * dy).sqrt()
        })
        .fold(f64::INFINITY, f64::min);

    min_m / 1000.0
}

/// Total great-circle length of a polyline in kilometers.
pub fn polyline_length_km(line: &[Coordinate]) -> f64 {
    line.windows(2)
        .map(|segment| haversine_distance(&segment[0], &segment[1]))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_line_is_unbounded() {
        let d = distance_point_to_polyline_km(&Coordinate::new(25.0, 120.0), &[]);
        assert!(d.is_infinite());
    }

    #[test]
    fn test_point_on_segment_is_zero() {
        let line = [Coordinate::new(25.0, 120.0), Coordinate::new(25.0, 122.0)];
        let d = distance_point_to_polyline_km(&Coordinate::new(25.0, 121.0), &line);
        assert!(d.abs() < 1e-9, "{}", d);
    }

    #[test]
    fn test_perpendicular_offset() {
        let line = [Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 2.0)];
        let d = distance_point_to_polyline_km(&Coordinate::new(1.0, 1.0), &line);
        // One degree of latitude at the equator
        assert!((d - 110.574).abs() < 0.01, "{}", d);
    }

    #[test]
    fn test_clamps_to_segment_end() {
        let line = [Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0)];
        let beyond = distance_point_to_polyline_km(&Coordinate::new(0.0, 2.0), &line);
        let (_, per_lng) = meters_per_degree(0.0);
        assert!((beyond - per_lng / 1000.0).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_segment() {
        let p = Coordinate::new(10.0, 10.0);
        let line = [p, p];
        assert!(distance_point_to_polyline_km(&p, &line).abs() < 1e-12);
    }

    #[test]
    fn test_minimum_across_segments() {
        let line = [
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 1.0),
            Coordinate::new(1.0, 1.0),
        ];
        let near_second = distance_point_to_polyline_km(&Coordinate::new(0.5, 1.0), &line);
        assert!(near_second.abs() < 1e-9);
    }

    #[test]
    fn test_polyline_length() {
        let line = [Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0), Coordinate::new(0.0, 2.0)];
        assert!((polyline_length_km(&line) - 222.39).abs() < 0.1);
        assert_eq!(polyline_length_km(&line[..1]), 0.0);
    }
}
