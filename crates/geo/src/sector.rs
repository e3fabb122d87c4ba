//! Sector (fan) geometry.

use crate::{destination_point, Coordinate};

/// Angular resolution used for sector arcs unless configured otherwise.
pub const DEFAULT_SECTOR_STEP_DEG: f64 = 2.0;

/// Finest arc resolution; smaller steps are raised to this.
pub const MIN_SECTOR_STEP_DEG: f64 = 0.01;

/// Normalizes an angle in degrees into `[0, 360)`.
#[inline]
pub fn normalize_degrees(angle: f64) -> f64 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if a >= 360.0 { 0.0 } else { a }
}

/// True if `angle` lies on the clockwise arc from `start` to `end`, inclusive.
///
/// All three angles are normalized first, so the arc may wrap through north.
pub fn angle_in_range_cw(angle: f64, start: f64, end: f64) -> bool {
    let a = normalize_degrees(angle);
    let s = normalize_degrees(start);
    let e = normalize_degrees(end);
    if s <= e {
        a >= s && a <= e
    } else {
        a >= s || a <= e
    }
}

/// Builds a closed fan polygon for a sector.
///
/// The first vertex is the centre, followed by points on the arc stepped every
/// `step_deg` degrees clockwise from `start_deg` to `end_deg`. Equal start and
/// end bearings produce a full circle. Non-positive steps fall back to
/// [`DEFAULT_SECTOR_STEP_DEG`]; steps below [`MIN_SECTOR_STEP_DEG`] are
/// raised to it.
pub fn build_sector_arc(
    center: &Coordinate,
    radius_km: f64,
    start_deg: f64,
    end_deg: f64,
    step_deg: f64,
) -> Vec<Coordinate> {
    let step = if step_deg.is_finite() && step_deg > 0.0 {
        step_deg.max(MIN_SECTOR_STEP_DEG)
    } else {
        DEFAULT_SECTOR_STEP_DEG
    };

    let s = normalize_degrees(start_deg);
    let e = normalize_degrees(end_deg);
    let cw = (e - s + 360.0) % 360.0;
    let sweep = if cw == 0.0 { 360.0 } else { cw };
    let steps = ((sweep / step).ceil() as usize).max(1);

    let mut vertices = Vec::with_capacity(steps + 2);
    vertices.push(*center);
    vertices.extend((0..=steps).map(|i| {
        let bearing = (s + sweep * i as f64 / steps as f64) % 360.0;
        destination_point(center, bearing, radius_km)
    }));
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::haversine_distance;
    use proptest::prelude::*;

    #[test]
    fn test_tiny_step_is_clamped() {
        let center = Coordinate::new(24.0, 121.0);
        let arc = build_sector_arc(&center, 10.0, 0.0, 90.0, 1e-12);
        // 90° at the finest resolution: centre plus 9001 arc points
        assert_eq!(arc.len(), 9002);
        assert_eq!(
            build_sector_arc(&center, 10.0, 0.0, 90.0, MIN_SECTOR_STEP_DEG).len(),
            arc.len()
        );
    }

    #[test]
    fn test_angle_in_simple_range() {
        assert!(angle_in_range_cw(45.0, 0.0, 90.0));
        assert!(angle_in_range_cw(0.0, 0.0, 90.0));
        assert!(angle_in_range_cw(90.0, 0.0, 90.0));
        assert!(!angle_in_range_cw(91.0, 0.0, 90.0));
    }

    #[test]
    fn test_angle_in_wrapping_range() {
        assert!(angle_in_range_cw(350.0, 300.0, 30.0));
        assert!(angle_in_range_cw(10.0, 300.0, 30.0));
        assert!(!angle_in_range_cw(180.0, 300.0, 30.0));
    }

    #[test]
    fn test_angle_normalizes_inputs() {
        assert!(angle_in_range_cw(-10.0, 340.0, 20.0));
        assert!(angle_in_range_cw(370.0, 0.0, 20.0));
        assert!(angle_in_range_cw(45.0, -90.0, 90.0));
    }

    #[test]
    fn test_sector_vertex_count() {
        let center = Coordinate::new(25.0, 120.0);
        let arc = build_sector_arc(&center, 10.0, 0.0, 90.0, 2.0);
        // centre + 45 steps + 1
        assert_eq!(arc.len(), 47);
        assert_eq!(arc[0], center);
    }

    #[test]
    fn test_sector_vertices_on_radius() {
        let center = Coordinate::new(25.0, 120.0);
        let arc = build_sector_arc(&center, 30.0, 300.0, 60.0, 5.0);
        for vertex in &arc[1..] {
            assert!((haversine_distance(&center, vertex) - 30.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_full_circle_closes() {
        let center = Coordinate::new(25.0, 120.0);
        let arc = build_sector_arc(&center, 50.0, 0.0, 360.0, DEFAULT_SECTOR_STEP_DEG);
        assert_eq!(arc.len(), 182);
        let first = arc[1];
        let last = arc[arc.len() - 1];
        assert!((first.latitude - last.latitude).abs() < 1e-9);
        assert!((first.longitude - last.longitude).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_step_falls_back() {
        let center = Coordinate::new(0.0, 0.0);
        let arc = build_sector_arc(&center, 1.0, 0.0, 10.0, 0.0);
        assert_eq!(arc.len(), 7);
    }

    #[test]
    fn test_tiny_sweep_has_one_step() {
        let center = Coordinate::new(0.0, 0.0);
        let arc = build_sector_arc(&center, 1.0, 10.0, 10.5, 2.0);
        assert_eq!(arc.len(), 3);
    }

    proptest! {
        #[test]
        fn full_circle_first_and_last_coincide(
            lat in -60.0f64..60.0, lng in -179.0f64..179.0,
            radius in 0.1f64..500.0, start in 0.0f64..360.0,
        ) {
            let center = Coordinate::new(lat, lng);
            let arc = build_sector_arc(&center, radius, start, start, DEFAULT_SECTOR_STEP_DEG);
            let first = arc[1];
            let last = arc[arc.len() - 1];
            prop_assert!(haversine_distance(&first, &last) < 1e-6);
        }

        #[test]
        fn normalized_angle_in_range(angle in -1.0e6f64..1.0e6) {
            let a = normalize_degrees(angle);
            prop_assert!((0.0..360.0).contains(&a));
        }
    }
}
