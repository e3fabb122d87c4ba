//! Polygon containment.

use crate::Coordinate;

const HORIZONTAL_EDGE_EPSILON: f64 = 1e-12;

/// Even-odd ray casting test against an implicitly closed ring.
///
/// Longitude is treated as `x` and latitude as `y`. Rings with fewer than
/// three vertices never contain anything.
pub fn point_in_polygon(point: &Coordinate, ring: &[Coordinate]) -> bool {
    let mut inside = false;
    let mut j = match ring.len() {
        0 => return false,
        n => n - 1,
    };

    for (i, vi) in ring.iter().enumerate() {
        let vj = &ring[j];
        let (xi, yi) = (vi.longitude, vi.latitude);
        let (xj, yj) = (vj.longitude, vj.latitude);

        let crosses = (yi > point.latitude) != (yj > point.latitude)
            && point.longitude
                < (xj - xi) * (point.latitude - yi) / (yj - yi + HORIZONTAL_EDGE_EPSILON) + xi;
        if crosses {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// Returns the ring with its first vertex repeated at the end, unless it already is.
pub fn close_ring(ring: &[Coordinate]) -> Vec<Coordinate> {
    let mut closed = ring.to_vec();
    if let (Some(first), Some(last)) = (ring.first(), ring.last()) {
        if ring.len() > 1 && first != last {
            closed.push(*first);
        }
    }
    closed
}
