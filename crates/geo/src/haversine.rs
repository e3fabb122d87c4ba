//! Great-circle calculations on a spherical Earth.
//!
//! Distance uses the Haversine formula; bearing and destination solve the
//! direct and inverse problems on the same mean-radius sphere.

use crate::Coordinate;

/// Earth's mean radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Earth's mean radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Calculates the great-circle distance between two coordinates in kilometers.
///
/// # Example
/// ```
/// use facilitymap_geo::{haversine_distance, Coordinate};
///
/// let taipei = Coordinate::new(25.0330, 121.5654);
/// let kaohsiung = Coordinate::new(22.6273, 120.3014);
///
/// let distance = haversine_distance(&taipei, &kaohsiung);
/// assert!((distance - 297.0).abs() < 5.0);
/// ```
#[inline]
pub fn haversine_distance(from: &Coordinate, to: &Coordinate) -> f64 {
    haversine_distance_with_radius(from, to, EARTH_RADIUS_KM)
}

/// Calculates the great-circle distance between two coordinates in meters.
#[inline]
pub fn haversine_distance_meters(from: &Coordinate, to: &Coordinate) -> f64 {
    haversine_distance_with_radius(from, to, EARTH_RADIUS_M)
}

#[inline]
fn haversine_distance_with_radius(from: &Coordinate, to: &Coordinate, radius: f64) -> f64 {
    let (lat1, lon1) = from.to_radians();
    let (lat2, lon2) = to.to_radians();

    let d_lat = lat2 - lat1;
    let d_lon = lon2 - lon1;

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    radius * c
}

/// Initial great-circle bearing from `from` towards `to`.
///
/// # Returns
/// Degrees clockwise from true north, in `[0, 360)`.
pub fn initial_bearing(from: &Coordinate, to: &Coordinate) -> f64 {
    let (phi1, lambda1) = from.to_radians();
    let (phi2, lambda2) = to.to_radians();
    let d_lambda = lambda2 - lambda1;

    let y = d_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * d_lambda.cos();

    let theta = y.atan2(x).to_degrees();
    (theta + 360.0) % 360.0
}

/// Point reached by travelling `distance_km` from `origin` along `bearing_deg`.
///
/// The resulting longitude is wrapped into `[-180, 180)`.
pub fn destination_point(origin: &Coordinate, bearing_deg: f64, distance_km: f64) -> Coordinate {
    let (phi1, lambda1) = origin.to_radians();
    let bearing = bearing_deg.to_radians();
    let delta = distance_km * 1000.0 / EARTH_RADIUS_M;

    let phi2 = (phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * bearing.cos()).asin();
    let lambda2 = lambda1
        + (bearing.sin() * delta.sin() * phi1.cos()).atan2(delta.cos() - phi1.sin() * phi2.sin());

    Coordinate::new(phi2.to_degrees(), (lambda2.to_degrees() + 540.0) % 360.0 - 180.0)
}
