//! Geometry engine for facility map shape overlays.
//!
//! This crate provides:
//! - Haversine distance, initial bearing and destination point
//! - Point-in-polygon and point-to-polyline distance tests
//! - Sector (fan) arc construction
//! - Parsing of the shareable-link shape parameter grammar
//! - Proximity filtering of features against parsed shapes, with optional parallelism
//!
//! # Example
//!
//! ```
//! use facilitymap_geo::{parse_shape_query_str, ShapeGeometry};
//!
//! let query = parse_shape_query_str("shape=circle&lat=25&lng=120&radius=50&unit=km");
//! assert_eq!(query.shapes.len(), 1);
//! match &query.shapes[0].geometry {
//!     ShapeGeometry::Circle { center, radius_km } => {
//!         assert_eq!(center.latitude, 25.0);
//!         assert_eq!(*radius_km, 50.0);
//!     }
//!     other => panic!("unexpected shape {other:?}"),
//! }
//! ```

mod error;
mod haversine;
mod polygon;
mod polyline;
pub mod proximity;
pub mod query;
mod sector;
mod shape;
mod units;

pub use error::{GeoError, GeoErrorCode, Result};
pub use haversine::{
    destination_point, haversine_distance, haversine_distance_meters, initial_bearing,
    EARTH_RADIUS_KM, EARTH_RADIUS_M,
};
pub use polygon::{close_ring, point_in_polygon};
pub use polyline::{distance_point_to_polyline_km, meters_per_degree, polyline_length_km};
pub use proximity::{within_radius, NearbyFeature, ProximityFilter};
pub use query::{
    parse_coordinate_list, parse_shape_query, parse_shape_query_str, QueryParams, ShapeMode,
    ShapeQuery, SkippedShape,
};
pub use sector::{
    angle_in_range_cw, build_sector_arc, normalize_degrees, DEFAULT_SECTOR_STEP_DEG,
    MIN_SECTOR_STEP_DEG,
};
pub use shape::{Bounds, Shape, ShapeGeometry};
pub use units::{unit_to_km, DistanceUnit};

/// A geographic coordinate with latitude and longitude.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a new coordinate.
    ///
    /// # Arguments
    /// * `latitude` - Latitude in degrees (-90 to 90)
    /// * `longitude` - Longitude in degrees (-180 to 180)
    #[inline]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Returns true if the coordinate has valid values.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }

    /// Returns true if both components are finite numbers.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    /// Converts degrees to radians for internal calculations.
    #[inline]
    pub(crate) fn to_radians(self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}
