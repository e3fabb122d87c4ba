//! Feature filtering against shapes, with optional parallelism.
//!
//! A feature is kept when its point lies inside, or within a buffer
//! distance of, any of the shapes.

use crate::{
    angle_in_range_cw, distance_point_to_polyline_km, haversine_distance, initial_bearing,
    point_in_polygon, Coordinate, Shape, ShapeGeometry, ShapeQuery,
};
use facilitymap_core::feature::Feature;
use tracing::debug;

/// A shape with its outline computed once up front.
#[derive(Debug, Clone)]
struct PreparedShape {
    shape: Shape,
    perimeter: Vec<Coordinate>,
}

/// Matches feature points against a set of shapes.
#[derive(Debug, Clone)]
pub struct ProximityFilter {
    shapes: Vec<PreparedShape>,
    buffer_km: f64,
    line_buffer_km: f64,
}

impl ProximityFilter {
    /// Builds a filter for every shape in a parsed query.
    ///
    /// # Arguments
    /// * `query` - Parsed shape parameters; its `line_buffer_km` widens line corridors
    /// * `buffer_km` - Extra distance around every shape
    /// * `step_deg` - Arc resolution used for sector and circle outlines
    pub fn new(query: &ShapeQuery, buffer_km: f64, step_deg: f64) -> Self {
        Self::from_shapes(query.shapes.iter().cloned(), query.line_buffer_km, buffer_km, step_deg)
    }

    pub fn from_shapes(
        shapes: impl IntoIterator<Item = Shape>,
        line_buffer_km: f64,
        buffer_km: f64,
        step_deg: f64,
    ) -> Self {
        let shapes = shapes
            .into_iter()
            .map(|shape| {
                let perimeter = match shape.geometry {
                    ShapeGeometry::Polygon { .. }
                    | ShapeGeometry::Bbox { .. }
                    | ShapeGeometry::Sector { .. } => shape.perimeter(step_deg),
                    _ => Vec::new(),
                };
                PreparedShape { shape, perimeter }
            })
            .collect();

        Self {
            shapes,
            buffer_km,
            line_buffer_km: if line_buffer_km.is_finite() { line_buffer_km } else { 0.0 },
        }
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// True if `point` matches at least one shape.
    pub fn matches(&self, point: &Coordinate) -> bool {
        self.shapes.iter().any(|prepared| self.matches_shape(prepared, point))
    }

    fn near_outline(&self, prepared: &PreparedShape, point: &Coordinate) -> bool {
        prepared.perimeter.len() >= 2
            && distance_point_to_polyline_km(point, &prepared.perimeter) <= self.buffer_km
    }

    fn matches_shape(&self, prepared: &PreparedShape, point: &Coordinate) -> bool {
        match &prepared.shape.geometry {
            ShapeGeometry::Point { center, radius_km } => {
                haversine_distance(center, point) <= radius_km.unwrap_or(0.0) + self.buffer_km
            }
            ShapeGeometry::Circle { center, radius_km } => {
                haversine_distance(center, point) <= radius_km + self.buffer_km
            }
            ShapeGeometry::Polygon { coords } => {
                point_in_polygon(point, coords) || self.near_outline(prepared, point)
            }
            ShapeGeometry::Bbox { bounds } => {
                bounds.contains(point) || self.near_outline(prepared, point)
            }
            ShapeGeometry::Line { coords } => {
                distance_point_to_polyline_km(point, coords)
                    <= self.line_buffer_km.max(self.buffer_km)
            }
            ShapeGeometry::Sector { center, radius_km, start_deg, end_deg } => {
                let within_angle =
                    angle_in_range_cw(initial_bearing(center, point), *start_deg, *end_deg);
                (within_angle && haversine_distance(center, point) <= radius_km + self.buffer_km)
                    || self.near_outline(prepared, point)
            }
        }
    }

    /// Features whose point matches, in input order.
    ///
    /// Features without a point geometry are skipped.
    pub fn filter<'a>(&self, features: &[&'a Feature]) -> Vec<&'a Feature> {
        let keep = |feature: &&'a Feature| {
            feature
                .point()
                .is_some_and(|(lat, lng)| self.matches(&Coordinate::new(lat, lng)))
        };

        #[cfg(feature = "parallel")]
        let matched: Vec<&'a Feature> = {
            use rayon::prelude::*;
            features.par_iter().copied().filter(keep).collect()
        };

        #[cfg(not(feature = "parallel"))]
        let matched: Vec<&'a Feature> = features.iter().copied().filter(keep).collect();

        debug!(
            shapes = self.shapes.len(),
            scanned = features.len(),
            matched = matched.len(),
            "Shape proximity filter"
        );
        matched
    }

    /// Convenience over [`ProximityFilter::filter`] for an owned slice.
    pub fn filter_all<'a>(&self, features: &'a [Feature]) -> Vec<&'a Feature> {
        let refs: Vec<&'a Feature> = features.iter().collect();
        self.filter(&refs)
    }
}

/// A feature with its distance from a search centre.
#[derive(Debug, Clone, Copy)]
pub struct NearbyFeature<'a> {
    pub feature: &'a Feature,
    /// Distance in kilometers
    pub distance_km: f64,
}

/// Features within `radius_km` of `center`, closest first.
///
/// Features without a point geometry are skipped.
pub fn within_radius<'a>(
    features: &[&'a Feature],
    center: &Coordinate,
    radius_km: f64,
) -> Vec<NearbyFeature<'a>> {
    let measure = |feature: &&'a Feature| {
        let (lat, lng) = feature.point()?;
        let distance_km = haversine_distance(center, &Coordinate::new(lat, lng));
        (distance_km <= radius_km).then_some(NearbyFeature { feature: *feature, distance_km })
    };

    #[cfg(feature = "parallel")]
    let mut results: Vec<NearbyFeature<'a>> = {
        use rayon::prelude::*;
        features.par_iter().filter_map(measure).collect()
    };

    #[cfg(not(feature = "parallel"))]
    let mut results: Vec<NearbyFeature<'a>> = features.iter().filter_map(measure).collect();

    // Stable, so equidistant features keep input order
    results.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    results
}
