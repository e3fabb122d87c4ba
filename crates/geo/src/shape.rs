//! Shape descriptors.

use crate::error::{GeoError, Result};
use crate::{build_sector_arc, close_ring, destination_point, Coordinate};
use serde::{Deserialize, Serialize};

/// Axis-aligned envelope in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl Bounds {
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self { west, south, east, north }
    }

    /// Smallest envelope holding every point, or `None` for an empty input.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Coordinate>) -> Option<Self> {
        points.into_iter().fold(None, |acc, p| {
            Some(match acc {
                None => Self::new(p.longitude, p.latitude, p.longitude, p.latitude),
                Some(b) => Self::new(
                    b.west.min(p.longitude),
                    b.south.min(p.latitude),
                    b.east.max(p.longitude),
                    b.north.max(p.latitude),
                ),
            })
        })
    }

    /// Inclusive containment test.
    pub fn contains(&self, point: &Coordinate) -> bool {
        point.latitude >= self.south
            && point.latitude <= self.north
            && point.longitude >= self.west
            && point.longitude <= self.east
    }

    /// Corners in ring order: south-west, south-east, north-east, north-west.
    pub fn corners(&self) -> [Coordinate; 4] {
        [
            Coordinate::new(self.south, self.west),
            Coordinate::new(self.south, self.east),
            Coordinate::new(self.north, self.east),
            Coordinate::new(self.north, self.west),
        ]
    }

    pub fn center(&self) -> Coordinate {
        Coordinate::new((self.south + self.north) / 2.0, (self.west + self.east) / 2.0)
    }
}

/// Geometry of a parsed shape, tagged by `type` when serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ShapeGeometry {
    /// Centre with an optional radius
    Point {
        center: Coordinate,
        radius_km: Option<f64>,
    },
    Circle {
        center: Coordinate,
        radius_km: f64,
    },
    /// Bearings are degrees clockwise from north, as given
    Sector {
        center: Coordinate,
        radius_km: f64,
        start_deg: f64,
        end_deg: f64,
    },
    Line {
        coords: Vec<Coordinate>,
    },
    /// Implicitly closed ring
    Polygon {
        coords: Vec<Coordinate>,
    },
    Bbox {
        bounds: Bounds,
    },
}

/// A shape with an optional label.
///
/// Constructors reject non-finite inputs and short vertex lists, so every
/// `Shape` in circulation is well formed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    #[serde(flatten)]
    pub geometry: ShapeGeometry,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

fn finite(value: f64, field: &'static str) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(GeoError::NonFinite(field))
    }
}

fn finite_center(center: Coordinate) -> Result<Coordinate> {
    finite(center.latitude, "latitude")?;
    finite(center.longitude, "longitude")?;
    Ok(center)
}

impl Shape {
    fn unlabeled(geometry: ShapeGeometry) -> Self {
        Self { geometry, label: None }
    }

    pub fn point(center: Coordinate, radius_km: Option<f64>) -> Result<Self> {
        let center = finite_center(center)?;
        let radius_km = radius_km.map(|r| finite(r, "radius")).transpose()?;
        Ok(Self::unlabeled(ShapeGeometry::Point { center, radius_km }))
    }

    pub fn circle(center: Coordinate, radius_km: f64) -> Result<Self> {
        Ok(Self::unlabeled(ShapeGeometry::Circle {
            center: finite_center(center)?,
            radius_km: finite(radius_km, "radius")?,
        }))
    }

    pub fn sector(center: Coordinate, radius_km: f64, start_deg: f64, end_deg: f64) -> Result<Self> {
        Ok(Self::unlabeled(ShapeGeometry::Sector {
            center: finite_center(center)?,
            radius_km: finite(radius_km, "radius")?,
            start_deg: finite(start_deg, "start")?,
            end_deg: finite(end_deg, "end")?,
        }))
    }

    pub fn line(coords: Vec<Coordinate>) -> Result<Self> {
        check_vertices("line", &coords, 2)?;
        Ok(Self::unlabeled(ShapeGeometry::Line { coords }))
    }

    pub fn polygon(coords: Vec<Coordinate>) -> Result<Self> {
        check_vertices("polygon", &coords, 3)?;
        Ok(Self::unlabeled(ShapeGeometry::Polygon { coords }))
    }

    pub fn bbox(west: f64, south: f64, east: f64, north: f64) -> Result<Self> {
        Ok(Self::unlabeled(ShapeGeometry::Bbox {
            bounds: Bounds::new(
                finite(west, "west")?,
                finite(south, "south")?,
                finite(east, "east")?,
                finite(north, "north")?,
            ),
        }))
    }

    /// Attaches a label; blank labels are ignored.
    pub fn with_label(mut self, label: Option<String>) -> Self {
        self.label = label
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());
        self
    }

    /// Lower-case kind name, matching the serialized `type` tag.
    pub fn kind(&self) -> &'static str {
        match self.geometry {
            ShapeGeometry::Point { .. } => "point",
            ShapeGeometry::Circle { .. } => "circle",
            ShapeGeometry::Sector { .. } => "sector",
            ShapeGeometry::Line { .. } => "line",
            ShapeGeometry::Polygon { .. } => "polygon",
            ShapeGeometry::Bbox { .. } => "bbox",
        }
    }

    /// South-west/north-east envelope of the shape.
    ///
    /// Round shapes are approximated by their outline at `step_deg`
    /// resolution.
    pub fn bounds(&self, step_deg: f64) -> Bounds {
        match &self.geometry {
            ShapeGeometry::Bbox { bounds } => *bounds,
            ShapeGeometry::Point { center, radius_km: None } => {
                Bounds::new(center.longitude, center.latitude, center.longitude, center.latitude)
            }
            _ => {
                let outline = self.perimeter(step_deg);
                // Every constructed shape has a non-empty outline
                Bounds::from_points(&outline).unwrap_or(Bounds::new(0.0, 0.0, 0.0, 0.0))
            }
        }
    }

    /// Outline used for nearby-distance tests.
    ///
    /// Areas return a closed ring, lines their own vertices and a point
    /// without a radius just its centre.
    pub fn perimeter(&self, step_deg: f64) -> Vec<Coordinate> {
        match &self.geometry {
            ShapeGeometry::Point { center, radius_km: None } => vec![*center],
            ShapeGeometry::Point { center, radius_km: Some(r) }
            | ShapeGeometry::Circle { center, radius_km: r } => circle_outline(center, *r, step_deg),
            ShapeGeometry::Sector { center, radius_km, start_deg, end_deg } => {
                close_ring(&build_sector_arc(center, *radius_km, *start_deg, *end_deg, step_deg))
            }
            ShapeGeometry::Line { coords } => coords.clone(),
            ShapeGeometry::Polygon { coords } => close_ring(coords),
            ShapeGeometry::Bbox { bounds } => close_ring(&bounds.corners()),
        }
    }
}

fn circle_outline(center: &Coordinate, radius_km: f64, step_deg: f64) -> Vec<Coordinate> {
    let mut ring = build_sector_arc(center, radius_km, 0.0, 0.0, step_deg);
    // Drop the fan centre; the arc already starts and ends at bearing 0
    ring.remove(0);
    if ring.is_empty() {
        ring.push(destination_point(center, 0.0, radius_km));
    }
    ring
}

fn check_vertices(kind: &'static str, coords: &[Coordinate], required: usize) -> Result<()> {
    if coords.len() < required {
        return Err(GeoError::TooFewPoints { kind, required, found: coords.len() });
    }
    if let Some(bad) = coords.iter().find(|c| !c.is_finite()) {
        return Err(GeoError::InvalidNumber(format!("{},{}", bad.longitude, bad.latitude)));
    }
    Ok(())
}
