//! Shape-link parameter grammar.
//!
//! Shareable map links describe overlays with query parameters:
//!
//! ```text
//! ?shape=circle&lat=25&lng=120&radius=50&unit=km
//! ?shape=sector&lat=25&lng=120&radius=30&start=300&end=60
//! ?shape=polygon&poly=120,25;121,25;121,26
//! ?shape=bbox&bbox=119.5,21.5,122.5,25.5
//! ?shape=multi&circle=120,25,50|Base A&line=120,25;121,26&line_text=Route
//! ```
//!
//! Coordinates in list values are `lng,lat`. Radii are in `unit` (default
//! nautical miles) and converted to kilometers. Parsing never fails: each
//! malformed entry is dropped on its own and recorded in
//! [`ShapeQuery::skipped`].

use crate::error::{GeoError, Result};
use crate::{Coordinate, DistanceUnit, Shape};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Radius (km) of a single `point` and corridor width of lines when no `radius` is given.
pub const DEFAULT_BUFFER_KM: f64 = 50.0;

/// Ordered multi-map of decoded query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Decodes an `application/x-www-form-urlencoded` query, with or without a leading `?`.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        form_urlencoded::parse(query.as_bytes()).into_owned().collect()
    }

    /// First value for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Every value for `name`, in order of appearance.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Value of the `shape` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeMode {
    Point,
    Line,
    Polygon,
    Bbox,
    Circle,
    Sector,
    /// Any number of repeated `circle`, `line`, `poly` and `sector` entries
    Multi,
}

impl ShapeMode {
    pub fn from_param(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "point" => Some(Self::Point),
            "line" => Some(Self::Line),
            "polygon" => Some(Self::Polygon),
            "bbox" => Some(Self::Bbox),
            "circle" => Some(Self::Circle),
            "sector" => Some(Self::Sector),
            "multi" => Some(Self::Multi),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Point => "point",
            Self::Line => "line",
            Self::Polygon => "polygon",
            Self::Bbox => "bbox",
            Self::Circle => "circle",
            Self::Sector => "sector",
            Self::Multi => "multi",
        }
    }
}

impl fmt::Display for ShapeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An entry that contributed no shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedShape {
    /// Parameter the entry came from
    pub param: String,
    /// The raw value as it appeared in the link
    pub raw: String,
    pub reason: String,
}

/// Parsed shape parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeQuery {
    /// `None` when no (or an unrecognised) `shape` parameter was given
    pub mode: Option<ShapeMode>,
    pub unit: DistanceUnit,
    pub km_per_unit: f64,
    pub shapes: Vec<Shape>,
    /// Corridor width for lines, from `radius` or [`DEFAULT_BUFFER_KM`]
    pub line_buffer_km: f64,
    /// Link-wide caption from the `text` parameter
    pub text: Option<String>,
    pub skipped: Vec<SkippedShape>,
}

impl ShapeQuery {
    /// Caption to show for a shape: its own label, else the link-wide text.
    pub fn label_for<'a>(&'a self, shape: &'a Shape) -> Option<&'a str> {
        shape.label.as_deref().or(self.text.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

/// Parses `;`-separated `lng,lat` pairs, dropping malformed pairs.
///
/// Components beyond the second in a pair are ignored.
pub fn parse_coordinate_list(raw: &str) -> Vec<Coordinate> {
    raw.split(';')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let mut parts = pair.split(',');
            let lng = parse_number(parts.next(), "longitude").ok()?;
            let lat = parse_number(parts.next(), "latitude").ok()?;
            Some(Coordinate::new(lat, lng))
        })
        .collect()
}

/// Parses a raw query string. See [`parse_shape_query`].
pub fn parse_shape_query_str(query: &str) -> ShapeQuery {
    parse_shape_query(&QueryParams::parse(query))
}

/// Parses the shape parameters of a link.
pub fn parse_shape_query(params: &QueryParams) -> ShapeQuery {
    let raw_mode = params.get("shape").map(str::trim).unwrap_or_default();
    let mode = ShapeMode::from_param(raw_mode);
    let unit = DistanceUnit::from_param(params.get("unit"));
    let km_per_unit = unit.km_per_unit();
    let global_radius = parse_number(params.get("radius"), "radius").ok();
    let text = params
        .get("text")
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    let mut parser = Parser {
        params,
        km_per_unit,
        shapes: Vec::new(),
        skipped: Vec::new(),
    };

    match mode {
        Some(ShapeMode::Multi) => parser.multi(),
        Some(single) => {
            let result = parser.single(single, global_radius);
            parser.record("shape", raw_mode, result);
        }
        None if !raw_mode.is_empty() => {
            parser.record("shape", raw_mode, Err(GeoError::UnknownShape(raw_mode.to_string())));
        }
        None => {}
    }

    ShapeQuery {
        mode,
        unit,
        km_per_unit,
        shapes: parser.shapes,
        line_buffer_km: global_radius.map_or(DEFAULT_BUFFER_KM, |r| r * km_per_unit),
        text,
        skipped: parser.skipped,
    }
}

struct Parser<'a> {
    params: &'a QueryParams,
    km_per_unit: f64,
    shapes: Vec<Shape>,
    skipped: Vec<SkippedShape>,
}

impl Parser<'_> {
    fn record(&mut self, param: &str, raw: &str, result: Result<Shape>) {
        match result {
            Ok(shape) => self.shapes.push(shape),
            Err(reason) => {
                debug!(param, raw, %reason, "Skipping shape entry");
                self.skipped.push(SkippedShape {
                    param: param.to_string(),
                    raw: raw.to_string(),
                    reason: reason.to_string(),
                });
            }
        }
    }

    fn required(&self, name: &'static str) -> Result<f64> {
        parse_number(self.params.get(name), name)
    }

    fn center(&self) -> Result<Coordinate> {
        Ok(Coordinate::new(self.required("lat")?, self.required("lng")?))
    }

    fn single(&self, mode: ShapeMode, global_radius: Option<f64>) -> Result<Shape> {
        let k = self.km_per_unit;
        match mode {
            ShapeMode::Point => {
                let radius_km = global_radius.map_or(DEFAULT_BUFFER_KM, |r| r * k);
                Shape::point(self.center()?, Some(radius_km))
            }
            ShapeMode::Line => Shape::line(parse_coordinate_list(self.params.get("line").unwrap_or_default())),
            ShapeMode::Polygon => {
                Shape::polygon(parse_coordinate_list(self.params.get("poly").unwrap_or_default()))
            }
            ShapeMode::Bbox => {
                let raw = self.params.get("bbox").ok_or(GeoError::MissingValue("bbox"))?;
                let mut parts = raw.split(',');
                Shape::bbox(
                    parse_number(parts.next(), "west")?,
                    parse_number(parts.next(), "south")?,
                    parse_number(parts.next(), "east")?,
                    parse_number(parts.next(), "north")?,
                )
            }
            ShapeMode::Circle => Shape::circle(self.center()?, self.required("radius")? * k),
            ShapeMode::Sector => Shape::sector(
                self.center()?,
                self.required("radius")? * k,
                self.required("start")?,
                self.required("end")?,
            ),
            ShapeMode::Multi => Err(GeoError::UnknownShape(mode.to_string())),
        }
    }

    fn multi(&mut self) {
        type EntryParser<'p> = fn(&Parser<'p>, &str) -> Result<Shape>;

        let params = self.params;
        let entries: [(&str, EntryParser<'_>); 4] = [
            ("circle", Self::circle_entry),
            ("line", Self::line_entry),
            ("poly", Self::poly_entry),
            ("sector", Self::sector_entry),
        ];
        for (param, build) in entries {
            let labels = LabelList::collect(params, param);
            for (idx, raw) in params.get_all(param).enumerate() {
                let (body, inline) = split_inline_label(raw);
                let result = build(&*self, body).map(|shape| {
                    let label = inline.or_else(|| labels.at(idx));
                    shape.with_label(label)
                });
                self.record(param, raw, result);
            }
        }
    }

    fn circle_entry(&self, body: &str) -> Result<Shape> {
        let mut parts = body.split(',');
        let lng = parse_number(parts.next(), "longitude")?;
        let lat = parse_number(parts.next(), "latitude")?;
        let r = parse_number(parts.next(), "radius")?;
        Shape::circle(Coordinate::new(lat, lng), r * self.km_per_unit)
    }

    fn line_entry(&self, body: &str) -> Result<Shape> {
        Shape::line(parse_coordinate_list(body))
    }

    fn poly_entry(&self, body: &str) -> Result<Shape> {
        Shape::polygon(parse_coordinate_list(body))
    }

    fn sector_entry(&self, body: &str) -> Result<Shape> {
        let mut parts = body.split(',');
        let lng = parse_number(parts.next(), "longitude")?;
        let lat = parse_number(parts.next(), "latitude")?;
        let r = parse_number(parts.next(), "radius")?;
        let start = parse_number(parts.next(), "start")?;
        let end = parse_number(parts.next(), "end")?;
        Shape::sector(Coordinate::new(lat, lng), r * self.km_per_unit, start, end)
    }
}

/// Parallel labels for one repeated parameter, e.g. `circle_text`.
///
/// `circle_text[i]` wins over the i-th `circle_text` occurrence. A single
/// occurrence holding a JSON array is read as the whole list; a malformed
/// array contributes no labels.
struct LabelList {
    indexed_key: String,
    sequential: Vec<Option<String>>,
    indexed: Vec<(String, String)>,
}

impl LabelList {
    fn collect(params: &QueryParams, param: &str) -> Self {
        let key = format!("{param}_text");
        let values: Vec<&str> = params.get_all(&key).collect();

        let sequential = match values.as_slice() {
            [single] if single.trim_start().starts_with('[') => {
                serde_json::from_str::<Vec<serde_json::Value>>(single)
                    .map(|list| list.iter().map(json_label).collect())
                    .unwrap_or_default()
            }
            _ => values.iter().map(|v| Some((*v).to_string())).collect(),
        };

        let indexed_key = format!("{key}[");
        let indexed = params
            .pairs
            .iter()
            .filter(|(k, _)| k.starts_with(&indexed_key))
            .cloned()
            .collect();

        Self { indexed_key, sequential, indexed }
    }

    fn at(&self, idx: usize) -> Option<String> {
        let wanted = format!("{}{idx}]", self.indexed_key);
        self.indexed
            .iter()
            .find(|(k, _)| *k == wanted)
            .map(|(_, v)| v.clone())
            .or_else(|| self.sequential.get(idx).cloned().flatten())
    }
}

fn json_label(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Splits `body|label` at the first `|`.
fn split_inline_label(raw: &str) -> (&str, Option<String>) {
    match raw.split_once('|') {
        Some((body, label)) => {
            let label = label.trim();
            (body, (!label.is_empty()).then(|| label.to_string()))
        }
        None => (raw, None),
    }
}

/// Strict decimal parse: trimmed, non-empty and finite.
fn parse_number(token: Option<&str>, what: &'static str) -> Result<f64> {
    let token = token.map(str::trim).unwrap_or_default();
    if token.is_empty() {
        return Err(GeoError::MissingValue(what));
    }
    let value: f64 = token
        .parse()
        .map_err(|_| GeoError::InvalidNumber(token.to_string()))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(GeoError::NonFinite(what))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ShapeGeometry;

    fn circle_of(shape: &Shape) -> (Coordinate, f64) {
        match &shape.geometry {
            ShapeGeometry::Circle { center, radius_km } => (*center, *radius_km),
            other => panic!("expected circle, got {other:?}"),
        }
    }

    #[test]
    fn test_query_params_order_and_decoding() {
        let params = QueryParams::parse("?a=1&b=x+y&a=2&c=%E5%9F%BA%E5%9C%B0");
        assert_eq!(params.get("a"), Some("1"));
        assert_eq!(params.get_all("a").collect::<Vec<_>>(), vec!["1", "2"]);
        assert_eq!(params.get("b"), Some("x y"));
        assert_eq!(params.get("c"), Some("基地"));
        assert_eq!(params.get("missing"), None);
    }

    #[test]
    fn test_parse_coordinate_list() {
        let coords = parse_coordinate_list("120,25; 121,26 ;bad,1;;122");
        assert_eq!(coords, vec![Coordinate::new(25.0, 120.0), Coordinate::new(26.0, 121.0)]);
        assert!(parse_coordinate_list("").is_empty());
    }

    #[test]
    fn test_single_circle_in_km() {
        let q = parse_shape_query_str("shape=circle&lat=25&lng=120&radius=50&unit=km");
        assert_eq!(q.mode, Some(ShapeMode::Circle));
        assert_eq!(q.unit, DistanceUnit::Kilometer);
        assert_eq!(q.shapes.len(), 1);
        let (center, radius) = circle_of(&q.shapes[0]);
        assert_eq!(center, Coordinate::new(25.0, 120.0));
        assert_eq!(radius, 50.0);
        assert_eq!(q.line_buffer_km, 50.0);
        assert!(q.skipped.is_empty());
    }

    #[test]
    fn test_multi_circles_with_inline_label() {
        let q = parse_shape_query_str("shape=multi&circle=120,25,50|Base A&circle=121,26,30");
        assert_eq!(q.mode, Some(ShapeMode::Multi));
        assert_eq!(q.shapes.len(), 2);
        assert_eq!(q.shapes[0].label.as_deref(), Some("Base A"));
        assert_eq!(q.shapes[1].label, None);

        let (center, radius) = circle_of(&q.shapes[0]);
        assert_eq!(center, Coordinate::new(25.0, 120.0));
        assert!((radius - 50.0 * 1.852).abs() < 1e-9);
    }

    #[test]
    fn test_label_precedence() {
        let q = parse_shape_query_str(
            "shape=multi&circle=120,25,1|Inline&circle=121,25,1&circle=122,25,1\
             &circle_text=Seq0&circle_text=Seq1&circle_text[1]=Indexed",
        );
        let labels: Vec<_> = q.shapes.iter().map(|s| s.label.as_deref()).collect();
        assert_eq!(labels, vec![Some("Inline"), Some("Indexed"), None]);
    }

    #[test]
    fn test_json_array_labels() {
        let q = parse_shape_query_str(
            "shape=multi&sector=120,25,10,0,90&sector=121,25,10,90,180\
             &sector_text=%5B%22North%22%2Cnull%5D",
        );
        assert_eq!(q.shapes.len(), 2);
        assert_eq!(q.shapes[0].label.as_deref(), Some("North"));
        assert_eq!(q.shapes[1].label, None);
    }

    #[test]
    fn test_malformed_json_labels_contribute_nothing() {
        let q = parse_shape_query_str("shape=multi&line=120,25;121,26&line_text=%5Boops");
        assert_eq!(q.shapes.len(), 1);
        assert_eq!(q.shapes[0].label, None);
    }

    #[test]
    fn test_multi_drops_bad_entries_independently() {
        let q = parse_shape_query_str(
            "shape=multi&circle=120,25&circle=121,26,5\
             &poly=120,25;121,25&poly=120,25;121,25;121,26\
             &sector=120,25,10,0&line=120,25;121,26",
        );
        let kinds: Vec<_> = q.shapes.iter().map(Shape::kind).collect();
        assert_eq!(kinds, vec!["circle", "line", "polygon"]);

        let skipped: Vec<_> = q.skipped.iter().map(|s| (s.param.as_str(), s.raw.as_str())).collect();
        assert_eq!(
            skipped,
            vec![("circle", "120,25"), ("poly", "120,25;121,25"), ("sector", "120,25,10,0")]
        );
        assert_eq!(q.skipped[0].reason, "missing radius");
        assert_eq!(q.skipped[1].reason, "polygon needs at least 3 points, got 2");
    }

    #[test]
    fn test_point_defaults_to_50km() {
        let q = parse_shape_query_str("shape=point&lat=25&lng=120");
        match &q.shapes[0].geometry {
            ShapeGeometry::Point { radius_km, .. } => assert_eq!(*radius_km, Some(50.0)),
            other => panic!("expected point, got {other:?}"),
        }

        let q = parse_shape_query_str("shape=point&lat=25&lng=120&radius=10");
        match &q.shapes[0].geometry {
            ShapeGeometry::Point { radius_km, .. } => {
                assert!((radius_km.unwrap_or_default() - 18.52).abs() < 1e-9)
            }
            other => panic!("expected point, got {other:?}"),
        }
        assert!((q.line_buffer_km - 18.52).abs() < 1e-9);
    }

    #[test]
    fn test_single_sector_requires_all_fields() {
        let q = parse_shape_query_str("shape=sector&lat=25&lng=120&radius=10&start=30");
        assert!(q.shapes.is_empty());
        assert_eq!(q.skipped[0].param, "shape");
        assert_eq!(q.skipped[0].reason, "missing end");

        let q = parse_shape_query_str("shape=sector&lat=25&lng=120&radius=10&start=30&end=90&unit=m");
        match &q.shapes[0].geometry {
            ShapeGeometry::Sector { radius_km, start_deg, end_deg, .. } => {
                assert!((radius_km - 0.01).abs() < 1e-12);
                assert_eq!((*start_deg, *end_deg), (30.0, 90.0));
            }
            other => panic!("expected sector, got {other:?}"),
        }
    }

    #[test]
    fn test_single_bbox_line_polygon() {
        let q = parse_shape_query_str("shape=bbox&bbox=119.5,21.5,122.5,25.5");
        assert_eq!(q.shapes[0].kind(), "bbox");

        let q = parse_shape_query_str("shape=bbox&bbox=119.5,21.5,abc,25.5");
        assert!(q.shapes.is_empty());
        assert_eq!(q.skipped[0].reason, "invalid number 'abc'");

        let q = parse_shape_query_str("shape=line&line=120,25;121,26");
        assert_eq!(q.shapes[0].kind(), "line");

        let q = parse_shape_query_str("shape=polygon&poly=120,25;121,25;121,26");
        assert_eq!(q.shapes[0].kind(), "polygon");

        let q = parse_shape_query_str("shape=polygon&poly=120,25");
        assert!(q.shapes.is_empty());
    }

    #[test]
    fn test_non_finite_values_dropped() {
        let q = parse_shape_query_str("shape=circle&lat=25&lng=120&radius=inf");
        assert!(q.shapes.is_empty());
        assert_eq!(q.skipped[0].reason, "radius must be finite");
    }

    #[test]
    fn test_unknown_and_missing_mode() {
        let q = parse_shape_query_str("shape=hexagon&lat=25");
        assert_eq!(q.mode, None);
        assert!(q.shapes.is_empty());
        assert_eq!(q.skipped[0].reason, "unknown shape mode 'hexagon'");

        let q = parse_shape_query_str("lat=25&lng=120");
        assert_eq!(q.mode, None);
        assert!(q.skipped.is_empty());
        assert_eq!(q.unit, DistanceUnit::NauticalMile);
    }

    #[test]
    fn test_text_and_label_fallback() {
        let q = parse_shape_query_str("shape=multi&circle=120,25,1|Own&circle=121,25,1&text=+Drill+zone+");
        assert_eq!(q.text.as_deref(), Some("Drill zone"));
        assert_eq!(q.label_for(&q.shapes[0]), Some("Own"));
        assert_eq!(q.label_for(&q.shapes[1]), Some("Drill zone"));
    }

    #[test]
    fn test_mode_case_insensitive() {
        let q = parse_shape_query_str("shape=%20CIRCLE%20&lat=25&lng=120&radius=1");
        assert_eq!(q.mode, Some(ShapeMode::Circle));
        assert_eq!(q.shapes.len(), 1);
    }
}
