//! Facility feature model
//!
//! Features arrive as GeoJSON from the data export. Only Point geometries
//! carry a location the engines can use; everything else is kept opaque.
//!
//! # Example
//!
//! ```
//! use facilitymap_core::feature::FeatureCollection;
//!
//! let json = r#"{
//!     "type": "FeatureCollection",
//!     "features": [{
//!         "type": "Feature",
//!         "geometry": {"type": "Point", "coordinates": [119.79, 25.51]},
//!         "properties": {"名稱": "HQ-12 陣地", "layer": "防空"}
//!     }]
//! }"#;
//!
//! let collection = FeatureCollection::from_json(json).unwrap();
//! assert_eq!(collection.features[0].layer_name(), "防空");
//! assert_eq!(collection.features[0].point(), Some((25.51, 119.79)));
//! ```

use crate::error::{Error, Result, ResultExt};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

/// Layer name used when a feature carries no classification property.
pub const DEFAULT_LAYER: &str = "武裝警察、海外軍事設施及其他分類";

/// Property keys consulted, in order, to classify a feature into a layer.
pub const LAYER_KEYS: [&str; 3] = ["layer", "分層", "類別"];

/// A single property value.
///
/// The data export only ever emits strings and numbers; booleans and nulls
/// are accepted so that hand-edited files still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
}

impl PropertyValue {
    /// Borrow the value as a string slice if it is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Text used for matching and display. Empty strings and nulls have none.
    pub fn as_text(&self) -> Option<String> {
        match self {
            PropertyValue::String(s) if !s.is_empty() => Some(s.clone()),
            PropertyValue::Number(n) => Some(n.to_string()),
            PropertyValue::Bool(true) => Some("true".to_string()),
            _ => None,
        }
    }
}

/// Ordered property bag of a feature.
pub type Properties = BTreeMap<String, PropertyValue>;

/// GeoJSON geometry, kept loosely typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// Geometry type, e.g. `Point`
    #[serde(rename = "type")]
    pub kind: String,
    /// Raw coordinates in GeoJSON `[lng, lat]` order
    #[serde(default)]
    pub coordinates: serde_json::Value,
}

impl Geometry {
    /// Build a Point geometry from latitude and longitude.
    pub fn point(lat: f64, lng: f64) -> Self {
        Self {
            kind: "Point".to_string(),
            coordinates: serde_json::json!([lng, lat]),
        }
    }
}

/// A facility record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub properties: Properties,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Properties, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Properties>::deserialize(deserializer)?.unwrap_or_default())
}

impl Feature {
    /// Create a point feature with the given properties.
    pub fn point_feature(lat: f64, lng: f64, properties: Properties) -> Self {
        Self {
            geometry: Some(Geometry::point(lat, lng)),
            properties,
        }
    }

    /// Look up a property.
    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Text of a property, skipping nulls and empty strings.
    pub fn property_text(&self, key: &str) -> Option<String> {
        self.property(key).and_then(PropertyValue::as_text)
    }

    /// `(lat, lng)` of a Point geometry.
    ///
    /// Returns `None` for other geometry types, missing geometry, or
    /// coordinates that are not a pair of finite numbers.
    pub fn point(&self) -> Option<(f64, f64)> {
        let geometry = self.geometry.as_ref()?;
        if geometry.kind != "Point" {
            return None;
        }
        let coords = geometry.coordinates.as_array()?;
        if coords.len() < 2 {
            return None;
        }
        let lng = coords[0].as_f64()?;
        let lat = coords[1].as_f64()?;
        (lat.is_finite() && lng.is_finite()).then_some((lat, lng))
    }

    /// Layer this feature is classified under.
    pub fn layer_name(&self) -> String {
        LAYER_KEYS
            .iter()
            .find_map(|key| self.property_text(key))
            .unwrap_or_else(|| DEFAULT_LAYER.to_string())
    }
}

/// A GeoJSON FeatureCollection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// Parse a collection from a JSON string.
    ///
    /// Any document whose top-level `type` is not `FeatureCollection` is
    /// rejected.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let kind = value
            .get("type")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("a document without a type");
        if kind != "FeatureCollection" {
            return Err(Error::not_a_feature_collection(kind));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Read a collection from a file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::file_not_found(path));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content).context(format!("Reading {}", path.display()))
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// True if the collection holds no features.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Features grouped by layer name, built in one pass.
#[derive(Debug, Default)]
pub struct LayerIndex<'a> {
    layers: HashMap<String, Vec<&'a Feature>>,
}

impl<'a> LayerIndex<'a> {
    /// Group features by [`Feature::layer_name`].
    pub fn build(features: &'a [Feature]) -> Self {
        let mut layers: HashMap<String, Vec<&'a Feature>> = HashMap::new();
        for feature in features {
            layers.entry(feature.layer_name()).or_default().push(feature);
        }
        Self { layers }
    }

    /// Features in a layer, if the layer exists.
    pub fn get(&self, layer: &str) -> Option<&[&'a Feature]> {
        self.layers.get(layer).map(Vec::as_slice)
    }

    /// Layer names with their feature counts, sorted by name.
    pub fn counts(&self) -> Vec<(&str, usize)> {
        let mut counts: Vec<(&str, usize)> = self
            .layers
            .iter()
            .map(|(name, features)| (name.as_str(), features.len()))
            .collect();
        counts.sort_by(|a, b| a.0.cmp(b.0));
        counts
    }
}

/// Restrict features to one layer.
///
/// `None` keeps everything. The index is used when it knows the layer;
/// otherwise the features are scanned linearly.
pub fn filter_by_layer<'a>(
    features: &'a [Feature],
    layer: Option<&str>,
    index: Option<&LayerIndex<'a>>,
) -> Vec<&'a Feature> {
    let Some(layer) = layer else {
        return features.iter().collect();
    };

    if let Some(hit) = index.and_then(|idx| idx.get(layer)) {
        return hit.to_vec();
    }

    features.iter().filter(|f| f.layer_name() == layer).collect()
}

/// Sorted, de-duplicated values of the explicit `layer` property.
pub fn list_layers(features: &[Feature]) -> Vec<String> {
    features
        .iter()
        .filter_map(|f| f.property_text("layer"))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
