//! CLI command implementations

pub mod equipment;
pub mod layers;
pub mod nearby;
pub mod search;
pub mod shapes;

use anyhow::Result;
use clap::ValueEnum;
use facilitymap_core::config::ConfigSchema;
use facilitymap_core::feature::Feature;
use facilitymap_search::UNNAMED;
use serde::Serialize;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Settings shared by every command
pub struct Context {
    pub schema: ConfigSchema,
    pub format: OutputFormat,
}

impl Context {
    pub fn new(schema: ConfigSchema, format: OutputFormat) -> Self {
        Self { schema, format }
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    pub fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}

/// Query part of a shape link; plain query strings pass through.
pub fn query_part(input: &str) -> &str {
    let input = input.trim();
    let query = input.split_once('?').map_or(input, |(_, query)| query);
    query.split('#').next().unwrap_or_default()
}

/// Display name of a facility.
pub fn feature_name(feature: &Feature) -> String {
    feature
        .property_text("名稱")
        .or_else(|| feature.property_text("name"))
        .unwrap_or_else(|| UNNAMED.to_string())
}

/// One facility in command output.
#[derive(Debug, Serialize)]
pub struct FeatureRow {
    pub name: String,
    pub layer: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl From<&Feature> for FeatureRow {
    fn from(feature: &Feature) -> Self {
        let point = feature.point();
        Self {
            name: feature_name(feature),
            layer: feature.layer_name(),
            lat: point.map(|(lat, _)| lat),
            lng: point.map(|(_, lng)| lng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facilitymap_core::feature::{Properties, PropertyValue};

    #[test]
    fn test_query_part() {
        assert_eq!(query_part("shape=circle&lat=25"), "shape=circle&lat=25");
        assert_eq!(query_part("?shape=circle"), "shape=circle");
        assert_eq!(
            query_part("https://example.org/map/?shape=bbox&bbox=1,2,3,4#layers"),
            "shape=bbox&bbox=1,2,3,4"
        );
    }

    #[test]
    fn test_feature_row() {
        let mut props = Properties::new();
        props.insert("name".into(), PropertyValue::String("Radar".into()));
        props.insert("layer".into(), PropertyValue::String("雷達".into()));
        let row = FeatureRow::from(&Feature::point_feature(25.0, 121.0, props));
        assert_eq!(row.name, "Radar");
        assert_eq!(row.layer, "雷達");
        assert_eq!(row.lat, Some(25.0));

        let unnamed = FeatureRow::from(&Feature::point_feature(0.0, 0.0, Properties::new()));
        assert_eq!(unnamed.name, UNNAMED);
    }
}
