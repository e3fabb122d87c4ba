//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Configuration wrapper
#[derive(Debug, Clone)]
pub struct Config {
    pub schema: ConfigSchema,
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file path or use defaults
    ///
    /// An explicit path must exist. Without one, the standard locations are
    /// searched and defaults are used when none is present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) if !p.exists() => return Err(Error::config_not_found(p)),
            Some(p) => Some(p.to_path_buf()),
            None => find_config_file(),
        };

        let schema = if let Some(ref p) = config_path {
            load_config_file(p)?
        } else {
            ConfigSchema::default()
        };

        validate(&schema)?;

        Ok(Self {
            schema,
            path: config_path,
        })
    }

    /// Load with defaults only (no file)
    pub fn defaults() -> Self {
        Self {
            schema: ConfigSchema::default(),
            path: None,
        }
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<PathBuf> {
    let mut candidates = vec![
        PathBuf::from("facilitymap.toml"),
        PathBuf::from(".facilitymap.toml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("facilitymap").join("config.toml"));
    }

    candidates.into_iter().find(|candidate| candidate.exists())
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &Path) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::config(format!("Failed to read config file {}: {}", path.display(), e))
    })?;

    parse_config(&content)
        .map_err(|e| e.with_context(format!("Parsing {}", path.display())))
}

/// Parse configuration from TOML text
pub fn parse_config(content: &str) -> Result<ConfigSchema> {
    Ok(toml::from_str(content)?)
}

/// Finest sector arc resolution accepted from configuration
const MIN_SECTOR_STEP_DEG: f64 = 0.01;

fn validate(schema: &ConfigSchema) -> Result<()> {
    let step = schema.shapes.sector_step_deg;
    if !(MIN_SECTOR_STEP_DEG..=360.0).contains(&step) {
        return Err(Error::config_validation(format!(
            "shapes.sector_step_deg must be between {MIN_SECTOR_STEP_DEG} and 360"
        )));
    }
    if schema.shapes.nearby_buffer_km < 0.0 || !schema.shapes.nearby_buffer_km.is_finite() {
        return Err(Error::config_validation("shapes.nearby_buffer_km cannot be negative"));
    }
    if schema.geocoder.timeout_secs == 0 {
        return Err(Error::config_validation("geocoder.timeout_secs cannot be zero"));
    }
    if schema.search.fields.is_empty() {
        return Err(Error::config_validation("search.fields needs at least one property name"));
    }
    Ok(())
}
