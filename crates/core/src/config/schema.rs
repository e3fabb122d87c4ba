//! Configuration schema definitions
//!
//! Every section has defaults, so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    #[serde(default)]
    pub geocoder: GeocoderConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub shapes: ShapesConfig,

    #[serde(default)]
    pub equipment: EquipmentConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote geocoder settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    /// Allow remote lookups at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Search endpoint
    #[serde(default = "default_nominatim_endpoint")]
    pub endpoint: String,

    /// Client-identifying User-Agent required by the provider
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// `accept-language` request parameter
    #[serde(default = "default_accept_language")]
    pub accept_language: String,

    /// `limit` request parameter
    #[serde(default = "default_result_limit")]
    pub result_limit: u32,

    /// Gap between the end of one request and the start of the next
    #[serde(default = "default_request_spacing_ms")]
    pub request_spacing_ms: u64,

    /// Freshness window of cached responses
    #[serde(default = "default_geocoder_cache_secs")]
    pub cache_max_age_secs: u64,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_nominatim_endpoint(),
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
            result_limit: default_result_limit(),
            request_spacing_ms: default_request_spacing_ms(),
            cache_max_age_secs: default_geocoder_cache_secs(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl GeocoderConfig {
    pub fn request_spacing(&self) -> Duration {
        Duration::from_millis(self.request_spacing_ms)
    }

    pub fn cache_max_age(&self) -> Duration {
        Duration::from_secs(self.cache_max_age_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_true() -> bool {
    true
}

fn default_nominatim_endpoint() -> String {
    "https://nominatim.openstreetmap.org/search".to_string()
}

fn default_user_agent() -> String {
    "MapSearchApp/1.0".to_string()
}

fn default_accept_language() -> String {
    "zh-CN,zh-TW,zh".to_string()
}

fn default_result_limit() -> u32 {
    5
}

fn default_request_spacing_ms() -> u64 {
    1100
}

fn default_geocoder_cache_secs() -> u64 {
    3600
}

fn default_timeout_secs() -> u64 {
    10
}

/// Feature search settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Property fields scanned, in priority order
    #[serde(default = "default_search_fields")]
    pub fields: Vec<String>,

    #[serde(default = "default_max_results")]
    pub max_results: usize,

    #[serde(default = "default_min_query_length")]
    pub min_query_length: usize,

    /// Remote lookup only runs when fewer local results than this were found
    #[serde(default = "default_remote_threshold")]
    pub remote_threshold: usize,

    #[serde(default = "default_remote_min_query_length")]
    pub remote_min_query_length: usize,

    #[serde(default = "default_remote_max_results")]
    pub remote_max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            fields: default_search_fields(),
            max_results: default_max_results(),
            min_query_length: default_min_query_length(),
            remote_threshold: default_remote_threshold(),
            remote_min_query_length: default_remote_min_query_length(),
            remote_max_results: default_remote_max_results(),
        }
    }
}

fn default_search_fields() -> Vec<String> {
    ["名稱", "說明", "layer"].iter().map(|s| (*s).to_string()).collect()
}

fn default_max_results() -> usize {
    50
}

fn default_min_query_length() -> usize {
    1
}

fn default_remote_threshold() -> usize {
    5
}

fn default_remote_min_query_length() -> usize {
    3
}

fn default_remote_max_results() -> usize {
    5
}

/// Shape overlay settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapesConfig {
    /// Extra distance around every shape within which features count as nearby
    #[serde(default = "default_nearby_buffer_km")]
    pub nearby_buffer_km: f64,

    /// Angular resolution of sector arcs
    #[serde(default = "default_sector_step_deg")]
    pub sector_step_deg: f64,
}

impl Default for ShapesConfig {
    fn default() -> Self {
        Self {
            nearby_buffer_km: default_nearby_buffer_km(),
            sector_step_deg: default_sector_step_deg(),
        }
    }
}

fn default_nearby_buffer_km() -> f64 {
    50.0
}

fn default_sector_step_deg() -> f64 {
    2.0
}

/// Client profile for equipment lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LookupProfile {
    #[default]
    Desktop,
    Mobile,
}

/// Equipment lookup settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipmentConfig {
    #[serde(default)]
    pub profile: LookupProfile,

    /// Page-summary endpoint; the title is appended as a path segment
    #[serde(default = "default_wikipedia_url")]
    pub wikipedia_url: String,

    #[serde(default = "default_equipment_cache_secs")]
    pub cache_max_age_secs: u64,

    /// Pause between lookup batches
    #[serde(default = "default_batch_delay_ms")]
    pub batch_delay_ms: u64,
}

impl Default for EquipmentConfig {
    fn default() -> Self {
        Self {
            profile: LookupProfile::default(),
            wikipedia_url: default_wikipedia_url(),
            cache_max_age_secs: default_equipment_cache_secs(),
            batch_delay_ms: default_batch_delay_ms(),
        }
    }
}

fn default_wikipedia_url() -> String {
    "https://en.wikipedia.org/api/rest_v1/page/summary".to_string()
}

fn default_equipment_cache_secs() -> u64 {
    30 * 60
}

fn default_batch_delay_ms() -> u64 {
    200
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of compact text
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
