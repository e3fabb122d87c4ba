//! Configuration for the HTTP adapters
//!
//! Defaults come from the facilitymap configuration file; a few environment
//! variables override them.

use crate::error::{ApiError, ApiResult};
use facilitymap_core::config::ConfigSchema;
use facilitymap_core::retry::RetryConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Geocoder search endpoint override
pub const ENV_NOMINATIM_URL: &str = "FACILITYMAP_NOMINATIM_URL";
/// Page-summary endpoint override
pub const ENV_WIKIPEDIA_URL: &str = "FACILITYMAP_WIKIPEDIA_URL";
/// User-Agent override
pub const ENV_USER_AGENT: &str = "FACILITYMAP_USER_AGENT";
/// Request timeout override, in seconds
pub const ENV_TIMEOUT_SECS: &str = "FACILITYMAP_TIMEOUT_SECS";

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Nominatim `search` endpoint
    pub nominatim_url: String,
    /// Page-summary endpoint; titles are appended as a path segment
    pub wikipedia_url: String,
    /// Sent with every request; Nominatim rejects anonymous clients
    pub user_agent: String,
    /// `accept-language` parameter of geocoder requests
    pub accept_language: String,
    /// `limit` parameter of geocoder requests
    pub result_limit: u32,
    /// Request timeout
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    /// Retry policy for services that allow it
    pub retry: RetryConfig,
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_schema(&ConfigSchema::default())
    }
}

impl ClientConfig {
    /// Build from the geocoder and equipment sections of a configuration file
    #[must_use]
    pub fn from_schema(schema: &ConfigSchema) -> Self {
        Self {
            nominatim_url: schema.geocoder.endpoint.clone(),
            wikipedia_url: schema.equipment.wikipedia_url.clone(),
            user_agent: schema.geocoder.user_agent.clone(),
            accept_language: schema.geocoder.accept_language.clone(),
            result_limit: schema.geocoder.result_limit,
            timeout: schema.geocoder.timeout(),
            retry: RetryConfig::default(),
        }
    }

    /// Defaults with environment overrides applied
    ///
    /// Reads the following environment variables:
    /// - `FACILITYMAP_NOMINATIM_URL`: geocoder search endpoint
    /// - `FACILITYMAP_WIKIPEDIA_URL`: page-summary endpoint
    /// - `FACILITYMAP_USER_AGENT`: User-Agent header
    /// - `FACILITYMAP_TIMEOUT_SECS`: request timeout in seconds
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply the environment overrides to this configuration
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(ENV_NOMINATIM_URL) {
            self.nominatim_url = url;
        }
        if let Some(url) = lookup(ENV_WIKIPEDIA_URL) {
            self.wikipedia_url = url;
        }
        if let Some(agent) = lookup(ENV_USER_AGENT) {
            self.user_agent = agent;
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS).and_then(|s| s.trim().parse().ok()) {
            self.timeout = Duration::from_secs(secs);
        }
        self
    }

    /// Builder-style method to set the geocoder endpoint
    #[must_use]
    pub fn with_nominatim_url(mut self, url: impl Into<String>) -> Self {
        self.nominatim_url = url.into();
        self
    }

    /// Builder-style method to set the page-summary endpoint
    #[must_use]
    pub fn with_wikipedia_url(mut self, url: impl Into<String>) -> Self {
        self.wikipedia_url = url.into();
        self
    }

    /// Builder-style method to set the User-Agent
    #[must_use]
    pub fn with_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Builder-style method to set timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder-style method to set retry config
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> ApiResult<()> {
        for (name, url) in [("nominatim_url", &self.nominatim_url), ("wikipedia_url", &self.wikipedia_url)] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ApiError::config(format!("{name} must start with http:// or https://")));
            }
        }

        if self.user_agent.trim().is_empty() {
            return Err(ApiError::config("user_agent cannot be empty"));
        }

        if self.timeout.is_zero() {
            return Err(ApiError::config("timeout cannot be zero"));
        }

        Ok(())
    }
}
