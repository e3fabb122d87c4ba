//! Core utilities for the facility map tools
//!
//! This crate provides shared functionality used by the geometry and search engines:
//!
//! - **Error handling**: Structured errors with codes, context, and recovery suggestions
//! - **Feature model**: GeoJSON facility records, layer classification and indexing
//! - **Caching**: In-memory TTL cache for remote lookups
//! - **Rate limiting**: Single-flight FIFO gate with request spacing
//! - **Retry**: Exponential backoff policy for transient failures
//! - **Configuration**: TOML-based configuration with validation
//!
//! # Example
//!
//! ```rust,no_run
//! use facilitymap_core::{config::Config, feature::FeatureCollection};
//!
//! let config = Config::load(None).expect("Invalid configuration");
//! let data = FeatureCollection::from_path("facilities.geojson").expect("Unreadable data");
//! println!("{} features, buffer {} km", data.len(), config.schema.shapes.nearby_buffer_km);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod config;
pub mod error;
pub mod feature;
pub mod rate_limit;
pub mod retry;

pub use error::{Error, ErrorCategory, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::cache::TtlCache;
    pub use crate::config::{Config, ConfigSchema, LookupProfile};
    pub use crate::error::{exit_codes, Error, ErrorCategory, ErrorCode, Result, ResultExt};
    pub use crate::feature::{Feature, FeatureCollection, LayerIndex, PropertyValue};
    pub use crate::rate_limit::{RequestGate, SpacingConfig};
    pub use crate::retry::{retry_async, RetryConfig};
}
