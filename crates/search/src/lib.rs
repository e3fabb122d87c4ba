//! Script-tolerant search for facility features.
//!
//! This crate provides:
//! - Traditional/Simplified Chinese folding with a pluggable converter
//! - Relevance-scored local search over feature properties
//! - A cached, rate-limited geocoder front
//! - Combined local and remote search with match highlighting
//!
//! # Example
//! ```
//! use facilitymap_search::{search_local_features, ScriptFolder, SearchOptions};
//! use facilitymap_core::feature::{Feature, Properties, PropertyValue};
//!
//! let mut props = Properties::new();
//! props.insert("名稱".into(), PropertyValue::String("臺灣海峽觀測站".into()));
//! let features = vec![Feature::point_feature(24.0, 119.5, props)];
//!
//! let folder = ScriptFolder::builtin();
//! let hits = search_local_features(&folder, &features, "台湾", &SearchOptions::default());
//! assert_eq!(hits.len(), 1);
//! ```

mod combined;
mod error;
mod fuzzy;
pub mod geocoder;
mod local;
mod relevance;
pub mod script;

pub use combined::{search_combined, CombinedOptions, RemoteMatch, SearchEngine, SearchResult};
pub use error::{Result, SearchError, SearchErrorCode};
pub use fuzzy::{find_match, fuzzy_match, highlight_match, HIGHLIGHT_CLOSE, HIGHLIGHT_OPEN};
pub use geocoder::{GeocodeBackend, GeocodedPlace, Geocoder, GeocoderOptions, NominatimPlace};
pub use local::{search_local_features, LocalMatch, SearchOptions, UNCLASSIFIED, UNNAMED};
pub use relevance::{calculate_relevance, remote_score, RelevanceScore, REMOTE_BASE_SCORE};
pub use script::{
    to_simplified, to_traditional, CharTableConverter, Script, ScriptConverter, ScriptFolder,
};
