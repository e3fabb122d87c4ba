//! Error types for the search crate.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors that can occur during search operations.
///
/// Remote failures stay inside the geocoder: combined search degrades to
/// local results instead of returning them.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Script converter could not be used
    #[error("Script converter error: {0}")]
    Converter(String),

    /// Geocoder transport or HTTP failure
    #[error("Geocoder request failed: {0}")]
    Remote(String),

    /// Geocoder did not answer in time
    #[error("Geocoder request timed out after {0:?}")]
    Timeout(Duration),

    /// Geocoder answered with something that is not a result list
    #[error("Malformed geocoder response: {0}")]
    MalformedResponse(String),
}

/// Error code for integration with facilitymap-core error handling.
/// Range: 11xxx for search errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchErrorCode {
    Converter = 11001,
    Remote = 11002,
    Timeout = 11003,
    MalformedResponse = 11004,
}

impl SearchError {
    /// Returns the error code for this error.
    pub fn code(&self) -> SearchErrorCode {
        match self {
            SearchError::Converter(_) => SearchErrorCode::Converter,
            SearchError::Remote(_) => SearchErrorCode::Remote,
            SearchError::Timeout(_) => SearchErrorCode::Timeout,
            SearchError::MalformedResponse(_) => SearchErrorCode::MalformedResponse,
        }
    }
}
