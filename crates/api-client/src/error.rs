//! Error types for the API client

use facilitymap_equipment::EquipmentError;
use facilitymap_search::SearchError;
use thiserror::Error;

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// API client errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Response body was not the expected JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Service answered with a non-success status
    #[error("API error ({status}): {message}")]
    ApiResponse {
        /// HTTP status code
        status: u16,
        /// Response body, or a placeholder when unreadable
        message: String,
    },

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Error code range: 13xxx for HTTP adapter errors
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum ApiErrorCode {
    Request = 13001,
    Json = 13002,
    Config = 13003,
    ApiResponse = 13004,
    InvalidUrl = 13005,
}

impl ApiError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an API response error
    pub fn api_response(status: u16, message: impl Into<String>) -> Self {
        Self::ApiResponse {
            status,
            message: message.into(),
        }
    }

    /// Error code for this error
    #[must_use]
    pub fn code(&self) -> ApiErrorCode {
        match self {
            Self::Request(_) => ApiErrorCode::Request,
            Self::Json(_) => ApiErrorCode::Json,
            Self::Config(_) => ApiErrorCode::Config,
            Self::ApiResponse { .. } => ApiErrorCode::ApiResponse,
            Self::InvalidUrl(_) => ApiErrorCode::InvalidUrl,
        }
    }

    /// Check if this error is retryable
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request(e) => {
                // Retry on connection errors, timeouts
                e.is_connect() || e.is_timeout()
            }
            Self::ApiResponse { status, .. } => {
                // Retry on 5xx errors and 429 (rate limited)
                *status >= 500 || *status == 429
            }
            Self::Config(_) | Self::Json(_) | Self::InvalidUrl(_) => false,
        }
    }

    /// Check if this is a client error (4xx)
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ApiResponse { status, .. } if (400..500).contains(status))
    }

    /// Check if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiResponse { status, .. } if *status >= 500)
    }
}

impl From<ApiError> for SearchError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Json(e) => SearchError::MalformedResponse(e.to_string()),
            other => SearchError::Remote(other.to_string()),
        }
    }
}

impl From<ApiError> for EquipmentError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Json(e) => EquipmentError::MalformedSummary(e.to_string()),
            other => EquipmentError::Source(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_statuses() {
        assert!(ApiError::api_response(503, "busy").is_retryable());
        assert!(ApiError::api_response(429, "slow down").is_retryable());
        assert!(!ApiError::api_response(403, "blocked").is_retryable());
        assert!(!ApiError::config("bad").is_retryable());
    }

    #[test]
    fn test_status_classes() {
        let forbidden = ApiError::api_response(403, "blocked");
        assert!(forbidden.is_client_error());
        assert!(!forbidden.is_server_error());
        assert_eq!(forbidden.code() as u32, 13004);
    }

    #[test]
    fn test_domain_conversions() {
        let json_err = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        assert!(matches!(
            SearchError::from(ApiError::Json(json_err)),
            SearchError::MalformedResponse(_)
        ));
        assert!(matches!(
            EquipmentError::from(ApiError::api_response(500, "oops")),
            EquipmentError::Source(msg) if msg.contains("500")
        ));
    }
}
