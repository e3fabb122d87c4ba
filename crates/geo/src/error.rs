//! Error types for the geo crate.

use thiserror::Error;

/// Result type alias for geo operations.
pub type Result<T> = std::result::Result<T, GeoError>;

/// Errors that can occur while building shapes.
///
/// Shape-link parsing never surfaces these to callers; each one becomes the
/// reason of a skipped entry in the parse report.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    /// A numeric token could not be parsed
    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    /// A required parameter or component is absent
    #[error("missing {0}")]
    MissingValue(&'static str),

    /// A numeric input is NaN or infinite
    #[error("{0} must be finite")]
    NonFinite(&'static str),

    /// A line or polygon has too few vertices
    #[error("{kind} needs at least {required} points, got {found}")]
    TooFewPoints {
        kind: &'static str,
        required: usize,
        found: usize,
    },

    /// Unrecognised `shape` mode
    #[error("unknown shape mode '{0}'")]
    UnknownShape(String),
}

/// Error code for integration with facilitymap-core error handling.
/// Range: 10xxx for geo errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoErrorCode {
    InvalidNumber = 10001,
    MissingValue = 10002,
    NonFinite = 10003,
    TooFewPoints = 10004,
    UnknownShape = 10005,
}

impl GeoError {
    /// Returns the error code for this error.
    pub fn code(&self) -> GeoErrorCode {
        match self {
            GeoError::InvalidNumber(_) => GeoErrorCode::InvalidNumber,
            GeoError::MissingValue(_) => GeoErrorCode::MissingValue,
            GeoError::NonFinite(_) => GeoErrorCode::NonFinite,
            GeoError::TooFewPoints { .. } => GeoErrorCode::TooFewPoints,
            GeoError::UnknownShape(_) => GeoErrorCode::UnknownShape,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = GeoError::TooFewPoints { kind: "polygon", required: 3, found: 2 };
        assert_eq!(err.to_string(), "polygon needs at least 3 points, got 2");
        assert_eq!(GeoError::NonFinite("radius").to_string(), "radius must be finite");
    }

    #[test]
    fn test_codes() {
        assert_eq!(GeoError::UnknownShape("hex".into()).code() as u32, 10005);
        assert_eq!(GeoError::InvalidNumber("x".into()).code(), GeoErrorCode::InvalidNumber);
    }
}
