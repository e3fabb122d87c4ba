//! Error types for equipment lookups.

use std::time::Duration;
use thiserror::Error;

/// Result type for equipment operations
pub type Result<T> = std::result::Result<T, EquipmentError>;

/// Errors raised by a [`SummarySource`](crate::SummarySource).
///
/// The resolver turns these into offline fallback entries.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EquipmentError {
    #[error("Summary source failed: {0}")]
    Source(String),

    #[error("Summary lookup timed out after {0:?}")]
    Timeout(Duration),

    #[error("Malformed summary payload: {0}")]
    MalformedSummary(String),
}

/// Error code range: 12xxx for equipment errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum EquipmentErrorCode {
    Source = 12001,
    Timeout = 12002,
    MalformedSummary = 12003,
}

impl EquipmentError {
    pub fn code(&self) -> EquipmentErrorCode {
        match self {
            EquipmentError::Source(_) => EquipmentErrorCode::Source,
            EquipmentError::Timeout(_) => EquipmentErrorCode::Timeout,
            EquipmentError::MalformedSummary(_) => EquipmentErrorCode::MalformedSummary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(EquipmentError::Source("x".into()).code() as u32, 12001);
        assert_eq!(
            EquipmentError::Timeout(Duration::from_secs(5)).to_string(),
            "Summary lookup timed out after 5s"
        );
    }
}
