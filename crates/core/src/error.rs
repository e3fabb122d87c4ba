//! Structured errors for configuration and data loading
//!
//! Every [`Error`] carries a numeric [`ErrorCode`], optional context and a
//! recovery suggestion. Codes group into an [`ErrorCategory`], which also
//! decides the process exit code of the command-line tools.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Broad class of an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum ErrorCategory {
    General,
    Io,
    Config,
    Data,
    Validation,
}

impl ErrorCategory {
    /// Process exit code for errors of this category
    pub fn exit_code(self) -> i32 {
        match self {
            Self::General => exit_codes::FAILURE,
            Self::Io | Self::Data => exit_codes::DATA_ERROR,
            Self::Config => exit_codes::CONFIG_ERROR,
            Self::Validation => exit_codes::VALIDATION_ERROR,
        }
    }
}

/// Error codes; the thousands digit is the category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[allow(missing_docs)]
pub enum ErrorCode {
    Internal = 1001,
    Timeout = 1003,

    Io = 2000,
    FileNotFound = 2001,
    PermissionDenied = 2002,

    ConfigError = 3000,
    ConfigNotFound = 3001,
    ConfigParseError = 3002,
    ConfigValidationError = 3003,

    InvalidGeoJson = 4001,
    NotAFeatureCollection = 4002,

    ValidationError = 6000,
    InvalidInput = 6001,
}

impl ErrorCode {
    /// Get the numeric code
    pub fn code(self) -> u32 {
        self as u32
    }

    /// Category from the thousands digit
    pub fn category(self) -> ErrorCategory {
        match self {
            Self::Internal | Self::Timeout => ErrorCategory::General,
            Self::Io | Self::FileNotFound | Self::PermissionDenied => ErrorCategory::Io,
            Self::ConfigError
            | Self::ConfigNotFound
            | Self::ConfigParseError
            | Self::ConfigValidationError => ErrorCategory::Config,
            Self::InvalidGeoJson | Self::NotAFeatureCollection => ErrorCategory::Data,
            Self::ValidationError | Self::InvalidInput => ErrorCategory::Validation,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

/// Error with code, context and suggestion
#[derive(Error, Debug)]
pub struct Error {
    /// Code for programmatic handling
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// What was being done when the error happened
    pub context: Option<String>,
    /// How the user can fix it
    pub suggestion: Option<String>,
    /// Underlying error
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(context) = &self.context {
            write!(f, "\n  While: {context}")?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  Hint: {suggestion}")?;
        }
        Ok(())
    }
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            suggestion: None,
            source: None,
        }
    }

    /// Set the context; an existing context is kept as the outer one
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        let context = context.into();
        self.context = Some(match self.context.take() {
            Some(inner) => format!("{context}: {inner}"),
            None => context,
        });
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn category(&self) -> ErrorCategory {
        self.code.category()
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        self.category().exit_code()
    }

    /// Serializable form for `--format json` output
    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code.to_string(),
            category: self.category(),
            message: self.message.clone(),
            context: self.context.clone(),
            suggestion: self.suggestion.clone(),
            source: self.source.as_ref().map(ToString::to_string),
        }
    }

    pub fn file_not_found(path: impl AsRef<std::path::Path>) -> Self {
        Self::new(
            ErrorCode::FileNotFound,
            format!("File not found: {}", path.as_ref().display()),
        )
        .with_suggestion("Check the path passed to --data")
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    pub fn config_not_found(path: impl AsRef<std::path::Path>) -> Self {
        Self::new(
            ErrorCode::ConfigNotFound,
            format!("Configuration file not found: {}", path.as_ref().display()),
        )
        .with_suggestion("Create a facilitymap.toml file or use --config to specify a path")
    }

    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigValidationError, message)
    }

    pub fn not_a_feature_collection(found: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::NotAFeatureCollection,
            format!("Expected a FeatureCollection, found {}", found.into()),
        )
        .with_suggestion("Export the facility layer as a GeoJSON FeatureCollection")
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }
}

/// JSON form of an [`Error`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct ErrorReport {
    /// Display form of the code, e.g. `E2001`
    pub code: String,
    pub category: ErrorCategory,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Result alias with the core [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Exit codes for CLI commands
#[allow(missing_docs)]
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
    pub const VALIDATION_ERROR: i32 = 2;
    pub const CONFIG_ERROR: i32 = 3;
    pub const DATA_ERROR: i32 = 4;
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorCode::PermissionDenied,
            _ => ErrorCode::Io,
        };
        Error::new(code, err.to_string()).with_source(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::new(ErrorCode::InvalidGeoJson, format!("Invalid GeoJSON: {err}")).with_source(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::new(ErrorCode::ConfigParseError, format!("Invalid TOML: {err}")).with_source(err)
    }
}

/// Context and suggestions on `Result`s
pub trait ResultExt<T> {
    /// Add context to the error
    fn context(self, context: impl Into<String>) -> Result<T>;
    /// Add a suggestion to the error
    fn with_suggestion(self, suggestion: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_suggestion(self, suggestion: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_suggestion(suggestion))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_display_and_category() {
        assert_eq!(ErrorCode::FileNotFound.to_string(), "E2001");
        assert_eq!(ErrorCode::NotAFeatureCollection.category(), ErrorCategory::Data);
        assert_eq!(ErrorCode::ConfigParseError.category(), ErrorCategory::Config);
        for code in [ErrorCode::Timeout, ErrorCode::PermissionDenied, ErrorCode::InvalidInput] {
            let digit = code.code() / 1000;
            let expected = match code.category() {
                ErrorCategory::General => 1,
                ErrorCategory::Io => 2,
                ErrorCategory::Config => 3,
                ErrorCategory::Data => 4,
                ErrorCategory::Validation => 6,
            };
            assert_eq!(digit, expected, "{code}");
        }
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(Error::file_not_found("x.geojson").exit_code(), exit_codes::DATA_ERROR);
        assert_eq!(Error::not_a_feature_collection("Point").exit_code(), exit_codes::DATA_ERROR);
        assert_eq!(Error::config_not_found("x.toml").exit_code(), exit_codes::CONFIG_ERROR);
        assert_eq!(Error::validation("empty").exit_code(), exit_codes::VALIDATION_ERROR);
        assert_eq!(Error::new(ErrorCode::Internal, "bug").exit_code(), exit_codes::FAILURE);
    }

    #[test]
    fn test_nested_context() {
        let result: Result<()> = Err(Error::config("bad value"));
        let err = result.context("Parsing shapes").context("Loading facilitymap.toml").unwrap_err();
        assert_eq!(err.context.as_deref(), Some("Loading facilitymap.toml: Parsing shapes"));
        assert!(err.to_string().contains("While: Loading facilitymap.toml"));
    }

    #[test]
    fn test_report_serialization() {
        let err = Error::not_a_feature_collection("Point").with_context("Reading --data file");
        let json = serde_json::to_value(err.to_report()).unwrap();
        assert_eq!(json["code"], "E4002");
        assert_eq!(json["category"], "data");
        assert_eq!(json["context"], "Reading --data file");
        assert!(json.get("source").is_none());
    }

    #[test]
    fn test_io_error_mapping() {
        let err = Error::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(err.code, ErrorCode::FileNotFound);
        assert!(err.source.is_some());
    }
}
