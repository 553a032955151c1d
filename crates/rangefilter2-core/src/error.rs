//! Error types for rangefilter2.
//!
//! [`FilterError`] covers the failures a list filter can report to its host
//! admin: rejected lookup parameters, validation failures, configuration
//! problems and template rendering errors. [`ValidationError`] mirrors the
//! field-level validation error raised by form fields and model fields.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// A validation failure with a message and a short machine-readable code.
///
/// # Examples
///
/// ```
/// use rangefilter2_core::error::ValidationError;
///
/// let err = ValidationError::new("Enter a valid date.", "invalid_date")
///     .with_param("value", "1402-13-01");
/// assert_eq!(err.code, "invalid_date");
/// assert_eq!(err.to_string(), "Enter a valid date.");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The human-readable error message.
    pub message: String,
    /// A short code identifying the failure (e.g. "invalid", "invalid_date").
    pub code: String,
    /// Additional parameters providing context for the message.
    pub params: HashMap<String, String>,
}

impl ValidationError {
    /// Creates a new `ValidationError` with a message and code.
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            params: HashMap::new(),
        }
    }

    /// Adds a parameter to this validation error.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

/// The error type returned by range filters and their supporting modules.
///
/// Each variant maps to an HTTP status code via [`FilterError::status_code`],
/// so a host admin can turn it into an error page directly.
#[derive(Error, Debug)]
pub enum FilterError {
    // ── Request errors ───────────────────────────────────────────────

    /// The ORM rejected the lookup parameters built by a filter.
    ///
    /// This is the canonical "incorrect lookup parameters" signal that the
    /// admin shows to the user instead of an unhandled failure.
    #[error("Incorrect lookup parameters: {0}")]
    IncorrectLookupParameters(String),

    /// A value failed validation.
    #[error("Validation error: {0}")]
    Validation(ValidationError),

    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The configured time zone name is not a known IANA zone.
    #[error("Unknown time zone: {0}")]
    UnknownTimeZone(String),

    // ── Templates ────────────────────────────────────────────────────

    /// A filter template failed to render.
    #[error("Template error: {0}")]
    Template(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FilterError {
    /// Returns the HTTP status code associated with this error.
    ///
    /// - `IncorrectLookupParameters`, `Validation` -> 400
    /// - Everything else -> 500
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::IncorrectLookupParameters(_) | Self::Validation(_) => 400,
            Self::Configuration(_) | Self::UnknownTimeZone(_) | Self::Template(_) | Self::Io(_) => {
                500
            }
        }
    }

    /// Returns `true` if this is an incorrect-lookup-parameters failure.
    pub const fn is_incorrect_lookup(&self) -> bool {
        matches!(self, Self::IncorrectLookupParameters(_))
    }
}

impl From<ValidationError> for FilterError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

/// A convenience type alias for `Result<T, FilterError>`.
pub type FilterResult<T> = Result<T, FilterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::new("Enter a valid time.", "invalid_time");
        assert_eq!(err.to_string(), "Enter a valid time.");
    }

    #[test]
    fn test_validation_error_with_param() {
        let err = ValidationError::new("Bad year.", "invalid").with_param("year", "10000");
        assert_eq!(err.params.get("year").unwrap(), "10000");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            FilterError::IncorrectLookupParameters("x".into()).status_code(),
            400
        );
        assert_eq!(
            FilterError::Validation(ValidationError::new("x", "y")).status_code(),
            400
        );
        assert_eq!(FilterError::Configuration("x".into()).status_code(), 500);
        assert_eq!(FilterError::UnknownTimeZone("Mars/Base".into()).status_code(), 500);
        assert_eq!(FilterError::Template("x".into()).status_code(), 500);
    }

    #[test]
    fn test_is_incorrect_lookup() {
        assert!(FilterError::IncorrectLookupParameters("x".into()).is_incorrect_lookup());
        assert!(!FilterError::Template("x".into()).is_incorrect_lookup());
    }

    #[test]
    fn test_display() {
        let err = FilterError::IncorrectLookupParameters("year 10000 is out of range".into());
        assert_eq!(
            err.to_string(),
            "Incorrect lookup parameters: year 10000 is out of range"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "settings.toml missing");
        let err: FilterError = io_err.into();
        assert_eq!(err.status_code(), 500);
        assert!(err.to_string().contains("settings.toml missing"));
    }
}
