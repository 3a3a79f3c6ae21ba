//! Error types for FortiOS operations.
//!
//! This module provides the error hierarchy shared by every resource crate, including
//! HTTP status code mapping, marshalling failures and the resource operation wrapper
//! that names the lifecycle verb and resource type.

use crate::types::Operation;
use thiserror::Error;

/// Main error type for FortiOS operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// FortiOS appliance is unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Operation timed out
    #[error("Timeout waiting for appliance: {0}")]
    Timeout(String),

    /// Object not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request (authentication or authorization failure)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Bad request with details
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Conflict error
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid endpoint
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Failed to parse an API response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The API answered with an error envelope
    #[error("FortiOS API error (http status {http_status}, code {code}): {message}")]
    ApiError {
        /// HTTP status reported inside the envelope
        http_status: u16,
        /// FortiOS internal error code
        code: i64,
        /// Raw envelope text
        message: String,
    },

    /// Local configuration did not match the declared schema during expand
    #[error("Error expanding {field}: {message}")]
    Expand {
        /// Field path (`entries.0.pattern`)
        field: String,
        /// Failure description
        message: String,
    },

    /// A remote value could not be written into the local configuration
    #[error("Error reading {field}: {message}")]
    FieldWrite {
        /// Field path (`entries.0.pattern`)
        field: String,
        /// Failure description
        message: String,
    },

    /// Ordering position outside the closed `before`/`after` set
    #[error("<alter_position> param should be only 'after' or 'before', got `{0}`")]
    InvalidPosition(String),

    /// A lifecycle operation failed for a resource type
    #[error("Error {operation} {resource} resource: {source}")]
    Resource {
        /// Lifecycle verb
        operation: Operation,
        /// Resource type name
        resource: String,
        /// Underlying failure
        #[source]
        source: Box<Error>,
    },
}

/// Specialized result type for FortiOS operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wrap an error with the lifecycle verb and resource type name.
    #[must_use]
    pub fn for_resource(self, operation: Operation, resource: impl Into<String>) -> Self {
        Self::Resource {
            operation,
            resource: resource.into(),
            source: Box::new(self),
        }
    }

    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::HttpError(_) => "HTTP_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Conflict(_) => "CONFLICT",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
            Self::ParseError(_) => "PARSE_ERROR",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::ApiError { .. } => "API_ERROR",
            Self::Expand { .. } => "EXPAND_ERROR",
            Self::FieldWrite { .. } => "FIELD_WRITE_ERROR",
            Self::InvalidPosition(_) => "INVALID_POSITION",
            Self::Resource { .. } => "RESOURCE_ERROR",
        }
    }

    /// Returns the innermost error, looking through resource wrappers.
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::Resource { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Returns true if the failed call may succeed when sent again.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::ServiceUnavailable(_))
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ServiceUnavailable(err.to_string())
        } else if err.is_decode() {
            Self::ParseError(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ValidationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            Error::ServiceUnavailable("test".to_string()).error_code(),
            "SERVICE_UNAVAILABLE"
        );
        assert_eq!(Error::Timeout("test".to_string()).error_code(), "TIMEOUT");
        assert_eq!(
            Error::NotFound("test".to_string()).error_code(),
            "NOT_FOUND"
        );
        assert_eq!(
            Error::ApiError {
                http_status: 500,
                code: -5,
                message: "dup".to_string()
            }
            .error_code(),
            "API_ERROR"
        );
        assert_eq!(
            Error::FieldWrite {
                field: "fosid".to_string(),
                message: "bad".to_string()
            }
            .error_code(),
            "FIELD_WRITE_ERROR"
        );
        assert_eq!(
            Error::InvalidPosition("middle".to_string()).error_code(),
            "INVALID_POSITION"
        );
    }

    #[test]
    fn test_resource_wrapper_display() {
        let err = Error::ServiceUnavailable("connection refused".to_string())
            .for_resource(Operation::Create, "WebfilterContentHeader");
        assert_eq!(
            err.to_string(),
            "Error creating WebfilterContentHeader resource: Service unavailable: connection refused"
        );
        assert_eq!(err.error_code(), "RESOURCE_ERROR");
        assert_eq!(err.root_cause().error_code(), "SERVICE_UNAVAILABLE");
    }

    #[test]
    fn test_field_write_display() {
        let err = Error::FieldWrite {
            field: "entries.0.pattern".to_string(),
            message: "expected string".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Error reading entries.0.pattern: expected string"
        );
    }

    #[test]
    fn test_invalid_position_display() {
        let err = Error::InvalidPosition("middle".to_string());
        assert!(err.to_string().contains("'after' or 'before'"));
    }

    #[test]
    fn test_is_transient() {
        assert!(Error::Timeout("t".to_string()).is_transient());
        assert!(Error::ServiceUnavailable("s".to_string()).is_transient());
        assert!(!Error::BadRequest("b".to_string()).is_transient());
        assert!(!Error::NotFound("n".to_string()).is_transient());
    }

    #[test]
    fn test_from_serde_json_error() {
        let err = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let fortios_err: Error = err.into();
        assert!(matches!(fortios_err, Error::ParseError(_)));
    }

    #[test]
    fn test_from_validation_errors() {
        use validator::Validate;

        #[derive(Validate)]
        struct Limits {
            #[validate(range(min = 1, max = 10))]
            retries: u32,
        }

        let err: Error = Limits { retries: 11 }.validate().unwrap_err().into();
        assert!(matches!(err, Error::ValidationError(ref message) if message.contains("retries")));
    }

    #[test]
    fn test_error_partial_eq() {
        let err1 = Error::NotFound("test".to_string());
        let err2 = Error::NotFound("test".to_string());
        let err3 = Error::NotFound("other".to_string());

        assert_eq!(err1, err2);
        assert_ne!(err1, err3);
    }
}
