//! Error types for Neutron operations.
//!
//! A single error enum covers local validation failures, endpoint resolution,
//! transport problems and HTTP status codes returned by the Networking API.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Main error type for Neutron operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Local validation failed before any request was sent
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Region is not present in the service catalog
    #[error("Endpoint resolution failed: {0}")]
    EndpointResolution(String),

    /// Connection-level failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Operation timed out
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Server answered with a 5xx or an unexpected 4xx status
    #[error("Server error {status}: {body}")]
    ServerError {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// Failed to parse a response body
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Bulk response did not line up with the request
    #[error("Batch error: {0}")]
    BatchError(String),

    /// Token provider could not supply credentials
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid endpoint
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Specialized result type for Neutron operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Deserialize)]
struct FaultEnvelope {
    #[serde(rename = "NeutronError")]
    neutron_error: Fault,
}

#[derive(Debug, Deserialize)]
struct Fault {
    message: String,
}

impl Error {
    /// Build the error for a non-success HTTP status.
    ///
    /// 404 becomes [`Error::NotFound`]; everything else becomes
    /// [`Error::ServerError`] carrying the status and body.
    #[must_use]
    pub fn from_status(status: StatusCode, body: impl Into<String>) -> Self {
        let body = body.into();
        if status == StatusCode::NOT_FOUND {
            Self::NotFound(body)
        } else {
            Self::ServerError {
                status: status.as_u16(),
                body,
            }
        }
    }

    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::EndpointResolution(_) => "ENDPOINT_RESOLUTION",
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::ServerError { .. } => "SERVER_ERROR",
            Self::ParseError(_) => "PARSE_ERROR",
            Self::BatchError(_) => "BATCH_ERROR",
            Self::Authentication(_) => "AUTHENTICATION_FAILED",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
        }
    }

    /// Returns true when repeating the same request could succeed.
    ///
    /// The clients never retry on their own; this is for callers that layer
    /// their own retry policy.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Timeout(_) => true,
            Self::ServerError { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// HTTP status associated with this error, if it came from a response.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound(_) => Some(404),
            Self::ServerError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Extract the `NeutronError.message` from a server error body.
    #[must_use]
    pub fn fault_message(&self) -> Option<String> {
        let body = match self {
            Self::ServerError { body, .. } | Self::NotFound(body) => body,
            _ => return None,
        };
        serde_json::from_str::<FaultEnvelope>(body)
            .ok()
            .map(|envelope| envelope.neutron_error.message)
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_decode() {
            Self::ParseError(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ConfigError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            Error::ValidationError("test".to_string()).error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(
            Error::NotFound("test".to_string()).error_code(),
            "NOT_FOUND"
        );
        assert_eq!(
            Error::EndpointResolution("test".to_string()).error_code(),
            "ENDPOINT_RESOLUTION"
        );
        assert_eq!(
            Error::Transport("test".to_string()).error_code(),
            "TRANSPORT_ERROR"
        );
        assert_eq!(Error::Timeout("test".to_string()).error_code(), "TIMEOUT");
        assert_eq!(
            Error::ServerError {
                status: 500,
                body: String::new()
            }
            .error_code(),
            "SERVER_ERROR"
        );
        assert_eq!(
            Error::ParseError("test".to_string()).error_code(),
            "PARSE_ERROR"
        );
        assert_eq!(
            Error::BatchError("test".to_string()).error_code(),
            "BATCH_ERROR"
        );
        assert_eq!(
            Error::Authentication("test".to_string()).error_code(),
            "AUTHENTICATION_FAILED"
        );
        assert_eq!(
            Error::ConfigError("test".to_string()).error_code(),
            "CONFIG_ERROR"
        );
        assert_eq!(
            Error::InvalidEndpoint("test".to_string()).error_code(),
            "INVALID_ENDPOINT"
        );
    }

    #[test]
    fn test_error_display() {
        let err = Error::EndpointResolution("RegionTwo".to_string());
        assert_eq!(err.to_string(), "Endpoint resolution failed: RegionTwo");

        let err = Error::ServerError {
            status: 503,
            body: "unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "Server error 503: unavailable");
    }

    #[test]
    fn test_from_status_maps_not_found() {
        let err = Error::from_status(StatusCode::NOT_FOUND, "missing");
        assert_eq!(err, Error::NotFound("missing".to_string()));

        let err = Error::from_status(StatusCode::CONFLICT, "in use");
        assert_eq!(
            err,
            Error::ServerError {
                status: 409,
                body: "in use".to_string()
            }
        );
    }

    #[test]
    fn test_is_transient() {
        assert!(Error::Timeout("slow".to_string()).is_transient());
        assert!(Error::Transport("refused".to_string()).is_transient());
        assert!(Error::ServerError {
            status: 502,
            body: String::new()
        }
        .is_transient());
        assert!(Error::ServerError {
            status: 429,
            body: String::new()
        }
        .is_transient());

        assert!(!Error::ServerError {
            status: 400,
            body: String::new()
        }
        .is_transient());
        assert!(!Error::ValidationError("name".to_string()).is_transient());
        assert!(!Error::NotFound("id".to_string()).is_transient());
    }

    #[test]
    fn test_status() {
        assert_eq!(Error::NotFound(String::new()).status(), Some(404));
        assert_eq!(
            Error::ServerError {
                status: 500,
                body: String::new()
            }
            .status(),
            Some(500)
        );
        assert_eq!(Error::Timeout(String::new()).status(), None);
    }

    #[test]
    fn test_fault_message() {
        let err = Error::ServerError {
            status: 409,
            body: r#"{"NeutronError": {"type": "NetworkInUse", "message": "Unable to complete operation on network 1234.", "detail": ""}}"#.to_string(),
        };
        assert_eq!(
            err.fault_message().as_deref(),
            Some("Unable to complete operation on network 1234.")
        );

        let err = Error::ServerError {
            status: 500,
            body: "<html>oops</html>".to_string(),
        };
        assert!(err.fault_message().is_none());
        assert!(Error::Timeout("x".to_string()).fault_message().is_none());
    }

    #[test]
    fn test_from_url_parse_error() {
        let err = url::Url::parse("not a url").unwrap_err();
        let neutron_err: Error = err.into();
        assert!(matches!(neutron_err, Error::InvalidEndpoint(_)));
    }

    #[test]
    fn test_from_serde_json_error() {
        let err = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let neutron_err: Error = err.into();
        assert!(matches!(neutron_err, Error::ParseError(_)));
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
