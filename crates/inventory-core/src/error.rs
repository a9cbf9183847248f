//! Error types for inventory operations.
//!
//! This module provides the error taxonomy shared by every inventory crate,
//! including the mapping from HTTP status codes to typed remote errors and a
//! closed [`ErrorKind`] classification callers can branch on.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Main error type for inventory operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Credentials could not be resolved
    #[error("Credential error: {0}")]
    CredentialError(String),

    /// Request could not be signed
    #[error("Signing failed: {0}")]
    SigningError(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Operation timed out
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Inventory service is unreachable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Invalid endpoint or path
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Invalid hardware or IP address
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Success status but the payload did not match the expected shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Failure status and the body was not a valid error envelope
    #[error("Malformed error response (HTTP {http_status}): {message}")]
    MalformedErrorResponse {
        /// HTTP status code of the response
        http_status: u16,
        /// Decode failure details
        message: String,
    },

    /// Resource not found (HTTP 404)
    #[error("Not found: {0}")]
    NotFound(ApiError),

    /// Resource already exists or is in conflicting state (HTTP 409)
    #[error("Conflict: {0}")]
    Conflict(ApiError),

    /// Request rejected as invalid (HTTP 400 or 422)
    #[error("Validation error: {0}")]
    Validation(ApiError),

    /// Any other non-2xx response
    #[error("Remote error: {0}")]
    Remote(ApiError),

    /// A lookup returned something other than exactly one match
    #[error("Lookup failed: {0}")]
    LookupFailed(String),
}

/// Specialized result type for inventory operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Closed classification of [`Error`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The requested resource does not exist
    NotFound,
    /// The resource already exists or conflicts with server state
    Conflict,
    /// The server rejected the request as invalid
    Validation,
    /// Network, timeout, credential or signing failure
    Transport,
    /// The server replied but the body could not be decoded
    Decode,
    /// A client-side invariant on the response was violated
    Invariant,
    /// Local configuration or input was invalid
    Config,
    /// Any other remote failure
    Other,
}

/// Error envelope returned by the inventory service on failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorEnvelope {
    /// Remote status text (e.g. `Not Found`)
    pub status: String,
    /// Remote error message
    #[serde(rename = "error")]
    pub message: String,
}

/// Remote failure details, carried by the remote error variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP method of the failed request
    pub method: String,
    /// Resource path of the failed request
    pub path: String,
    /// HTTP status code
    pub http_status: u16,
    /// Status reported in the error envelope
    pub status: String,
    /// Message reported in the error envelope
    pub message: String,
}

impl ApiError {
    /// Builds remote error details from a decoded envelope.
    #[must_use]
    pub fn new(
        method: impl Into<String>,
        path: impl Into<String>,
        http_status: u16,
        envelope: ErrorEnvelope,
    ) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            http_status,
            status: envelope.status,
            message: envelope.message,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} ({} {})",
            self.status, self.message, self.method, self.path
        )
    }
}

impl Error {
    /// Maps a non-2xx status and decoded envelope to the matching variant.
    #[must_use]
    pub fn from_status(api: ApiError) -> Self {
        match api.http_status {
            404 => Self::NotFound(api),
            409 => Self::Conflict(api),
            400 | 422 => Self::Validation(api),
            _ => Self::Remote(api),
        }
    }

    /// Returns the error category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Validation(_) => ErrorKind::Validation,
            Self::HttpError(_)
            | Self::Timeout(_)
            | Self::ServiceUnavailable(_)
            | Self::SigningError(_)
            | Self::CredentialError(_) => ErrorKind::Transport,
            Self::MalformedResponse(_) | Self::MalformedErrorResponse { .. } => ErrorKind::Decode,
            Self::LookupFailed(_) => ErrorKind::Invariant,
            Self::ConfigError(_) | Self::InvalidEndpoint(_) | Self::InvalidAddress(_) => {
                ErrorKind::Config
            }
            Self::Remote(_) => ErrorKind::Other,
        }
    }

    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::CredentialError(_) => "CREDENTIAL_ERROR",
            Self::SigningError(_) => "SIGNING_ERROR",
            Self::HttpError(_) => "HTTP_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
            Self::InvalidAddress(_) => "INVALID_ADDRESS",
            Self::MalformedResponse(_) => "MALFORMED_RESPONSE",
            Self::MalformedErrorResponse { .. } => "MALFORMED_ERROR_RESPONSE",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Remote(_) => "REMOTE_ERROR",
            Self::LookupFailed(_) => "LOOKUP_FAILED",
        }
    }

    /// Returns the remote error details when the server rejected the request.
    #[must_use]
    pub const fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::NotFound(api) | Self::Conflict(api) | Self::Validation(api) | Self::Remote(api) => {
                Some(api)
            }
            _ => None,
        }
    }

    /// Returns true for failures that happened before or during transmission.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self.kind(), ErrorKind::Transport)
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ServiceUnavailable(err.to_string())
        } else {
            Self::HttpError(err.to_string())
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
        Self::MalformedResponse(err.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Self::ConfigError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ConfigError(err.to_string())
    }
}
