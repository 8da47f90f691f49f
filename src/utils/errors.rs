//! Error handling for SIORMA
//!
//! This module defines the error types used throughout the crate. Backend
//! failures are classified once, in the request wrapper, into the closed
//! [`ApiError`] set so callers match on variants instead of status codes.

use std::collections::BTreeMap;
use thiserror::Error;

/// Main error type for the SIORMA client
#[derive(Error, Debug)]
pub enum SiormaError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Session storage error: {0}")]
    Session(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Failures reported by the remote backend or the transport beneath it
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized: {}", .message.as_deref().unwrap_or("session is no longer valid"))]
    Unauthorized { message: Option<String> },

    #[error("Invalid credentials: {}", .message.as_deref().unwrap_or("email or password is wrong"))]
    InvalidCredentials { message: Option<String> },

    #[error("Forbidden: {}", .message.as_deref().unwrap_or("access denied"))]
    Forbidden { message: Option<String> },

    #[error("Not found: {}", .message.as_deref().unwrap_or("resource not found"))]
    NotFound { message: Option<String> },

    #[error("Conflict: {}", .message.as_deref().unwrap_or("resource already exists"))]
    Conflict { message: Option<String> },

    #[error("Validation failed: {}", .message.as_deref().unwrap_or("invalid input"))]
    Validation {
        message: Option<String>,
        field_errors: BTreeMap<String, Vec<String>>,
    },

    #[error("HTTP {status}: {}", .message.as_deref().unwrap_or("request failed"))]
    Status { status: u16, message: Option<String> },

    #[error("HTTP request error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

/// Coarse outcome of a failed call, used to pick the user-facing message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    SessionExpired,
    InvalidCredentials,
    AccessDenied,
    Validation,
    NotFound,
    Conflict,
    Failed,
}

/// Result type alias for SIORMA operations
pub type Result<T> = std::result::Result<T, SiormaError>;

impl ApiError {
    /// Classify a non-success HTTP status together with the message the server sent.
    ///
    /// Field errors are taken in iteration order; the first one surfaces for 422.
    pub fn from_status(
        status: u16,
        message: Option<String>,
        field_errors: impl IntoIterator<Item = (String, Vec<String>)>,
    ) -> Self {
        match status {
            401 => ApiError::Unauthorized { message },
            403 => ApiError::Forbidden { message },
            404 => ApiError::NotFound { message },
            409 => ApiError::Conflict { message },
            422 => {
                let mut first_field = None;
                let field_errors: BTreeMap<String, Vec<String>> = field_errors
                    .into_iter()
                    .inspect(|(_, errors)| {
                        if first_field.is_none() {
                            first_field = errors.first().cloned();
                        }
                    })
                    .collect();
                // The first field error is more useful than Laravel's generic summary
                ApiError::Validation {
                    message: first_field.or(message),
                    field_errors,
                }
            }
            _ => ApiError::Status { status, message },
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            ApiError::Unauthorized { .. } => FailureKind::SessionExpired,
            ApiError::InvalidCredentials { .. } => FailureKind::InvalidCredentials,
            ApiError::Forbidden { .. } => FailureKind::AccessDenied,
            ApiError::NotFound { .. } => FailureKind::NotFound,
            ApiError::Conflict { .. } => FailureKind::Conflict,
            ApiError::Validation { .. } => FailureKind::Validation,
            ApiError::Status { .. } | ApiError::Transport(_) | ApiError::InvalidResponse(_) => {
                FailureKind::Failed
            }
        }
    }

    /// Message reported by the backend, if it sent one
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized { message }
            | ApiError::InvalidCredentials { message }
            | ApiError::Forbidden { message }
            | ApiError::NotFound { message }
            | ApiError::Conflict { message }
            | ApiError::Validation { message, .. }
            | ApiError::Status { message, .. } => message.as_deref(),
            ApiError::Transport(_) | ApiError::InvalidResponse(_) => None,
        }
    }

    /// HTTP status behind the failure, when the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } | ApiError::InvalidCredentials { .. } => Some(401),
            ApiError::Forbidden { .. } => Some(403),
            ApiError::NotFound { .. } => Some(404),
            ApiError::Conflict { .. } => Some(409),
            ApiError::Validation { .. } => Some(422),
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            ApiError::InvalidResponse(_) => None,
        }
    }
}

impl SiormaError {
    /// Check if the error is recoverable by trying again later
    pub fn is_recoverable(&self) -> bool {
        match self {
            SiormaError::Api(ApiError::Transport(_)) => true,
            SiormaError::Api(ApiError::Status { status, .. }) => *status >= 500,
            SiormaError::Api(_) => false,
            SiormaError::Config(_) => false,
            SiormaError::Session(_) => false,
            SiormaError::InvalidInput(_) => false,
            SiormaError::Serialization(_) => false,
            SiormaError::Io(_) => true,
            SiormaError::UrlParse(_) => false,
        }
    }

    /// Failure kind for API errors; local errors count as generic failures
    pub fn kind(&self) -> FailureKind {
        match self {
            SiormaError::Api(e) => e.kind(),
            SiormaError::InvalidInput(_) => FailureKind::Validation,
            _ => FailureKind::Failed,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            SiormaError::Config(_) => ErrorSeverity::Critical,
            SiormaError::Session(_) => ErrorSeverity::Error,
            SiormaError::InvalidInput(_) => ErrorSeverity::Info,
            SiormaError::Api(e) => match e.kind() {
                FailureKind::SessionExpired | FailureKind::AccessDenied => ErrorSeverity::Warning,
                FailureKind::InvalidCredentials
                | FailureKind::Validation
                | FailureKind::NotFound
                | FailureKind::Conflict => {
                    ErrorSeverity::Info
                }
                FailureKind::Failed => ErrorSeverity::Error,
            },
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        let none = BTreeMap::new();
        assert_eq!(ApiError::from_status(401, None, none.clone()).kind(), FailureKind::SessionExpired);
        assert_eq!(ApiError::from_status(403, None, none.clone()).kind(), FailureKind::AccessDenied);
        assert_eq!(ApiError::from_status(404, None, none.clone()).kind(), FailureKind::NotFound);
        assert_eq!(ApiError::from_status(409, None, none.clone()).kind(), FailureKind::Conflict);
        assert_eq!(ApiError::from_status(422, None, none.clone()).kind(), FailureKind::Validation);
        assert_eq!(ApiError::from_status(500, None, none).kind(), FailureKind::Failed);
    }

    #[test]
    fn test_validation_prefers_first_field_error() {
        let mut fields = BTreeMap::new();
        fields.insert("email".to_string(), vec!["The email has already been taken.".to_string()]);
        let err = ApiError::from_status(422, Some("The given data was invalid.".to_string()), fields);

        assert_eq!(err.server_message(), Some("The email has already been taken."));
        assert_eq!(err.status(), Some(422));
    }

    #[test]
    fn test_recoverable() {
        let server = SiormaError::Api(ApiError::Status { status: 503, message: None });
        let client = SiormaError::Api(ApiError::Status { status: 400, message: None });
        assert!(server.is_recoverable());
        assert!(!client.is_recoverable());
        assert!(!SiormaError::InvalidInput("x".into()).is_recoverable());
    }

    #[test]
    fn test_severity() {
        let denied = SiormaError::Api(ApiError::Forbidden { message: None });
        assert_eq!(denied.severity(), ErrorSeverity::Warning);
        assert_eq!(SiormaError::Config("x".into()).severity(), ErrorSeverity::Critical);
        assert_eq!(ErrorSeverity::Warning.to_string(), "WARN");
    }
}
