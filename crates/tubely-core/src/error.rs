//! Error types module
//!
//! All request failures are unified under the `AppError` enum, which covers client
//! mistakes (bad input, authentication, ownership), media tool failures and storage
//! or database outages.
//!
//! The `Database` variant and `From<sqlx::Error>` are gated behind the `sqlx` feature.

use std::io;

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Expected errors like validation failures
    Debug,
    /// Client errors worth noticing, like ownership violations
    Warn,
    /// Unexpected failures
    Error,
}

/// Metadata for error responses.
///
/// Lets an error describe its own HTTP response characteristics.
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "MEDIA_PROBE_FAILED")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden from clients
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Database(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Media probe failed: {0}")]
    ProbeFailed(String),

    #[error("Media remux failed: {0}")]
    RemuxFailed(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::InvalidInput(format!("UUID parsing error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::InvalidInput(format!("Validation error: {}", err))
    }
}

/// Response characteristics shared by every error of one kind.
#[derive(Debug, Clone, Copy)]
struct ErrorClass {
    status: u16,
    code: &'static str,
    recoverable: bool,
    action: Option<&'static str>,
    sensitive: bool,
    level: LogLevel,
}

impl ErrorClass {
    const fn client(status: u16, code: &'static str, action: &'static str, level: LogLevel) -> Self {
        Self {
            status,
            code,
            recoverable: false,
            action: Some(action),
            sensitive: false,
            level,
        }
    }

    const fn transient(code: &'static str) -> Self {
        Self {
            status: 500,
            code,
            recoverable: true,
            action: Some("Retry after a short delay"),
            sensitive: true,
            level: LogLevel::Error,
        }
    }

    const fn media(code: &'static str, action: &'static str) -> Self {
        Self {
            status: 500,
            code,
            recoverable: false,
            action: Some(action),
            sensitive: true,
            level: LogLevel::Error,
        }
    }
}

const DATABASE: ErrorClass = ErrorClass::transient("DATABASE_ERROR");
const STORAGE: ErrorClass = ErrorClass::transient("STORAGE_ERROR");
const INTERNAL: ErrorClass = ErrorClass::transient("INTERNAL_ERROR");
const INVALID_INPUT: ErrorClass = ErrorClass::client(
    400,
    "INVALID_INPUT",
    "Check request parameters and try again",
    LogLevel::Debug,
);
const BAD_REQUEST: ErrorClass = ErrorClass::client(
    400,
    "BAD_REQUEST",
    "Check request format and parameters",
    LogLevel::Debug,
);
const NOT_FOUND: ErrorClass =
    ErrorClass::client(404, "NOT_FOUND", "Verify the resource ID exists", LogLevel::Debug);
const PAYLOAD_TOO_LARGE: ErrorClass = ErrorClass::client(
    413,
    "PAYLOAD_TOO_LARGE",
    "Reduce file size and upload again",
    LogLevel::Debug,
);
const UNAUTHORIZED: ErrorClass =
    ErrorClass::client(401, "UNAUTHORIZED", "Check the bearer token", LogLevel::Debug);
const FORBIDDEN: ErrorClass = ErrorClass::client(
    403,
    "FORBIDDEN",
    "Only the owner of the video can modify it",
    LogLevel::Warn,
);
const PROBE_FAILED: ErrorClass =
    ErrorClass::media("MEDIA_PROBE_FAILED", "Check that the file is a valid mp4 video");
const REMUX_FAILED: ErrorClass =
    ErrorClass::media("MEDIA_REMUX_FAILED", "Contact support if this error persists");

impl AppError {
    fn class(&self) -> ErrorClass {
        match self {
            AppError::Database(_) => DATABASE,
            AppError::Storage(_) => STORAGE,
            AppError::InvalidInput(_) => INVALID_INPUT,
            AppError::BadRequest(_) => BAD_REQUEST,
            AppError::NotFound(_) => NOT_FOUND,
            AppError::PayloadTooLarge(_) => PAYLOAD_TOO_LARGE,
            AppError::Unauthorized(_) => UNAUTHORIZED,
            AppError::Forbidden(_) => FORBIDDEN,
            AppError::ProbeFailed(_) => PROBE_FAILED,
            AppError::RemuxFailed(_) => REMUX_FAILED,
            AppError::Internal(_) | AppError::InternalWithSource { .. } => INTERNAL,
        }
    }

    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::Database(_) => "Database",
            AppError::Storage(_) => "Storage",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::BadRequest(_) => "BadRequest",
            AppError::NotFound(_) => "NotFound",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::Forbidden(_) => "Forbidden",
            AppError::ProbeFailed(_) => "ProbeFailed",
            AppError::RemuxFailed(_) => "RemuxFailed",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        self.class().status
    }

    fn error_code(&self) -> &'static str {
        self.class().code
    }

    fn is_recoverable(&self) -> bool {
        self.class().recoverable
    }

    fn suggested_action(&self) -> Option<&'static str> {
        self.class().action
    }

    fn is_sensitive(&self) -> bool {
        self.class().sensitive
    }

    fn log_level(&self) -> LogLevel {
        self.class().level
    }

    fn client_message(&self) -> String {
        match self {
            AppError::InvalidInput(msg)
            | AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::PayloadTooLarge(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg) => msg.clone(),
            AppError::Database(_) => "Failed to access database".to_string(),
            AppError::Storage(_) => "Failed to store uploaded media".to_string(),
            AppError::ProbeFailed(_) => "Could not read video dimensions".to_string(),
            AppError::RemuxFailed(_) => "Could not process video".to_string(),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "Internal server error".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metadata_database() {
        #[cfg(feature = "sqlx")]
        let err = AppError::from(sqlx::Error::PoolClosed);
        #[cfg(not(feature = "sqlx"))]
        let err = AppError::Database("pool closed".to_string());
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.error_code(), "DATABASE_ERROR");
        assert!(err.is_recoverable());
        assert_eq!(err.client_message(), "Failed to access database");
        assert!(err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Error);
    }

    #[test]
    fn test_error_metadata_forbidden() {
        let err = AppError::Forbidden("Unauthorised user".to_string());
        assert_eq!(err.http_status_code(), 403);
        assert_eq!(err.error_code(), "FORBIDDEN");
        assert!(!err.is_recoverable());
        assert_eq!(err.client_message(), "Unauthorised user");
        assert!(!err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Warn);
    }

    #[test]
    fn test_error_metadata_media_tools_hide_diagnostics() {
        let probe = AppError::ProbeFailed("ffprobe exited with status 1: moov atom not found".into());
        assert_eq!(probe.http_status_code(), 500);
        assert_eq!(probe.error_code(), "MEDIA_PROBE_FAILED");
        assert!(probe.is_sensitive());
        assert!(!probe.client_message().contains("moov"));

        let remux = AppError::RemuxFailed("ffmpeg exited with status 1".into());
        assert_eq!(remux.http_status_code(), 500);
        assert_eq!(remux.error_code(), "MEDIA_REMUX_FAILED");
        assert_eq!(remux.client_message(), "Could not process video");
    }

    #[test]
    fn test_error_metadata_storage() {
        let err = AppError::Storage("multipart upload failed".to_string());
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.error_code(), "STORAGE_ERROR");
        assert!(err.is_recoverable());
        assert_eq!(err.log_level(), LogLevel::Error);
    }

    #[test]
    fn test_error_metadata_client_errors() {
        assert_eq!(
            AppError::InvalidInput("Invalid file type".into()).http_status_code(),
            400
        );
        assert_eq!(
            AppError::PayloadTooLarge("too large".into()).http_status_code(),
            413
        );
        assert_eq!(
            AppError::Unauthorized("Missing bearer token".into()).http_status_code(),
            401
        );
        assert_eq!(AppError::NotFound("gone".into()).http_status_code(), 404);
    }

    #[test]
    fn test_detailed_message_includes_source_chain() {
        let err = AppError::from(anyhow::anyhow!("disk full").context("writing staged file"));
        let details = err.detailed_message();
        assert!(details.starts_with("Internal error with source"));
        assert!(details.contains("Caused by: writing staged file"));
    }
}
