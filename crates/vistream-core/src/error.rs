//! Error types module
//!
//! All failures on the streaming path are unified under [`AppError`]. Each
//! variant self-describes how it is presented over HTTP through the
//! [`ErrorMetadata`] trait, so the API layer only has to render it.
//!
//! The `Database` variant carries a `sqlx::Error` when the `sqlx` feature is
//! enabled and a plain string otherwise.

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Expected client mistakes (bad id, missing asset)
    Debug,
    /// Denied access and origin-side trouble the player will retry past
    Warn,
    /// Unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "ORIGIN_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether the client may retry the same request
    fn is_recoverable(&self) -> bool;

    /// Client-facing message. Never contains storage keys, URLs or credentials.
    fn client_message(&self) -> String;

    /// Whether the error carries internal detail that must stay server-side
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Path identifier was not a positive integer.
    #[error("Invalid video identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller has no valid identity for a private asset.
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// Storage backend unreachable, timed out, or answered with an unusable response.
    #[error("Origin error (status {status:?}): {message}")]
    Origin { status: Option<u16>, message: String },

    #[error("Signing error: {0}")]
    Signing(String),

    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },

    /// Client or origin dropped mid-transfer. Headers are already on the wire,
    /// so this is only ever logged.
    #[error("Stream interrupted: {0}")]
    StreamInterrupted(String),
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

impl AppError {
    pub fn origin(status: Option<u16>, message: impl Into<String>) -> Self {
        AppError::Origin {
            status,
            message: message.into(),
        }
    }

    /// Backend status attached to an origin failure, if the backend answered at all.
    pub fn origin_status(&self) -> Option<u16> {
        match self {
            AppError::Origin { status, .. } => *status,
            _ => None,
        }
    }

    /// Get the error type name for log records
    pub fn error_type(&self) -> &str {
        match self {
            AppError::InvalidIdentifier(_) => "InvalidIdentifier",
            AppError::NotFound(_) => "NotFound",
            AppError::Unauthorized { .. } => "Unauthorized",
            AppError::Origin { .. } => "Origin",
            AppError::Signing(_) => "Signing",
            AppError::Database(_) => "Database",
            AppError::Internal(_) | AppError::InternalWithSource { .. } => "Internal",
            AppError::StreamInterrupted(_) => "StreamInterrupted",
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

/// Static metadata for each variant: (http_status, error_code, recoverable, sensitive, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, bool, bool, LogLevel) {
    match err {
        AppError::InvalidIdentifier(_) => (400, "INVALID_VIDEO_ID", false, false, LogLevel::Debug),
        AppError::NotFound(_) => (404, "VIDEO_NOT_FOUND", false, false, LogLevel::Debug),
        AppError::Unauthorized { .. } => (401, "AUTH_REQUIRED", false, false, LogLevel::Warn),
        AppError::Origin { .. } => (502, "ORIGIN_ERROR", true, true, LogLevel::Warn),
        AppError::Signing(_) => (500, "SIGNING_ERROR", true, true, LogLevel::Error),
        AppError::Database(_) => (500, "DATABASE_ERROR", true, true, LogLevel::Error),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => {
            (500, "INTERNAL_ERROR", false, true, LogLevel::Error)
        }
        AppError::StreamInterrupted(_) => (500, "STREAM_INTERRUPTED", true, true, LogLevel::Warn),
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).3
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).4
    }

    fn client_message(&self) -> String {
        match self {
            AppError::InvalidIdentifier(_) => "invalid video id".to_string(),
            AppError::NotFound(_) => "video not found".to_string(),
            AppError::Unauthorized { message } => message.clone(),
            _ => "failed to stream video".to_string(),
        }
    }
}
