//! Error types module
//!
//! All failures surface through the `AppError` enum, which covers the
//! library persistence paths (save, delete, usage), the upstream generation
//! provider, and request-level problems. Each variant self-describes its
//! HTTP presentation through the `ErrorMetadata` trait.
//!
//! The `Database` variant and `From<sqlx::Error>` are gated behind the
//! `sqlx` feature so backends without Postgres can build without it.

use std::io;

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like provider throttling
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
/// This trait allows errors to self-describe their HTTP response characteristics
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "BLOB_WRITE_FAILED")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
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

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Blob write failed: {0}")]
    BlobWriteFailed(String),

    #[error("Record insert failed: {0}")]
    RecordInsertFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Provider quota exceeded: {0}")]
    ProviderQuotaExceeded(String),

    #[error("Provider safety block: {0}")]
    ProviderSafetyBlocked(String),

    #[error("Provider access denied: {0}")]
    ProviderAccessDenied(String),

    #[error("Provider timeout: {0}")]
    ProviderTimeout(String),

    #[error("Provider error: {0}")]
    ProviderUpstream(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

// Error conversion implementations
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
        AppError::InvalidArgument(format!("JSON parsing error: {}", err))
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::InvalidArgument(format!("UUID parsing error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
/// Reduces duplication in the ErrorMetadata impl; client_message stays per-variant for dynamic content.
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::Database(_) => (
            500,
            "DATABASE_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::Storage(_) => (
            500,
            "STORAGE_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::Unauthorized(_) => (
            401,
            "UNAUTHORIZED",
            false,
            Some("Sign in and retry with a valid token"),
            false,
            LogLevel::Debug,
        ),
        AppError::NotFound(_) => (
            404,
            "NOT_FOUND",
            false,
            Some("Verify the item ID exists"),
            false,
            LogLevel::Debug,
        ),
        AppError::InvalidArgument(_) => (
            400,
            "INVALID_ARGUMENT",
            false,
            Some("Check request parameters and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::BlobWriteFailed(_) => (
            502,
            "BLOB_WRITE_FAILED",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::RecordInsertFailed(_) => (
            500,
            "RECORD_INSERT_FAILED",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::DeleteFailed(_) => (
            500,
            "DELETE_FAILED",
            true,
            Some("Retry the delete"),
            false,
            LogLevel::Error,
        ),
        AppError::ProviderQuotaExceeded(_) => (
            429,
            "PROVIDER_QUOTA_EXCEEDED",
            true,
            Some("Wait for the quota window to reset and retry"),
            false,
            LogLevel::Warn,
        ),
        AppError::ProviderSafetyBlocked(_) => (
            422,
            "PROVIDER_SAFETY_BLOCKED",
            false,
            Some("Adjust the prompt or source image"),
            false,
            LogLevel::Warn,
        ),
        AppError::ProviderAccessDenied(_) => (
            403,
            "PROVIDER_ACCESS_DENIED",
            false,
            Some("Check API key permissions for this model"),
            false,
            LogLevel::Warn,
        ),
        AppError::ProviderTimeout(_) => (
            504,
            "PROVIDER_TIMEOUT",
            true,
            Some("Retry the generation"),
            false,
            LogLevel::Warn,
        ),
        AppError::ProviderUpstream(_) => (
            502,
            "PROVIDER_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::Internal(_) => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::InternalWithSource { .. } => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::Database(_) => "Database",
            AppError::Storage(_) => "Storage",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::NotFound(_) => "NotFound",
            AppError::InvalidArgument(_) => "InvalidArgument",
            AppError::BlobWriteFailed(_) => "BlobWriteFailed",
            AppError::RecordInsertFailed(_) => "RecordInsertFailed",
            AppError::DeleteFailed(_) => "DeleteFailed",
            AppError::ProviderQuotaExceeded(_) => "ProviderQuotaExceeded",
            AppError::ProviderSafetyBlocked(_) => "ProviderSafetyBlocked",
            AppError::ProviderAccessDenied(_) => "ProviderAccessDenied",
            AppError::ProviderTimeout(_) => "ProviderTimeout",
            AppError::ProviderUpstream(_) => "ProviderUpstream",
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
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Database(_) => "Failed to access database".to_string(),
            AppError::Storage(_) => "Failed to access storage".to_string(),
            AppError::Unauthorized(ref msg) => msg.clone(),
            AppError::NotFound(ref msg) => msg.clone(),
            AppError::InvalidArgument(ref msg) => msg.clone(),
            AppError::BlobWriteFailed(_) => "Failed to store generated media".to_string(),
            AppError::RecordInsertFailed(_) => "Failed to save library item".to_string(),
            AppError::DeleteFailed(ref msg) => msg.clone(),
            AppError::ProviderQuotaExceeded(ref msg) => msg.clone(),
            AppError::ProviderSafetyBlocked(ref msg) => msg.clone(),
            AppError::ProviderAccessDenied(ref msg) => msg.clone(),
            AppError::ProviderTimeout(ref msg) => msg.clone(),
            AppError::ProviderUpstream(_) => "Generation provider error".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
            AppError::InternalWithSource { .. } => "Internal server error".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metadata_not_found() {
        let err = AppError::NotFound("Item not found".to_string());
        assert_eq!(err.http_status_code(), 404);
        assert_eq!(err.error_code(), "NOT_FOUND");
        assert!(!err.is_recoverable());
        assert_eq!(err.client_message(), "Item not found");
        assert!(!err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_error_metadata_invalid_argument() {
        let err = AppError::InvalidArgument("Maximum 20 items per request".to_string());
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.error_code(), "INVALID_ARGUMENT");
        assert!(!err.is_recoverable());
        assert_eq!(err.client_message(), "Maximum 20 items per request");
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_error_metadata_save_path() {
        let blob = AppError::BlobWriteFailed("upload rejected".to_string());
        assert_eq!(blob.http_status_code(), 502);
        assert_eq!(blob.error_code(), "BLOB_WRITE_FAILED");
        assert!(blob.is_recoverable());
        assert!(blob.is_sensitive());
        assert_eq!(blob.client_message(), "Failed to store generated media");

        let record = AppError::RecordInsertFailed("insert rejected".to_string());
        assert_eq!(record.http_status_code(), 500);
        assert_eq!(record.error_code(), "RECORD_INSERT_FAILED");
        assert_eq!(record.log_level(), LogLevel::Error);
    }

    #[test]
    fn test_error_metadata_provider_kinds() {
        let quota = AppError::ProviderQuotaExceeded(
            "API quota exceeded. Please try again later.".to_string(),
        );
        assert_eq!(quota.http_status_code(), 429);
        assert_eq!(quota.log_level(), LogLevel::Warn);
        assert!(quota.is_recoverable());

        let safety = AppError::ProviderSafetyBlocked("blocked".to_string());
        assert_eq!(safety.http_status_code(), 422);
        assert!(!safety.is_recoverable());

        let timeout = AppError::ProviderTimeout(
            "Video generation timed out. Please try again.".to_string(),
        );
        assert_eq!(timeout.http_status_code(), 504);
        assert_eq!(timeout.error_code(), "PROVIDER_TIMEOUT");

        let denied = AppError::ProviderAccessDenied("no access".to_string());
        assert_eq!(denied.http_status_code(), 403);
    }

    #[test]
    fn test_detailed_message_includes_source_chain() {
        let source = anyhow::anyhow!("connection refused").context("pool unavailable");
        let err = AppError::from(source);
        let details = err.detailed_message();
        assert!(details.contains("Internal error with source"));
        assert!(details.contains("Caused by:"));
        assert!(details.contains("connection refused"));
    }
}
