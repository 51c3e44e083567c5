//! Unified error types for shelfsync.

use tokio_rusqlite::rusqlite;

/// Unified error type shared by the store, cache, index, and sync layers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Credentials are missing or expired; the user must re-authenticate.
    #[error("AUTH_ERROR: {0}")]
    Auth(String),

    /// Transport-level failure; safe to retry the whole sync.
    #[error("NETWORK_ERROR: {0}")]
    Network(String),

    /// The remote API explicitly signalled a rate limit.
    #[error("RATE_LIMITED: {0}")]
    RateLimited(String),

    /// The durable medium is full; callers prompt for cleanup rather
    /// than retrying silently.
    #[error("STORAGE_QUOTA_EXCEEDED: {0}")]
    StorageQuotaExceeded(String),

    /// Search was used before any index build.
    #[error("INDEX_NOT_BUILT: search index has not been built")]
    IndexNotBuilt,

    /// Database operation failed.
    #[error("STORE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("STORE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// Catch-all for unexpected conditions; always names the operation.
    #[error("OPERATION_FAILED: {operation}: {message}")]
    OperationFailed { operation: String, message: String },
}

impl Error {
    /// Build an `OperationFailed` naming the originating operation.
    pub fn operation(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Error::OperationFailed { operation: operation.into(), message: message.into() }
    }
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e.into(),
            other => Error::Database(other),
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        // SQLITE_FULL is the one medium-exhaustion signal callers handle
        // differently from generic I/O failure.
        if let rusqlite::Error::SqliteFailure(code, _) = &err
            && code.code == rusqlite::ErrorCode::DiskFull
        {
            return Error::StorageQuotaExceeded(err.to_string());
        }
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Auth("token expired".to_string());
        assert!(err.to_string().contains("AUTH_ERROR"));
        assert!(err.to_string().contains("token expired"));
    }

    #[test]
    fn test_index_not_built_display() {
        let err = Error::IndexNotBuilt;
        assert!(err.to_string().contains("INDEX_NOT_BUILT"));
    }

    #[test]
    fn test_operation_failed_names_operation() {
        let err = Error::operation("upsert_batch", "unexpected");
        assert!(err.to_string().contains("upsert_batch"));
    }

    #[test]
    fn test_disk_full_maps_to_quota() {
        let err = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_FULL),
            Some("database or disk is full".to_string()),
        );
        let err: Error = err.into();
        assert!(matches!(err, Error::StorageQuotaExceeded(_)));
    }

    #[test]
    fn test_other_sqlite_error_stays_database() {
        let err = rusqlite::Error::QueryReturnedNoRows;
        let err: Error = err.into();
        assert!(matches!(err, Error::Database(_)));
    }
}
