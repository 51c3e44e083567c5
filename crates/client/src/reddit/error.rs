//! Reddit API client error types.

use shelfsync_core::Error;
use std::sync::Arc;

/// Errors from the Reddit API client.
#[derive(Debug, thiserror::Error)]
pub enum RedditError {
    /// Token rejected by the remote (401/403).
    #[error("authentication failed: token rejected")]
    Auth,

    /// Rate limited by the remote (429).
    #[error("rate limited: too many requests")]
    RateLimited,

    /// Other HTTP error response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),

    /// Malformed API base URL in configuration.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

impl From<reqwest::Error> for RedditError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { RedditError::Timeout } else { RedditError::Network(Arc::new(err)) }
    }
}

impl From<RedditError> for Error {
    fn from(err: RedditError) -> Self {
        match err {
            RedditError::Auth => Error::Auth(err.to_string()),
            RedditError::RateLimited => Error::RateLimited(err.to_string()),
            other => Error::Network(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RedditError::Auth;
        assert!(err.to_string().contains("authentication failed"));

        let err = RedditError::HttpError { status: 502 };
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn test_maps_to_core_taxonomy() {
        assert!(matches!(Error::from(RedditError::Auth), Error::Auth(_)));
        assert!(matches!(Error::from(RedditError::RateLimited), Error::RateLimited(_)));
        assert!(matches!(Error::from(RedditError::Timeout), Error::Network(_)));
        assert!(matches!(Error::from(RedditError::Parse("bad".into())), Error::Network(_)));
    }
}
