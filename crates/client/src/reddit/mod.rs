//! Reddit API client.
//!
//! Stateless request/response wrapper around the authenticated Reddit
//! API, with request validation and response normalization.
//!
//! ### Specification
//!
//! - **Endpoints**: `/api/v1/me` (profile), `/user/{name}/saved` (paged
//!   listing, `limit` up to 100, opaque `after` cursor).
//! - **Authentication**: bearer token supplied per call; token lifecycle
//!   is owned by the caller, not this client.
//! - **Status mapping**: 401/403 → auth failure, 429 → rate limited,
//!   other non-2xx → HTTP error with status.

pub mod error;
pub mod response;
pub mod source;

pub use error::RedditError;
pub use source::{Identity, SavedItemSource, SavedPage};

use async_trait::async_trait;
use reqwest::header;
use std::time::Duration;
use url::Url;

/// Default base URL for the authenticated Reddit API.
const DEFAULT_BASE_URL: &str = "https://oauth.reddit.com";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "shelfsync/0.1";

/// Remote page size; the listing endpoint caps at 100.
const DEFAULT_PAGE_SIZE: u32 = 100;

/// Reddit API client configuration.
#[derive(Debug, Clone)]
pub struct RedditConfig {
    /// Base URL (default: https://oauth.reddit.com).
    pub base_url: String,
    /// Request timeout (default: 10s).
    pub timeout: Duration,
    /// User-agent string (default: shelfsync/0.x).
    pub user_agent: String,
    /// Items requested per page (default and maximum: 100).
    pub page_size: u32,
}

impl Default for RedditConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Reddit API client.
#[derive(Debug, Clone)]
pub struct RedditClient {
    http: reqwest::Client,
    base_url: Url,
    config: RedditConfig,
}

impl RedditClient {
    /// Create a new client with the given configuration.
    pub fn new(config: RedditConfig) -> Result<Self, RedditError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| RedditError::InvalidBaseUrl(e.to_string()))?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .use_rustls_tls()
            .build()
            .map_err(|e| RedditError::Network(std::sync::Arc::new(e)))?;

        Ok(Self { http, base_url, config })
    }

    /// Fetch the acting user's identity from the profile endpoint.
    pub async fn user_identity(&self, access_token: &str) -> Result<Identity, RedditError> {
        let url = self
            .base_url
            .join("/api/v1/me")
            .map_err(|e| RedditError::InvalidBaseUrl(e.to_string()))?;

        tracing::debug!("fetching user identity");

        let http_response = self
            .http
            .get(url)
            .header(header::AUTHORIZATION, format!("Bearer {access_token}"))
            .header(header::USER_AGENT, &self.config.user_agent)
            .send()
            .await?;

        let bytes = Self::check_status(http_response)?.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| RedditError::Parse(e.to_string()))
    }

    /// Fetch one page of the user's saved items.
    ///
    /// Returns up to `page_size` parsed items plus the next cursor
    /// (None when the remote dataset is exhausted).
    pub async fn saved_page(
        &self, access_token: &str, username: &str, after: Option<&str>,
    ) -> Result<SavedPage, RedditError> {
        let url = self
            .base_url
            .join(&format!("/user/{username}/saved"))
            .map_err(|e| RedditError::InvalidBaseUrl(e.to_string()))?;

        let mut query: Vec<(&str, String)> =
            vec![("limit", self.config.page_size.to_string()), ("raw_json", "1".to_string())];
        if let Some(cursor) = after {
            query.push(("after", cursor.to_string()));
        }

        tracing::debug!(after = after.unwrap_or("start"), "fetching saved-items page");

        let http_response = self
            .http
            .get(url)
            .header(header::AUTHORIZATION, format!("Bearer {access_token}"))
            .header(header::USER_AGENT, &self.config.user_agent)
            .query(&query)
            .send()
            .await?;

        let bytes = Self::check_status(http_response)?.bytes().await?;
        let listing: response::RawListing =
            serde_json::from_slice(&bytes).map_err(|e| RedditError::Parse(e.to_string()))?;

        let items = listing.data.children.into_iter().map(|thing| thing.data.into()).collect();

        Ok(SavedPage { items, after: listing.data.after })
    }

    fn check_status(response: reqwest::Response) -> Result<reqwest::Response, RedditError> {
        let status = response.status();

        if status == 401 || status == 403 {
            return Err(RedditError::Auth);
        }
        if status == 429 {
            return Err(RedditError::RateLimited);
        }
        if status.is_client_error() || status.is_server_error() {
            return Err(RedditError::HttpError { status: status.as_u16() });
        }

        Ok(response)
    }
}

#[async_trait]
impl SavedItemSource for RedditClient {
    async fn user_identity(&self, access_token: &str) -> Result<Identity, RedditError> {
        RedditClient::user_identity(self, access_token).await
    }

    async fn saved_page(
        &self, access_token: &str, username: &str, after: Option<&str>,
    ) -> Result<SavedPage, RedditError> {
        RedditClient::saved_page(self, access_token, username, after).await
    }
}
