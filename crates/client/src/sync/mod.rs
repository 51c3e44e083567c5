//! Paginated remote synchronization pipeline.
//!
//! Drives a `SavedItemSource` across cursor-ordered pages under a fixed
//! inter-request delay and a hard page ceiling. A single page failure
//! aborts the whole sync so the store is only ever mutated once the full
//! sequence is known.

pub mod service;

use std::time::Duration;

use chrono::{DateTime, Utc};
use shelfsync_core::{AppConfig, Error, SavedItem};
use tokio::sync::Mutex;

use crate::reddit::SavedItemSource;

/// Access token and its expiry, supplied by the credential provider.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl Credentials {
    pub fn new(access_token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self { access_token: access_token.into(), expires_at }
    }

    /// A token is invalid once "now" reaches its expiry.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Pipeline tuning knobs.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Hard ceiling on pages fetched in one run.
    pub max_pages: u32,
    /// Pacing delay between page requests.
    pub page_delay: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self { max_pages: 50, page_delay: Duration::from_secs(1) }
    }
}

impl From<&AppConfig> for SyncConfig {
    fn from(config: &AppConfig) -> Self {
        Self { max_pages: config.max_pages, page_delay: config.page_delay() }
    }
}

/// Result of one full sync run.
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    /// All items in the order the remote returned them.
    pub items: Vec<SavedItem>,
    pub pages_fetched: u32,
    /// True when the page ceiling was reached while a cursor remained;
    /// the items fetched so far are still returned.
    pub truncated: bool,
}

/// Drives the remote source page by page until the cursor is exhausted
/// or the ceiling is reached.
#[derive(Debug)]
pub struct SyncPipeline<S> {
    source: S,
    config: SyncConfig,
    /// Username resolved once per pipeline instance.
    username: Mutex<Option<String>>,
}

impl<S: SavedItemSource> SyncPipeline<S> {
    pub fn new(source: S, config: SyncConfig) -> Self {
        Self { source, config, username: Mutex::new(None) }
    }

    /// Fetch the complete remote dataset.
    ///
    /// Pages are requested strictly in cursor order, pausing for the
    /// configured delay only when another page remains. No partial result
    /// survives a page failure.
    ///
    /// # Errors
    ///
    /// - `Error::Auth` if the token is missing or expired (checked before
    ///   any network call) or rejected by the remote
    /// - `Error::RateLimited` only if the remote explicitly signals it
    /// - `Error::Network` on transport failure; the caller may retry the
    ///   whole sync
    pub async fn sync_all(&self, credentials: &Credentials) -> Result<SyncOutcome, Error> {
        if credentials.access_token.is_empty() {
            return Err(Error::Auth("no access token; login required".to_string()));
        }
        if credentials.is_expired() {
            return Err(Error::Auth("access token expired; login required".to_string()));
        }

        let username = self.resolve_username(credentials).await?;
        tracing::debug!(username = %username, "starting full sync");

        let mut items: Vec<SavedItem> = Vec::new();
        let mut after: Option<String> = None;
        let mut pages_fetched = 0u32;

        loop {
            let page = self
                .source
                .saved_page(&credentials.access_token, &username, after.as_deref())
                .await?;
            pages_fetched += 1;
            items.extend(page.items);
            after = page.after;

            tracing::debug!(page = pages_fetched, total = items.len(), "fetched saved-items page");

            if after.is_none() || pages_fetched >= self.config.max_pages {
                break;
            }

            tokio::time::sleep(self.config.page_delay).await;
        }

        let truncated = after.is_some();
        if truncated {
            tracing::warn!(
                pages = pages_fetched,
                total = items.len(),
                "reached page ceiling before cursor exhaustion; results truncated"
            );
        }

        tracing::debug!(total = items.len(), pages = pages_fetched, "sync complete");
        Ok(SyncOutcome { items, pages_fetched, truncated })
    }

    async fn resolve_username(&self, credentials: &Credentials) -> Result<String, Error> {
        let mut cached = self.username.lock().await;
        if let Some(username) = cached.as_ref() {
            return Ok(username.clone());
        }

        let identity = self.source.user_identity(&credentials.access_token).await?;
        tracing::debug!(username = %identity.username, "resolved acting user");
        *cached = Some(identity.username.clone());
        Ok(identity.username)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{MockSource, make_page};
    use super::*;
    use crate::reddit::RedditError;
    use std::sync::atomic::Ordering;

    fn valid_credentials() -> Credentials {
        Credentials::new("token", Utc::now() + chrono::Duration::hours(1))
    }

    fn fast_config(max_pages: u32) -> SyncConfig {
        SyncConfig { max_pages, page_delay: Duration::from_millis(1_000) }
    }

    #[tokio::test(start_paused = true)]
    async fn test_sync_three_pages() {
        let source = MockSource::new(vec![
            Ok(make_page(100, 0, Some("c1"))),
            Ok(make_page(100, 100, Some("c2"))),
            Ok(make_page(40, 200, None)),
        ]);
        let pipeline = SyncPipeline::new(source, fast_config(50));

        let outcome = pipeline.sync_all(&valid_credentials()).await.unwrap();

        assert_eq!(outcome.items.len(), 240);
        assert_eq!(outcome.pages_fetched, 3);
        assert!(!outcome.truncated);
        assert_eq!(pipeline.source.page_calls.load(Ordering::SeqCst), 3);
        // Remote order preserved, no client-side resort.
        assert_eq!(outcome.items[0].id, "t3_0000");
        assert_eq!(outcome.items[239].id, "t3_0239");
    }

    #[tokio::test(start_paused = true)]
    async fn test_sync_hits_page_ceiling_without_error() {
        let source = MockSource::new(vec![
            Ok(make_page(10, 0, Some("c1"))),
            Ok(make_page(10, 10, Some("c2"))),
            Ok(make_page(10, 20, Some("c3"))),
        ]);
        let pipeline = SyncPipeline::new(source, fast_config(2));

        let outcome = pipeline.sync_all(&valid_credentials()).await.unwrap();

        assert_eq!(outcome.pages_fetched, 2);
        assert_eq!(outcome.items.len(), 20);
        assert!(outcome.truncated);
        assert_eq!(pipeline.source.page_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_expired_credentials_fail_before_any_request() {
        let source = MockSource::new(vec![Ok(make_page(1, 0, None))]);
        let pipeline = SyncPipeline::new(source, fast_config(50));

        let credentials = Credentials::new("token", Utc::now() - chrono::Duration::seconds(1));
        let result = pipeline.sync_all(&credentials).await;

        assert!(matches!(result, Err(Error::Auth(_))));
        assert_eq!(pipeline.source.identity_calls.load(Ordering::SeqCst), 0);
        assert_eq!(pipeline.source.page_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_token_fails_before_any_request() {
        let source = MockSource::new(vec![]);
        let pipeline = SyncPipeline::new(source, fast_config(50));

        let credentials = Credentials::new("", Utc::now() + chrono::Duration::hours(1));
        let result = pipeline.sync_all(&credentials).await;

        assert!(matches!(result, Err(Error::Auth(_))));
        assert_eq!(pipeline.source.page_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_page_failure_aborts_whole_sync() {
        let source = MockSource::new(vec![
            Ok(make_page(10, 0, Some("c1"))),
            Err(RedditError::Timeout),
        ]);
        let pipeline = SyncPipeline::new(source, fast_config(50));

        let result = pipeline.sync_all(&valid_credentials()).await;
        assert!(matches!(result, Err(Error::Network(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_signal_propagates() {
        let source = MockSource::new(vec![Err(RedditError::RateLimited)]);
        let pipeline = SyncPipeline::new(source, fast_config(50));

        let result = pipeline.sync_all(&valid_credentials()).await;
        assert!(matches!(result, Err(Error::RateLimited(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_username_resolved_once_across_runs() {
        let source = MockSource::new(vec![Ok(make_page(1, 0, None)), Ok(make_page(1, 1, None))]);
        let pipeline = SyncPipeline::new(source, fast_config(50));

        pipeline.sync_all(&valid_credentials()).await.unwrap();
        pipeline.sync_all(&valid_credentials()).await.unwrap();

        assert_eq!(pipeline.source.identity_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_inter_page_delay_only_between_pages() {
        let source = MockSource::new(vec![
            Ok(make_page(1, 0, Some("c1"))),
            Ok(make_page(1, 1, None)),
        ]);
        let pipeline = SyncPipeline::new(source, fast_config(50));

        let start = tokio::time::Instant::now();
        pipeline.sync_all(&valid_credentials()).await.unwrap();
        let elapsed = start.elapsed();

        // Two pages: exactly one pacing delay, none after the last page.
        assert!(elapsed >= Duration::from_millis(1_000));
        assert!(elapsed < Duration::from_millis(2_000));
    }
}
