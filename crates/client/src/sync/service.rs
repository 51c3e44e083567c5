//! Composition layer wiring pipeline, store, cache, and search index.
//!
//! The service owns explicit, injected component instances (no hidden
//! process-wide state): a sync run fetches the full remote dataset,
//! commits it to the store, invalidates derived cache entries, and
//! rebuilds the index from the fresh store snapshot. Read helpers consult
//! the cache first and fall back to the store or index on a miss; a miss
//! is never an error.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use shelfsync_core::cache::keys;
use shelfsync_core::{Cache, Error, SavedItem, SearchIndex, StoreDb, StoreStats};
use tokio::sync::Mutex;

use super::{Credentials, SyncPipeline};
use crate::reddit::SavedItemSource;

/// TTL for cached search results.
const SEARCH_TTL: Duration = Duration::from_secs(2 * 60);

/// TTL for the cached full item list.
const ALL_SAVES_TTL: Duration = Duration::from_secs(10 * 60);

/// TTL for cached store stats.
const STATS_TTL: Duration = Duration::from_secs(5 * 60);

/// Values the service caches, one variant per derived view.
#[derive(Debug, Clone)]
pub enum CachedValue {
    Items(Vec<SavedItem>),
    Stats(StoreStats),
}

/// Summary of one completed sync, fed to save-count / last-sync displays.
#[derive(Debug, Clone)]
pub struct SyncReport {
    /// Items fetched from the remote.
    pub fetched: usize,
    /// Items actually written to the store.
    pub written: usize,
    pub pages_fetched: u32,
    pub truncated: bool,
    pub last_sync: DateTime<Utc>,
}

/// Owns the synchronized dataset end to end.
pub struct SyncService<S> {
    pipeline: SyncPipeline<S>,
    store: StoreDb,
    cache: Arc<Cache<CachedValue>>,
    index: Mutex<SearchIndex>,
    top_subreddits: usize,
}

impl<S: SavedItemSource> SyncService<S> {
    pub fn new(
        pipeline: SyncPipeline<S>, store: StoreDb, cache: Arc<Cache<CachedValue>>, top_subreddits: usize,
    ) -> Self {
        Self { pipeline, store, cache, index: Mutex::new(SearchIndex::new()), top_subreddits }
    }

    /// Run a full sync: fetch everything, commit the batch, invalidate
    /// derived cache entries, rebuild the search index.
    ///
    /// The store is only mutated after the complete remote sequence is
    /// known, so a failed sync leaves it in its prior state.
    pub async fn sync(&self, credentials: &Credentials) -> Result<SyncReport, Error> {
        let outcome = self.pipeline.sync_all(credentials).await?;
        let fetched = outcome.items.len();

        let written = self.store.upsert_batch(&outcome.items).await?;

        self.invalidate_derived().await;

        let snapshot = self.store.get_all().await?;
        self.index.lock().await.build(&snapshot);

        let last_sync = Utc::now();
        tracing::debug!(fetched, written, pages = outcome.pages_fetched, "sync committed");

        Ok(SyncReport {
            fetched,
            written,
            pages_fetched: outcome.pages_fetched,
            truncated: outcome.truncated,
            last_sync,
        })
    }

    /// Ranked keyword search, cached per normalized query.
    pub async fn search(&self, query: &str) -> Result<Vec<SavedItem>, Error> {
        let key = keys::search(query);
        if let Some(CachedValue::Items(items)) = self.cache.get(&key).await {
            return Ok(items);
        }

        let results = self.index.lock().await.search(query)?;
        self.cache
            .set_with_ttl(key, CachedValue::Items(results.clone()), SEARCH_TTL)
            .await;
        Ok(results)
    }

    /// All stored items, newest first, cached.
    pub async fn all_items(&self) -> Result<Vec<SavedItem>, Error> {
        if let Some(CachedValue::Items(items)) = self.cache.get(keys::ALL_SAVES).await {
            return Ok(items);
        }

        let items = self.store.get_all().await?;
        self.cache
            .set_with_ttl(keys::ALL_SAVES, CachedValue::Items(items.clone()), ALL_SAVES_TTL)
            .await;
        Ok(items)
    }

    /// One subreddit's items, newest first, cached as a filtered view.
    pub async fn items_by_subreddit(&self, subreddit: &str) -> Result<Vec<SavedItem>, Error> {
        let key = keys::filter("subreddit", subreddit);
        if let Some(CachedValue::Items(items)) = self.cache.get(&key).await {
            return Ok(items);
        }

        let items = self.store.get_by_subreddit(subreddit).await?;
        self.cache.set(key, CachedValue::Items(items.clone())).await;
        Ok(items)
    }

    /// Aggregate store stats, cached.
    pub async fn stats(&self) -> Result<StoreStats, Error> {
        if let Some(CachedValue::Stats(stats)) = self.cache.get(keys::STATS).await {
            return Ok(stats);
        }

        let stats = self.store.get_stats(self.top_subreddits).await?;
        self.cache
            .set_with_ttl(keys::STATS, CachedValue::Stats(stats.clone()), STATS_TTL)
            .await;
        Ok(stats)
    }

    /// Single-item lookup; absence is a normal None, not an error.
    pub async fn item(&self, id: &str) -> Result<Option<SavedItem>, Error> {
        self.store.get_by_id(id).await
    }

    /// Delete one item and refresh derived structures.
    pub async fn delete_item(&self, id: &str) -> Result<bool, Error> {
        let deleted = self.store.delete_by_id(id).await?;
        if deleted {
            self.invalidate_derived().await;
            let snapshot = self.store.get_all().await?;
            self.index.lock().await.build(&snapshot);
        }
        Ok(deleted)
    }

    /// Full reset: empty the store and derived structures.
    pub async fn clear_all(&self) -> Result<u64, Error> {
        let removed = self.store.clear_all().await?;
        self.invalidate_derived().await;
        self.index.lock().await.build(&[]);
        Ok(removed)
    }

    /// Indexed document count, for diagnostics.
    pub async fn document_count(&self) -> usize {
        self.index.lock().await.document_count()
    }

    async fn invalidate_derived(&self) {
        for key in keys::DATA_KEYS {
            self.cache.delete(key).await;
        }
        self.cache.clear_by_prefix(keys::SEARCH_PREFIX).await;
        self.cache.clear_by_prefix(keys::FILTER_PREFIX).await;
    }
}
