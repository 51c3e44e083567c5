//! Bounded in-memory TTL cache with pattern invalidation.
//!
//! A derived, disposable accelerator layered above the store: readers that
//! miss here must fall back to the store, never fail. Expiry is lazy
//! (enforced when an entry is observed) plus a periodic background sweep;
//! eviction at capacity is FIFO by creation time, not LRU.

pub mod keys;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Default entry TTL: 5 minutes.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Default capacity bound.
pub const DEFAULT_CAPACITY: usize = 50;

/// Default background sweep interval: 5 minutes.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Observable lifecycle state of a cache entry.
///
/// An `Expired` entry is observably absent even before it has been
/// physically purged; observing it removes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryState {
    Valid,
    Expired,
}

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    created: Instant,
    ttl: Duration,
}

impl<V> Entry<V> {
    /// An entry is stale strictly after its age exceeds its TTL; age
    /// exactly equal to the TTL still counts as valid.
    fn state(&self, now: Instant) -> EntryState {
        if now.duration_since(self.created) > self.ttl { EntryState::Expired } else { EntryState::Valid }
    }
}

/// Generic bounded TTL cache keyed by string.
///
/// Reads use the tokio clock, so tests can drive expiry deterministically
/// with paused time. All methods take `&self`; the map is guarded by an
/// async mutex, matching the single-writer cooperative model.
#[derive(Debug)]
pub struct Cache<V> {
    inner: Mutex<HashMap<String, Entry<V>>>,
    default_ttl: Duration,
    capacity: usize,
}

impl<V> Default for Cache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL, DEFAULT_CAPACITY)
    }
}

impl<V> Cache<V> {
    /// Create a cache with the given default TTL and capacity bound.
    pub fn new(default_ttl: Duration, capacity: usize) -> Self {
        Self { inner: Mutex::new(HashMap::new()), default_ttl, capacity }
    }

    /// Insert a value under the default TTL.
    ///
    /// If the cache is at capacity the single oldest-by-creation entry is
    /// evicted first. Reads do not refresh age, so eviction order is FIFO.
    pub async fn set(&self, key: impl Into<String>, value: V) {
        self.set_with_ttl(key, value, self.default_ttl).await;
    }

    /// Insert a value with a per-entry TTL override.
    pub async fn set_with_ttl(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let key = key.into();
        let mut map = self.inner.lock().await;

        if map.len() >= self.capacity {
            Self::evict_oldest(&mut map);
        }

        tracing::debug!(key = %key, ttl_ms = ttl.as_millis() as u64, "cache set");
        map.insert(key, Entry { value, created: Instant::now(), ttl });
    }

    /// Get a value, or None on miss.
    ///
    /// A present-but-expired entry is removed and reported as a miss.
    pub async fn get(&self, key: &str) -> Option<V>
    where
        V: Clone,
    {
        let mut map = self.inner.lock().await;
        let entry = map.get(key)?;

        match entry.state(Instant::now()) {
            EntryState::Valid => Some(entry.value.clone()),
            EntryState::Expired => {
                tracing::debug!(key = %key, "cache entry expired on read");
                map.remove(key);
                None
            }
        }
    }

    /// Whether `get` would succeed for this key.
    ///
    /// Applies the same lazy-expiry rule as `get`: an observed-expired
    /// entry is removed as a side effect.
    pub async fn has(&self, key: &str) -> bool {
        let mut map = self.inner.lock().await;
        let Some(entry) = map.get(key) else {
            return false;
        };

        match entry.state(Instant::now()) {
            EntryState::Valid => true,
            EntryState::Expired => {
                map.remove(key);
                false
            }
        }
    }

    /// Remove one entry. Returns true if it was present.
    pub async fn delete(&self, key: &str) -> bool {
        self.inner.lock().await.remove(key).is_some()
    }

    /// Remove all entries.
    pub async fn clear(&self) {
        let mut map = self.inner.lock().await;
        let size = map.len();
        map.clear();
        tracing::debug!(removed = size, "cache cleared");
    }

    /// Remove every entry whose age exceeds its TTL.
    ///
    /// Returns the number of entries removed. Invoked by the periodic
    /// sweep in addition to lazy expiry, to bound memory held by entries
    /// nobody has read recently.
    pub async fn clear_expired(&self) -> usize {
        let now = Instant::now();
        let mut map = self.inner.lock().await;
        let before = map.len();
        map.retain(|_, entry| entry.state(now) == EntryState::Valid);
        before - map.len()
    }

    /// Remove every entry whose key starts with `prefix`.
    ///
    /// Used to invalidate families of derived entries (e.g. all cached
    /// search results) after the underlying dataset changes. Returns the
    /// number of entries removed.
    pub async fn clear_by_prefix(&self, prefix: &str) -> usize {
        let mut map = self.inner.lock().await;
        let before = map.len();
        map.retain(|key, _| !key.starts_with(prefix));
        let removed = before - map.len();
        tracing::debug!(prefix = %prefix, removed, "cache prefix invalidation");
        removed
    }

    /// Number of entries currently held, including not-yet-observed
    /// expired ones.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    /// Spawn a background task that sweeps expired entries at a fixed
    /// interval. Removal races harmlessly with readers because it is
    /// idempotent.
    pub fn spawn_sweep(self: &Arc<Self>, every: Duration) -> JoinHandle<()>
    where
        V: Send + 'static,
    {
        let cache = Arc::clone(self);
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(every);
            tick.tick().await; // first tick completes immediately
            loop {
                tick.tick().await;
                let removed = cache.clear_expired().await;
                if removed > 0 {
                    tracing::debug!(removed, "cache sweep removed expired entries");
                }
            }
        })
    }

    fn evict_oldest(map: &mut HashMap<String, Entry<V>>) {
        // Ties on creation time (possible under paused test clocks) break
        // by key so eviction stays deterministic.
        let oldest = map
            .iter()
            .min_by(|(ka, a), (kb, b)| a.created.cmp(&b.created).then_with(|| ka.cmp(kb)))
            .map(|(key, _)| key.clone());

        if let Some(key) = oldest {
            tracing::debug!(key = %key, "cache evicting oldest entry");
            map.remove(&key);
        }
    }
}
