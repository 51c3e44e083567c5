//! Well-known cache keys and invalidation prefixes.
//!
//! Derived cache entries are grouped into families by key prefix so a
//! whole family can be invalidated in one call after a sync.

/// Full list of all stored items.
pub const ALL_SAVES: &str = "allSaves";

/// Acting user's identity.
pub const USER_INFO: &str = "userInfo";

/// Aggregate store statistics.
pub const STATS: &str = "stats";

/// Last successful sync time.
pub const LAST_SYNC: &str = "lastSync";

/// Prefix for cached search-query results.
pub const SEARCH_PREFIX: &str = "search_";

/// Prefix for cached filtered views.
pub const FILTER_PREFIX: &str = "filter_";

/// Point keys invalidated together after any dataset change.
pub const DATA_KEYS: &[&str] = &[ALL_SAVES, USER_INFO, STATS, LAST_SYNC];

/// Key for one search query's cached results.
pub fn search(query: &str) -> String {
    format!("{SEARCH_PREFIX}{}", query.trim().to_lowercase())
}

/// Key for one filtered view's cached results.
pub fn filter(field: &str, value: &str) -> String {
    format!("{FILTER_PREFIX}{field}_{value}")
}
