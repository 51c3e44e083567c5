//! Aggregate statistics over stored items.
//!
//! Stats are computed fresh from current contents on every call; caching
//! them is the cache layer's job, not the store's.

use super::connection::StoreDb;
use crate::Error;
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;

/// One subreddit and how many stored items belong to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubredditCount {
    pub subreddit: String,
    pub count: u64,
}

/// Aggregate statistics about the store contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub total_items: u64,
    pub distinct_subreddits: u64,
    /// Top subreddits by item count, ties broken by name ascending.
    pub top_subreddits: Vec<SubredditCount>,
    pub posts: u64,
    pub comments: u64,
}

impl StoreDb {
    /// Compute aggregate stats over the current contents.
    ///
    /// `top_n` bounds the `top_subreddits` list.
    pub async fn get_stats(&self, top_n: usize) -> Result<StoreStats, Error> {
        let top_n = top_n as i64;
        self.conn
            .call(move |conn| -> Result<StoreStats, Error> {
                let total_items: u64 =
                    conn.query_row("SELECT COUNT(*) FROM saved_items", [], |row| row.get(0))?;

                let distinct_subreddits: u64 = conn.query_row(
                    "SELECT COUNT(DISTINCT subreddit) FROM saved_items",
                    [],
                    |row| row.get(0),
                )?;

                let mut stmt = conn.prepare(
                    "SELECT subreddit, COUNT(*) AS n FROM saved_items
                     GROUP BY subreddit
                     ORDER BY n DESC, subreddit ASC
                     LIMIT ?1",
                )?;
                let rows = stmt.query_map(params![top_n], |row| {
                    Ok(SubredditCount { subreddit: row.get(0)?, count: row.get(1)? })
                })?;

                let mut top_subreddits = Vec::new();
                for row in rows {
                    top_subreddits.push(row?);
                }

                let posts: u64 = conn.query_row(
                    "SELECT COUNT(*) FROM saved_items WHERE kind = 'post'",
                    [],
                    |row| row.get(0),
                )?;
                let comments: u64 = conn.query_row(
                    "SELECT COUNT(*) FROM saved_items WHERE kind = 'comment'",
                    [],
                    |row| row.get(0),
                )?;

                Ok(StoreStats { total_items, distinct_subreddits, top_subreddits, posts, comments })
            })
            .await
            .map_err(Error::from)
    }
}
