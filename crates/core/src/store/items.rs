//! Saved-item CRUD operations.
//!
//! Provides keyed upsert, ordered retrieval, equality lookups, and
//! delete/clear operations over the saved_items table.

use super::connection::StoreDb;
use crate::Error;
use crate::item::{ItemKind, SavedItem};
use chrono::{DateTime, TimeZone, Utc};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

const ITEM_COLUMNS: &str = "id, title, subreddit, url, author, kind, content, score, thumbnail, created_at, saved_at";

fn millis_to_instant(ms: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ms).single().unwrap_or(DateTime::UNIX_EPOCH)
}

fn item_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<SavedItem> {
    let kind: String = row.get(5)?;
    Ok(SavedItem {
        id: row.get(0)?,
        title: row.get(1)?,
        subreddit: row.get(2)?,
        url: row.get(3)?,
        author: row.get(4)?,
        kind: ItemKind::from_db(&kind),
        content: row.get(6)?,
        score: row.get(7)?,
        thumbnail: row.get(8)?,
        created_at: millis_to_instant(row.get(9)?),
        saved_at: millis_to_instant(row.get(10)?),
    })
}

impl StoreDb {
    /// Insert or fully replace a batch of items by id.
    ///
    /// Idempotent: re-upserting the same batch yields the same store state.
    /// Items with an empty id are skipped and logged, not fatal to the
    /// batch. The whole batch is applied in one transaction, so a failed
    /// batch leaves the store in its prior state.
    ///
    /// Returns the number of items successfully written.
    ///
    /// # Errors
    ///
    /// Returns `StorageQuotaExceeded` if the medium is full; that aborts
    /// the batch rather than being skipped per item.
    pub async fn upsert_batch(&self, items: &[SavedItem]) -> Result<usize, Error> {
        let items = items.to_vec();
        self.conn
            .call(move |conn| -> Result<usize, Error> {
                let tx = conn.transaction()?;
                let mut written = 0usize;
                {
                    let mut stmt = tx.prepare(
                        "INSERT INTO saved_items (
                            id, title, subreddit, url, author, kind,
                            content, score, thumbnail, created_at, saved_at
                        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                        ON CONFLICT(id) DO UPDATE SET
                            title = excluded.title,
                            subreddit = excluded.subreddit,
                            url = excluded.url,
                            author = excluded.author,
                            kind = excluded.kind,
                            content = excluded.content,
                            score = excluded.score,
                            thumbnail = excluded.thumbnail,
                            created_at = excluded.created_at,
                            saved_at = excluded.saved_at",
                    )?;

                    for item in &items {
                        if item.id.is_empty() {
                            tracing::warn!(title = %item.title, "skipping item with missing id");
                            continue;
                        }

                        let result = stmt.execute(params![
                            &item.id,
                            &item.title,
                            &item.subreddit,
                            &item.url,
                            &item.author,
                            item.kind.as_str(),
                            &item.content,
                            item.score,
                            &item.thumbnail,
                            item.created_at.timestamp_millis(),
                            item.saved_at.timestamp_millis(),
                        ]);

                        match result {
                            Ok(_) => written += 1,
                            Err(e) => {
                                let err: Error = e.into();
                                if matches!(err, Error::StorageQuotaExceeded(_)) {
                                    return Err(err);
                                }
                                tracing::warn!(id = %item.id, error = %err, "skipping item that failed to write");
                            }
                        }
                    }
                }
                tx.commit()?;
                Ok(written)
            })
            .await
            .map_err(Error::from)
    }

    /// Get all items, newest first.
    ///
    /// Ordering is stable: `created_at` descending with ties broken by
    /// `id` ascending.
    pub async fn get_all(&self) -> Result<Vec<SavedItem>, Error> {
        self.select_ordered("", String::new()).await
    }

    /// Get all items in one subreddit, newest first.
    pub async fn get_by_subreddit(&self, subreddit: &str) -> Result<Vec<SavedItem>, Error> {
        self.select_ordered("WHERE subreddit = ?1", subreddit.to_string()).await
    }

    /// Get all items by one author, newest first.
    pub async fn get_by_author(&self, author: &str) -> Result<Vec<SavedItem>, Error> {
        self.select_ordered("WHERE author = ?1", author.to_string()).await
    }

    /// Get all items of one kind, newest first.
    pub async fn get_by_kind(&self, kind: ItemKind) -> Result<Vec<SavedItem>, Error> {
        self.select_ordered("WHERE kind = ?1", kind.as_str().to_string()).await
    }

    async fn select_ordered(&self, filter: &'static str, value: String) -> Result<Vec<SavedItem>, Error> {
        self.conn
            .call(move |conn| -> Result<Vec<SavedItem>, Error> {
                let sql = format!(
                    "SELECT {ITEM_COLUMNS} FROM saved_items {filter} ORDER BY created_at DESC, id ASC"
                );
                let mut stmt = conn.prepare(&sql)?;

                let rows = if filter.is_empty() {
                    stmt.query_map([], item_from_row)?
                } else {
                    stmt.query_map(params![value], item_from_row)?
                };

                let mut items = Vec::new();
                for row in rows {
                    items.push(row?);
                }
                Ok(items)
            })
            .await
            .map_err(Error::from)
    }

    /// Get an item by id.
    ///
    /// Returns None if the id doesn't exist; absence is not an error.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<SavedItem>, Error> {
        let id = id.to_string();
        self.conn
            .call(move |conn| -> Result<Option<SavedItem>, Error> {
                let mut stmt =
                    conn.prepare(&format!("SELECT {ITEM_COLUMNS} FROM saved_items WHERE id = ?1"))?;

                let result = stmt.query_row(params![id], item_from_row);

                match result {
                    Ok(item) => Ok(Some(item)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Delete an item by id.
    ///
    /// Returns true if a row was removed.
    pub async fn delete_by_id(&self, id: &str) -> Result<bool, Error> {
        let id = id.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let count = conn.execute("DELETE FROM saved_items WHERE id = ?1", params![id])?;
                Ok(count > 0)
            })
            .await
            .map_err(Error::from)
    }

    /// Remove every item. Used for full-reset flows.
    ///
    /// Returns the number of deleted rows.
    pub async fn clear_all(&self) -> Result<u64, Error> {
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM saved_items", [])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}
