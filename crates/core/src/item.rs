//! The canonical saved-item entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether a saved item is a post or a comment.
///
/// Derived at parse time: a post carries a non-empty title, a comment
/// does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Post,
    Comment,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Post => "post",
            ItemKind::Comment => "comment",
        }
    }

    /// Parse the stored string form; anything unrecognized is a comment.
    pub fn from_db(s: &str) -> Self {
        if s == "post" { ItemKind::Post } else { ItemKind::Comment }
    }
}

/// A saved item mirrored from the remote platform.
///
/// `id` is the primary key; a later sync upserts a revised copy with the
/// same id rather than mutating in place. `created_at` and `saved_at` are
/// always valid instants: unparsable source timestamps are normalized to
/// "now" at parse time, never propagated as invalid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedItem {
    pub id: String,
    pub title: String,
    pub subreddit: String,
    pub url: String,
    pub author: String,
    pub kind: ItemKind,
    pub content: String,
    pub score: i64,
    pub thumbnail: String,
    pub created_at: DateTime<Utc>,
    pub saved_at: DateTime<Utc>,
}
