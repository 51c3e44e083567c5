//! Reddit listing payload types and normalization into `SavedItem`.

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use shelfsync_core::item::{ItemKind, SavedItem};

/// Raw listing envelope from the saved-items endpoint.
#[derive(Debug, Deserialize)]
pub struct RawListing {
    pub data: RawListingData,
}

#[derive(Debug, Deserialize)]
pub struct RawListingData {
    pub children: Vec<RawThing>,
    /// Cursor for the next page; absent/null signals end of data.
    #[serde(default)]
    pub after: Option<String>,
}

/// One wrapped item in a listing.
#[derive(Debug, Deserialize)]
pub struct RawThing {
    pub data: RawSavedItem,
}

/// Raw saved item as returned by the remote.
///
/// Posts carry `title`/`selftext`; comments carry `link_title`/`body`.
/// Everything is optional because both shapes share one endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct RawSavedItem {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub link_title: Option<String>,
    #[serde(default)]
    pub subreddit: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub permalink: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub created_utc: Option<f64>,
    #[serde(default)]
    pub saved_utc: Option<f64>,
    #[serde(default)]
    pub selftext: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub score: Option<i64>,
}

/// Normalize remote epoch seconds into a valid instant.
///
/// Missing or non-finite timestamps become "now" rather than propagating
/// as invalid.
fn instant_from_secs(secs: Option<f64>) -> DateTime<Utc> {
    match secs {
        Some(s) if s.is_finite() => Utc
            .timestamp_millis_opt((s * 1000.0) as i64)
            .single()
            .unwrap_or_else(Utc::now),
        _ => Utc::now(),
    }
}

impl From<RawSavedItem> for SavedItem {
    /// Convert a raw payload into the canonical entity.
    ///
    /// A present `title` marks a post; its absence marks a comment, whose
    /// display title falls back to the parent link's title.
    fn from(raw: RawSavedItem) -> Self {
        let kind = match raw.title.as_deref() {
            Some(t) if !t.is_empty() => ItemKind::Post,
            _ => ItemKind::Comment,
        };

        let title = raw
            .title
            .filter(|t| !t.is_empty())
            .or(raw.link_title)
            .unwrap_or_else(|| "Comment".to_string());

        let url = raw
            .url
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| format!("https://reddit.com{}", raw.permalink.unwrap_or_default()));

        SavedItem {
            id: raw.id.unwrap_or_default(),
            title,
            subreddit: raw.subreddit.unwrap_or_default(),
            url,
            author: raw.author.unwrap_or_default(),
            kind,
            content: raw.selftext.or(raw.body).unwrap_or_default(),
            score: raw.score.unwrap_or(0),
            thumbnail: raw.thumbnail.unwrap_or_default(),
            created_at: instant_from_secs(raw.created_utc),
            saved_at: instant_from_secs(raw.saved_utc),
        }
    }
}
