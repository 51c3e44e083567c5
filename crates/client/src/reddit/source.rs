//! Trait seam between the sync pipeline and the remote platform.

use async_trait::async_trait;
use serde::Deserialize;
use shelfsync_core::SavedItem;

use super::RedditError;

/// The acting user's identity, from the profile endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Identity {
    #[serde(rename = "name")]
    pub username: String,
    pub id: String,
}

/// One page of parsed saved items plus the cursor for the next page.
///
/// `after` is None when the remote dataset is exhausted.
#[derive(Debug, Clone)]
pub struct SavedPage {
    pub items: Vec<SavedItem>,
    pub after: Option<String>,
}

/// A remote source of saved items.
///
/// The sync pipeline drives this interface; `RedditClient` is the
/// production implementation, and tests substitute an in-memory one.
#[async_trait]
pub trait SavedItemSource: Send + Sync {
    /// Resolve the acting user's identity.
    async fn user_identity(&self, access_token: &str) -> Result<Identity, RedditError>;

    /// Fetch one page of saved items starting at the given cursor.
    async fn saved_page(
        &self, access_token: &str, username: &str, after: Option<&str>,
    ) -> Result<SavedPage, RedditError>;
}
