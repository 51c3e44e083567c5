//! Client code for shelfsync.
//!
//! This crate provides the Reddit API client, the paginated sync
//! pipeline, and the service that composes pipeline, store, cache, and
//! search index.

pub mod reddit;
pub mod sync;

pub use reddit::{Identity, RedditClient, RedditConfig, RedditError, SavedItemSource, SavedPage};
pub use sync::service::{CachedValue, SyncReport, SyncService};
pub use sync::{Credentials, SyncConfig, SyncOutcome, SyncPipeline};
