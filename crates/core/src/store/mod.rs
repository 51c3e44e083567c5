//! SQLite-backed durable store for saved items.
//!
//! This module provides the single source of truth for synchronized items,
//! with async access via tokio-rusqlite. It supports:
//!
//! - Keyed upsert with last-write-wins semantics per id
//! - Secondary indexes for ordering by creation time and equality lookups
//!   by subreddit, author, and kind
//! - Automatic schema migrations
//! - WAL mode for concurrent access

pub mod connection;
pub mod items;
pub mod migrations;
pub mod stats;

pub use crate::Error;

pub use connection::StoreDb;
pub use stats::{StoreStats, SubredditCount};
