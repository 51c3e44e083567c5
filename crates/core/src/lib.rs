//! Core types and shared functionality for shelfsync.
//!
//! This crate provides:
//! - The canonical saved-item model
//! - Durable keyed store with SQLite backend
//! - Bounded in-memory TTL cache with pattern invalidation
//! - Field-weighted inverted search index
//! - Unified error types and configuration

pub mod cache;
pub mod config;
pub mod error;
pub mod item;
pub mod search;
pub mod store;

pub use cache::Cache;
pub use config::AppConfig;
pub use error::Error;
pub use item::{ItemKind, SavedItem};
pub use search::SearchIndex;
pub use store::{StoreDb, StoreStats};
