//! Application configuration with layered loading.
//!
//! Loading precedence (highest wins):
//! 1. Environment variables (SHELFSYNC_*)
//! 2. TOML config file (if SHELFSYNC_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite store.
    ///
    /// Set via SHELFSYNC_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// User-Agent string for remote API requests.
    ///
    /// Set via SHELFSYNC_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Base URL of the authenticated remote API.
    ///
    /// Set via SHELFSYNC_API_BASE_URL environment variable.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// HTTP request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Items requested per page (remote maximum is 100).
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Hard ceiling on pages fetched in one sync.
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// Inter-page pacing delay in milliseconds.
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,

    /// Default cache entry TTL in milliseconds.
    #[serde(default = "default_cache_ttl_ms")]
    pub cache_ttl_ms: u64,

    /// Maximum number of cache entries before eviction.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    /// Interval between background cache sweeps in milliseconds.
    #[serde(default = "default_sweep_interval_ms")]
    pub sweep_interval_ms: u64,

    /// Number of subreddits reported in top-N stats.
    #[serde(default = "default_top_subreddits")]
    pub top_subreddits: usize,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./shelfsync.sqlite")
}

fn default_user_agent() -> String {
    "shelfsync/0.1".into()
}

fn default_api_base_url() -> String {
    "https://oauth.reddit.com".into()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_page_size() -> u32 {
    100
}

fn default_max_pages() -> u32 {
    50
}

fn default_page_delay_ms() -> u64 {
    1_000
}

fn default_cache_ttl_ms() -> u64 {
    300_000 // 5 minutes
}

fn default_cache_capacity() -> usize {
    50
}

fn default_sweep_interval_ms() -> u64 {
    300_000
}

fn default_top_subreddits() -> usize {
    10
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            user_agent: default_user_agent(),
            api_base_url: default_api_base_url(),
            timeout_ms: default_timeout_ms(),
            page_size: default_page_size(),
            max_pages: default_max_pages(),
            page_delay_ms: default_page_delay_ms(),
            cache_ttl_ms: default_cache_ttl_ms(),
            cache_capacity: default_cache_capacity(),
            sweep_interval_ms: default_sweep_interval_ms(),
            top_subreddits: default_top_subreddits(),
        }
    }
}

impl AppConfig {
    /// Request timeout as a Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Inter-page pacing delay as a Duration.
    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    /// Default cache TTL as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }

    /// Background sweep interval as a Duration.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("SHELFSYNC_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("SHELFSYNC_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
