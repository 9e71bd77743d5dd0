//! Fogwatch: a companion data client for the Fog
//!
//! This crate aggregates three upstream sources for an asymmetric-horror game:
//! promotional codes scraped from a third-party HTML page, the weekly rotating
//! Shrine shop, and official news. Fetched snapshots are cached locally and
//! diffed against the previous fetch to report what is new.

pub mod cache;
pub mod client;
pub mod codes;
pub mod config;
pub mod diff;
pub mod news;
pub mod refresh;
pub mod shrine;

use thiserror::Error;

/// Main error type for Fogwatch operations
#[derive(Debug, Error)]
pub enum FogError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Unexpected response shape from {url}: {message}")]
    InvalidShape { url: String, message: String },

    #[error("Cache error: {0}")]
    Cache(#[from] cache::CacheError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FogError {
    /// True when the error is a transport or upstream failure rather than a
    /// local bug. Callers use this to decide whether a cached snapshot should
    /// stand in for the failed fetch.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            FogError::Http { .. }
                | FogError::Status { .. }
                | FogError::Timeout { .. }
                | FogError::InvalidShape { .. }
                | FogError::Reqwest(_)
        )
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Fogwatch operations
pub type Result<T> = std::result::Result<T, FogError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use codes::{CodesSnapshot, PromoCode, PromoCodeType};
pub use config::Config;
pub use news::{NewsItem, NewsSnapshot};
pub use refresh::{RefreshOutcome, Refresher};
pub use shrine::{PerkRole, ShrinePerk, ShrineSnapshot};
