use serde::{Deserialize, Serialize};

/// Main configuration structure for Fogwatch
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub sources: SourcesConfig,
    pub client: ClientConfig,
    pub cache: CacheConfig,
    #[serde(default)]
    pub notifications: NotificationToggles,
    #[serde(default)]
    pub refresh: RefreshConfig,
}

/// Upstream endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SourcesConfig {
    /// HTML page carrying the embedded promo-code array
    #[serde(rename = "codes-url")]
    pub codes_url: String,

    /// Shrine rotation JSON API
    #[serde(rename = "shrine-url")]
    pub shrine_url: String,

    /// News JSON API
    #[serde(rename = "news-url")]
    pub news_url: String,
}

/// HTTP client identification and transport configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Name sent in the User-Agent header
    #[serde(rename = "app-name")]
    pub app_name: String,

    /// Version sent in the User-Agent header
    #[serde(rename = "app-version")]
    pub app_version: String,

    /// Overall request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Local snapshot cache configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Path to the SQLite cache database
    #[serde(rename = "database-path")]
    pub database_path: String,
}

/// Per-source notification toggles
///
/// Each toggle gates whether the refresher hands that source's diff to the
/// notifier. All default to off.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationToggles {
    #[serde(default)]
    pub codes: bool,
    #[serde(default)]
    pub shrine: bool,
    #[serde(default)]
    pub news: bool,
}

/// Watch-mode polling configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshConfig {
    /// Minutes between refreshes in watch mode
    #[serde(rename = "interval-minutes", default = "default_interval_minutes")]
    pub interval_minutes: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        RefreshConfig {
            interval_minutes: default_interval_minutes(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_interval_minutes() -> u64 {
    15
}
