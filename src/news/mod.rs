//! News: the official announcement feed
//!
//! A structured JSON API (`{appnews: {newsitems: [...]}}`) with Unix-second
//! timestamps and HTML-laden text fields. Parsing validates the container
//! shape; text fields pass through the sanitizer before reaching the model.

pub mod api;
pub mod sanitize;

pub use api::{fetch_news, parse_news};
pub use sanitize::strip_html;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single article record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: String,
    pub title: String,
    pub url: String,
    pub author: String,

    /// Article body, HTML stripped
    pub contents: String,

    pub feed_label: String,
    pub date: DateTime<Utc>,
}

/// One fetch result for the news feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsSnapshot {
    pub items: Vec<NewsItem>,
    pub fetched_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
