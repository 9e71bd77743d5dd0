//! News API parsing

use crate::client::fetch_json;
use crate::news::sanitize::strip_html;
use crate::news::{NewsItem, NewsSnapshot};
use crate::FogError;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct NewsResponse {
    appnews: AppNews,
}

#[derive(Debug, Deserialize)]
struct AppNews {
    newsitems: Vec<RawNewsItem>,
}

#[derive(Debug, Deserialize)]
struct RawNewsItem {
    gid: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    author: String,
    #[serde(default)]
    contents: String,
    #[serde(default)]
    feedlabel: String,
    date: i64,
}

/// Fetches the news feed and produces a normalized snapshot
pub async fn fetch_news(client: &Client, url: &str) -> Result<NewsSnapshot, FogError> {
    let body: Value = fetch_json(client, url).await?;
    let snapshot = parse_news(body, url)?;

    tracing::info!(count = snapshot.items.len(), "fetched news items");

    Ok(snapshot)
}

/// Parses a news API response body
///
/// A missing `appnews` or `newsitems` container is [`FogError::InvalidShape`].
pub fn parse_news(body: Value, url: &str) -> Result<NewsSnapshot, FogError> {
    let response: NewsResponse =
        serde_json::from_value(body).map_err(|e| FogError::InvalidShape {
            url: url.to_string(),
            message: e.to_string(),
        })?;

    let items = response
        .appnews
        .newsitems
        .into_iter()
        .map(normalize_item)
        .collect();

    Ok(NewsSnapshot {
        items,
        fetched_at: Utc::now(),
        error: None,
    })
}

fn normalize_item(raw: RawNewsItem) -> NewsItem {
    NewsItem {
        id: raw.gid,
        title: strip_html(&raw.title),
        url: raw.url,
        author: raw.author,
        contents: strip_html(&raw.contents),
        feed_label: raw.feedlabel,
        date: DateTime::from_timestamp(raw.date, 0).unwrap_or_else(Utc::now),
    }
}
