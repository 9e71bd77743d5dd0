//! Refresh orchestration
//!
//! The [`Refresher`] owns the HTTP client, the cache handle, and the
//! notification toggles, and runs the full fetch, extract, normalize, diff,
//! cache cycle. The three upstream fetches run concurrently and are isolated
//! from each other: one source failing falls back to its cached snapshot
//! without tainting the others.
//!
//! No failure in this pipeline is fatal. A fetch error degrades to "stale or
//! empty data with an error string attached"; cache problems degrade to
//! misses. Availability wins over freshness.

mod notify;

pub use notify::{
    codes_notification, news_notification, shrine_notification, Notification, Notifier,
    TracingNotifier,
};

use crate::cache::{read_snapshot, write_snapshot, CacheStore, Slot};
use crate::client::build_http_client;
use crate::codes::{fetch_promo_codes, CodesSnapshot, PromoCode};
use crate::config::Config;
use crate::diff;
use crate::news::{fetch_news, NewsItem, NewsSnapshot};
use crate::shrine::{fetch_shrine, ShrineSnapshot};
use crate::{FogError, Result};
use reqwest::Client;

/// The result of one refresh cycle
#[derive(Debug)]
pub struct RefreshOutcome {
    /// Codes snapshot: fresh, cached fallback, or empty-with-error
    pub codes: CodesSnapshot,

    /// Shrine snapshot; `None` when the fetch failed and no cache exists
    pub shrine: Option<ShrineSnapshot>,

    /// News snapshot; `None` when the fetch failed and no cache exists
    pub news: Option<NewsSnapshot>,

    /// Codes absent from the previous snapshot
    pub new_codes: Vec<PromoCode>,

    /// News items absent from the previous snapshot
    pub new_news: Vec<NewsItem>,

    /// Whether the shrine rotation changed since the previous snapshot
    pub shrine_changed: bool,
}

/// Owns the pipeline: client, cache, settings
pub struct Refresher<S: CacheStore> {
    client: Client,
    config: Config,
    store: S,
}

impl<S: CacheStore> Refresher<S> {
    /// Builds a refresher from a validated config and an opened cache store
    pub fn new(config: Config, store: S) -> Result<Self> {
        let client = build_http_client(&config.client)?;
        Ok(Refresher {
            client,
            config,
            store,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Runs one full refresh cycle
    ///
    /// With `fresh` set, cached snapshots are ignored for this run: fallback
    /// has nothing to fall back to, and the diff treats every source as a
    /// first fetch (nothing reported new).
    pub async fn refresh_all(&mut self, fresh: bool, notifier: &dyn Notifier) -> RefreshOutcome {
        // Keep the persisted toggles in sync with the config for companion
        // readers of the cache.
        write_snapshot(&mut self.store, Slot::Settings, &self.config.notifications);

        let prev_codes = self.cached_codes(fresh);
        let prev_shrine = self.cached_shrine(fresh);
        let prev_news = self.cached_news(fresh);

        // Best-effort join: all three complete, each outcome inspected on
        // its own.
        let (codes_result, shrine_result, news_result) = tokio::join!(
            fetch_promo_codes(&self.client, &self.config.sources.codes_url),
            fetch_shrine(&self.client, &self.config.sources.shrine_url),
            fetch_news(&self.client, &self.config.sources.news_url),
        );

        let (codes, new_codes) = self.settle_codes(codes_result, prev_codes);
        let (shrine, shrine_changed) = self.settle_shrine(shrine_result, prev_shrine);
        let (news, new_news) = self.settle_news(news_result, prev_news);

        if self.config.notifications.codes {
            if let Some(notification) = codes_notification(&new_codes) {
                notifier.notify(&notification);
            }
        }
        if self.config.notifications.shrine && shrine_changed {
            if let Some(shrine) = &shrine {
                notifier.notify(&shrine_notification(shrine));
            }
        }
        if self.config.notifications.news {
            if let Some(notification) = news_notification(&new_news) {
                notifier.notify(&notification);
            }
        }

        RefreshOutcome {
            codes,
            shrine,
            news,
            new_codes,
            new_news,
            shrine_changed,
        }
    }

    /// Fetches only the codes source, with the same cache fallback policy
    pub async fn refresh_codes(&mut self, fresh: bool) -> (CodesSnapshot, Vec<PromoCode>) {
        let prev = self.cached_codes(fresh);
        let result = fetch_promo_codes(&self.client, &self.config.sources.codes_url).await;
        self.settle_codes(result, prev)
    }

    /// Fetches only the shrine source
    pub async fn refresh_shrine(&mut self, fresh: bool) -> (Option<ShrineSnapshot>, bool) {
        let prev = self.cached_shrine(fresh);
        let result = fetch_shrine(&self.client, &self.config.sources.shrine_url).await;
        self.settle_shrine(result, prev)
    }

    /// Fetches only the news source
    pub async fn refresh_news(&mut self, fresh: bool) -> (Option<NewsSnapshot>, Vec<NewsItem>) {
        let prev = self.cached_news(fresh);
        let result = fetch_news(&self.client, &self.config.sources.news_url).await;
        self.settle_news(result, prev)
    }

    fn cached_codes(&self, fresh: bool) -> Option<CodesSnapshot> {
        if fresh {
            None
        } else {
            read_snapshot(&self.store, Slot::Codes)
        }
    }

    fn cached_shrine(&self, fresh: bool) -> Option<ShrineSnapshot> {
        if fresh {
            None
        } else {
            read_snapshot(&self.store, Slot::Shrine)
        }
    }

    fn cached_news(&self, fresh: bool) -> Option<NewsSnapshot> {
        if fresh {
            None
        } else {
            read_snapshot(&self.store, Slot::News)
        }
    }

    fn settle_codes(
        &mut self,
        result: std::result::Result<CodesSnapshot, FogError>,
        prev: Option<CodesSnapshot>,
    ) -> (CodesSnapshot, Vec<PromoCode>) {
        match result {
            Ok(snapshot) => {
                let new_codes: Vec<PromoCode> = diff::new_codes(prev.as_ref(), &snapshot)
                    .into_iter()
                    .cloned()
                    .collect();
                write_snapshot(&mut self.store, Slot::Codes, &snapshot);
                (snapshot, new_codes)
            }
            Err(e) => {
                tracing::warn!(error = %e, "codes fetch failed; serving last known snapshot");
                let snapshot = match prev {
                    Some(mut cached) => {
                        cached.error = Some(e.to_string());
                        cached
                    }
                    None => CodesSnapshot::failed(e.to_string()),
                };
                (snapshot, Vec::new())
            }
        }
    }

    fn settle_shrine(
        &mut self,
        result: std::result::Result<ShrineSnapshot, FogError>,
        prev: Option<ShrineSnapshot>,
    ) -> (Option<ShrineSnapshot>, bool) {
        match result {
            Ok(snapshot) => {
                let changed = diff::shrine_changed(prev.as_ref(), &snapshot);
                write_snapshot(&mut self.store, Slot::Shrine, &snapshot);
                (Some(snapshot), changed)
            }
            Err(e) => {
                tracing::warn!(error = %e, "shrine fetch failed; serving last known snapshot");
                (prev, false)
            }
        }
    }

    fn settle_news(
        &mut self,
        result: std::result::Result<NewsSnapshot, FogError>,
        prev: Option<NewsSnapshot>,
    ) -> (Option<NewsSnapshot>, Vec<NewsItem>) {
        match result {
            Ok(snapshot) => {
                let new_items: Vec<NewsItem> = diff::new_news(prev.as_ref(), &snapshot)
                    .into_iter()
                    .cloned()
                    .collect();
                write_snapshot(&mut self.store, Slot::News, &snapshot);
                (Some(snapshot), new_items)
            }
            Err(e) => {
                tracing::warn!(error = %e, "news fetch failed; serving last known snapshot");
                let snapshot = prev.map(|mut cached| {
                    cached.error = Some(e.to_string());
                    cached
                });
                (snapshot, Vec::new())
            }
        }
    }
}
