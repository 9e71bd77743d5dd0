//! Promo codes: scraping, extraction, and normalization
//!
//! The coupons source is an HTML marketing page, not an API. The interesting
//! data sits in an inline script as a loose JavaScript array literal, so
//! fetching a snapshot means scraping the page and running the degrading
//! extraction chain in [`extract`].

pub mod extract;
pub mod literal;
pub mod normalize;

pub use extract::{extract_raw_coupons, ExtractStrategy, RawCoupon};
pub use normalize::{code_id, map_code_type, normalize_coupons};

use crate::client::fetch_text;
use crate::FogError;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// A single redeemable promo code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoCode {
    /// Stable identifier derived from the code string
    pub id: String,

    /// The redeemable string, as scraped (case preserved)
    pub code: String,

    pub title: String,
    pub description: String,

    /// Free-text expiration date as supplied upstream, unvalidated
    pub expires_at: Option<String>,

    pub days_left: Option<i64>,

    #[serde(rename = "type")]
    pub kind: PromoCodeType,

    /// True when `days_left` is present and <= 0
    pub is_expired: bool,
}

/// Closed set of reward types a code can grant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromoCodeType {
    Badge,
    Charm,
    Cosmetic,
    Shards,
    Unknown,
}

/// One fetch result: the full code list plus bookkeeping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodesSnapshot {
    pub codes: Vec<PromoCode>,
    pub fetched_at: DateTime<Utc>,

    /// Set when the snapshot is a fallback after a failed fetch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CodesSnapshot {
    /// An empty snapshot carrying an error string, for when the fetch failed
    /// and no cached data exists.
    pub fn failed(error: String) -> Self {
        CodesSnapshot {
            codes: Vec::new(),
            fetched_at: Utc::now(),
            error: Some(error),
        }
    }
}

/// Fetches the coupons page and produces a normalized snapshot
///
/// Extraction itself never fails; a page where every strategy misses yields
/// an empty code list. Only the HTTP fetch can error here.
pub async fn fetch_promo_codes(client: &Client, url: &str) -> Result<CodesSnapshot, FogError> {
    let html = fetch_text(client, url).await?;
    let raw = extract_raw_coupons(&html);
    let codes = normalize_coupons(raw);

    tracing::info!(count = codes.len(), "fetched promo codes");

    Ok(CodesSnapshot {
        codes,
        fetched_at: Utc::now(),
        error: None,
    })
}
