//! Promo-code extraction strategies
//!
//! The coupons page carries no API contract, so extraction runs an ordered
//! list of degrading strategies sharing one interface. Each strategy either
//! yields a non-empty batch of raw records or reports a miss; the first hit
//! wins. Exhausting every strategy produces an empty list, never an error:
//! "no codes right now" and "markup changed again" both degrade to an empty
//! snapshot instead of a failed one.
//!
//! 1. [`ArrayLiteralStrategy`] - parse the embedded JS array after rewriting
//!    it into strict JSON (full fidelity)
//! 2. [`FragmentStrategy`] - field-anchored scan of object-shaped fragments
//!    (full fidelity when the fragments are intact)
//! 3. [`BareCodeStrategy`] - bare `code: "VALUE"` scan producing minimal
//!    records (codes only, no metadata)

use crate::codes::literal::{find_array_literal, loose_js_to_json};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;

/// A coupon record as it appears upstream, before normalization
#[derive(Debug, Clone, Deserialize)]
pub struct RawCoupon {
    #[serde(default)]
    pub title: String,

    pub code: String,

    #[serde(default)]
    pub desc: String,

    #[serde(default)]
    pub expires: Option<String>,

    #[serde(rename = "daysLeft", default)]
    pub days_left: Option<i64>,

    #[serde(rename = "usesToday", default)]
    pub uses_today: Option<i64>,

    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// One extraction attempt against the raw page text
///
/// `attempt` returns `None` both when the strategy does not apply (pattern
/// not found) and when it applies but fails (e.g. the rewritten literal still
/// does not parse). The distinction does not matter to the caller; either way
/// the next strategy runs.
pub trait ExtractStrategy {
    /// Short name used in log output
    fn name(&self) -> &'static str;

    /// Attempts to extract raw coupon records from the page text
    fn attempt(&self, raw: &str) -> Option<Vec<RawCoupon>>;
}

/// Runs the strategy chain in order and returns the first non-empty batch
///
/// Records come back in document order. Returns an empty vector when every
/// strategy misses.
pub fn extract_raw_coupons(raw: &str) -> Vec<RawCoupon> {
    let strategies: [&dyn ExtractStrategy; 3] =
        [&ArrayLiteralStrategy, &FragmentStrategy, &BareCodeStrategy];

    for strategy in strategies {
        match strategy.attempt(raw) {
            Some(coupons) if !coupons.is_empty() => {
                tracing::debug!(
                    strategy = strategy.name(),
                    count = coupons.len(),
                    "extraction strategy matched"
                );
                return coupons;
            }
            _ => {
                tracing::debug!(strategy = strategy.name(), "extraction strategy missed");
            }
        }
    }

    tracing::warn!("all extraction strategies missed; returning empty code list");
    Vec::new()
}

/// Primary strategy: parse the embedded array literal as JSON
pub struct ArrayLiteralStrategy;

impl ExtractStrategy for ArrayLiteralStrategy {
    fn name(&self) -> &'static str {
        "array-literal"
    }

    fn attempt(&self, raw: &str) -> Option<Vec<RawCoupon>> {
        let literal = find_array_literal(raw)?;
        let json = loose_js_to_json(literal);

        // Parse entries individually so one malformed element does not sink
        // the whole batch.
        let values: Vec<serde_json::Value> = match serde_json::from_str(&json) {
            Ok(values) => values,
            Err(e) => {
                tracing::debug!(error = %e, "rewritten literal failed to parse as JSON");
                return None;
            }
        };

        let coupons: Vec<RawCoupon> = values
            .into_iter()
            .filter_map(|value| serde_json::from_value(value).ok())
            .collect();

        Some(coupons)
    }
}

static FRAGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{[^{}]*\}").expect("fragment pattern"));
static FIELD_TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""?title"?\s*:\s*"([^"]+)""#).expect("title pattern"));
static FIELD_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""?code"?\s*:\s*"([^"]+)""#).expect("code pattern"));
static FIELD_DESC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""?desc"?\s*:\s*"([^"]*)""#).expect("desc pattern"));
static FIELD_EXPIRES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""?expires"?\s*:\s*"([^"]*)""#).expect("expires pattern"));
static FIELD_DAYS_LEFT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""?daysLeft"?\s*:\s*(-?\d+)"#).expect("daysLeft pattern"));
static FIELD_TYPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""?type"?\s*:\s*"([^"]*)""#).expect("type pattern"));

/// Fallback strategy: scan object-shaped fragments for anchored fields
///
/// A fragment qualifies when it carries `title`, `code`, and `desc`; the
/// optional fields are picked up when present. Duplicate `code` values are
/// skipped, first occurrence in document order wins.
pub struct FragmentStrategy;

impl ExtractStrategy for FragmentStrategy {
    fn name(&self) -> &'static str {
        "fragment-scan"
    }

    fn attempt(&self, raw: &str) -> Option<Vec<RawCoupon>> {
        let mut coupons = Vec::new();
        let mut seen = HashSet::new();

        for fragment in FRAGMENT.find_iter(raw) {
            let text = fragment.as_str();

            let title = match capture(&FIELD_TITLE, text) {
                Some(title) => title,
                None => continue,
            };
            let code = match capture(&FIELD_CODE, text) {
                Some(code) => code,
                None => continue,
            };
            let desc = match capture(&FIELD_DESC, text) {
                Some(desc) => desc,
                None => continue,
            };

            if !seen.insert(code.clone()) {
                continue;
            }

            let days_left = FIELD_DAYS_LEFT
                .captures(text)
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse::<i64>().ok());

            coupons.push(RawCoupon {
                title,
                code,
                desc,
                expires: capture(&FIELD_EXPIRES, text).filter(|s| !s.is_empty()),
                days_left,
                uses_today: None,
                kind: capture(&FIELD_TYPE, text).filter(|s| !s.is_empty()),
            });
        }

        if coupons.is_empty() {
            None
        } else {
            Some(coupons)
        }
    }
}

/// Bare code values: uppercase alphanumeric, at least 6 characters
static BARE_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i:code)\s*:\s*"([A-Z0-9]{6,})""#).expect("bare code pattern"));

/// Last-resort strategy: collect bare `code: "VALUE"` occurrences
///
/// Builds minimal records: the code doubles as the title, the description is
/// a generic placeholder, and no expiration data is attached.
pub struct BareCodeStrategy;

impl ExtractStrategy for BareCodeStrategy {
    fn name(&self) -> &'static str {
        "bare-code"
    }

    fn attempt(&self, raw: &str) -> Option<Vec<RawCoupon>> {
        let mut coupons = Vec::new();
        let mut seen = HashSet::new();

        for caps in BARE_CODE.captures_iter(raw) {
            let code = caps[1].to_string();
            if !seen.insert(code.clone()) {
                continue;
            }

            coupons.push(RawCoupon {
                title: code.clone(),
                code,
                desc: "Promo Code".to_string(),
                expires: None,
                days_left: None,
                uses_today: None,
                kind: None,
            });
        }

        if coupons.is_empty() {
            None
        } else {
            Some(coupons)
        }
    }
}

/// Pulls the first capture group of `pattern` out of `text`
fn capture(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
