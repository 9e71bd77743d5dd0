//! Raw coupon normalization
//!
//! Pure mapping from [`RawCoupon`] into the canonical [`PromoCode`] record.
//! The same raw input always yields the same normalized output; timestamps
//! are attached by the caller, not here.

use crate::codes::extract::RawCoupon;
use crate::codes::{PromoCode, PromoCodeType};
use std::collections::HashSet;

/// Derives the stable identifier for a code string
///
/// Lowercases the code and replaces every character outside `[a-z0-9]` with
/// an underscore, prefixed with a constant tag. Re-fetching the same code
/// always yields the same id.
pub fn code_id(code: &str) -> String {
    let mut id = String::with_capacity(code.len() + 5);
    id.push_str("code_");
    for c in code.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            id.push(c);
        } else {
            id.push('_');
        }
    }
    id
}

/// Maps a free-text type string onto the closed enum
///
/// Case-insensitive; anything unrecognized becomes [`PromoCodeType::Unknown`].
pub fn map_code_type(raw: Option<&str>) -> PromoCodeType {
    match raw.map(|s| s.to_lowercase()).as_deref() {
        Some("badge") => PromoCodeType::Badge,
        Some("charm") => PromoCodeType::Charm,
        Some("cosmetic") => PromoCodeType::Cosmetic,
        Some("shards") => PromoCodeType::Shards,
        _ => PromoCodeType::Unknown,
    }
}

/// Normalizes a single raw coupon into a canonical record
pub fn normalize_coupon(raw: RawCoupon) -> PromoCode {
    let is_expired = matches!(raw.days_left, Some(days) if days <= 0);
    let title = if raw.title.is_empty() {
        raw.code.clone()
    } else {
        raw.title
    };

    PromoCode {
        id: code_id(&raw.code),
        title,
        description: raw.desc,
        expires_at: raw.expires.filter(|s| !s.is_empty()),
        days_left: raw.days_left,
        kind: map_code_type(raw.kind.as_deref()),
        is_expired,
        code: raw.code,
    }
}

/// Normalizes a batch, deduplicating by code (first occurrence wins)
///
/// Guarantees the snapshot invariant: ids are unique within one result.
pub fn normalize_coupons(raw: Vec<RawCoupon>) -> Vec<PromoCode> {
    let mut seen = HashSet::new();
    raw.into_iter()
        .filter(|coupon| seen.insert(coupon.code.clone()))
        .map(normalize_coupon)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(code: &str) -> RawCoupon {
        RawCoupon {
            title: "Title".to_string(),
            code: code.to_string(),
            desc: String::new(),
            expires: None,
            days_left: None,
            uses_today: None,
            kind: None,
        }
    }

    #[test]
    fn test_id_is_deterministic() {
        assert_eq!(code_id("SAVE10"), code_id("SAVE10"));
        assert_eq!(code_id("SAVE10"), "code_save10");
    }

    #[test]
    fn test_id_normalizes_case_and_punctuation() {
        // Case and punctuation collapse into the same id space.
        assert_eq!(code_id("SAVE-10"), "code_save_10");
        assert_eq!(code_id("save_10"), "code_save_10");
        assert_ne!(code_id("SAVE10"), code_id("SAVE-20"));
    }

    #[test]
    fn test_expiry_derivation() {
        let mut coupon = raw("ABC123");
        coupon.days_left = Some(0);
        assert!(normalize_coupon(coupon).is_expired);

        let mut coupon = raw("ABC123");
        coupon.days_left = Some(1);
        assert!(!normalize_coupon(coupon).is_expired);

        let mut coupon = raw("ABC123");
        coupon.days_left = Some(-3);
        assert!(normalize_coupon(coupon).is_expired);

        let coupon = raw("ABC123");
        assert!(!normalize_coupon(coupon).is_expired);
    }

    #[test]
    fn test_type_mapping_case_insensitive() {
        assert_eq!(map_code_type(Some("Shards")), PromoCodeType::Shards);
        assert_eq!(map_code_type(Some("BADGE")), PromoCodeType::Badge);
        assert_eq!(map_code_type(Some("charm")), PromoCodeType::Charm);
        assert_eq!(map_code_type(Some("cosmetic")), PromoCodeType::Cosmetic);
        assert_eq!(map_code_type(Some("mystery")), PromoCodeType::Unknown);
        assert_eq!(map_code_type(None), PromoCodeType::Unknown);
    }

    #[test]
    fn test_empty_title_falls_back_to_code() {
        let mut coupon = raw("ABC123");
        coupon.title = String::new();
        assert_eq!(normalize_coupon(coupon).title, "ABC123");
    }

    #[test]
    fn test_normalize_is_idempotent_per_input() {
        let a = normalize_coupon(raw("TWICE1"));
        let b = normalize_coupon(raw("TWICE1"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_batch_dedups_by_code() {
        let mut first = raw("ABC123");
        first.title = "First".to_string();
        let mut second = raw("ABC123");
        second.title = "Second".to_string();

        let codes = normalize_coupons(vec![first, second, raw("OTHER9")]);
        assert_eq!(codes.len(), 2);
        assert_eq!(codes[0].title, "First");

        // Ids stay unique within the batch.
        let ids: std::collections::HashSet<_> = codes.iter().map(|c| c.id.clone()).collect();
        assert_eq!(ids.len(), codes.len());
    }

    #[test]
    fn test_empty_expires_dropped() {
        let mut coupon = raw("ABC123");
        coupon.expires = Some(String::new());
        assert_eq!(normalize_coupon(coupon).expires_at, None);
    }
}
