//! Snapshot differ
//!
//! Compares the previous snapshot of an entity type against a new one to
//! compute what is "new since last fetch". The results drive notification
//! dispatch; this module itself neither notifies nor touches storage.
//!
//! A missing previous snapshot means a first-ever fetch: codes and news
//! report nothing new (initial is not "new"), while the shrine reports
//! changed (any rotation is news when none was known).

use crate::codes::{CodesSnapshot, PromoCode};
use crate::news::{NewsItem, NewsSnapshot};
use crate::shrine::ShrineSnapshot;
use std::collections::HashSet;

/// Codes present in `current` whose id was absent from `previous`
pub fn new_codes<'a>(
    previous: Option<&CodesSnapshot>,
    current: &'a CodesSnapshot,
) -> Vec<&'a PromoCode> {
    let Some(previous) = previous else {
        return Vec::new();
    };

    let known: HashSet<&str> = previous.codes.iter().map(|c| c.id.as_str()).collect();
    current
        .codes
        .iter()
        .filter(|code| !known.contains(code.id.as_str()))
        .collect()
}

/// News items present in `current` whose id was absent from `previous`
pub fn new_news<'a>(
    previous: Option<&NewsSnapshot>,
    current: &'a NewsSnapshot,
) -> Vec<&'a NewsItem> {
    let Some(previous) = previous else {
        return Vec::new();
    };

    let known: HashSet<&str> = previous.items.iter().map(|i| i.id.as_str()).collect();
    current
        .items
        .iter()
        .filter(|item| !known.contains(item.id.as_str()))
        .collect()
}

/// Whether the shrine rotation differs from the previous snapshot
///
/// The rotation id is the primary signal; when ids match, the perk-id sets
/// are compared (any mismatch in count or membership counts as changed).
pub fn shrine_changed(previous: Option<&ShrineSnapshot>, current: &ShrineSnapshot) -> bool {
    let Some(previous) = previous else {
        return true;
    };

    if previous.id != current.id {
        return true;
    }

    if previous.perks.len() != current.perks.len() {
        return true;
    }

    let known: HashSet<&str> = previous.perks.iter().map(|p| p.id.as_str()).collect();
    current.perks.iter().any(|perk| !known.contains(perk.id.as_str()))
}
