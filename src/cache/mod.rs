//! Local snapshot cache
//!
//! Three snapshot slots (codes, shrine, news) plus a settings slot and a
//! seen-codes slot, backed by SQLite behind the [`CacheStore`] trait. The
//! typed helpers here implement the advisory-cache policy: a read failure or
//! corrupt payload is logged and treated as a miss, a write failure is logged
//! and swallowed. Nothing in this module surfaces a user-visible error.

mod sqlite;
mod traits;

pub use sqlite::SqliteCache;
pub use traits::{CacheError, CacheResult, CacheStore, Slot};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashSet;

/// Reads and deserializes a slot, treating every failure as a miss
pub fn read_snapshot<T, S>(store: &S, slot: Slot) -> Option<T>
where
    T: DeserializeOwned,
    S: CacheStore + ?Sized,
{
    let payload = match store.read_slot(slot) {
        Ok(Some(payload)) => payload,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(slot = slot.key(), error = %e, "cache read failed; treating as miss");
            return None;
        }
    };

    match serde_json::from_str(&payload) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(slot = slot.key(), error = %e, "corrupt cache payload; treating as miss");
            None
        }
    }
}

/// Serializes and writes a slot, logging failures instead of propagating
pub fn write_snapshot<T, S>(store: &mut S, slot: Slot, value: &T)
where
    T: Serialize,
    S: CacheStore + ?Sized,
{
    let payload = match serde_json::to_string(value) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(slot = slot.key(), error = %e, "failed to serialize cache payload");
            return;
        }
    };

    if let Err(e) = store.write_slot(slot, &payload) {
        tracing::warn!(slot = slot.key(), error = %e, "cache write failed");
    }
}

/// Loads the set of code ids the user has already acknowledged
pub fn load_seen_codes<S: CacheStore + ?Sized>(store: &S) -> HashSet<String> {
    read_snapshot::<Vec<String>, _>(store, Slot::SeenCodes)
        .map(|ids| ids.into_iter().collect())
        .unwrap_or_default()
}

/// Marks code ids as seen, merging with the existing set
pub fn mark_codes_seen<S, I>(store: &mut S, ids: I)
where
    S: CacheStore + ?Sized,
    I: IntoIterator<Item = String>,
{
    let mut seen = load_seen_codes(store);
    let before = seen.len();
    seen.extend(ids);

    if seen.len() != before {
        let mut sorted: Vec<String> = seen.into_iter().collect();
        sorted.sort();
        write_snapshot(store, Slot::SeenCodes, &sorted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::CodesSnapshot;
    use chrono::Utc;

    #[test]
    fn test_typed_roundtrip() {
        let mut cache = SqliteCache::in_memory().unwrap();
        let snapshot = CodesSnapshot {
            codes: Vec::new(),
            fetched_at: Utc::now(),
            error: None,
        };

        write_snapshot(&mut cache, Slot::Codes, &snapshot);
        let back: CodesSnapshot = read_snapshot(&cache, Slot::Codes).unwrap();
        assert!(back.codes.is_empty());
    }

    #[test]
    fn test_corrupt_payload_is_a_miss() {
        let mut cache = SqliteCache::in_memory().unwrap();
        cache.write_slot(Slot::Codes, "{not json").unwrap();

        let result: Option<CodesSnapshot> = read_snapshot(&cache, Slot::Codes);
        assert!(result.is_none());
    }

    #[test]
    fn test_seen_codes_merge() {
        let mut cache = SqliteCache::in_memory().unwrap();

        mark_codes_seen(&mut cache, vec!["code_a".to_string(), "code_b".to_string()]);
        mark_codes_seen(&mut cache, vec!["code_b".to_string(), "code_c".to_string()]);

        let seen = load_seen_codes(&cache);
        assert_eq!(seen.len(), 3);
        assert!(seen.contains("code_a"));
        assert!(seen.contains("code_c"));
    }

    #[test]
    fn test_seen_codes_empty_by_default() {
        let cache = SqliteCache::in_memory().unwrap();
        assert!(load_seen_codes(&cache).is_empty());
    }
}
