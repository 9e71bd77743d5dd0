//! Cache trait and error types
//!
//! The cache is a handful of opaque string-keyed slots holding serialized
//! last-known-good snapshots. It is advisory only: readers treat every
//! failure as a cache miss, and writers log failures without propagating
//! them.

use thiserror::Error;

/// Errors that can occur during cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// The fixed set of storage slots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Codes,
    Shrine,
    News,
    Settings,
    SeenCodes,
}

impl Slot {
    /// The string key backing this slot
    pub fn key(self) -> &'static str {
        match self {
            Slot::Codes => "codes_snapshot",
            Slot::Shrine => "shrine_snapshot",
            Slot::News => "news_snapshot",
            Slot::Settings => "notification_settings",
            Slot::SeenCodes => "seen_codes",
        }
    }
}

/// Trait for cache backend implementations
pub trait CacheStore {
    /// Reads the raw payload of a slot, `None` when the slot is empty
    fn read_slot(&self, slot: Slot) -> CacheResult<Option<String>>;

    /// Writes a slot, overwriting any previous payload (last-write-wins)
    fn write_slot(&mut self, slot: Slot, payload: &str) -> CacheResult<()>;

    /// Clears every slot
    fn clear(&mut self) -> CacheResult<()>;
}
