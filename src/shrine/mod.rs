//! Shrine: the weekly rotating in-game shop
//!
//! The shrine API has shipped two shapes over time: a wrapper object with
//! fully-described perks (names, images, characters) and a flatter object
//! carrying only perk identifiers. [`api`] detects and parses either;
//! [`perks`] resolves identifier-only perks through a static lookup table
//! plus best-effort heuristics.

pub mod api;
pub mod perks;

pub use api::{fetch_shrine, parse_shrine};
pub use perks::{display_name, guess_role, perk_wiki_url, resolve_perk};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which side of the trial a perk belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerkRole {
    Survivor,
    Killer,
}

/// Community usage tier reported by the upstream API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UsageTier {
    High,
    Low,
}

/// One of the rotating shop entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShrinePerk {
    /// Upstream perk identifier, canonicalized to a string
    pub id: String,

    pub name: String,
    pub bloodpoints: i64,
    pub shards: i64,

    pub image: Option<String>,
    pub character: Option<String>,
    pub role: PerkRole,
    pub usage_tier: Option<UsageTier>,
}

/// One weekly shrine rotation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShrineSnapshot {
    /// Rotation identifier: the week number when upstream supplies one,
    /// otherwise the upstream rotation id
    pub id: String,

    pub week: Option<i64>,
    pub perks: Vec<ShrinePerk>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub fetched_at: DateTime<Utc>,
}
