//! Perk metadata resolution
//!
//! The flat API variant names perks only by identifier ("Hex_Ruin",
//! "spineChill"). Known identifiers resolve through a static table; unknown
//! ones get a derived display name and a keyword-based role guess. The guess
//! is explicitly best-effort and may misclassify new perks.

use crate::shrine::PerkRole;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Identifiers containing these fragments are assumed to be killer perks
const KILLER_KEYWORDS: &[&str] = &["hex", "scourge", "devour", "undying", "ruin", "noed"];

/// Known perk identifiers mapped to (display name, character, role)
///
/// Keyed by [`canonical_key`] so "Hex_Ruin", "hexRuin", and "hex ruin" all
/// resolve to the same entry. Characters are omitted for general perks.
static KNOWN_PERKS: Lazy<HashMap<&'static str, (&'static str, Option<&'static str>, PerkRole)>> =
    Lazy::new(|| {
        use PerkRole::{Killer, Survivor};

        let mut map: HashMap<&'static str, (&'static str, Option<&'static str>, PerkRole)> =
            HashMap::new();

        // Survivor perks
        map.insert("deadhard", ("Dead Hard", Some("David King"), Survivor));
        map.insert(
            "decisivestrike",
            ("Decisive Strike", Some("Laurie Strode"), Survivor),
        );
        map.insert("sprintburst", ("Sprint Burst", Some("Meg Thomas"), Survivor));
        map.insert("adrenaline", ("Adrenaline", Some("Meg Thomas"), Survivor));
        map.insert(
            "selfcare",
            ("Self-Care", Some("Claudette Morel"), Survivor),
        );
        map.insert(
            "borrowedtime",
            ("Borrowed Time", Some("Bill Overbeck"), Survivor),
        );
        map.insert(
            "unbreakable",
            ("Unbreakable", Some("Bill Overbeck"), Survivor),
        );
        map.insert("ironwill", ("Iron Will", Some("Jake Park"), Survivor));
        map.insert(
            "balancedlanding",
            ("Balanced Landing", Some("Nea Karlsson"), Survivor),
        );
        map.insert("spinechill", ("Spine Chill", None, Survivor));
        map.insert("kindred", ("Kindred", None, Survivor));
        map.insert("wellmakeit", ("We'll Make It", None, Survivor));

        // Killer perks
        map.insert("hexruin", ("Hex: Ruin", Some("The Hag"), Killer));
        map.insert(
            "hexdevourhope",
            ("Hex: Devour Hope", Some("The Hag"), Killer),
        );
        map.insert("devourhope", ("Hex: Devour Hope", Some("The Hag"), Killer));
        map.insert("hexundying", ("Hex: Undying", Some("The Blight"), Killer));
        map.insert(
            "hexnooneescapesdeath",
            ("Hex: No One Escapes Death", None, Killer),
        );
        map.insert("noed", ("Hex: No One Escapes Death", None, Killer));
        map.insert(
            "barbecueandchilli",
            ("Barbecue & Chilli", Some("The Cannibal"), Killer),
        );
        map.insert(
            "popgoestheweasel",
            ("Pop Goes the Weasel", Some("The Clown"), Killer),
        );
        map.insert(
            "scourgehookpainresonance",
            ("Scourge Hook: Pain Resonance", Some("The Artist"), Killer),
        );
        map.insert(
            "corruptintervention",
            ("Corrupt Intervention", Some("The Plague"), Killer),
        );
        map.insert(
            "savethebestforlast",
            ("Save the Best for Last", Some("The Shape"), Killer),
        );
        map.insert("bamboozle", ("Bamboozle", Some("The Clown"), Killer));
        map.insert("tinkerer", ("Tinkerer", Some("The Hillbilly"), Killer));
        map.insert("whispers", ("Whispers", None, Killer));

        map
    });

/// A perk identifier resolved to display metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPerk {
    pub name: String,
    pub character: Option<String>,
    pub role: PerkRole,
}

/// Resolves an upstream perk identifier to display metadata
///
/// Known identifiers come from the static table; unknown ones fall back to a
/// derived readable name and the keyword role heuristic.
pub fn resolve_perk(identifier: &str) -> ResolvedPerk {
    if let Some((name, character, role)) = KNOWN_PERKS.get(canonical_key(identifier).as_str()) {
        return ResolvedPerk {
            name: (*name).to_string(),
            character: character.map(str::to_string),
            role: *role,
        };
    }

    ResolvedPerk {
        name: display_name(identifier),
        character: None,
        role: guess_role(identifier),
    }
}

/// Collapses an identifier to lowercase alphanumerics for table lookup
fn canonical_key(identifier: &str) -> String {
    identifier
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}

/// Derives a readable display name from an identifier
///
/// Splits on underscores, hyphens, and lowercase-to-uppercase boundaries,
/// then title-cases each word: "scourge_hook" becomes "Scourge Hook",
/// "devourHope" becomes "Devour Hope".
pub fn display_name(identifier: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for c in identifier.chars() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        } else if c.is_uppercase()
            && current
                .chars()
                .last()
                .map_or(false, |prev| prev.is_lowercase())
        {
            words.push(std::mem::take(&mut current));
            current.push(c);
        } else {
            current.push(c);
        }
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
        .iter()
        .map(|word| title_case(word))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Uppercases the first character and lowercases the rest
fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
        None => String::new(),
    }
}

/// Guesses killer vs survivor from identifier keywords
///
/// Best-effort only; defaults to survivor.
pub fn guess_role(identifier: &str) -> PerkRole {
    let lower = identifier.to_lowercase();
    if KILLER_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        PerkRole::Killer
    } else {
        PerkRole::Survivor
    }
}

const WIKI_BASE: &str = "https://deadbydaylight.wiki.gg/wiki/";

/// Builds the wiki URL for a perk display name
///
/// Spaces become underscores and the result is percent-encoded.
pub fn perk_wiki_url(name: &str) -> String {
    let formatted = name.replace(' ', "_");
    format!("{}{}", WIKI_BASE, encode_component(&formatted))
}

/// Percent-encodes everything outside the unreserved set
fn encode_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'_' | b'-' | b'.' | b'~' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}
