//! Text sanitization for news fields
//!
//! Upstream titles and bodies carry markup and entity-encoded characters.
//! The entity set handled here is fixed; anything outside it passes through
//! untouched.

use once_cell::sync::Lazy;
use regex::Regex;

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("tag pattern"));

/// Entities the upstream feed is known to emit
const ENTITIES: &[(&str, &str)] = &[
    ("&nbsp;", " "),
    ("&amp;", "&"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
];

/// Strips HTML tags and decodes the fixed entity set
pub fn strip_html(raw: &str) -> String {
    let mut text = TAG.replace_all(raw, "").into_owned();
    for (entity, replacement) in ENTITIES {
        text = text.replace(entity, replacement);
    }
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_tags_and_entities() {
        assert_eq!(
            strip_html("Hello &amp; welcome <b>friend</b>"),
            "Hello & welcome friend"
        );
    }

    #[test]
    fn test_decodes_full_entity_set() {
        assert_eq!(
            strip_html("&lt;a&gt;&nbsp;&quot;it&#39;s&quot;"),
            "<a> \"it's\""
        );
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(strip_html("  <p>body</p>  "), "body");
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(strip_html("plain text"), "plain text");
    }

    #[test]
    fn test_unknown_entities_pass_through() {
        assert_eq!(strip_html("&copy; 2025"), "&copy; 2025");
    }
}
