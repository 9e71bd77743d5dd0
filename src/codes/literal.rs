//! Loose JavaScript array literal handling
//!
//! The upstream coupons page embeds its data as a plain JavaScript array
//! literal (`const coupons = [ ... ];`), which is not valid JSON: property
//! names are bare identifiers and trailing commas may appear before a closing
//! bracket. This module locates the literal and rewrites it into strict JSON.
//!
//! The rewrite walks the text with a small scanner that tracks string
//! boundaries, so quotes, colons, and commas *inside* string values are left
//! untouched. A blanket regex replace would corrupt values like
//! `"use before: March"`.

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches a top-level binding of an array literal: `const ident = [ ... ];`
static ARRAY_BINDING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\b(?:const|let|var)\s+[A-Za-z_$][A-Za-z0-9_$]*\s*=\s*(\[.*?\])\s*;")
        .expect("array binding pattern")
});

/// Locates the first array literal bound to an identifier in the raw text
///
/// Returns the bracketed literal including the outer `[` and `]`, or `None`
/// when no such binding exists.
pub fn find_array_literal(raw: &str) -> Option<&str> {
    ARRAY_BINDING
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Rewrites a loose JavaScript object/array literal into strict JSON
///
/// Handles the two deviations the upstream page is known to produce:
///
/// 1. Bare identifier property names (`title:` becomes `"title":`)
/// 2. Trailing commas before `]` or `}` (dropped)
///
/// Single-quoted strings are converted to double-quoted ones with the
/// necessary escaping. Anything else (e.g. embedded function calls,
/// `undefined`) passes through unchanged and will make the subsequent JSON
/// parse fail, which the caller treats as a strategy miss rather than an
/// error.
pub fn loose_js_to_json(literal: &str) -> String {
    let chars: Vec<char> = literal.chars().collect();
    let mut out = String::with_capacity(literal.len() + 16);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '"' | '\'' => {
                i = copy_string(&chars, i, &mut out);
            }
            ',' => {
                // Drop the comma when the next non-whitespace char closes a
                // container (trailing comma).
                let mut j = i + 1;
                while j < chars.len() && chars[j].is_whitespace() {
                    j += 1;
                }
                if !(j < chars.len() && (chars[j] == ']' || chars[j] == '}')) {
                    out.push(',');
                }
                i += 1;
            }
            c if c.is_ascii_alphabetic() || c == '_' || c == '$' => {
                let start = i;
                while i < chars.len()
                    && (chars[i].is_ascii_alphanumeric() || chars[i] == '_' || chars[i] == '$')
                {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();

                // A bare word directly followed by a colon is a property name.
                let mut j = i;
                while j < chars.len() && chars[j].is_whitespace() {
                    j += 1;
                }
                if j < chars.len() && chars[j] == ':' {
                    out.push('"');
                    out.push_str(&word);
                    out.push('"');
                } else {
                    out.push_str(&word);
                }
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }

    out
}

/// Copies one string literal starting at `start` into `out` as a JSON string
///
/// Returns the index of the first character after the closing quote. Escape
/// sequences are preserved; a single-quoted string has its delimiters swapped
/// and any inner double quotes escaped.
fn copy_string(chars: &[char], start: usize, out: &mut String) -> usize {
    let quote = chars[start];
    out.push('"');
    let mut i = start + 1;

    while i < chars.len() {
        let c = chars[i];
        if c == '\\' && i + 1 < chars.len() {
            let next = chars[i + 1];
            if quote == '\'' && next == '\'' {
                // \' is not a valid JSON escape once the string is
                // double-quoted; emit the bare apostrophe.
                out.push('\'');
            } else {
                out.push('\\');
                out.push(next);
            }
            i += 2;
            continue;
        }
        if c == quote {
            i += 1;
            break;
        }
        if c == '"' {
            // Inner double quote in a single-quoted string.
            out.push('\\');
        }
        out.push(c);
        i += 1;
    }

    out.push('"');
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_array_literal() {
        let html = r#"<script>const coupons = [{code: "ABC"}];</script>"#;
        let literal = find_array_literal(html).unwrap();
        assert_eq!(literal, r#"[{code: "ABC"}]"#);
    }

    #[test]
    fn test_find_array_literal_let_binding() {
        let html = r#"let entries = [1, 2, 3];"#;
        assert_eq!(find_array_literal(html), Some("[1, 2, 3]"));
    }

    #[test]
    fn test_find_array_literal_absent() {
        assert_eq!(find_array_literal("<html><body>nothing</body></html>"), None);
    }

    #[test]
    fn test_quotes_bare_keys() {
        let json = loose_js_to_json(r#"[{title: "Hi", code: "ABC"}]"#);
        assert_eq!(json, r#"[{"title": "Hi", "code": "ABC"}]"#);
    }

    #[test]
    fn test_strips_trailing_commas() {
        let json = loose_js_to_json("[{code: \"A\",}, ]");
        assert_eq!(json, "[{\"code\": \"A\"} ]");
    }

    #[test]
    fn test_string_contents_untouched() {
        // A colon-adjacent bare word and a comma inside the value must survive.
        let json = loose_js_to_json(r#"[{desc: "use before: March, or else"}]"#);
        assert_eq!(json, r#"[{"desc": "use before: March, or else"}]"#);
    }

    #[test]
    fn test_escaped_quote_preserved() {
        let json = loose_js_to_json(r#"[{desc: "say \"hi\""}]"#);
        assert_eq!(json, r#"[{"desc": "say \"hi\""}]"#);
    }

    #[test]
    fn test_single_quoted_strings_converted() {
        let json = loose_js_to_json(r#"[{desc: 'it\'s "fine"'}]"#);
        assert_eq!(json, r#"[{"desc": "it's \"fine\""}]"#);
    }

    #[test]
    fn test_bare_literals_pass_through() {
        let json = loose_js_to_json("[{active: true, count: null}]");
        assert_eq!(json, r#"[{"active": true, "count": null}]"#);
    }

    #[test]
    fn test_roundtrips_through_serde() {
        let literal = r#"[
            {title: "10% Off", code: "SAVE10", daysLeft: 5,},
        ]"#;
        let json = loose_js_to_json(literal);
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["code"], "SAVE10");
        assert_eq!(parsed[0]["daysLeft"], 5);
    }
}
