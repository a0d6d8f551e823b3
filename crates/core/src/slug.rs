//! URL slug normalization for gallery titles and facet names.

use once_cell::sync::Lazy;
use regex_lite::Regex;

static DISALLOWED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s-]").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static HYPHENS: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+").unwrap());

/// Turn arbitrary text into a URL-safe slug.
///
/// Lower-cases, drops everything except ASCII letters, digits, `_`,
/// whitespace and `-`, turns whitespace runs into a single hyphen, collapses
/// hyphen runs and trims hyphens from both ends. Any Unicode whitespace
/// (NBSP, ideographic space, ...) counts as whitespace.
///
/// The result may be empty (e.g. for an all-punctuation title); callers that
/// need a usable slug must reject that case.
pub fn normalize_slug(text: &str) -> String {
    // regex-lite classes are ASCII-only; fold other whitespace first.
    let lowered: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .collect();
    let cleaned = DISALLOWED.replace_all(&lowered, "");
    let hyphenated = WHITESPACE.replace_all(&cleaned, "-");
    let collapsed = HYPHENS.replace_all(&hyphenated, "-");
    collapsed.trim_matches('-').to_string()
}
