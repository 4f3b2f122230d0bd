//! Title normalization: the join key shared by every dataset.

use once_cell::sync::Lazy;
use regex::Regex;

static AMPERSAND: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*&\s*").expect("valid regex"));
static APOSTROPHE: Lazy<Regex> = Lazy::new(|| Regex::new(r"['’]").expect("valid regex"));
static SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"[,/]").expect("valid regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Normalize a raw occupation title for equality comparison.
///
/// Never displayed. Two raw titles name the same occupation iff their
/// normalized forms are equal.
pub fn normalize_title(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    let s = AMPERSAND.replace_all(&lowered, " and ");
    let s = APOSTROPHE.replace_all(&s, "");
    let s = SEPARATOR.replace_all(&s, " ");
    let s = WHITESPACE.replace_all(&s, " ");
    s.trim().to_string()
}
