//! Text folding shared by containment, cascade gating and ranking.
//!
//! Everything here is pure: NFD decomposition with combining marks removed,
//! optionally followed by case folding and trimming.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Removes diacritics, keeping case and surrounding whitespace.
///
/// Used to build fallback query strings, where the provider may care about
/// the casing of place names.
#[must_use]
pub fn strip_diacritics(text: &str) -> String {
    if text.is_ascii() {
        return text.to_string();
    }
    text.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Folds text for comparison: diacritics removed, lower-cased, trimmed.
#[must_use]
pub fn normalize(text: &str) -> String {
    strip_diacritics(&text.to_lowercase()).trim().to_string()
}

/// [`normalize`] for optional provider fields; `None` folds to `""`.
#[must_use]
pub fn normalize_opt(text: Option<&str>) -> String {
    text.map(normalize).unwrap_or_default()
}

/// Significant tokens of a user query.
///
/// Tokens shorter than three characters are noise ("de", "la", "du") unless
/// they carry a digit, since house numbers are the most selective part of
/// an address.
#[must_use]
pub fn query_tokens(query: &str) -> Vec<String> {
    normalize(query)
        .split_whitespace()
        .filter(|token| token.chars().count() >= 3 || has_digit(token))
        .map(str::to_owned)
        .collect()
}

pub(crate) fn has_digit(token: &str) -> bool {
    token.chars().any(|c| c.is_ascii_digit())
}
