use std::collections::HashSet;

use crate::types::TaggedSuggestion;

/// Identity used for de-duplication: the provider id, or the label when the
/// id is empty.
#[must_use]
pub fn dedup_key(candidate: &TaggedSuggestion) -> &str {
    let id = candidate.suggestion.id.as_str();
    if id.is_empty() {
        candidate.suggestion.label.as_str()
    } else {
        id
    }
}

/// Appends the items of `additional` not already present in `base`.
///
/// `base` keeps its order; new items follow in first-seen order.
#[must_use]
pub fn merge(
    base: Vec<TaggedSuggestion>,
    additional: Vec<TaggedSuggestion>,
) -> Vec<TaggedSuggestion> {
    if additional.is_empty() {
        return base;
    }

    let mut seen: HashSet<String> = base.iter().map(|s| dedup_key(s).to_owned()).collect();
    let mut merged = base;
    for candidate in additional {
        if seen.insert(dedup_key(&candidate).to_owned()) {
            merged.push(candidate);
        }
    }
    merged
}
