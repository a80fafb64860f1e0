//! Relevance scoring and final ordering of suggestions.
//!
//! `score = token_matches * 10 + starts_with_query * 5 + numeric_match * 3`
//!
//! Ties prefer suggestions from the primary round, then labels in French
//! alphabetical order.

use std::cmp::Ordering;

use crate::normalize::{has_digit, normalize, strip_diacritics};
use crate::types::{ScoredSuggestion, SuggestionOrigin, TaggedSuggestion};

const TOKEN_MATCH_WEIGHT: usize = 10;
const PREFIX_WEIGHT: usize = 5;
const NUMERIC_WEIGHT: usize = 3;

/// Scores one suggestion against the normalized query and its tokens.
#[must_use]
pub fn score_suggestion(
    candidate: TaggedSuggestion,
    normalized_query: &str,
    tokens: &[String],
) -> ScoredSuggestion {
    let label = normalize(&candidate.suggestion.label);
    let name = normalize(&candidate.suggestion.name);
    let found = |token: &str| label.contains(token) || name.contains(token);

    let token_matches = tokens.iter().filter(|t| found(t)).count();
    let starts_with_query = label.starts_with(normalized_query);
    // Vacuously true when the query has no numeric token.
    let numeric_match = tokens.iter().filter(|t| has_digit(t)).all(|t| found(t));

    let score = token_matches * TOKEN_MATCH_WEIGHT
        + usize::from(starts_with_query) * PREFIX_WEIGHT
        + usize::from(numeric_match) * NUMERIC_WEIGHT;

    ScoredSuggestion {
        candidate,
        token_matches,
        score,
    }
}

/// Orders suggestions by relevance.
///
/// Without tokens (or without suggestions) the provider order is kept.
/// Suggestions matching no token are dropped unless nothing matches at all,
/// in which case every suggestion is ranked.
#[must_use]
pub fn rank_suggestions(
    suggestions: Vec<TaggedSuggestion>,
    query: &str,
    tokens: &[String],
) -> Vec<TaggedSuggestion> {
    if tokens.is_empty() || suggestions.is_empty() {
        return suggestions;
    }

    let normalized_query = normalize(query);
    let (matching, unmatched): (Vec<_>, Vec<_>) = suggestions
        .into_iter()
        .map(|candidate| score_suggestion(candidate, &normalized_query, tokens))
        .partition(|scored| scored.token_matches > 0);

    let mut ranked = if matching.is_empty() {
        unmatched
    } else {
        matching
    };
    ranked.sort_by(compare_scored);
    ranked.into_iter().map(|scored| scored.candidate).collect()
}

fn compare_scored(a: &ScoredSuggestion, b: &ScoredSuggestion) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| origin_rank(a.candidate.origin).cmp(&origin_rank(b.candidate.origin)))
        .then_with(|| {
            compare_labels_fr(
                &a.candidate.suggestion.label,
                &b.candidate.suggestion.label,
            )
        })
}

fn origin_rank(origin: SuggestionOrigin) -> u8 {
    match origin {
        SuggestionOrigin::Primary => 0,
        SuggestionOrigin::Fallback => 1,
    }
}

/// Approximates French collation with four levels: letters and digits
/// without accents, case or punctuation first, then punctuation and spacing,
/// then accents, then case (lowercase first).
///
/// Accents are compared left to right; the backward accent ordering of
/// traditional French dictionaries is not applied.
#[must_use]
pub fn compare_labels_fr(a: &str, b: &str) -> Ordering {
    let a_lower = a.to_lowercase();
    let b_lower = b.to_lowercase();
    let a_folded = strip_diacritics(&a_lower);
    let b_folded = strip_diacritics(&b_lower);
    base_letters(&a_folded)
        .cmp(base_letters(&b_folded))
        .then_with(|| a_folded.cmp(&b_folded))
        .then_with(|| a_lower.cmp(&b_lower))
        .then_with(|| b.cmp(a))
}

/// Alphanumeric characters only; hyphens, apostrophes and spaces are
/// ignored at the first level.
fn base_letters(folded: &str) -> impl Iterator<Item = char> + '_ {
    folded.chars().filter(|c| c.is_alphanumeric())
}
