//! Entry point of the address-suggestion engine.

use civitas_core::CommuneGeoContext;

use crate::cascade::run_cascade;
use crate::client::GeocoderClient;
use crate::error::SuggestError;
use crate::normalize::query_tokens;
use crate::rank::rank_suggestions;
use crate::types::{AddressSuggestion, TaggedSuggestion};

pub const DEFAULT_MAX_RESULTS: usize = 7;
pub const MAX_RESULTS_CAP: usize = 10;
pub const MIN_QUERY_CHARS: usize = 2;

/// Clamps a caller-supplied limit to `1..=10`, defaulting to 7.
#[must_use]
pub fn resolve_max_results(limit: Option<i64>) -> usize {
    match limit {
        None => DEFAULT_MAX_RESULTS,
        Some(n) if n < 1 => 1,
        Some(n) => usize::try_from(n).map_or(MAX_RESULTS_CAP, |n| n.min(MAX_RESULTS_CAP)),
    }
}

/// Returns the trimmed query if it is long enough to search for.
///
/// # Errors
///
/// Returns [`SuggestError::InvalidQuery`] when the trimmed query has fewer
/// than two characters.
pub fn validate_query(query: &str) -> Result<&str, SuggestError> {
    let trimmed = query.trim();
    if trimmed.chars().count() < MIN_QUERY_CHARS {
        return Err(SuggestError::InvalidQuery(format!(
            "query must contain at least {MIN_QUERY_CHARS} characters"
        )));
    }
    Ok(trimmed)
}

/// Suggests addresses inside `geo` for a free-text query.
///
/// Validates the query, runs the primary/fallback cascade, ranks the merged
/// suggestions and returns at most the resolved limit, provenance stripped.
///
/// # Errors
///
/// - [`SuggestError::InvalidQuery`] before any provider call.
/// - [`SuggestError::ProviderUnavailable`] when the primary request fails.
pub async fn suggest_addresses(
    client: &GeocoderClient,
    geo: &CommuneGeoContext,
    query: &str,
    limit: Option<i64>,
) -> Result<Vec<AddressSuggestion>, SuggestError> {
    let query = validate_query(query)?;
    let max_results = resolve_max_results(limit);
    let tokens = query_tokens(query);

    let outcome = run_cascade(client, query, geo, &tokens, max_results)
        .await
        .map_err(SuggestError::ProviderUnavailable)?;

    let total = outcome.suggestions.len();
    let suggestions: Vec<AddressSuggestion> = rank_suggestions(outcome.suggestions, query, &tokens)
        .into_iter()
        .take(max_results)
        .map(TaggedSuggestion::into_public)
        .collect();

    tracing::debug!(
        commune_id = %geo.id,
        fallback_attempts = outcome.fallback_attempts,
        candidates = total,
        returned = suggestions.len(),
        "address suggestions resolved"
    );

    Ok(suggestions)
}
