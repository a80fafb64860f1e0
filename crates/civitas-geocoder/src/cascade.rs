//! Primary query plus bounded fallback reformulations.
//!
//! The cascade is a small state machine, `Primary → Fallback(i) → Done`,
//! gated by [`has_meaningful_match`]. Requests run strictly one after the
//! other because each fallback only happens if the previous round did not
//! satisfy the query tokens.

use civitas_core::CommuneGeoContext;

use crate::client::{GeocoderClient, SearchRequest};
use crate::error::GeocoderError;
use crate::mapper::map_features;
use crate::merge::merge;
use crate::normalize::{normalize, strip_diacritics};
use crate::types::{SuggestionOrigin, TaggedSuggestion};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CascadeState {
    Primary,
    Fallback(usize),
    Done,
}

/// Everything the cascade accumulated.
#[derive(Debug, Clone)]
pub struct CascadeOutcome {
    pub suggestions: Vec<TaggedSuggestion>,
    /// Fallback requests issued, failed ones included.
    pub fallback_attempts: usize,
}

/// Whether the accumulated suggestions already answer the query.
///
/// With no significant tokens any non-empty result is enough; otherwise one
/// normalized label must contain every token.
#[must_use]
pub fn has_meaningful_match(suggestions: &[TaggedSuggestion], tokens: &[String]) -> bool {
    if tokens.is_empty() {
        return !suggestions.is_empty();
    }
    suggestions.iter().any(|candidate| {
        let label = normalize(&candidate.suggestion.label);
        tokens.iter().all(|token| label.contains(token.as_str()))
    })
}

/// The primary query: user text followed by the commune name.
#[must_use]
pub fn enriched_query(query: &str, geo: &CommuneGeoContext) -> String {
    format!("{} {}", query.trim(), geo.name.trim())
        .trim()
        .to_string()
}

/// Fallback queries in the order they are tried, without duplicates or
/// empty strings.
#[must_use]
pub fn fallback_queries(query: &str, geo: &CommuneGeoContext) -> Vec<String> {
    let stripped_query = strip_diacritics(query.trim());
    let stripped_name = strip_diacritics(geo.name.trim());

    let candidates = [
        stripped_query.clone(),
        format!("{stripped_query} {stripped_name}"),
        geo.first_postal_code()
            .map(|code| format!("{stripped_query} {code}"))
            .unwrap_or_default(),
    ];

    let mut queries: Vec<String> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let candidate = candidate.trim();
        if !candidate.is_empty() && !queries.iter().any(|q| q == candidate) {
            queries.push(candidate.to_string());
        }
    }
    queries
}

/// Runs the primary request and, if needed, the fallback requests.
///
/// # Errors
///
/// Returns the provider error of the primary request. Fallback failures are
/// logged and treated as empty results.
pub async fn run_cascade(
    client: &GeocoderClient,
    query: &str,
    geo: &CommuneGeoContext,
    tokens: &[String],
    max_results: usize,
) -> Result<CascadeOutcome, GeocoderError> {
    let mut state = CascadeState::Primary;
    let mut suggestions: Vec<TaggedSuggestion> = Vec::new();
    let mut fallbacks: Vec<String> = Vec::new();
    let mut fallback_attempts = 0usize;

    loop {
        state = match state {
            CascadeState::Primary => {
                let primary_query = enriched_query(query, geo);
                let features = client
                    .search(&SearchRequest {
                        query: &primary_query,
                        limit: max_results,
                        centroid: geo.centroid,
                        restrict_types: true,
                    })
                    .await?;
                suggestions = map_features(features, geo, SuggestionOrigin::Primary);

                if has_meaningful_match(&suggestions, tokens) {
                    tracing::debug!(
                        commune_id = %geo.id,
                        count = suggestions.len(),
                        "primary query satisfied, skipping fallbacks"
                    );
                    CascadeState::Done
                } else {
                    fallbacks = fallback_queries(query, geo);
                    CascadeState::Fallback(0)
                }
            }
            CascadeState::Fallback(index) => {
                let Some(fallback_query) = fallbacks.get(index) else {
                    break;
                };
                fallback_attempts += 1;

                let found = match client
                    .search(&SearchRequest {
                        query: fallback_query,
                        limit: max_results,
                        centroid: geo.centroid,
                        restrict_types: false,
                    })
                    .await
                {
                    Ok(features) => map_features(features, geo, SuggestionOrigin::Fallback),
                    Err(e) => {
                        tracing::warn!(
                            commune_id = %geo.id,
                            attempt = index + 1,
                            query = %fallback_query,
                            error = %e,
                            "fallback geocoder request failed"
                        );
                        Vec::new()
                    }
                };

                tracing::debug!(
                    commune_id = %geo.id,
                    attempt = index + 1,
                    count = found.len(),
                    "fallback query returned"
                );
                suggestions = merge(suggestions, found);

                if has_meaningful_match(&suggestions, tokens) {
                    CascadeState::Done
                } else {
                    CascadeState::Fallback(index + 1)
                }
            }
            CascadeState::Done => break,
        };
    }

    Ok(CascadeOutcome {
        suggestions,
        fallback_attempts,
    })
}

#[cfg(test)]
mod tests {
    use civitas_core::Centroid;

    use super::*;
    use crate::normalize::query_tokens;
    use crate::types::AddressSuggestion;

    fn geo(name: &str, postal_codes: &[&str]) -> CommuneGeoContext {
        CommuneGeoContext {
            id: "99001".to_string(),
            name: name.to_string(),
            postal_codes: postal_codes.iter().map(|s| (*s).to_string()).collect(),
            bounding_box: None,
            centroid: Centroid {
                latitude: 48.85,
                longitude: 2.34,
            },
        }
    }

    fn tagged(label: &str) -> TaggedSuggestion {
        TaggedSuggestion {
            suggestion: AddressSuggestion {
                id: label.to_string(),
                label: label.to_string(),
                name: label.to_string(),
                context: None,
                latitude: 48.85,
                longitude: 2.34,
                postcode: None,
                city: None,
            },
            origin: SuggestionOrigin::Primary,
        }
    }

    #[test]
    fn meaningful_match_needs_every_token_in_one_label() {
        let tokens = query_tokens("12 rue paix");
        assert!(!has_meaningful_match(
            &[tagged("12 Rue Lepic"), tagged("Rue de la Paix")],
            &tokens
        ));
        assert!(has_meaningful_match(
            &[tagged("Avenue Foch"), tagged("12 Rue de la Paix")],
            &tokens
        ));
    }

    #[test]
    fn meaningful_match_without_tokens_means_non_empty() {
        assert!(!has_meaningful_match(&[], &[]));
        assert!(has_meaningful_match(&[tagged("Anything")], &[]));
    }

    #[test]
    fn enriched_query_appends_commune_name() {
        let g = geo("Springfield", &["75000"]);
        assert_eq!(
            enriched_query(" 12 rue de la paix ", &g),
            "12 rue de la paix Springfield"
        );
    }

    #[test]
    fn fallback_queries_strip_diacritics_in_order() {
        let g = geo("Saint-Étienne", &["42000, 42100"]);
        assert_eq!(
            fallback_queries("bibliothéque", &g),
            vec![
                "bibliotheque".to_string(),
                "bibliotheque Saint-Etienne".to_string(),
                "bibliotheque 42000".to_string(),
            ]
        );
    }

    #[test]
    fn fallback_queries_skip_missing_postal_code() {
        let g = geo("Springfield", &[]);
        assert_eq!(
            fallback_queries("mairie", &g),
            vec!["mairie".to_string(), "mairie Springfield".to_string()]
        );
    }

    #[test]
    fn fallback_queries_deduplicate() {
        let g = geo("", &[]);
        assert_eq!(fallback_queries("mairie", &g), vec!["mairie".to_string()]);
    }
}
