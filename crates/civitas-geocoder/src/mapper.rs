//! Conversion from raw provider features to tagged suggestions.

use civitas_core::CommuneGeoContext;

use crate::containment::{matches_commune, ContainmentCandidate};
use crate::types::{
    AddressSuggestion, RawGeocoderFeature, RawProperties, SuggestionOrigin, TaggedSuggestion,
};

/// Why a feature was dropped during validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    MissingCoordinates,
    NonFiniteCoordinate,
    MissingLabel,
}

/// A feature with the mandatory fields present and checked.
#[derive(Debug, Clone)]
pub struct UsableFeature {
    pub latitude: f64,
    pub longitude: f64,
    pub label: String,
    pub properties: RawProperties,
}

#[derive(Debug, Clone)]
pub enum FeatureDisposition {
    Usable(UsableFeature),
    Discarded(DiscardReason),
}

/// Checks the two mandatory parts of a feature: a finite `[lon, lat]` pair
/// and a non-blank label.
#[must_use]
pub fn validate_feature(feature: RawGeocoderFeature) -> FeatureDisposition {
    let coordinates = feature
        .geometry
        .as_ref()
        .map(|g| g.coordinates.as_slice())
        .unwrap_or_default();
    let (Some(lon), Some(lat)) = (coordinates.first(), coordinates.get(1)) else {
        return FeatureDisposition::Discarded(DiscardReason::MissingCoordinates);
    };
    let (Some(longitude), Some(latitude)) = (lon.as_f64(), lat.as_f64()) else {
        return FeatureDisposition::Discarded(DiscardReason::NonFiniteCoordinate);
    };
    if !(longitude.is_finite() && latitude.is_finite()) {
        return FeatureDisposition::Discarded(DiscardReason::NonFiniteCoordinate);
    }

    let mut properties = feature.properties;
    let Some(label) = properties.label.take().filter(|l| !l.trim().is_empty()) else {
        return FeatureDisposition::Discarded(DiscardReason::MissingLabel);
    };

    FeatureDisposition::Usable(UsableFeature {
        latitude,
        longitude,
        label,
        properties,
    })
}

/// Maps provider features to suggestions inside `geo`, preserving provider
/// order. Malformed features and features outside the commune are dropped.
#[must_use]
pub fn map_features(
    features: Vec<RawGeocoderFeature>,
    geo: &CommuneGeoContext,
    origin: SuggestionOrigin,
) -> Vec<TaggedSuggestion> {
    features
        .into_iter()
        .filter_map(|feature| match validate_feature(feature) {
            FeatureDisposition::Usable(usable) => Some(usable),
            FeatureDisposition::Discarded(reason) => {
                tracing::trace!(?reason, "discarding malformed geocoder feature");
                None
            }
        })
        .filter(|usable| {
            let candidate = ContainmentCandidate {
                latitude: usable.latitude,
                longitude: usable.longitude,
                postcode: usable.properties.postcode.as_deref(),
                city: usable.properties.city.as_deref(),
                context: usable.properties.context.as_deref(),
            };
            matches_commune(&candidate, geo)
        })
        .map(|usable| TaggedSuggestion {
            suggestion: to_suggestion(usable),
            origin,
        })
        .collect()
}

fn to_suggestion(usable: UsableFeature) -> AddressSuggestion {
    let UsableFeature {
        latitude,
        longitude,
        label,
        properties,
    } = usable;

    let id = non_blank(properties.id).unwrap_or_else(|| format!("{latitude},{longitude}"));
    let name = non_blank(properties.name).unwrap_or_else(|| label.clone());

    AddressSuggestion {
        id,
        label,
        name,
        context: non_blank(properties.context),
        latitude,
        longitude,
        postcode: non_blank(properties.postcode),
        city: non_blank(properties.city),
    }
}

/// Treat empty strings from the provider as absent.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
