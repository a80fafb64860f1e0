//! Decides whether a provider result plausibly lies in the target commune.
//!
//! Two independent signals are OR-ed: the commune bounding box (grown by a
//! fixed tolerance) and administrative text (city, context, postcode). The
//! filter leans toward recall; ranking demotes weak matches afterwards.

use civitas_core::CommuneGeoContext;

use crate::normalize::{normalize, normalize_opt};

/// Margin added to every side of the commune box, roughly one kilometre.
/// Absorbs discrepancies between provider and registry boundaries.
pub const BBOX_TOLERANCE_DEGREES: f64 = 0.01;

/// The parts of a provider result the filter looks at.
#[derive(Debug, Clone, Copy)]
pub struct ContainmentCandidate<'a> {
    pub latitude: f64,
    pub longitude: f64,
    pub postcode: Option<&'a str>,
    pub city: Option<&'a str>,
    pub context: Option<&'a str>,
}

#[must_use]
pub fn matches_commune(candidate: &ContainmentCandidate<'_>, geo: &CommuneGeoContext) -> bool {
    within_bounding_box(candidate, geo) || matches_administrative_text(candidate, geo)
}

/// Vacuously true when the commune has no usable box.
#[must_use]
pub fn within_bounding_box(candidate: &ContainmentCandidate<'_>, geo: &CommuneGeoContext) -> bool {
    geo.bounding_box.as_ref().is_none_or(|bbox| {
        bbox.contains_with_tolerance(
            candidate.latitude,
            candidate.longitude,
            BBOX_TOLERANCE_DEGREES,
        )
    })
}

#[must_use]
pub fn matches_administrative_text(
    candidate: &ContainmentCandidate<'_>,
    geo: &CommuneGeoContext,
) -> bool {
    let commune_name = normalize(&geo.name);

    if !commune_name.is_empty() {
        if normalize_opt(candidate.city) == commune_name {
            return true;
        }

        let context = normalize_opt(candidate.context);
        if context.contains(&commune_name) {
            return true;
        }
    }

    candidate
        .postcode
        .map(str::trim)
        .filter(|postcode| !postcode.is_empty())
        .is_some_and(|postcode| {
            geo.postal_code_list()
                .any(|code| postcode.starts_with(code))
        })
}
