//! Address-suggestion engine backed by the national geocoding service.
//!
//! [`suggest_addresses`] is the entry point; the other modules are its
//! stages, leaf-first: [`normalize`], [`containment`], [`mapper`],
//! [`cascade`], [`merge`], [`rank`].

pub mod cascade;
pub mod client;
pub mod containment;
pub mod error;
pub mod mapper;
pub mod merge;
pub mod normalize;
pub mod rank;
pub mod suggest;
pub mod types;

pub use client::{GeocoderClient, SearchRequest};
pub use error::{GeocoderError, SuggestError};
pub use suggest::{resolve_max_results, suggest_addresses, validate_query};
pub use types::{AddressSuggestion, RawGeocoderFeature, SuggestionOrigin, TaggedSuggestion};
