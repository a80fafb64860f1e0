//! Provider response shapes and the engine's suggestion records.
//!
//! The provider (BAN `search` endpoint) answers with a GeoJSON
//! `FeatureCollection`. Every property is optional on the wire; a feature is
//! only usable when it carries a label and a `[lon, lat]` coordinate pair.
//! Features are parsed one by one and optional properties of the wrong type
//! are ignored, so a single odd entry never poisons the whole response.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawGeocoderFeature {
    #[serde(default, deserialize_with = "lenient_geometry")]
    pub geometry: Option<RawGeometry>,
    #[serde(default, deserialize_with = "lenient_properties")]
    pub properties: RawProperties,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawGeometry {
    /// `[longitude, latitude]`; values are checked for finiteness later.
    #[serde(default)]
    pub coordinates: Vec<Value>,
}

/// Optional feature properties. A value of the wrong JSON type reads as
/// `None` instead of rejecting the feature.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawProperties {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "string_only")]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "string_only")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub postcode: Option<String>,
    #[serde(default, deserialize_with = "string_only")]
    pub city: Option<String>,
    /// Administrative context, e.g. `"75, Paris, Île-de-France"`.
    #[serde(default, deserialize_with = "string_only")]
    pub context: Option<String>,
    #[serde(default, deserialize_with = "number_only")]
    pub importance: Option<f64>,
    #[serde(default, deserialize_with = "number_only")]
    pub score: Option<f64>,
}

/// Extracts the `features` array of a provider response body.
///
/// A missing, `null` or non-array `features` member yields no entries.
#[must_use]
pub fn feature_entries(mut body: Value) -> Vec<Value> {
    match body.get_mut("features").map(Value::take) {
        Some(Value::Array(entries)) => entries,
        _ => Vec::new(),
    }
}

fn lenient_geometry<'de, D>(deserializer: D) -> Result<Option<RawGeometry>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn lenient_properties<'de, D>(deserializer: D) -> Result<RawProperties, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

fn string_only<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

/// Identifiers and postcodes sometimes arrive as bare numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        _ => Ok(None),
    }
}

fn number_only<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(deserializer)?.as_f64())
}

/// One address suggestion as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddressSuggestion {
    pub id: String,
    pub label: String,
    pub name: String,
    pub context: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub postcode: Option<String>,
    pub city: Option<String>,
}

/// Which cascade round produced a suggestion. Only used for tie-breaking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionOrigin {
    Primary,
    Fallback,
}

/// A suggestion carrying its provenance while inside the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedSuggestion {
    pub suggestion: AddressSuggestion,
    pub origin: SuggestionOrigin,
}

impl TaggedSuggestion {
    /// Drops the provenance tag.
    #[must_use]
    pub fn into_public(self) -> AddressSuggestion {
        self.suggestion
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredSuggestion {
    pub candidate: TaggedSuggestion,
    pub token_matches: usize,
    pub score: usize,
}
