//! Geographic context of a commune, as consumed by the address-suggestion
//! engine.

use serde::{Deserialize, Serialize};

/// Commune extent in degrees, stored as `[south, north, west, east]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub south: f64,
    pub north: f64,
    pub west: f64,
    pub east: f64,
}

impl BoundingBox {
    /// Builds a box from the stored `[south, north, west, east]` array.
    ///
    /// Returns `None` unless there are exactly four finite values.
    #[must_use]
    pub fn from_slice(values: &[f64]) -> Option<Self> {
        match values {
            [south, north, west, east] if values.iter().all(|v| v.is_finite()) => Some(Self {
                south: *south,
                north: *north,
                west: *west,
                east: *east,
            }),
            _ => None,
        }
    }

    /// Whether the point lies inside the box grown by `tolerance` degrees on
    /// every side.
    #[must_use]
    pub fn contains_with_tolerance(&self, latitude: f64, longitude: f64, tolerance: f64) -> bool {
        latitude >= self.south - tolerance
            && latitude <= self.north + tolerance
            && longitude >= self.west - tolerance
            && longitude <= self.east + tolerance
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Centroid {
    pub latitude: f64,
    pub longitude: f64,
}

/// Everything the suggestion engine needs to know about the target commune.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommuneGeoContext {
    pub id: String,
    pub name: String,
    /// Raw postal code entries; one entry may hold several codes.
    pub postal_codes: Vec<String>,
    pub bounding_box: Option<BoundingBox>,
    pub centroid: Centroid,
}

impl CommuneGeoContext {
    /// Individual postal codes, with multi-code entries split on commas,
    /// semicolons and whitespace.
    pub fn postal_code_list(&self) -> impl Iterator<Item = &str> + '_ {
        self.postal_codes
            .iter()
            .flat_map(|entry| entry.split(|c: char| c == ',' || c == ';' || c.is_whitespace()))
            .filter(|code| !code.is_empty())
    }

    #[must_use]
    pub fn first_postal_code(&self) -> Option<&str> {
        self.postal_code_list().next()
    }
}
