use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::geo::{BoundingBox, Centroid, CommuneGeoContext};
use crate::ConfigError;

/// Postal codes as stored in the registry: either one field that may hold
/// several separated codes, or an explicit list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostalCodes {
    Single(String),
    List(Vec<String>),
}

impl Default for PostalCodes {
    fn default() -> Self {
        PostalCodes::List(Vec::new())
    }
}

impl PostalCodes {
    fn entries(&self) -> Vec<String> {
        match self {
            PostalCodes::Single(s) => vec![s.clone()],
            PostalCodes::List(v) => v.clone(),
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommuneConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub postal_codes: PostalCodes,
    /// `[south, north, west, east]`; anything other than four finite numbers
    /// is treated as absent.
    #[serde(default)]
    pub bounding_box: Option<Vec<f64>>,
    pub centroid: Centroid,
    #[serde(default = "default_true")]
    pub is_public: bool,
}

impl CommuneConfig {
    #[must_use]
    pub fn geo_context(&self) -> CommuneGeoContext {
        CommuneGeoContext {
            id: self.id.trim().to_string(),
            name: self.name.trim().to_string(),
            postal_codes: self.postal_codes.entries(),
            bounding_box: self
                .bounding_box
                .as_deref()
                .and_then(BoundingBox::from_slice),
            centroid: self.centroid,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CommunesFile {
    pub communes: Vec<CommuneConfig>,
}

/// Load and validate the commune registry from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_communes(path: &Path) -> Result<CommunesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CommunesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_communes(&content)
}

/// Parse and validate registry YAML already in memory.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML cannot be parsed or fails validation.
pub fn parse_communes(content: &str) -> Result<CommunesFile, ConfigError> {
    let communes_file: CommunesFile =
        serde_yaml::from_str(content).map_err(ConfigError::CommunesFileParse)?;

    validate_communes(&communes_file)?;

    Ok(communes_file)
}

fn validate_communes(communes_file: &CommunesFile) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();

    for commune in &communes_file.communes {
        let id = commune.id.trim();
        if id.is_empty() {
            return Err(ConfigError::Validation(format!(
                "commune '{}' has an empty id",
                commune.name
            )));
        }

        if commune.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "commune '{id}' has an empty name"
            )));
        }

        if !(commune.centroid.latitude.is_finite() && commune.centroid.longitude.is_finite()) {
            return Err(ConfigError::Validation(format!(
                "commune '{id}' has a non-finite centroid"
            )));
        }

        if !seen_ids.insert(id.to_string()) {
            return Err(ConfigError::Validation(format!(
                "duplicate commune id: '{id}'"
            )));
        }
    }

    Ok(())
}

/// In-memory commune lookup keyed by commune id.
#[derive(Debug, Clone, Default)]
pub struct CommuneRegistry {
    communes: HashMap<String, RegistryEntry>,
}

#[derive(Debug, Clone)]
struct RegistryEntry {
    context: CommuneGeoContext,
    is_public: bool,
}

impl CommuneRegistry {
    #[must_use]
    pub fn from_file(file: &CommunesFile) -> Self {
        let communes = file
            .communes
            .iter()
            .map(|c| {
                let context = c.geo_context();
                (
                    context.id.clone(),
                    RegistryEntry {
                        context,
                        is_public: c.is_public,
                    },
                )
            })
            .collect();
        Self { communes }
    }

    /// Returns the context of a publicly visible commune. Unknown and
    /// hidden communes are indistinguishable to the caller.
    #[must_use]
    pub fn find_public(&self, id: &str) -> Option<&CommuneGeoContext> {
        self.communes
            .get(id.trim())
            .filter(|entry| entry.is_public)
            .map(|entry| &entry.context)
    }

    /// All communes sorted by id, with their visibility flag.
    #[must_use]
    pub fn entries(&self) -> Vec<(&CommuneGeoContext, bool)> {
        let mut entries: Vec<_> = self
            .communes
            .values()
            .map(|entry| (&entry.context, entry.is_public))
            .collect();
        entries.sort_by(|a, b| a.0.id.cmp(&b.0.id));
        entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.communes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.communes.is_empty()
    }
}

#[cfg(test)]
#[path = "communes_test.rs"]
mod tests;
