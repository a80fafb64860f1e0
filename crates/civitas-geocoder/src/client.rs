//! HTTP client for the national address search API (BAN `search` endpoint).
//!
//! Wraps `reqwest` with the headers the provider expects, typed error
//! handling and per-feature response parsing. Every request is sent with
//! caching disabled.

use std::time::Duration;

use civitas_core::Centroid;
use reqwest::{Client, Url};

use crate::error::GeocoderError;
use crate::types::{feature_entries, RawGeocoderFeature};

/// Result classes requested on the primary attempt.
pub const PRIMARY_RESULT_TYPES: [&str; 3] = ["housenumber", "street", "locality"];

/// Parameters of one search attempt.
#[derive(Debug, Clone)]
pub struct SearchRequest<'a> {
    pub query: &'a str,
    pub limit: usize,
    /// Bias point, usually the commune centroid.
    pub centroid: Centroid,
    /// Restrict results to [`PRIMARY_RESULT_TYPES`].
    pub restrict_types: bool,
}

/// Client for the geocoding provider.
///
/// Use [`GeocoderClient::new`] with the production endpoint or a mock
/// server URL in tests.
pub struct GeocoderClient {
    client: Client,
    base_url: Url,
}

impl GeocoderClient {
    /// Creates a client for the search endpoint at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`GeocoderError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GeocoderError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn new(base_url: &str, user_agent: &str, timeout_secs: u64) -> Result<Self, GeocoderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .user_agent(user_agent)
            .build()?;

        let base_url = Url::parse(base_url).map_err(|e| GeocoderError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    /// Runs one search attempt and returns the features that deserialize.
    ///
    /// A body without a `features` array yields no features. Entries that
    /// are not JSON objects are skipped; field-level validation happens in
    /// [`crate::mapper`].
    ///
    /// # Errors
    ///
    /// - [`GeocoderError::Http`] on network failure.
    /// - [`GeocoderError::UnexpectedStatus`] on any non-2xx status.
    /// - [`GeocoderError::Deserialize`] if the body is not valid JSON.
    pub async fn search(
        &self,
        request: &SearchRequest<'_>,
    ) -> Result<Vec<RawGeocoderFeature>, GeocoderError> {
        let url = self.build_url(request);
        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::ACCEPT_LANGUAGE, "fr")
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .header(reqwest::header::PRAGMA, "no-cache")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocoderError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let parsed: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| GeocoderError::Deserialize {
                context: format!("search(q={})", request.query),
                source: e,
            })?;

        let entries = feature_entries(parsed);
        let total = entries.len();
        let features: Vec<RawGeocoderFeature> = entries
            .into_iter()
            .filter_map(|v| serde_json::from_value::<RawGeocoderFeature>(v).ok())
            .collect();

        if features.len() < total {
            tracing::debug!(
                query = request.query,
                skipped = total - features.len(),
                "skipped geocoder features with unexpected shape"
            );
        }

        Ok(features)
    }

    /// Builds the request URL with percent-encoded query parameters.
    fn build_url(&self, request: &SearchRequest<'_>) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("q", request.query);
            pairs.append_pair("limit", &request.limit.to_string());
            pairs.append_pair("autocomplete", "1");
            pairs.append_pair("lat", &request.centroid.latitude.to_string());
            pairs.append_pair("lon", &request.centroid.longitude.to_string());
            if request.restrict_types {
                for result_type in PRIMARY_RESULT_TYPES {
                    pairs.append_pair("type", result_type);
                }
            }
        }
        url
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
