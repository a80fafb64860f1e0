use thiserror::Error;

/// Errors returned by the geocoding provider client.
#[derive(Debug, Error)]
pub enum GeocoderError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body is not the expected JSON document.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid geocoder base URL '{base_url}': {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

/// Errors surfaced by [`crate::suggest_addresses`].
#[derive(Debug, Error)]
pub enum SuggestError {
    /// Rejected before any provider call.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// The primary provider request failed; no result set can be built.
    #[error("geocoding provider unavailable: {0}")]
    ProviderUnavailable(#[source] GeocoderError),
}
