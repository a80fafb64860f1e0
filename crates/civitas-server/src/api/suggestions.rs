use axum::{
    extract::{Query, State},
    Extension, Json,
};
use civitas_geocoder::{suggest_addresses, validate_query, AddressSuggestion, SuggestError};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct SuggestionQuery {
    pub commune_id: Option<String>,
    pub q: Option<String>,
    pub limit: Option<i64>,
}

pub(super) async fn list_address_suggestions(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<SuggestionQuery>,
) -> Result<Json<ApiResponse<Vec<AddressSuggestion>>>, ApiError> {
    let text = query.q.as_deref().unwrap_or_default();
    validate_query(text).map_err(|e| map_suggest_error(req_id.0.clone(), &e))?;

    let commune_id = query
        .commune_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| {
            ApiError::new(
                req_id.0.clone(),
                "validation_error",
                "commune_id is required",
            )
        })?;

    let geo = state.communes.find_public(commune_id).ok_or_else(|| {
        ApiError::new(
            req_id.0.clone(),
            "not_found",
            format!("commune {commune_id} not found"),
        )
    })?;

    let data = suggest_addresses(&state.geocoder, geo, text, query.limit)
        .await
        .map_err(|e| map_suggest_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

fn map_suggest_error(request_id: String, error: &SuggestError) -> ApiError {
    match error {
        SuggestError::InvalidQuery(message) => {
            ApiError::new(request_id, "validation_error", message.clone())
        }
        SuggestError::ProviderUnavailable(source) => {
            tracing::error!(request_id = %request_id, error = %source, "geocoding provider request failed");
            ApiError::new(
                request_id,
                "service_unavailable",
                "address provider is unavailable",
            )
        }
    }
}
