use std::sync::Arc;

use axum::{
    Json,
    extract::Extension,
};
use serde::Deserialize;

use crate::api::extract::Query;
use crate::api::{ApiError, AppState, params};
use crate::services::Place;

const MAX_QUERY_CHARS: usize = 200;

#[derive(Debug, Deserialize)]
pub struct PlacesParams {
    pub query: Option<String>,
}

/// GET /api/places
pub async fn places_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<PlacesParams>,
) -> Result<Json<Vec<Place>>, ApiError> {
    let query = params::required("query", params.query.as_deref())?;
    if query.chars().count() > MAX_QUERY_CHARS {
        return Err(ApiError::bad_request(format!(
            "'query' must be at most {MAX_QUERY_CHARS} characters"
        )));
    }

    let places = state
        .places
        .as_ref()
        .ok_or(ApiError::Unavailable("place search"))?;

    let results = places.search(query).await.map_err(ApiError::Upstream)?;
    Ok(Json(results))
}
