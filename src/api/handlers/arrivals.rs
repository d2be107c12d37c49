use std::sync::Arc;

use axum::{
    Json,
    extract::Extension,
};
use serde::{Deserialize, Serialize};

use crate::api::extract::Query;
use crate::api::{ApiError, AppState, params};
use crate::services::Arrival;

#[derive(Debug, Deserialize)]
pub struct ArrivalsParams {
    pub stop: Option<String>,
    /// Look-ahead window in minutes.
    pub minutes: Option<String>,
}

#[derive(Serialize)]
pub struct ArrivalsResponse {
    pub stop: String,
    pub arrivals: Vec<Arrival>,
}

/// GET /api/arrivals
pub async fn arrivals_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<ArrivalsParams>,
) -> Result<Json<ArrivalsResponse>, ApiError> {
    let stop = params::stop_id(params::required("stop", params.stop.as_deref())?)?;
    let minutes = params::bounded_u32("minutes", params.minutes.as_deref(), 60, 1..=240)?;

    let transit = state
        .transit
        .as_ref()
        .ok_or(ApiError::Unavailable("transit arrivals"))?;

    let arrivals = transit
        .arrivals(stop, minutes)
        .await
        .map_err(ApiError::Upstream)?;

    Ok(Json(ArrivalsResponse {
        stop: stop.to_string(),
        arrivals,
    }))
}
