//! Tidal-current map endpoints.

use std::sync::Arc;

use axum::{
    Json,
    extract::Extension,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::api::extract::Query;
use crate::api::{ApiError, AppState, params};
use crate::currents::{AggregateOptions, StationPredictions, aggregate_currents};
use crate::stations::Station;

#[derive(Debug, Deserialize)]
pub struct CurrentsParams {
    /// `YYYYMMDD`; defaults to today (UTC).
    pub date: Option<String>,
}

#[derive(Serialize)]
pub struct CurrentsResponse {
    pub date: NaiveDate,
    pub interval_minutes: u32,
    pub stations: Vec<StationPredictions>,
}

/// GET /api/stations
pub async fn stations_handler(Extension(state): Extension<Arc<AppState>>) -> Json<Vec<Station>> {
    Json(state.stations.clone())
}

/// GET /api/currents
///
/// Never fails on upstream trouble: stations that cannot be fetched are
/// simply missing from the response.
pub async fn currents_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<CurrentsParams>,
) -> Result<Json<CurrentsResponse>, ApiError> {
    let date = match params.date.as_deref() {
        Some(raw) => params::compact_date("date", raw.trim())?,
        None => Utc::now().date_naive(),
    };

    let options = AggregateOptions {
        date,
        interval_minutes: state.currents.interval_minutes,
        concurrency: state.currents.concurrency,
    };
    let stations = aggregate_currents(state.tides.clone(), &state.stations, &options).await;

    Ok(Json(CurrentsResponse {
        date,
        interval_minutes: options.interval_minutes,
        stations,
    }))
}
