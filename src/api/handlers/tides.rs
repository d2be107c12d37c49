use std::sync::Arc;

use axum::{
    Json,
    extract::Extension,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::api::extract::Query;
use crate::api::{ApiError, AppState, params};
use crate::services::TideEvent;

const DEFAULT_HOURS: u32 = 48;
// NOAA caps a single hi/lo request at 31 days
const MAX_HOURS: u32 = 720;

#[derive(Debug, Deserialize)]
pub struct TidesParams {
    pub station: Option<String>,
    /// `YYYYMMDD`; defaults to today (UTC).
    pub date: Option<String>,
    pub hours: Option<String>,
}

#[derive(Serialize)]
pub struct TidesResponse {
    pub station: String,
    pub begin: NaiveDate,
    pub hours: u32,
    pub events: Vec<TideEvent>,
}

/// GET /api/tides
pub async fn tides_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<TidesParams>,
) -> Result<Json<TidesResponse>, ApiError> {
    let station = params::station_id(params::required("station", params.station.as_deref())?)?;
    let begin = match params.date.as_deref() {
        Some(raw) => params::compact_date("date", raw.trim())?,
        None => Utc::now().date_naive(),
    };
    let hours = params::bounded_u32("hours", params.hours.as_deref(), DEFAULT_HOURS, 1..=MAX_HOURS)?;

    let events = state
        .tides
        .tide_predictions(station, begin, hours)
        .await
        .map_err(ApiError::Upstream)?;

    Ok(Json(TidesResponse {
        station: station.to_string(),
        begin,
        hours,
        events,
    }))
}
