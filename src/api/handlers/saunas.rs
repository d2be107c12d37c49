//! Sauna directory and live availability.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::extract::Query;
use crate::api::{ApiError, AppState, params};
use crate::directory::{Sauna, find_sauna};
use crate::services::Slot;

#[derive(Debug, Deserialize)]
pub struct AvailabilityParams {
    /// `YYYY-MM-DD`
    pub date: Option<String>,
}

#[derive(Serialize)]
pub struct AvailabilityResponse {
    pub sauna: String,
    pub date: NaiveDate,
    pub slots: Vec<Slot>,
}

/// GET /api/saunas
pub async fn list_saunas_handler(Extension(state): Extension<Arc<AppState>>) -> Json<Vec<Sauna>> {
    Json(state.saunas.clone())
}

/// GET /api/saunas/:sauna_id/availability
pub async fn availability_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(sauna_id): Path<String>,
    Query(params): Query<AvailabilityParams>,
) -> Result<Json<AvailabilityResponse>, ApiError> {
    let sauna = find_sauna(&state.saunas, &sauna_id)
        .ok_or_else(|| ApiError::NotFound(format!("no sauna with id '{sauna_id}'")))?;
    let date = params::iso_date("date", params::required("date", params.date.as_deref())?)?;

    let booking = sauna.booking.as_ref().ok_or_else(|| {
        ApiError::bad_request(format!("sauna '{sauna_id}' does not take online bookings"))
    })?;

    let slots = state
        .scheduling
        .availability(booking, date)
        .await
        .map_err(ApiError::Upstream)?;

    Ok(Json(AvailabilityResponse {
        sauna: sauna.id.clone(),
        date,
        slots,
    }))
}
