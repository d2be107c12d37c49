use axum::Json;
use serde::Deserialize;

use crate::api::extract::Query;
use crate::api::{ApiError, params};
use crate::tax::{self, MarriageTaxComparison};

#[derive(Debug, Deserialize)]
pub struct MarriageTaxParams {
    pub income_a: Option<String>,
    pub income_b: Option<String>,
    pub year: Option<String>,
}

/// GET /api/marriage-tax
pub async fn marriage_tax_handler(
    Query(params): Query<MarriageTaxParams>,
) -> Result<Json<MarriageTaxComparison>, ApiError> {
    let income_a = params::amount("income_a", params::required("income_a", params.income_a.as_deref())?)?;
    let income_b = params::amount("income_b", params::required("income_b", params.income_b.as_deref())?)?;
    let year = match params.year.as_deref().map(str::trim) {
        Some(raw) => raw
            .parse::<u16>()
            .map_err(|_| ApiError::bad_request("'year' must be a four-digit year"))?,
        None => tax::DEFAULT_YEAR,
    };

    tax::compare(income_a, income_b, year)
        .map(Json)
        .map_err(|e| ApiError::bad_request(e.to_string()))
}
