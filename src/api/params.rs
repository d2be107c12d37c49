//! Query-parameter validation shared by the handlers.
//!
//! Handlers take every parameter as `Option<String>` and run it through
//! these so that a bad value produces a 400 with a readable message.

use std::ops::RangeInclusive;

use chrono::NaiveDate;

use super::ApiError;

/// Returns the trimmed value, rejecting absent or blank parameters.
pub fn required<'a>(name: &str, value: Option<&'a str>) -> Result<&'a str, ApiError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::bad_request(format!("missing required parameter '{name}'"))),
    }
}

/// Parses a NOAA-style `YYYYMMDD` date.
pub fn compact_date(name: &str, value: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value, "%Y%m%d")
        .map_err(|_| ApiError::bad_request(format!("'{name}' must be a date in YYYYMMDD form")))
}

/// Parses an ISO `YYYY-MM-DD` date.
pub fn iso_date(name: &str, value: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ApiError::bad_request(format!("'{name}' must be a date in YYYY-MM-DD form")))
}

pub fn bounded_u32(
    name: &str,
    value: Option<&str>,
    default: u32,
    range: RangeInclusive<u32>,
) -> Result<u32, ApiError> {
    let Some(raw) = value else {
        return Ok(default);
    };
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|n| range.contains(n))
        .ok_or_else(|| {
            ApiError::bad_request(format!(
                "'{name}' must be a whole number between {} and {}",
                range.start(),
                range.end()
            ))
        })
}

/// Parses a dollar amount, tolerating `$` and thousands separators.
pub fn amount(name: &str, value: &str) -> Result<f64, ApiError> {
    let cleaned: String = value
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' '))
        .collect();
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .ok_or_else(|| ApiError::bad_request(format!("'{name}' must be a non-negative amount")))
}

/// NOAA station ids: short and alphanumeric (`9447130`, `PUG1515`, `PUG1515_1`).
pub fn station_id(value: &str) -> Result<&str, ApiError> {
    let ok = (1..=16).contains(&value.len())
        && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if ok {
        Ok(value)
    } else {
        Err(ApiError::bad_request(format!("'{value}' is not a valid station id")))
    }
}

/// OneBusAway stop ids are `<agency>_<stop>`, e.g. `1_75403`.
pub fn stop_id(value: &str) -> Result<&str, ApiError> {
    let well_formed = value.len() <= 64
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        && value
            .split_once('_')
            .is_some_and(|(agency, stop)| !agency.is_empty() && !stop.is_empty());
    if well_formed {
        Ok(value)
    } else {
        Err(ApiError::bad_request(format!(
            "'{value}' is not a valid stop id (expected AGENCY_STOP)"
        )))
    }
}
