//! Tidal-current prediction aggregation for the currents map.
//!
//! One request per station goes out concurrently; whatever comes back is
//! normalized, checked for shape, and merged in station order. A station
//! that fails or returns something unexpected is logged and left out.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::{Instrument, debug, info, warn};

use crate::services::TidesApi;
use crate::stations::Station;

/// Upper bound on the number of stations fetched for one map render.
pub const MAX_STATIONS: usize = 200;

const NOAA_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";
const OUTPUT_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A single predicted current speed along the station's major axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    /// Station-local time, `YYYY-MM-DDTHH:MM:SS`.
    pub time: String,
    /// Knots; positive is flood, negative is ebb.
    pub velocity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationPredictions {
    pub station: Station,
    pub predictions: Vec<Prediction>,
}

#[derive(Debug, Clone)]
pub struct AggregateOptions {
    pub date: NaiveDate,
    pub interval_minutes: u32,
    /// Maximum in-flight upstream requests.
    pub concurrency: usize,
}

/// Why a station's payload was left out of the merged result.
#[derive(Debug, Error, PartialEq)]
pub enum MalformedPayload {
    #[error("upstream error: {0}")]
    Upstream(String),

    #[error("missing current_predictions.cp array")]
    MissingRecords,

    #[error("no prediction records")]
    Empty,

    #[error("record {index}: {reason}")]
    BadRecord { index: usize, reason: String },

    #[error("expected {expected} records, got {actual}")]
    CountMismatch { expected: usize, actual: usize },
}

/// Decodes one NOAA `currents_predictions` payload.
///
/// The upstream sometimes answers 200 with `{"error": {...}}`, and velocity
/// arrives as either a number or a numeric string depending on the station.
pub fn normalize_payload(payload: &Value) -> Result<Vec<Prediction>, MalformedPayload> {
    if let Some(err) = payload.get("error") {
        let message = err
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        return Err(MalformedPayload::Upstream(message.to_string()));
    }

    let records = payload
        .get("current_predictions")
        .and_then(|cp| cp.get("cp"))
        .and_then(Value::as_array)
        .ok_or(MalformedPayload::MissingRecords)?;

    if records.is_empty() {
        return Err(MalformedPayload::Empty);
    }

    records
        .iter()
        .enumerate()
        .map(|(index, record)| -> Result<Prediction, MalformedPayload> {
            let bad = |reason: &str| MalformedPayload::BadRecord {
                index,
                reason: reason.to_string(),
            };

            let raw_time = record
                .get("Time")
                .and_then(Value::as_str)
                .ok_or_else(|| bad("missing Time"))?;
            let time = reformat_time(raw_time).ok_or_else(|| bad("unparseable Time"))?;

            let velocity = match record.get("Velocity_Major") {
                Some(Value::Number(n)) => n.as_f64(),
                Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
                _ => None,
            }
            .filter(|v| v.is_finite())
            .ok_or_else(|| bad("missing or non-numeric Velocity_Major"))?;

            Ok(Prediction { time, velocity })
        })
        .collect()
}

/// `2024-06-01 13:30` -> `2024-06-01T13:30:00`.
pub fn reformat_time(raw: &str) -> Option<String> {
    NaiveDateTime::parse_from_str(raw.trim(), NOAA_TIME_FORMAT)
        .ok()
        .map(|t| t.format(OUTPUT_TIME_FORMAT).to_string())
}

/// Fetches current predictions for every station and merges the usable ones.
///
/// The expected record count is taken from the first well-formed payload in
/// station order; any later payload with a different count is dropped. The
/// returned list keeps the relative order of `stations`.
#[tracing::instrument(skip(api, stations), fields(stations = stations.len(), date = %options.date))]
pub async fn aggregate_currents(
    api: Arc<dyn TidesApi>,
    stations: &[Station],
    options: &AggregateOptions,
) -> Vec<StationPredictions> {
    let semaphore = Arc::new(Semaphore::new(options.concurrency.max(1)));
    let mut tasks = Vec::with_capacity(stations.len());

    for station in stations {
        let api = api.clone();
        let sem = semaphore.clone();
        let station_id = station.id.clone();
        let date = options.date;
        let interval = options.interval_minutes;

        let span = tracing::info_span!(
            "fetch_station",
            station_id = %station.id,
            station_name = %station.name,
        );

        let task = tokio::spawn(
            async move {
                let _permit = sem.acquire_owned().await?;
                let payload = api.current_predictions(&station_id, date, interval).await?;
                Ok::<Value, anyhow::Error>(payload)
            }
            .instrument(span),
        );

        tasks.push(task);
    }

    let mut expected: Option<usize> = None;
    let mut merged = Vec::new();

    for (station, task) in stations.iter().zip(tasks) {
        let payload = match task.await {
            Ok(Ok(payload)) => payload,
            Ok(Err(e)) => {
                warn!(station_id = %station.id, error = %e, "Current prediction fetch failed");
                continue;
            }
            Err(e) => {
                warn!(station_id = %station.id, error = %e, "Current prediction task did not complete");
                continue;
            }
        };

        let checked = normalize_payload(&payload).and_then(|predictions| {
            match expected {
                Some(n) if n != predictions.len() => Err(MalformedPayload::CountMismatch {
                    expected: n,
                    actual: predictions.len(),
                }),
                _ => Ok(predictions),
            }
        });

        match checked {
            Ok(predictions) => {
                expected.get_or_insert(predictions.len());
                debug!(station_id = %station.id, records = predictions.len(), "Station accepted");
                merged.push(StationPredictions {
                    station: station.clone(),
                    predictions,
                });
            }
            Err(e) => {
                warn!(station_id = %station.id, reason = %e, "Skipping malformed payload");
            }
        }
    }

    info!(
        requested = stations.len(),
        returned = merged.len(),
        "Current predictions aggregated"
    );

    merged
}
