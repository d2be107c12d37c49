//! Trait and types for tide and current predictions.

use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;

/// Whether a hi/lo tide prediction is a high or a low water.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TideKind {
    High,
    Low,
}

/// A single predicted high or low water.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TideEvent {
    /// Station-local time, `YYYY-MM-DDTHH:MM:SS`.
    pub time: String,
    pub height_ft: f64,
    pub kind: TideKind,
}

/// Abstraction over a tide/current prediction provider (NOAA CO-OPS).
#[async_trait::async_trait]
pub trait TidesApi: Send + Sync {
    /// Returns the raw current-prediction payload for one station and day.
    ///
    /// The payload is deliberately left undecoded: upstream shapes vary by
    /// station and the aggregation decides what counts as well-formed.
    async fn current_predictions(
        &self,
        station_id: &str,
        date: NaiveDate,
        interval_minutes: u32,
    ) -> Result<serde_json::Value>;

    /// Returns hi/lo tide events starting at `begin` and spanning `hours`.
    async fn tide_predictions(
        &self,
        station_id: &str,
        begin: NaiveDate,
        hours: u32,
    ) -> Result<Vec<TideEvent>>;
}
