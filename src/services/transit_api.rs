//! Trait and types for realtime transit arrivals.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One upcoming arrival at a stop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Arrival {
    pub route: String,
    pub headsign: String,
    pub scheduled: DateTime<Utc>,
    /// Realtime prediction, when the vehicle is reporting.
    pub predicted: Option<DateTime<Utc>>,
    /// Minutes from the provider's "now" to the predicted (or scheduled) time.
    pub minutes_away: i64,
    pub realtime: bool,
}

impl Arrival {
    /// The time riders should expect: the prediction if there is one.
    pub fn expected(&self) -> DateTime<Utc> {
        self.predicted.unwrap_or(self.scheduled)
    }
}

/// Abstraction over a transit arrivals provider (OneBusAway).
#[async_trait::async_trait]
pub trait TransitApi: Send + Sync {
    /// Returns arrivals at `stop_id` within the next `minutes_after` minutes,
    /// soonest first.
    async fn arrivals(&self, stop_id: &str, minutes_after: u32) -> Result<Vec<Arrival>>;
}
