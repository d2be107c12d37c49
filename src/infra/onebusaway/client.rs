use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::fetch::{HttpClient, fetch_json};
use crate::infra::join_path;
use crate::services::transit_api::{Arrival, TransitApi};

pub const DEFAULT_BASE_URL: &str = "https://api.pugetsound.onebusaway.org";

/// Client for the OneBusAway REST API.
///
/// The API key is not handled here; wrap the transport in
/// [`UrlParam`](crate::fetch::auth::UrlParam) with `param_name = "key"`.
pub struct ObaClient<C> {
    http: C,
    base_url: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObaResponse {
    code: u16,
    #[serde(default)]
    text: Option<String>,
    current_time: i64,
    data: Option<ObaData>,
}

#[derive(Deserialize)]
struct ObaData {
    entry: ObaEntry,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObaEntry {
    #[serde(default)]
    arrivals_and_departures: Vec<RawArrival>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArrival {
    #[serde(default)]
    route_short_name: Option<String>,
    #[serde(default)]
    route_long_name: Option<String>,
    #[serde(default)]
    trip_headsign: Option<String>,
    scheduled_arrival_time: i64,
    #[serde(default)]
    predicted_arrival_time: i64,
}

impl<C: HttpClient> ObaClient<C> {
    pub fn new(http: C, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

fn from_millis(ms: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(ms)
}

/// Reshapes one upstream record. A predicted time of 0 means the vehicle
/// is not reporting and only the schedule is known.
fn to_arrival(raw: RawArrival, now_ms: i64) -> Option<Arrival> {
    let scheduled = from_millis(raw.scheduled_arrival_time)?;
    let predicted = match raw.predicted_arrival_time {
        0 => None,
        ms => from_millis(ms),
    };
    let expected_ms = predicted.map_or(raw.scheduled_arrival_time, |_| raw.predicted_arrival_time);
    let until_ms = expected_ms.checked_sub(now_ms)?;

    let route = raw
        .route_short_name
        .filter(|s| !s.is_empty())
        .or(raw.route_long_name)
        .unwrap_or_default();

    Some(Arrival {
        route,
        headsign: raw.trip_headsign.unwrap_or_default(),
        scheduled,
        predicted,
        minutes_away: until_ms.div_euclid(60_000),
        realtime: predicted.is_some(),
    })
}

#[async_trait]
impl<C: HttpClient> TransitApi for ObaClient<C> {
    async fn arrivals(&self, stop_id: &str, minutes_after: u32) -> Result<Vec<Arrival>> {
        let mut url = join_path(
            &self.base_url,
            &[
                "api",
                "where",
                "arrivals-and-departures-for-stop",
                &format!("{stop_id}.json"),
            ],
        )?;
        url.query_pairs_mut()
            .append_pair("minutesBefore", "0")
            .append_pair("minutesAfter", &minutes_after.to_string());

        debug!(stop_id, "Requesting arrivals");
        let resp: ObaResponse = fetch_json(&self.http, url.as_str()).await?;

        if resp.code != 200 {
            anyhow::bail!(
                "OneBusAway returned code {} for stop {stop_id}: {}",
                resp.code,
                resp.text.unwrap_or_default()
            );
        }

        let data = resp
            .data
            .ok_or_else(|| anyhow::anyhow!("OneBusAway response for {stop_id} has no data"))?;

        let mut arrivals: Vec<Arrival> = data
            .entry
            .arrivals_and_departures
            .into_iter()
            .filter_map(|raw| to_arrival(raw, resp.current_time))
            .collect();
        arrivals.sort_by_key(Arrival::expected);

        Ok(arrivals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(scheduled: i64, predicted: i64) -> RawArrival {
        RawArrival {
            route_short_name: Some("8".into()),
            route_long_name: None,
            trip_headsign: Some("Seattle Center".into()),
            scheduled_arrival_time: scheduled,
            predicted_arrival_time: predicted,
        }
    }

    #[test]
    fn test_scheduled_only_arrival() {
        let now = 1_717_250_000_000;
        let a = to_arrival(raw(now + 5 * 60_000, 0), now).unwrap();
        assert!(!a.realtime);
        assert!(a.predicted.is_none());
        assert_eq!(a.minutes_away, 5);
    }

    #[test]
    fn test_predicted_arrival_wins() {
        let now = 1_717_250_000_000;
        let a = to_arrival(raw(now + 5 * 60_000, now + 7 * 60_000 + 30_000), now).unwrap();
        assert!(a.realtime);
        assert_eq!(a.minutes_away, 7);
        assert_eq!(a.expected(), a.predicted.unwrap());
    }

    #[test]
    fn test_route_falls_back_to_long_name() {
        let mut r = raw(0, 0);
        r.route_short_name = Some(String::new());
        r.route_long_name = Some("Link light rail".into());
        assert_eq!(to_arrival(r, 0).unwrap().route, "Link light rail");
    }

    #[test]
    fn test_extreme_current_time_drops_record() {
        assert!(to_arrival(raw(1_717_250_000_000, 0), i64::MIN).is_none());
        assert!(to_arrival(raw(-1_717_250_000_000, 0), i64::MAX).is_none());
    }
}
