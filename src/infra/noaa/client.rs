use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use reqwest::Url;
use serde::Deserialize;
use tracing::debug;

use crate::fetch::{HttpClient, fetch_json};
use crate::services::tides_api::{TideEvent, TideKind, TidesApi};

pub const DEFAULT_BASE_URL: &str = "https://api.tidesandcurrents.noaa.gov";

/// Client for the NOAA CO-OPS `datagetter` endpoint.
pub struct NoaaClient<C> {
    http: C,
    base_url: String,
    application: String,
}

#[derive(Deserialize)]
struct TidePredictionsResponse {
    #[serde(default)]
    predictions: Option<Vec<RawTidePrediction>>,
    #[serde(default)]
    error: Option<NoaaError>,
}

#[derive(Deserialize)]
struct RawTidePrediction {
    t: String,
    v: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Deserialize)]
struct NoaaError {
    message: String,
}

impl<C: HttpClient> NoaaClient<C> {
    /// `application` identifies the site to NOAA, as their terms ask.
    pub fn new(http: C, base_url: impl Into<String>, application: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            application: application.into(),
        }
    }

    fn datagetter_url(&self, params: &[(&str, String)]) -> Result<Url> {
        let endpoint = format!(
            "{}/api/prod/datagetter",
            self.base_url.trim_end_matches('/')
        );
        let mut url = Url::parse(&endpoint)?;
        url.query_pairs_mut()
            .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())))
            .append_pair("units", "english")
            .append_pair("time_zone", "lst_ldt")
            .append_pair("format", "json")
            .append_pair("application", &self.application);
        Ok(url)
    }
}

fn parse_tide_event(raw: RawTidePrediction) -> Result<TideEvent> {
    let time = NaiveDateTime::parse_from_str(&raw.t, "%Y-%m-%d %H:%M")
        .with_context(|| format!("bad prediction time '{}'", raw.t))?;
    let height_ft: f64 = raw
        .v
        .trim()
        .parse()
        .with_context(|| format!("bad prediction height '{}'", raw.v))?;
    let kind = match raw.kind.as_str() {
        "H" | "HH" => TideKind::High,
        "L" | "LL" => TideKind::Low,
        other => anyhow::bail!("unknown prediction type '{other}'"),
    };

    Ok(TideEvent {
        time: time.format("%Y-%m-%dT%H:%M:%S").to_string(),
        height_ft,
        kind,
    })
}

#[async_trait]
impl<C: HttpClient> TidesApi for NoaaClient<C> {
    async fn current_predictions(
        &self,
        station_id: &str,
        date: NaiveDate,
        interval_minutes: u32,
    ) -> Result<serde_json::Value> {
        let day = date.format("%Y%m%d").to_string();
        let url = self.datagetter_url(&[
            ("product", "currents_predictions".to_string()),
            ("station", station_id.to_string()),
            ("begin_date", day.clone()),
            ("end_date", day),
            ("interval", interval_minutes.to_string()),
        ])?;

        debug!(station_id, url = %url, "Requesting current predictions");
        fetch_json(&self.http, url.as_str()).await
    }

    async fn tide_predictions(
        &self,
        station_id: &str,
        begin: NaiveDate,
        hours: u32,
    ) -> Result<Vec<TideEvent>> {
        let url = self.datagetter_url(&[
            ("product", "predictions".to_string()),
            ("station", station_id.to_string()),
            ("begin_date", begin.format("%Y%m%d").to_string()),
            ("range", hours.to_string()),
            ("datum", "MLLW".to_string()),
            ("interval", "hilo".to_string()),
        ])?;

        debug!(station_id, url = %url, "Requesting tide predictions");
        let resp: TidePredictionsResponse = fetch_json(&self.http, url.as_str()).await?;

        if let Some(err) = resp.error {
            anyhow::bail!("NOAA error for station {station_id}: {}", err.message);
        }

        resp.predictions
            .ok_or_else(|| anyhow::anyhow!("NOAA response for {station_id} has no predictions"))?
            .into_iter()
            .map(parse_tide_event)
            .collect()
    }
}
