//! Runtime configuration.
//!
//! Every setting is a CLI flag with an environment-variable fallback, so the
//! same binary runs from a `.env` file locally and from plain env in a
//! container.

use anyhow::Result;
use clap::Args;

use crate::currents::MAX_STATIONS;
use crate::infra;

/// Intervals NOAA accepts for `currents_predictions`.
const CURRENT_INTERVALS: &[u32] = &[1, 6, 10, 30, 60];

#[derive(Args, Debug, Clone)]
pub struct SiteConfig {
    /// CSV table of current stations (`id,name,lat,lng`)
    #[arg(long, env = "STATIONS_PATH", default_value = "data/current_stations.csv")]
    pub stations_path: String,

    /// Only stations whose id starts with this prefix are mapped
    #[arg(long, env = "STATION_PREFIX", default_value = "PUG")]
    pub station_prefix: String,

    /// Maximum number of stations fetched per request
    #[arg(long, env = "STATION_LIMIT", default_value_t = MAX_STATIONS)]
    pub station_limit: usize,

    /// Maximum concurrent upstream requests during aggregation
    #[arg(long, env = "FETCH_CONCURRENCY", default_value_t = 32)]
    pub concurrency: usize,

    /// Minutes between current predictions
    #[arg(long, env = "CURRENTS_INTERVAL", default_value_t = 60)]
    pub interval_minutes: u32,

    /// Sauna directory JSON
    #[arg(long, env = "SAUNAS_PATH", default_value = "data/saunas.json")]
    pub saunas_path: String,

    /// Photo gallery manifest JSON
    #[arg(long, env = "GALLERY_PATH", default_value = "data/gallery.json")]
    pub gallery_path: String,

    #[arg(long, env = "NOAA_BASE_URL", default_value = infra::noaa::DEFAULT_BASE_URL)]
    pub noaa_base_url: String,

    /// Application name sent to NOAA with every request
    #[arg(long, env = "NOAA_APPLICATION", default_value = "site_api")]
    pub noaa_application: String,

    #[arg(long, env = "OBA_BASE_URL", default_value = infra::onebusaway::DEFAULT_BASE_URL)]
    pub oba_base_url: String,

    #[arg(long, env = "OBA_API_KEY", hide_env_values = true)]
    pub oba_api_key: Option<String>,

    #[arg(long, env = "PLACES_BASE_URL", default_value = infra::google_places::DEFAULT_BASE_URL)]
    pub places_base_url: String,

    #[arg(long, env = "GOOGLE_PLACES_API_KEY", hide_env_values = true)]
    pub places_api_key: Option<String>,

    #[arg(long, env = "ACUITY_BASE_URL", default_value = infra::acuity::DEFAULT_BASE_URL)]
    pub acuity_base_url: String,

    #[arg(long, env = "ACUITY_USER_ID")]
    pub acuity_user_id: Option<String>,

    #[arg(long, env = "ACUITY_API_KEY", hide_env_values = true)]
    pub acuity_api_key: Option<String>,
}

impl SiteConfig {
    /// Rejects settings that would make every request fail.
    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            anyhow::bail!("concurrency must be at least 1");
        }
        if self.station_limit == 0 || self.station_limit > MAX_STATIONS {
            anyhow::bail!("station limit must be between 1 and {MAX_STATIONS}");
        }
        if !CURRENT_INTERVALS.contains(&self.interval_minutes) {
            anyhow::bail!(
                "currents interval {} is not one of {:?}",
                self.interval_minutes,
                CURRENT_INTERVALS
            );
        }
        for (name, url) in [
            ("NOAA", &self.noaa_base_url),
            ("OneBusAway", &self.oba_base_url),
            ("Places", &self.places_base_url),
            ("Acuity", &self.acuity_base_url),
        ] {
            let parsed = reqwest::Url::parse(url)
                .map_err(|e| anyhow::anyhow!("{name} base URL '{url}' is invalid: {e}"))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                anyhow::bail!("{name} base URL must be http(s), got '{url}'");
            }
        }
        if self.acuity_user_id.is_some() != self.acuity_api_key.is_some() {
            anyhow::bail!("ACUITY_USER_ID and ACUITY_API_KEY must be set together");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        config: SiteConfig,
    }

    fn parse(args: &[&str]) -> SiteConfig {
        let mut argv = vec!["site_api"];
        argv.extend_from_slice(args);
        Wrapper::parse_from(argv).config
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = parse(&[]);
        assert_eq!(config.station_limit, MAX_STATIONS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_concurrency() {
        assert!(parse(&["--concurrency", "0"]).validate().is_err());
    }

    #[test]
    fn test_rejects_station_limit_over_cap() {
        assert!(parse(&["--station-limit", "201"]).validate().is_err());
    }

    #[test]
    fn test_rejects_unsupported_interval() {
        assert!(parse(&["--interval-minutes", "15"]).validate().is_err());
    }

    #[test]
    fn test_rejects_half_configured_acuity_credentials() {
        assert!(parse(&["--acuity-user-id", "42"]).validate().is_err());
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        assert!(parse(&["--noaa-base-url", "ftp://example.com"]).validate().is_err());
    }
}
