use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use crate::config::SiteConfig;
use crate::directory::{self, Photo, Sauna};
use crate::fetch::BasicClient;
use crate::fetch::auth::{ApiKey, BasicAuth, UrlParam};
use crate::infra::{acuity::AcuityClient, google_places::PlacesClient, noaa::NoaaClient, onebusaway::ObaClient};
use crate::services::{PlacesApi, SchedulingApi, TidesApi, TransitApi};
use crate::stations::{self, Station};

#[derive(Debug, Clone)]
pub struct CurrentsSettings {
    pub interval_minutes: u32,
    pub concurrency: usize,
}

/// Shared, read-only state handed to every handler.
///
/// Providers whose API key is not configured are `None`; their endpoints
/// answer 503 instead of failing upstream on every call.
pub struct AppState {
    pub tides: Arc<dyn TidesApi>,
    pub transit: Option<Arc<dyn TransitApi>>,
    pub places: Option<Arc<dyn PlacesApi>>,
    pub scheduling: Arc<dyn SchedulingApi>,
    /// Stations already filtered by prefix and limit.
    pub stations: Vec<Station>,
    pub saunas: Vec<Sauna>,
    pub gallery: Vec<Photo>,
    pub currents: CurrentsSettings,
}

impl AppState {
    /// Loads static data and wires up the upstream clients.
    pub fn from_config(config: &SiteConfig) -> Result<Self> {
        config.validate()?;

        let all_stations = stations::load_stations(&config.stations_path)?;
        let selected =
            stations::select_stations(&all_stations, &config.station_prefix, config.station_limit);
        info!(
            total = all_stations.len(),
            selected = selected.len(),
            prefix = %config.station_prefix,
            "Current stations selected"
        );

        let saunas = directory::load_saunas(&config.saunas_path)?;
        let gallery = directory::load_gallery(&config.gallery_path)?;

        let http = BasicClient::new()?;

        let tides: Arc<dyn TidesApi> = Arc::new(NoaaClient::new(
            http.clone(),
            config.noaa_base_url.clone(),
            config.noaa_application.clone(),
        ));

        let transit = config
            .oba_api_key
            .as_ref()
            .filter(|key| !key.is_empty())
            .map(|key| {
                let authed = UrlParam {
                    inner: http.clone(),
                    param_name: "key".to_string(),
                    key: key.clone(),
                };
                Arc::new(ObaClient::new(authed, config.oba_base_url.clone())) as Arc<dyn TransitApi>
            });
        if transit.is_none() {
            warn!("OBA_API_KEY not set; transit arrivals disabled");
        }

        let places = config
            .places_api_key
            .as_ref()
            .filter(|key| !key.is_empty())
            .map(|key| -> Result<Arc<dyn PlacesApi>> {
                let authed = ApiKey::new(http.clone(), "X-Goog-Api-Key", key)?;
                Ok(Arc::new(PlacesClient::new(authed, config.places_base_url.clone())))
            })
            .transpose()?;
        if places.is_none() {
            warn!("GOOGLE_PLACES_API_KEY not set; place search disabled");
        }

        let scheduling: Arc<dyn SchedulingApi> =
            match (&config.acuity_user_id, &config.acuity_api_key) {
                (Some(user), Some(key)) => Arc::new(AcuityClient::new(
                    BasicAuth::new(http.clone(), user.clone(), key.clone())?,
                    config.acuity_base_url.clone(),
                )),
                _ => Arc::new(AcuityClient::new(http, config.acuity_base_url.clone())),
            };

        Ok(Self {
            tides,
            transit,
            places,
            scheduling,
            stations: selected,
            saunas,
            gallery,
            currents: CurrentsSettings {
                interval_minutes: config.interval_minutes,
                concurrency: config.concurrency,
            },
        })
    }
}
