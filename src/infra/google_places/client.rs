use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::fetch::{HttpClient, execute_json};
use crate::infra::join_path;
use crate::services::places_api::{Place, PlacesApi};

pub const DEFAULT_BASE_URL: &str = "https://places.googleapis.com";

const FIELD_MASK: &str = "places.id,places.displayName,places.formattedAddress,\
places.location,places.rating,places.googleMapsUri";

/// Client for Google Places Text Search (New).
///
/// Authenticate by wrapping the transport in
/// [`ApiKey`](crate::fetch::auth::ApiKey) with the `X-Goog-Api-Key` header.
pub struct PlacesClient<C> {
    http: C,
    base_url: String,
    max_results: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    text_query: &'a str,
    max_result_count: u32,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    places: Vec<RawPlace>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPlace {
    id: String,
    #[serde(default)]
    display_name: Option<LocalizedText>,
    #[serde(default)]
    formatted_address: Option<String>,
    #[serde(default)]
    location: Option<LatLng>,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    google_maps_uri: Option<String>,
}

#[derive(Deserialize)]
struct LocalizedText {
    text: String,
}

#[derive(Deserialize)]
struct LatLng {
    latitude: f64,
    longitude: f64,
}

impl<C: HttpClient> PlacesClient<C> {
    pub fn new(http: C, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            max_results: 20,
        }
    }
}

impl From<RawPlace> for Place {
    fn from(raw: RawPlace) -> Self {
        Place {
            name: raw
                .display_name
                .map(|n| n.text)
                .unwrap_or_else(|| raw.id.clone()),
            id: raw.id,
            address: raw.formatted_address,
            lat: raw.location.as_ref().map(|l| l.latitude),
            lng: raw.location.as_ref().map(|l| l.longitude),
            rating: raw.rating,
            maps_url: raw.google_maps_uri,
        }
    }
}

#[async_trait]
impl<C: HttpClient> PlacesApi for PlacesClient<C> {
    async fn search(&self, query: &str) -> Result<Vec<Place>> {
        let url = join_path(&self.base_url, &["v1", "places:searchText"])?;
        let body = serde_json::to_vec(&SearchRequest {
            text_query: query,
            max_result_count: self.max_results,
        })?;

        let mut req = reqwest::Request::new(reqwest::Method::POST, url);
        req.headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        req.headers_mut()
            .insert("x-goog-fieldmask", HeaderValue::from_static(FIELD_MASK));
        *req.body_mut() = Some(body.into());

        debug!(query, "Searching places");
        let resp: SearchResponse = execute_json(&self.http, req).await?;
        Ok(resp.places.into_iter().map(Place::from).collect())
    }
}
