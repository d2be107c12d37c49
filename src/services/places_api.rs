//! Trait and types for place search.

use anyhow::Result;
use serde::Serialize;

/// A search hit, trimmed to the fields the sauna map shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Place {
    pub id: String,
    pub name: String,
    pub address: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub rating: Option<f64>,
    pub maps_url: Option<String>,
}

/// Abstraction over a free-text place search provider (Google Places).
#[async_trait::async_trait]
pub trait PlacesApi: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<Place>>;
}
