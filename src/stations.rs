//! Static tidal-station metadata.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// A NOAA CO-OPS station as listed in the site's station table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

/// Reads stations from CSV with an `id,name,lat,lng` header.
///
/// # Errors
///
/// Returns an error naming the offending line if a row is missing a column,
/// has a non-numeric coordinate or a coordinate outside the valid range.
pub fn parse_stations<R: Read>(reader: R) -> Result<Vec<Station>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut stations = Vec::new();

    for (idx, row) in rdr.deserialize::<Station>().enumerate() {
        // header is line 1
        let line = idx + 2;
        let station = row.with_context(|| format!("station table line {line}"))?;
        if !(-90.0..=90.0).contains(&station.lat) || !(-180.0..=180.0).contains(&station.lng) {
            anyhow::bail!(
                "station table line {line}: coordinates ({}, {}) out of range",
                station.lat,
                station.lng
            );
        }
        stations.push(station);
    }

    Ok(stations)
}

/// Loads the station table from `path`.
pub fn load_stations(path: impl AsRef<Path>) -> Result<Vec<Station>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open station table {}", path.display()))?;
    let stations = parse_stations(file)?;
    debug!(path = %path.display(), count = stations.len(), "Station table loaded");
    Ok(stations)
}

/// Keeps the stations whose id follows the `prefix` naming convention, in
/// table order, capped at `limit`. An empty prefix keeps every station.
pub fn select_stations(stations: &[Station], prefix: &str, limit: usize) -> Vec<Station> {
    stations
        .iter()
        .filter(|s| s.id.starts_with(prefix))
        .take(limit)
        .cloned()
        .collect()
}
