//! Output for the CLI commands: pretty JSON, or CSV appended like a log.

use anyhow::Result;
use chrono::NaiveDate;
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::debug;

use crate::currents::StationPredictions;

/// One prediction flattened with its station, the CSV row shape.
#[derive(Debug, Serialize, PartialEq)]
pub struct PredictionRow<'a> {
    pub date: NaiveDate,
    pub station_id: &'a str,
    pub station_name: &'a str,
    pub lat: f64,
    pub lng: f64,
    pub time: &'a str,
    pub velocity: f64,
}

pub fn flatten(date: NaiveDate, results: &[StationPredictions]) -> Vec<PredictionRow<'_>> {
    results
        .iter()
        .flat_map(|sp| {
            sp.predictions.iter().map(move |p| PredictionRow {
                date,
                station_id: &sp.station.id,
                station_name: &sp.station.name,
                lat: sp.station.lat,
                lng: sp.station.lng,
                time: &p.time,
                velocity: p.velocity,
            })
        })
        .collect()
}

/// Writes `value` as pretty JSON to `path`, or to stdout when `path` is `None`.
pub fn write_json<T: Serialize>(path: Option<&str>, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match path {
        Some(path) => std::fs::write(path, json + "\n")?,
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }
    Ok(())
}

/// Appends every prediction in `results` as a row of the CSV at `path`.
///
/// Creates the file with headers if it does not already exist. Returns the
/// number of rows written.
pub fn append_records(path: &str, date: NaiveDate, results: &[StationPredictions]) -> Result<usize> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV records");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);

    let rows = flatten(date, results);
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(rows.len())
}
