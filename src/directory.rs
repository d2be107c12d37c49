//! Static content served alongside the live tools: the sauna directory and
//! the photo gallery manifest. Both are plain JSON files edited by hand.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// How to look up live availability for a sauna on its scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    /// Scheduler owner id (the public booking page's `owner` parameter).
    pub owner: String,
    pub appointment_type_id: String,
    #[serde(default)]
    pub calendar_id: Option<String>,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_timezone() -> String {
    "America/Los_Angeles".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sauna {
    pub id: String,
    pub name: String,
    pub city: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub booking: Option<Booking>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub id: String,
    pub title: String,
    pub album: String,
    pub src: String,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub taken: Option<NaiveDate>,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid JSON in {}", path.display()))
}

fn ensure_unique_ids<'a>(kind: &str, ids: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            anyhow::bail!("duplicate {kind} id '{id}'");
        }
    }
    Ok(())
}

/// Loads the sauna directory, rejecting duplicate ids.
pub fn load_saunas(path: impl AsRef<Path>) -> Result<Vec<Sauna>> {
    let saunas: Vec<Sauna> = read_json(path.as_ref())?;
    ensure_unique_ids("sauna", saunas.iter().map(|s| s.id.as_str()))?;
    Ok(saunas)
}

/// Loads the gallery manifest, newest photos first. Undated photos sort last.
pub fn load_gallery(path: impl AsRef<Path>) -> Result<Vec<Photo>> {
    let mut photos: Vec<Photo> = read_json(path.as_ref())?;
    ensure_unique_ids("photo", photos.iter().map(|p| p.id.as_str()))?;
    photos.sort_by(|a, b| b.taken.cmp(&a.taken));
    Ok(photos)
}

pub fn find_sauna<'a>(saunas: &'a [Sauna], id: &str) -> Option<&'a Sauna> {
    saunas.iter().find(|s| s.id == id)
}

/// Case-insensitive album filter; `None` returns everything.
pub fn photos_in_album<'a>(photos: &'a [Photo], album: Option<&str>) -> Vec<&'a Photo> {
    match album {
        Some(album) => photos
            .iter()
            .filter(|p| p.album.eq_ignore_ascii_case(album))
            .collect(),
        None => photos.iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn test_load_saunas_with_optional_booking() {
        let f = write_temp(
            r#"[
              {"id": "cedar", "name": "Cedar", "city": "Seattle", "lat": 47.6, "lng": -122.3,
               "booking": {"owner": "123", "appointment_type_id": "456"}},
              {"id": "dock", "name": "Dock", "city": "Tacoma", "lat": 47.2, "lng": -122.4}
            ]"#,
        );
        let saunas = load_saunas(f.path()).unwrap();
        assert_eq!(saunas.len(), 2);
        let booking = saunas[0].booking.as_ref().unwrap();
        assert_eq!(booking.timezone, "America/Los_Angeles");
        assert!(saunas[1].booking.is_none());
        assert_eq!(find_sauna(&saunas, "dock").unwrap().city, "Tacoma");
        assert!(find_sauna(&saunas, "nope").is_none());
    }

    #[test]
    fn test_load_saunas_rejects_duplicates() {
        let f = write_temp(
            r#"[
              {"id": "a", "name": "A", "city": "X", "lat": 0, "lng": 0},
              {"id": "a", "name": "B", "city": "Y", "lat": 0, "lng": 0}
            ]"#,
        );
        let err = load_saunas(f.path()).unwrap_err();
        assert!(err.to_string().contains("duplicate sauna id 'a'"));
    }

    #[test]
    fn test_gallery_sorted_and_filtered() {
        let f = write_temp(
            r#"[
              {"id": "1", "title": "Old", "album": "Coast", "src": "/p/1.jpg", "width": 10, "height": 10, "taken": "2020-01-01"},
              {"id": "2", "title": "Undated", "album": "misc", "src": "/p/2.jpg", "width": 10, "height": 10},
              {"id": "3", "title": "New", "album": "coast", "src": "/p/3.jpg", "width": 10, "height": 10, "taken": "2023-05-02"}
            ]"#,
        );
        let photos = load_gallery(f.path()).unwrap();
        let ids: Vec<_> = photos.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["3", "1", "2"]);

        let coast = photos_in_album(&photos, Some("COAST"));
        assert_eq!(coast.len(), 2);
        assert_eq!(photos_in_album(&photos, None).len(), 3);
    }
}
