//! Concrete upstream clients behind the [`crate::services`] traits.

pub mod acuity;
pub mod google_places;
pub mod noaa;
pub mod onebusaway;

use anyhow::Result;
use reqwest::Url;

/// Joins `segments` onto `base`, percent-encoding each one.
pub(crate) fn join_path(base: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|_| anyhow::anyhow!("base URL '{base}' cannot carry a path"))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_path_handles_trailing_slash() {
        let a = join_path("http://localhost:1234", &["api", "x.json"]).unwrap();
        let b = join_path("http://localhost:1234/", &["api", "x.json"]).unwrap();
        assert_eq!(a.as_str(), "http://localhost:1234/api/x.json");
        assert_eq!(a, b);
    }

    #[test]
    fn test_join_path_encodes_segments() {
        let url = join_path("http://localhost", &["a b/c"]).unwrap();
        assert_eq!(url.path(), "/a%20b%2Fc");
    }
}
