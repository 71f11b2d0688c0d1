//! Free-text place resolution against a Nominatim-style search endpoint.

use serde::Deserialize;
use std::sync::Arc;

use super::transport::HttpTransport;
use crate::core::geo::LatLng;
use crate::{Error, Result};

/// Location plus the canonical label the search endpoint returned
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPlace {
    pub location: LatLng,
    pub display_name: String,
}

/// Nominatim returns coordinates as strings
#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
    display_name: String,
}

pub struct PlaceResolver {
    transport: Arc<dyn HttpTransport>,
    search_url: String,
}

impl PlaceResolver {
    pub fn new(transport: Arc<dyn HttpTransport>, search_url: impl Into<String>) -> Self {
        Self {
            transport,
            search_url: search_url.into(),
        }
    }

    /// Resolves `"<place>, <region>"` with a single request, keeping only
    /// the first hit.
    pub async fn resolve(&self, place: &str, region: &str) -> Result<ResolvedPlace> {
        let query = search_query(place, region);
        log::info!("resolving place '{}'", query);

        let response = self
            .transport
            .get(
                &self.search_url,
                &[("q", query.as_str()), ("format", "json"), ("limit", "1")],
            )
            .await
            .map_err(|e| Error::ResolutionRequestFailed(e.to_string()))?;

        if !response.is_success() {
            return Err(Error::ResolutionRequestFailed(format!(
                "search endpoint answered HTTP {}",
                response.status
            )));
        }

        let hits: Vec<SearchHit> = serde_json::from_slice(&response.body)
            .map_err(|e| Error::ResolutionRequestFailed(format!("unreadable response: {}", e)))?;

        let Some(hit) = hits.into_iter().next() else {
            return Err(Error::PlaceNotFound { query });
        };

        let location = parse_location(&hit)?;
        log::info!("resolved '{}' to {} ({})", query, location, hit.display_name);

        Ok(ResolvedPlace {
            location,
            display_name: hit.display_name,
        })
    }
}

fn search_query(place: &str, region: &str) -> String {
    let region = region.trim();
    if region.is_empty() {
        place.trim().to_string()
    } else {
        format!("{}, {}", place.trim(), region)
    }
}

fn parse_location(hit: &SearchHit) -> Result<LatLng> {
    let parse = |value: &str, axis: &str| {
        value.trim().parse::<f64>().map_err(|_| {
            Error::ResolutionRequestFailed(format!("invalid {} '{}' in search result", axis, value))
        })
    };

    let location = LatLng::new(parse(&hit.lat, "latitude")?, parse(&hit.lon, "longitude")?);
    if !location.is_valid() {
        return Err(Error::ResolutionRequestFailed(format!(
            "search result out of range: {:?}",
            location
        )));
    }
    Ok(location)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::transport::ScriptedTransport;

    const SEARCH: &str = "https://geo.test/search";

    fn resolver(transport: &Arc<ScriptedTransport>) -> PlaceResolver {
        let transport: Arc<dyn HttpTransport> = transport.clone();
        PlaceResolver::new(transport, SEARCH)
    }

    #[tokio::test]
    async fn test_first_hit_wins() {
        let body = r#"[
            {"lat": "48.8588897", "lon": "2.3200410", "display_name": "Paris, France"},
            {"lat": "33.66", "lon": "-95.55", "display_name": "Paris, Texas"}
        ]"#;
        let transport = Arc::new(ScriptedTransport::new().respond(SEARCH, 200, body));

        let place = resolver(&transport).resolve("Paris", "France").await.unwrap();
        assert_eq!(place.location, LatLng::new(48.8588897, 2.3200410));
        assert_eq!(place.display_name, "Paris, France");

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].params,
            vec![
                ("q".to_string(), "Paris, France".to_string()),
                ("format".to_string(), "json".to_string()),
                ("limit".to_string(), "1".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_result_is_not_found() {
        let transport = Arc::new(ScriptedTransport::new().respond(SEARCH, 200, "[]"));

        let err = resolver(&transport).resolve("Atlantis", "").await.unwrap_err();
        assert!(matches!(err, Error::PlaceNotFound { ref query } if query == "Atlantis"));
    }

    #[tokio::test]
    async fn test_request_failures() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .respond(SEARCH, 503, "unavailable")
                .fail(SEARCH, "timed out")
                .respond(SEARCH, 200, r#"{"error": "bad"}"#)
                .respond(SEARCH, 200, r#"[{"lat": "north", "lon": "1", "display_name": "x"}]"#),
        );
        let resolver = resolver(&transport);

        for _ in 0..4 {
            let err = resolver.resolve("Oslo", "Norway").await.unwrap_err();
            assert!(matches!(err, Error::ResolutionRequestFailed(_)), "{err}");
        }
        // No retries
        assert_eq!(transport.requests().len(), 4);
    }

    #[test]
    fn test_search_query() {
        assert_eq!(search_query(" Tokyo ", "Japan"), "Tokyo, Japan");
        assert_eq!(search_query("Tokyo", "  "), "Tokyo");
    }
}
