//! Nominatim HTTP geocoder.
//!
//! Queries the OpenStreetMap Nominatim `/search` endpoint, restricted to a
//! bounding box so that short street names resolve inside the network's
//! region instead of somewhere else in the world.

use serde::Deserialize;
use tracing::debug;

use crate::domain::Coordinates;

use super::Geocoder;
use super::error::GeocodeError;

/// Default base URL for the public Nominatim instance.
const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Nominatim's usage policy requires an identifying user agent.
const DEFAULT_USER_AGENT: &str = "transit-router/0.1";

/// A latitude/longitude bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewbox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Viewbox {
    /// The Karlsruhe district.
    pub const KARLSRUHE: Viewbox = Viewbox {
        south: 48.8,
        west: 8.2,
        north: 49.3,
        east: 8.9,
    };

    /// Nominatim's `viewbox` parameter: `<west>,<south>,<east>,<north>`.
    fn to_param(self) -> String {
        format!("{},{},{},{}", self.west, self.south, self.east, self.north)
    }
}

/// Configuration for the Nominatim client.
#[derive(Debug, Clone)]
pub struct NominatimConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Sent as `User-Agent` on every request
    pub user_agent: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Restrict results to this box (`bounded=1`)
    pub viewbox: Option<Viewbox>,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 10,
            viewbox: Some(Viewbox::KARLSRUHE),
        }
    }
}

impl NominatimConfig {
    /// Set a custom base URL (self-hosted instance or tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the bounding box, or `None` to search everywhere.
    pub fn with_viewbox(mut self, viewbox: Option<Viewbox>) -> Self {
        self.viewbox = viewbox;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// One search hit. Nominatim sends coordinates as strings.
#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

/// Nominatim API client.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    http: reqwest::Client,
    base_url: String,
    viewbox: Option<Viewbox>,
}

impl NominatimClient {
    /// Create a new client with the given configuration.
    pub fn new(config: NominatimConfig) -> Result<Self, GeocodeError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            viewbox: config.viewbox,
        })
    }

    fn search_params(&self, query: &str) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("q", query.to_string()),
            ("format", "jsonv2".to_string()),
            ("limit", "1".to_string()),
        ];
        if let Some(viewbox) = self.viewbox {
            params.push(("viewbox", viewbox.to_param()));
            params.push(("bounded", "1".to_string()));
        }
        params
    }
}

impl Geocoder for NominatimClient {
    async fn geocode(&self, query: &str) -> Result<Coordinates, GeocodeError> {
        let url = format!("{}/search", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&self.search_params(query))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeocodeError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        let coords = parse_places(&body)?
            .ok_or_else(|| GeocodeError::AddressNotFound(query.to_string()))?;

        debug!(query, %coords, "Geocoded address");
        Ok(coords)
    }
}

/// First hit of a search response, if any.
fn parse_places(body: &str) -> Result<Option<Coordinates>, GeocodeError> {
    let places: Vec<Place> = serde_json::from_str(body).map_err(|e| GeocodeError::Json {
        message: e.to_string(),
    })?;

    let Some(place) = places.into_iter().next() else {
        return Ok(None);
    };

    let parse = |value: &str, field: &str| {
        value.parse::<f64>().map_err(|_| GeocodeError::Json {
            message: format!(
                "bad {field} {value:?} for {}",
                place.display_name.as_deref().unwrap_or("result")
            ),
        })
    };

    Ok(Some(Coordinates::new(
        parse(&place.lat, "lat")?,
        parse(&place.lon, "lon")?,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_first_hit() {
        let body = r#"[
            {"lat": "49.0093", "lon": "8.4037", "display_name": "Marktplatz, Karlsruhe"},
            {"lat": "48.0", "lon": "9.0", "display_name": "Elsewhere"}
        ]"#;
        let coords = parse_places(body).unwrap().unwrap();
        assert_eq!(coords, Coordinates::new(49.0093, 8.4037));
    }

    #[test]
    fn parse_empty_result() {
        assert_eq!(parse_places("[]").unwrap(), None);
    }

    #[test]
    fn parse_garbage() {
        assert!(matches!(
            parse_places("<html>"),
            Err(GeocodeError::Json { .. })
        ));
        assert!(matches!(
            parse_places(r#"[{"lat": "north", "lon": "8.4"}]"#),
            Err(GeocodeError::Json { .. })
        ));
    }

    #[test]
    fn bounded_search_params() {
        let client = NominatimClient::new(NominatimConfig::default()).unwrap();
        let params = client.search_params("Kaiserstraße 12");

        assert!(params.contains(&("q", "Kaiserstraße 12".to_string())));
        assert!(params.contains(&("format", "jsonv2".to_string())));
        assert!(params.contains(&("viewbox", "8.2,48.8,8.9,49.3".to_string())));
        assert!(params.contains(&("bounded", "1".to_string())));
    }

    #[test]
    fn unbounded_search_params() {
        let config = NominatimConfig::default()
            .with_base_url("http://localhost:8080/")
            .with_viewbox(None);
        let client = NominatimClient::new(config).unwrap();

        assert_eq!(client.base_url, "http://localhost:8080");
        assert!(client.search_params("x").iter().all(|(k, _)| *k != "bounded"));
    }
}
