//! OSRM HTTP road router.
//!
//! Uses the `/route/v1/{profile}/{lon},{lat};{lon},{lat}` endpoint with full
//! GeoJSON geometry. Which modes work depends on the profiles the server was
//! built with; the public demo server only routes cars.

use serde::Deserialize;
use tracing::debug;

use crate::domain::Coordinates;

use super::error::RoadError;
use super::{RoadRoute, RoadRouter, TravelMode};

/// Default base URL for the public OSRM demo server.
const DEFAULT_BASE_URL: &str = "https://router.project-osrm.org";

/// Configuration for the OSRM client.
#[derive(Debug, Clone)]
pub struct OsrmConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

impl OsrmConfig {
    /// Set a custom base URL (self-hosted instance or tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

#[derive(Debug, Deserialize)]
struct RouteResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
struct Route {
    /// Seconds
    duration: f64,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    /// GeoJSON order: `[lon, lat]`
    coordinates: Vec<[f64; 2]>,
}

/// OSRM API client.
#[derive(Debug, Clone)]
pub struct OsrmClient {
    http: reqwest::Client,
    base_url: String,
}

impl OsrmClient {
    /// Create a new client with the given configuration.
    pub fn new(config: OsrmConfig) -> Result<Self, RoadError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn route_url(&self, from: Coordinates, to: Coordinates, mode: TravelMode) -> String {
        format!(
            "{}/route/v1/{}/{},{};{},{}",
            self.base_url,
            mode.osrm_profile(),
            from.lon,
            from.lat,
            to.lon,
            to.lat
        )
    }
}

impl RoadRouter for OsrmClient {
    async fn route(
        &self,
        from: Coordinates,
        to: Coordinates,
        mode: TravelMode,
    ) -> Result<RoadRoute, RoadError> {
        let url = self.route_url(from, to, mode);

        let response = self
            .http
            .get(&url)
            .query(&[("overview", "full"), ("geometries", "geojson")])
            .send()
            .await?;

        // OSRM reports "NoRoute" with a 400 status and a JSON body, so the
        // body is inspected before the status.
        let status = response.status();
        let body = response.text().await?;

        match parse_route(&body) {
            Ok(route) => {
                debug!(%from, %to, ?mode, minutes = route.travel_minutes, "Road route found");
                Ok(route)
            }
            Err(RoadError::Json { .. }) if !status.is_success() => Err(RoadError::Api {
                status: status.as_u16(),
                message: body.chars().take(500).collect(),
            }),
            Err(e) => Err(e),
        }
    }
}

fn parse_route(body: &str) -> Result<RoadRoute, RoadError> {
    let response: RouteResponse = serde_json::from_str(body).map_err(|e| RoadError::Json {
        message: e.to_string(),
    })?;

    match response.code.as_str() {
        "Ok" => {}
        "NoRoute" | "NoSegment" => return Err(RoadError::RouteNotFound),
        other => {
            return Err(RoadError::Api {
                status: 0,
                message: format!(
                    "{other}: {}",
                    response.message.unwrap_or_default()
                ),
            });
        }
    }

    let route = response
        .routes
        .into_iter()
        .next()
        .ok_or(RoadError::RouteNotFound)?;

    Ok(RoadRoute {
        path: route
            .geometry
            .coordinates
            .into_iter()
            .map(|[lon, lat]| Coordinates::new(lat, lon))
            .collect(),
        travel_minutes: route.duration / 60.0,
    })
}
