//! Door-to-door journey planning.
//!
//! Ties the pieces together for a free-text query: each endpoint is either a
//! known stop (fuzzy matched) or an address (geocoded, then attached to the
//! nearest stop with a walk). The transit leg comes from the timetable
//! router; the walks come from the road router.

use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::Coordinates;
use crate::geocode::{GeocodeError, Geocoder};
use crate::planner::{Itinerary, RouteQuery, SearchError, SortBy, TimetableRouter};
use crate::road::{RoadError, RoadRoute, RoadRouter, TravelMode};
use crate::stops::{DEFAULT_CUTOFF, find_nearest_stop, resolve_stop};
use crate::timetable::TimetableGraph;

/// Errors from planning a journey.
#[derive(Debug, thiserror::Error)]
pub enum JourneyError {
    #[error("empty place query")]
    EmptyQuery,

    #[error(transparent)]
    Geocode(#[from] GeocodeError),

    #[error(transparent)]
    Road(#[from] RoadError),

    #[error(transparent)]
    Search(#[from] SearchError),

    /// An address with no stop that has coordinates
    #[error("no stop near {0}")]
    NoNearbyStop(String),

    #[error("no coordinates for stop {0}")]
    NoCoordinates(String),

    #[error("no connection from {from} to {to}")]
    NoRoute { from: String, to: String },
}

/// Where a journey starts or ends.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Endpoint {
    /// A stop of the timetable
    Stop { name: String },
    /// A geocoded address
    Address { query: String, coords: Coordinates },
}

impl Endpoint {
    /// Position of the endpoint, if known.
    pub fn coords(&self, graph: &TimetableGraph) -> Option<Coordinates> {
        match self {
            Endpoint::Stop { name } => graph.coordinates(name),
            Endpoint::Address { coords, .. } => Some(*coords),
        }
    }

    /// Stop name or the address as typed.
    pub fn label(&self) -> &str {
        match self {
            Endpoint::Stop { name } => name,
            Endpoint::Address { query, .. } => query,
        }
    }
}

/// Endings of German street names, compared lowercased.
const STREET_SUFFIXES: [&str; 6] = ["str.", "straße", "strasse", "gasse", "allee", "weg"];

/// Whether free text reads as a street address rather than a stop name.
///
/// Addresses carry a house number after a word ("Hauptstraße 12",
/// "Am Markt 3a") or a street-name ending ("Kaiserallee").
///
/// # Examples
///
/// ```
/// use transit_router::journey::looks_like_address;
///
/// assert!(looks_like_address("Bretten Bahnhofstr. 5"));
/// assert!(looks_like_address("Musterstrasse 5, Teststadt"));
/// assert!(looks_like_address("Freibadweg"));
/// assert!(!looks_like_address("Bretten Bahnhof"));
/// assert!(!looks_like_address("Knittlingen ZOB / Schule"));
/// ```
pub fn looks_like_address(query: &str) -> bool {
    let words: Vec<String> = query
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect();

    let numbered = words
        .windows(2)
        .any(|pair| pair[0].chars().any(char::is_alphabetic) && is_house_number(&pair[1]));
    let street = words
        .iter()
        .any(|w| STREET_SUFFIXES.iter().any(|suffix| w.ends_with(suffix)));

    numbered || street
}

/// "12", "3a", "117B".
fn is_house_number(word: &str) -> bool {
    let digits = word.trim_end_matches(|c: char| c.is_ascii_alphabetic());
    !digits.is_empty()
        && digits.len() <= 4
        && word.len() - digits.len() <= 1
        && digits.chars().all(|c| c.is_ascii_digit())
}

/// Interpret free text as a stop name, falling back to geocoding.
///
/// Text that looks like a street address goes straight to the geocoder, so
/// "Bahnhofstr. 5" is never mistaken for the stop "Bahnhof".
pub async fn resolve_endpoint<G: Geocoder>(
    graph: &TimetableGraph,
    geocoder: &G,
    query: &str,
) -> Result<Endpoint, JourneyError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(JourneyError::EmptyQuery);
    }

    if looks_like_address(query) {
        debug!(query, "Query looks like an address");
    } else if let Some(name) = resolve_stop(query, graph.stop_names(), DEFAULT_CUTOFF) {
        debug!(query, stop = name, "Query matched a stop");
        return Ok(Endpoint::Stop {
            name: name.to_string(),
        });
    }

    let coords = geocoder.geocode(query).await?;
    Ok(Endpoint::Address {
        query: query.to_string(),
        coords,
    })
}

/// A journey request in free text.
#[derive(Debug, Clone)]
pub struct JourneyRequest {
    pub from: String,
    pub to: String,
    /// Departure clock, or latest arrival when `arrive_by`
    pub minutes: f64,
    pub arrive_by: bool,
    pub sort_by: SortBy,
}

/// A planned door-to-door journey.
#[derive(Debug, Clone, Serialize)]
pub struct JourneyPlan {
    pub from: Endpoint,
    pub to: Endpoint,
    /// Walk from an address to the first stop
    pub access: Option<RoadRoute>,
    pub itinerary: Itinerary,
    /// Walk from the last stop to an address
    pub egress: Option<RoadRoute>,
}

/// Plan a journey between two free-text places.
///
/// Addresses are attached to their nearest stop. The walk there shifts the
/// transit query: a depart-at query boards after the access walk, an
/// arrive-by query must leave time for the egress walk. Walks that cannot be
/// routed are left out rather than failing the journey.
pub async fn plan_journey<G: Geocoder, R: RoadRouter>(
    router: &TimetableRouter,
    geocoder: &G,
    road: &R,
    request: &JourneyRequest,
) -> Result<JourneyPlan, JourneyError> {
    let graph = router.graph();

    let (from, to) = futures::try_join!(
        resolve_endpoint(graph, geocoder, &request.from),
        resolve_endpoint(graph, geocoder, &request.to),
    )?;

    let board = transit_stop(graph, &from)?;
    let alight = transit_stop(graph, &to)?;

    let (access, egress) = futures::join!(
        walk(road, &from, graph.coordinates(&board), true),
        walk(road, &to, graph.coordinates(&alight), false),
    );

    let reference_minutes = if request.arrive_by {
        request.minutes - egress.as_ref().map_or(0.0, |w| w.travel_minutes)
    } else {
        request.minutes + access.as_ref().map_or(0.0, |w| w.travel_minutes)
    };

    let query = RouteQuery {
        start: board.clone(),
        goal: alight.clone(),
        reference_minutes,
        reverse: request.arrive_by,
        sort_by: request.sort_by,
    };

    let itinerary = router.route(&query)?.ok_or(JourneyError::NoRoute {
        from: board,
        to: alight,
    })?;

    Ok(JourneyPlan {
        from,
        to,
        access,
        itinerary,
        egress,
    })
}

/// The stop where transit starts or ends for `endpoint`.
fn transit_stop(graph: &TimetableGraph, endpoint: &Endpoint) -> Result<String, JourneyError> {
    match endpoint {
        Endpoint::Stop { name } => Ok(name.clone()),
        Endpoint::Address { query, coords } => find_nearest_stop(graph, *coords)
            .map(str::to_string)
            .ok_or_else(|| JourneyError::NoNearbyStop(query.clone())),
    }
}

/// Walk between an address endpoint and its stop. `None` for stop
/// endpoints and for walks that cannot be routed.
async fn walk<R: RoadRouter>(
    road: &R,
    endpoint: &Endpoint,
    stop: Option<Coordinates>,
    towards_stop: bool,
) -> Option<RoadRoute> {
    let Endpoint::Address { query, coords } = endpoint else {
        return None;
    };
    let stop = stop?;
    let (a, b) = if towards_stop {
        (*coords, stop)
    } else {
        (stop, *coords)
    };

    match road.route(a, b, TravelMode::Walk).await {
        Ok(route) => Some(route),
        Err(e) => {
            warn!(address = %query, error = %e, "Walk could not be routed");
            None
        }
    }
}

/// A door-to-door road trip without transit.
#[derive(Debug, Clone, Serialize)]
pub struct RoadTrip {
    pub from: Endpoint,
    pub to: Endpoint,
    pub mode: TravelMode,
    pub route: RoadRoute,
}

/// Route between two free-text places over the street network.
pub async fn plan_road_trip<G: Geocoder, R: RoadRouter>(
    graph: &TimetableGraph,
    geocoder: &G,
    road: &R,
    from: &str,
    to: &str,
    mode: TravelMode,
) -> Result<RoadTrip, JourneyError> {
    let (from, to) = futures::try_join!(
        resolve_endpoint(graph, geocoder, from),
        resolve_endpoint(graph, geocoder, to),
    )?;

    let a = from
        .coords(graph)
        .ok_or_else(|| JourneyError::NoCoordinates(from.label().to_string()))?;
    let b = to
        .coords(graph)
        .ok_or_else(|| JourneyError::NoCoordinates(to.label().to_string()))?;

    let route = road.route(a, b, mode).await?;
    Ok(RoadTrip {
        from,
        to,
        mode,
        route,
    })
}
