//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Coordinates, minutes_to_hhmm};
use crate::journey::{Endpoint, JourneyPlan, RoadTrip};
use crate::planner::PathStep;
use crate::road::{RoadRoute, TravelMode};

/// Request to resolve a stop name.
#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    /// Free-text stop name
    pub q: String,

    /// Use the strict similarity cutoff
    #[serde(default)]
    pub strict: bool,
}

/// Result of resolving a stop name.
#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub query: String,

    /// Best matching stop, if similar enough
    pub stop: Option<String>,

    /// Similarity of the match in `[0, 1]`
    pub similarity: Option<f64>,
}

/// Request for the stop nearest to a position.
#[derive(Debug, Deserialize)]
pub struct NearestRequest {
    pub lat: f64,
    pub lon: f64,
}

/// The stop nearest to a position.
#[derive(Debug, Serialize)]
pub struct NearestResponse {
    pub stop: String,
    pub coords: Coordinates,
    pub distance_m: f64,
}

/// Request to plan a journey.
#[derive(Debug, Deserialize)]
pub struct RouteRequest {
    /// Stop name or address
    pub from: String,

    /// Stop name or address
    pub to: String,

    /// Time in HH:MM format (defaults to now)
    pub time: Option<String>,

    /// Treat `time` as the latest arrival
    #[serde(default)]
    pub arrive_by: bool,

    /// `time` (default) or `transfers`
    pub sort: Option<String>,

    /// Also write the route map to the map output directory
    #[serde(default)]
    pub save_map: bool,
}

/// One stop of a planned journey.
#[derive(Debug, Serialize, PartialEq)]
pub struct StepResult {
    pub stop: String,

    /// Line ridden to reach this stop (absent for the origin)
    pub line: Option<String>,

    /// Boarding time of that ride, HH:MM
    pub departure: Option<String>,

    /// Arrival time at this stop, HH:MM
    pub arrival: Option<String>,
}

impl StepResult {
    pub fn from_step(step: &PathStep) -> Self {
        match step {
            PathStep::Origin { stop } => StepResult {
                stop: stop.clone(),
                line: None,
                departure: None,
                arrival: None,
            },
            PathStep::Travel {
                stop,
                line,
                departure,
                arrival,
            } => StepResult {
                stop: stop.clone(),
                line: Some(line.clone()),
                departure: Some(minutes_to_hhmm(*departure)),
                arrival: Some(minutes_to_hhmm(*arrival)),
            },
        }
    }
}

/// A walk or other street route.
#[derive(Debug, Serialize)]
pub struct RoadResult {
    /// Whole minutes, rounded up
    pub minutes: u32,
    pub path: Vec<Coordinates>,
}

impl RoadResult {
    pub fn from_route(route: &RoadRoute) -> Self {
        RoadResult {
            minutes: route.travel_minutes.max(0.0).ceil() as u32,
            path: route.path.clone(),
        }
    }
}

/// A planned journey.
#[derive(Debug, Serialize)]
pub struct RouteResponse {
    pub from: Endpoint,
    pub to: Endpoint,

    /// First boarding, HH:MM
    pub departure: Option<String>,

    /// Arrival at the last stop, HH:MM
    pub arrival: Option<String>,

    pub transfers: usize,

    /// Walk from the start address to the first stop
    pub access: Option<RoadResult>,

    pub steps: Vec<StepResult>,

    /// Walk from the last stop to the destination address
    pub egress: Option<RoadResult>,

    /// Where the route map was written, if requested
    pub map_file: Option<String>,
}

impl RouteResponse {
    pub fn from_plan(plan: &JourneyPlan) -> Self {
        let itinerary = &plan.itinerary;
        RouteResponse {
            from: plan.from.clone(),
            to: plan.to.clone(),
            departure: itinerary.departure_time().map(minutes_to_hhmm),
            arrival: itinerary.arrival_time().map(minutes_to_hhmm),
            transfers: itinerary.transfer_count(),
            access: plan.access.as_ref().map(RoadResult::from_route),
            steps: itinerary.steps().iter().map(StepResult::from_step).collect(),
            egress: plan.egress.as_ref().map(RoadResult::from_route),
            map_file: None,
        }
    }
}

/// Request for a street route without transit.
#[derive(Debug, Deserialize)]
pub struct RoadRequest {
    pub from: String,
    pub to: String,

    /// `drive`, `bike` or `walk` (default)
    pub mode: Option<String>,

    /// Also write the route map to the map output directory
    #[serde(default)]
    pub save_map: bool,
}

/// A street route without transit.
#[derive(Debug, Serialize)]
pub struct RoadTripResponse {
    pub from: Endpoint,
    pub to: Endpoint,
    pub mode: TravelMode,
    pub route: RoadResult,

    /// Where the route map was written, if requested
    pub map_file: Option<String>,
}

impl RoadTripResponse {
    pub fn from_trip(trip: &RoadTrip) -> Self {
        RoadTripResponse {
            from: trip.from.clone(),
            to: trip.to.clone(),
            mode: trip.mode,
            route: RoadResult::from_route(&trip.route),
            map_file: None,
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
