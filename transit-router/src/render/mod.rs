//! Map rendering of planned routes.
//!
//! A [`MapRenderer`] turns a sequence of labelled points into a visual
//! artifact. [`HtmlMapRenderer`] writes a self-contained Leaflet page.

mod html;

use std::path::PathBuf;

use serde::Serialize;

use crate::domain::{Coordinates, minutes_to_hhmm};
use crate::journey::{JourneyPlan, RoadTrip};
use crate::planner::Itinerary;
use crate::timetable::TimetableGraph;

pub use html::HtmlMapRenderer;

/// Errors from writing a map.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Template rendering failed
    #[error("template error: {0}")]
    Template(#[from] askama::Error),

    /// Writing the output file failed
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A point on the map with its tooltip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    pub lat: f64,
    pub lon: f64,
    pub label: String,
}

impl MapPoint {
    pub fn new(coords: Coordinates, label: impl Into<String>) -> Self {
        Self {
            lat: coords.lat,
            lon: coords.lon,
            label: label.into(),
        }
    }

    pub fn coords(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lon)
    }
}

/// Draws a path of points.
pub trait MapRenderer {
    /// Render `points` in order. `Ok(None)` means the renderer declined,
    /// e.g. because there is nothing to draw.
    fn render(&self, points: &[MapPoint]) -> Result<Option<PathBuf>, RenderError>;
}

/// Map points for every stop of `itinerary`, labelled with the arrival
/// clock, or `None` if any stop lacks coordinates.
pub fn itinerary_points(graph: &TimetableGraph, itinerary: &Itinerary) -> Option<Vec<MapPoint>> {
    itinerary
        .steps()
        .iter()
        .map(|step| {
            let Some(coords) = graph.coordinates(step.stop()) else {
                tracing::debug!(stop = step.stop(), "No coordinates for stop");
                return None;
            };
            let label = match step.arrival() {
                Some(arrival) => format!("{} ({})", step.stop(), minutes_to_hhmm(arrival)),
                None => step.stop().to_string(),
            };
            Some(MapPoint::new(coords, label))
        })
        .collect()
}

/// Map points along a road route; only the ends are labelled.
pub fn road_points(path: &[Coordinates], from: &str, to: &str) -> Vec<MapPoint> {
    let last = path.len().saturating_sub(1);
    path.iter()
        .enumerate()
        .map(|(i, &coords)| {
            let label = match i {
                0 => from,
                i if i == last => to,
                _ => "",
            };
            MapPoint::new(coords, label)
        })
        .collect()
}

/// Map points along a road trip, labelled with its endpoints.
pub fn road_trip_points(trip: &RoadTrip) -> Vec<MapPoint> {
    road_points(&trip.route.path, trip.from.label(), trip.to.label())
}

/// Map points for a whole journey: the access walk, the stops ridden
/// through, then the egress walk. `None` if a stop lacks coordinates.
pub fn journey_points(graph: &TimetableGraph, plan: &JourneyPlan) -> Option<Vec<MapPoint>> {
    let mut points = Vec::new();

    if let Some(access) = &plan.access {
        let mut walk = road_points(&access.path, plan.from.label(), "");
        // The walk ends at the first stop, which the itinerary adds
        walk.pop();
        points.extend(walk);
    }

    points.extend(itinerary_points(graph, &plan.itinerary)?);

    if let Some(egress) = &plan.egress {
        let walk = road_points(&egress.path, "", plan.to.label());
        points.extend(walk.into_iter().skip(1));
    }

    Some(points)
}
