//! Application state for the web layer.

use std::sync::Arc;

use crate::geocode::GeocoderBackend;
use crate::planner::TimetableRouter;
use crate::render::HtmlMapRenderer;
use crate::road::RoadBackend;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Timetable graph and route search
    pub router: Arc<TimetableRouter>,

    /// Address lookup
    pub geocoder: Arc<GeocoderBackend>,

    /// Street routing for walks and road trips
    pub road: Arc<RoadBackend>,

    /// Route map output
    pub maps: Arc<HtmlMapRenderer>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        router: TimetableRouter,
        geocoder: GeocoderBackend,
        road: RoadBackend,
        maps: HtmlMapRenderer,
    ) -> Self {
        Self {
            router: Arc::new(router),
            geocoder: Arc::new(geocoder),
            road: Arc::new(road),
            maps: Arc::new(maps),
        }
    }
}
