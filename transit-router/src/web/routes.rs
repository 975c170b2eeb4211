//! HTTP route handlers.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::domain::{Coordinates, now_minutes, parse_time_to_minutes};
use crate::geocode::GeocodeError;
use crate::journey::{
    JourneyError, JourneyPlan, JourneyRequest, RoadTrip, plan_journey, plan_road_trip,
};
use crate::planner::{SearchError, SortBy};
use crate::render::{MapPoint, MapRenderer, RenderError, journey_points, road_trip_points};
use crate::road::{RoadError, TravelMode};
use crate::stops::{DEFAULT_CUTOFF, STRICT_CUTOFF, nearest_with_distance, resolve_stop, similarity};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/stops/resolve", get(resolve_stop_name))
        .route("/api/stops/nearest", get(nearest_stop))
        .route("/api/route", get(plan_route))
        .route("/api/road", get(road_route))
        .route("/map", get(route_map))
        .route("/map/road", get(road_map))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Fuzzy-match a stop name.
async fn resolve_stop_name(
    State(state): State<AppState>,
    Query(req): Query<ResolveRequest>,
) -> Json<ResolveResponse> {
    let cutoff = if req.strict { STRICT_CUTOFF } else { DEFAULT_CUTOFF };
    let graph = state.router.graph();

    let stop = resolve_stop(&req.q, graph.stop_names(), cutoff);
    let score = stop.map(|name| similarity(&req.q.trim().to_lowercase(), &name.to_lowercase()));

    Json(ResolveResponse {
        stop: stop.map(str::to_string),
        similarity: score,
        query: req.q,
    })
}

/// Stop closest to a position.
async fn nearest_stop(
    State(state): State<AppState>,
    Query(req): Query<NearestRequest>,
) -> Result<Json<NearestResponse>, AppError> {
    let graph = state.router.graph();
    let (stop, distance_m) = nearest_with_distance(graph, Coordinates::new(req.lat, req.lon))
        .ok_or_else(|| AppError::NotFound {
            message: "No stop has coordinates".to_string(),
        })?;

    let coords = graph.coordinates(stop).ok_or_else(|| AppError::Internal {
        message: format!("Nearest stop {stop} has no coordinates"),
    })?;

    Ok(Json(NearestResponse {
        stop: stop.to_string(),
        coords,
        distance_m,
    }))
}

/// Plan a journey between two stops or addresses.
async fn plan_route(
    State(state): State<AppState>,
    Query(req): Query<RouteRequest>,
) -> Result<Json<RouteResponse>, AppError> {
    let plan = plan(&state, &req).await?;
    let mut response = RouteResponse::from_plan(&plan);

    if req.save_map {
        response.map_file = match journey_points(state.router.graph(), &plan) {
            Some(points) => write_map(&state, points).await?,
            None => {
                debug!("Route map skipped, stops without coordinates");
                None
            }
        };
    }

    Ok(Json(response))
}

/// Interactive map of a planned journey.
async fn route_map(
    State(state): State<AppState>,
    Query(req): Query<RouteRequest>,
) -> Result<Response, AppError> {
    let plan = plan(&state, &req).await?;

    let points =
        journey_points(state.router.graph(), &plan).ok_or_else(|| AppError::NotFound {
            message: "Route passes stops without coordinates".to_string(),
        })?;

    map_page(&state, &points)
}

/// Street route without transit.
async fn road_route(
    State(state): State<AppState>,
    Query(req): Query<RoadRequest>,
) -> Result<Json<RoadTripResponse>, AppError> {
    let trip = road_trip(&state, &req).await?;
    let mut response = RoadTripResponse::from_trip(&trip);

    if req.save_map {
        response.map_file = write_map(&state, road_trip_points(&trip)).await?;
    }

    Ok(Json(response))
}

/// Interactive map of a street route.
async fn road_map(
    State(state): State<AppState>,
    Query(req): Query<RoadRequest>,
) -> Result<Response, AppError> {
    let trip = road_trip(&state, &req).await?;
    map_page(&state, &road_trip_points(&trip))
}

async fn road_trip(state: &AppState, req: &RoadRequest) -> Result<RoadTrip, AppError> {
    let mode = req
        .mode
        .as_deref()
        .map(str::parse::<TravelMode>)
        .transpose()
        .map_err(|e| AppError::BadRequest {
            message: e.to_string(),
        })?
        .unwrap_or_default();

    let trip = plan_road_trip(
        state.router.graph(),
        state.geocoder.as_ref(),
        state.road.as_ref(),
        &req.from,
        &req.to,
        mode,
    )
    .await?;
    Ok(trip)
}

async fn plan(state: &AppState, req: &RouteRequest) -> Result<JourneyPlan, AppError> {
    let request = journey_request(req)?;
    let plan = plan_journey(
        &state.router,
        state.geocoder.as_ref(),
        state.road.as_ref(),
        &request,
    )
    .await?;
    Ok(plan)
}

/// Parse the query string into a journey request.
fn journey_request(req: &RouteRequest) -> Result<JourneyRequest, AppError> {
    let minutes = match req.time.as_deref() {
        Some(text) => parse_time_to_minutes(text).map_err(|e| AppError::BadRequest {
            message: e.to_string(),
        })?,
        None => now_minutes(),
    };

    let sort_by = req
        .sort
        .as_deref()
        .map(str::parse::<SortBy>)
        .transpose()
        .map_err(|e| AppError::BadRequest {
            message: e.to_string(),
        })?
        .unwrap_or_default();

    Ok(JourneyRequest {
        from: req.from.clone(),
        to: req.to.clone(),
        minutes,
        arrive_by: req.arrive_by,
        sort_by,
    })
}

/// HTML page drawing `points`.
fn map_page(state: &AppState, points: &[MapPoint]) -> Result<Response, AppError> {
    let html = state
        .maps
        .render_html(points)?
        .ok_or_else(|| AppError::NotFound {
            message: "Nothing to draw".to_string(),
        })?;

    Ok(Html(html).into_response())
}

/// Write a map file off the async runtime.
async fn write_map(state: &AppState, points: Vec<MapPoint>) -> Result<Option<String>, AppError> {
    let maps = Arc::clone(&state.maps);
    let path = tokio::task::spawn_blocking(move || maps.render(&points))
        .await
        .map_err(|e| AppError::Internal {
            message: format!("Map writer failed: {e}"),
        })??;

    Ok(path.map(|p| p.display().to_string()))
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<JourneyError> for AppError {
    fn from(e: JourneyError) -> Self {
        let message = e.to_string();
        match e {
            JourneyError::EmptyQuery | JourneyError::Search(SearchError::InvalidQuery(_)) => {
                AppError::BadRequest { message }
            }
            JourneyError::Geocode(GeocodeError::AddressNotFound(_))
            | JourneyError::Road(RoadError::RouteNotFound)
            | JourneyError::NoNearbyStop(_)
            | JourneyError::NoCoordinates(_)
            | JourneyError::NoRoute { .. } => AppError::NotFound { message },
            JourneyError::Geocode(_) | JourneyError::Road(_) => AppError::Internal { message },
        }
    }
}

impl From<RenderError> for AppError {
    fn from(e: RenderError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        warn!(%status, %message, "Request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
