//! Street-network routing for walking, cycling and driving.
//!
//! Used for the walk to the first stop and from the last one, and for
//! door-to-door trips that do not use transit at all.

mod error;
mod osrm;
mod straight;

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::Coordinates;

pub use error::RoadError;
pub use osrm::{OsrmClient, OsrmConfig};
pub use straight::StraightLineRouter;

/// How the road is travelled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    Drive,
    Bike,
    #[default]
    Walk,
}

impl TravelMode {
    /// OSRM profile name.
    pub fn osrm_profile(self) -> &'static str {
        match self {
            TravelMode::Drive => "driving",
            TravelMode::Bike => "cycling",
            TravelMode::Walk => "foot",
        }
    }

    /// Average speed in km/h for estimates without a road network.
    pub fn typical_speed_kmh(self) -> f64 {
        match self {
            TravelMode::Drive => 50.0,
            TravelMode::Bike => 15.0,
            TravelMode::Walk => 4.5,
        }
    }
}

/// Error returned for an unknown travel mode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown travel mode {0:?} (expected drive, bike or walk)")]
pub struct InvalidTravelMode(String);

impl FromStr for TravelMode {
    type Err = InvalidTravelMode;

    /// Accepts the English names and the German `auto`, `rad`, `fuss`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "drive" | "car" | "auto" => Ok(TravelMode::Drive),
            "bike" | "cycle" | "rad" => Ok(TravelMode::Bike),
            "walk" | "foot" | "fuss" | "fuß" => Ok(TravelMode::Walk),
            _ => Err(InvalidTravelMode(s.to_string())),
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TravelMode::Drive => f.write_str("drive"),
            TravelMode::Bike => f.write_str("bike"),
            TravelMode::Walk => f.write_str("walk"),
        }
    }
}

/// A street route: the coordinates along it and how long it takes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoadRoute {
    pub path: Vec<Coordinates>,
    pub travel_minutes: f64,
}

/// Routes between two coordinates over the street network.
pub trait RoadRouter {
    /// Route from `from` to `to`, or [`RoadError::RouteNotFound`].
    fn route(
        &self,
        from: Coordinates,
        to: Coordinates,
        mode: TravelMode,
    ) -> impl Future<Output = Result<RoadRoute, RoadError>> + Send;
}

/// The road router chosen at startup.
pub enum RoadBackend {
    Osrm(OsrmClient),
    StraightLine(StraightLineRouter),
}

impl RoadRouter for RoadBackend {
    async fn route(
        &self,
        from: Coordinates,
        to: Coordinates,
        mode: TravelMode,
    ) -> Result<RoadRoute, RoadError> {
        match self {
            RoadBackend::Osrm(router) => router.route(from, to, mode).await,
            RoadBackend::StraightLine(router) => router.route(from, to, mode).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_travel_mode() {
        assert_eq!("drive".parse::<TravelMode>().unwrap(), TravelMode::Drive);
        assert_eq!("Auto".parse::<TravelMode>().unwrap(), TravelMode::Drive);
        assert_eq!("rad".parse::<TravelMode>().unwrap(), TravelMode::Bike);
        assert_eq!("FUSS".parse::<TravelMode>().unwrap(), TravelMode::Walk);
        assert!("bahn".parse::<TravelMode>().is_err());
    }

    #[test]
    fn display_roundtrip() {
        for mode in [TravelMode::Drive, TravelMode::Bike, TravelMode::Walk] {
            assert_eq!(mode.to_string().parse::<TravelMode>().unwrap(), mode);
        }
    }

    #[test]
    fn osrm_profiles() {
        assert_eq!(TravelMode::Drive.osrm_profile(), "driving");
        assert_eq!(TravelMode::Bike.osrm_profile(), "cycling");
        assert_eq!(TravelMode::Walk.osrm_profile(), "foot");
    }
}
