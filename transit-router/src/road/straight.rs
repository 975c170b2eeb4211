//! Offline road router: a straight line at a typical speed per mode.

use crate::domain::Coordinates;

use super::error::RoadError;
use super::{RoadRoute, RoadRouter, TravelMode};

/// Great-circle "router" used when no OSRM server is configured.
///
/// Never fails unless `max_distance_m` is set and exceeded, which stands in
/// for "not reachable" in tests.
#[derive(Debug, Clone, Default)]
pub struct StraightLineRouter {
    max_distance_m: Option<f64>,
}

impl StraightLineRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse routes longer than `metres`.
    pub fn with_max_distance(mut self, metres: f64) -> Self {
        self.max_distance_m = Some(metres);
        self
    }
}

impl RoadRouter for StraightLineRouter {
    async fn route(
        &self,
        from: Coordinates,
        to: Coordinates,
        mode: TravelMode,
    ) -> Result<RoadRoute, RoadError> {
        let metres = from.distance_m(&to);
        if self.max_distance_m.is_some_and(|max| metres > max) {
            return Err(RoadError::RouteNotFound);
        }

        Ok(RoadRoute {
            path: vec![from, to],
            travel_minutes: metres / 1000.0 / mode.typical_speed_kmh() * 60.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn walking_a_kilometre() {
        let a = Coordinates::new(49.0, 8.4);
        // ~1 km north
        let b = Coordinates::new(49.0 + 1.0 / 111.195, 8.4);

        let route = StraightLineRouter::new().route(a, b, TravelMode::Walk).await.unwrap();
        assert_eq!(route.path, vec![a, b]);
        // 4.5 km/h
        assert!((route.travel_minutes - 13.33).abs() < 0.1);

        let route = StraightLineRouter::new().route(a, b, TravelMode::Drive).await.unwrap();
        assert!(route.travel_minutes < 2.0);
    }

    #[tokio::test]
    async fn too_far() {
        let router = StraightLineRouter::new().with_max_distance(500.0);
        let a = Coordinates::new(49.0, 8.4);
        let b = Coordinates::new(49.1, 8.4);

        assert!(matches!(
            router.route(a, b, TravelMode::Walk).await,
            Err(RoadError::RouteNotFound)
        ));
        assert!(router.route(a, a, TravelMode::Walk).await.is_ok());
    }
}
