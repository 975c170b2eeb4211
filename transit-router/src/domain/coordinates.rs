//! Geographic positions of stops and addresses.

use std::fmt;

use geo::{Distance, Haversine, Point};
use serde::{Deserialize, Serialize};

/// A WGS84 latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// Create a coordinate pair.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Great-circle distance to `other` in metres.
    ///
    /// # Examples
    ///
    /// ```
    /// use transit_router::domain::Coordinates;
    ///
    /// let a = Coordinates::new(49.0, 8.4);
    /// assert_eq!(a.distance_m(&a), 0.0);
    ///
    /// // One degree of latitude is roughly 111 km
    /// let b = Coordinates::new(50.0, 8.4);
    /// assert!((a.distance_m(&b) - 111_195.0).abs() < 500.0);
    /// ```
    pub fn distance_m(&self, other: &Coordinates) -> f64 {
        Haversine.distance(self.to_point(), other.to_point())
    }

    /// `geo` points are (x = lon, y = lat).
    fn to_point(self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }
}

impl From<(f64, f64)> for Coordinates {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self { lat, lon }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.lat, self.lon)
    }
}
