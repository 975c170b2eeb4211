//! Free-text address geocoding.
//!
//! Turns a street address into coordinates so that journeys can start or end
//! away from a stop. The planner only depends on the [`Geocoder`] trait;
//! [`NominatimClient`] talks to OpenStreetMap, [`CachedGeocoder`] sits in
//! front of it, and [`StaticGeocoder`] serves a fixed table.

mod cache;
mod error;
mod fixed;
mod nominatim;

use std::future::Future;

use crate::domain::Coordinates;

pub use cache::{CachedGeocoder, GeocodeCacheConfig};
pub use error::GeocodeError;
pub use fixed::StaticGeocoder;
pub use nominatim::{NominatimClient, NominatimConfig, Viewbox};

/// Resolves free text to coordinates.
pub trait Geocoder {
    /// Coordinates for `query`, or [`GeocodeError::AddressNotFound`].
    fn geocode(&self, query: &str)
    -> impl Future<Output = Result<Coordinates, GeocodeError>> + Send;
}

/// The geocoder chosen at startup.
pub enum GeocoderBackend {
    /// Cached Nominatim lookups
    Nominatim(CachedGeocoder<NominatimClient>),
    /// Fixed address table
    Static(StaticGeocoder),
}

impl Geocoder for GeocoderBackend {
    async fn geocode(&self, query: &str) -> Result<Coordinates, GeocodeError> {
        match self {
            GeocoderBackend::Nominatim(geocoder) => geocoder.geocode(query).await,
            GeocoderBackend::Static(geocoder) => geocoder.geocode(query).await,
        }
    }
}
