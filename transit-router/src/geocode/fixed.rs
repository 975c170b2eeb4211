//! In-memory geocoder for tests and offline use.
//!
//! Serves a fixed table of addresses, optionally loaded from a JSON file of
//! the form `{"Marktplatz": {"lat": 49.0093, "lon": 8.4037}}`.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::domain::Coordinates;

use super::Geocoder;
use super::error::GeocodeError;

/// Geocoder that answers from a fixed address table.
///
/// Matching is case-insensitive and ignores surrounding whitespace.
#[derive(Debug, Default)]
pub struct StaticGeocoder {
    addresses: HashMap<String, Coordinates>,
    lookups: AtomicUsize,
}

impl StaticGeocoder {
    /// An empty table: every lookup is "address not found".
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an address.
    pub fn with_address(mut self, address: &str, coords: Coordinates) -> Self {
        self.addresses.insert(normalize(address), coords);
        self
    }

    /// Load the table from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, GeocodeError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| GeocodeError::Json {
            message: format!("Failed to read {:?}: {}", path, e),
        })?;
        Self::from_json(&json)
    }

    /// Parse the table from JSON text.
    pub fn from_json(json: &str) -> Result<Self, GeocodeError> {
        let table: HashMap<String, Coordinates> =
            serde_json::from_str(json).map_err(|e| GeocodeError::Json {
                message: e.to_string(),
            })?;

        Ok(table
            .into_iter()
            .fold(Self::new(), |geocoder, (address, coords)| {
                geocoder.with_address(&address, coords)
            }))
    }

    /// Number of known addresses.
    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    /// Whether no address is known.
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    /// How many lookups have been made.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::Relaxed)
    }
}

fn normalize(address: &str) -> String {
    address.trim().to_lowercase()
}

impl Geocoder for StaticGeocoder {
    async fn geocode(&self, query: &str) -> Result<Coordinates, GeocodeError> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        self.addresses
            .get(&normalize(query))
            .copied()
            .ok_or_else(|| GeocodeError::AddressNotFound(query.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[tokio::test]
    async fn lookup_ignores_case() {
        let geocoder =
            StaticGeocoder::new().with_address("Kaiserstraße 12", Coordinates::new(49.01, 8.41));

        let coords = geocoder.geocode(" KAISERSTRAßE 12 ").await.unwrap();
        assert_eq!(coords, Coordinates::new(49.01, 8.41));
        assert!(geocoder.geocode("Kaiserstraße 13").await.is_err());
        assert_eq!(geocoder.lookups(), 2);
    }

    #[tokio::test]
    async fn unknown_address() {
        let err = StaticGeocoder::new().geocode("Nowhere 1").await.unwrap_err();
        assert!(matches!(err, GeocodeError::AddressNotFound(q) if q == "Nowhere 1"));
    }

    #[tokio::test]
    async fn loads_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"Marktplatz": {{"lat": 49.0093, "lon": 8.4037}}, "Schloss": {{"lat": 49.0135, "lon": 8.4044}}}}"#
        )
        .unwrap();

        let geocoder = StaticGeocoder::from_json_file(file.path()).unwrap();
        assert_eq!(geocoder.len(), 2);
        assert_eq!(
            geocoder.geocode("schloss").await.unwrap(),
            Coordinates::new(49.0135, 8.4044)
        );
    }

    #[test]
    fn rejects_bad_json() {
        assert!(StaticGeocoder::from_json("[1, 2]").is_err());
        assert!(StaticGeocoder::from_json_file("/nonexistent/addresses.json").is_err());
    }
}
