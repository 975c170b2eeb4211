//! Geocoding error types.

/// Errors from turning free text into coordinates.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    /// The geocoder had no match for the query
    #[error("address not found: {0}")]
    AddressNotFound(String),

    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with an error status
    #[error("geocoder error {status}: {message}")]
    Api { status: u16, message: String },

    /// The response body could not be understood
    #[error("geocoder response parse error: {message}")]
    Json { message: String },
}

impl GeocodeError {
    /// Whether the failure means "no such place" rather than a broken service.
    pub fn is_not_found(&self) -> bool {
        matches!(self, GeocodeError::AddressNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = GeocodeError::AddressNotFound("Kaiserstraße 999".into());
        assert_eq!(err.to_string(), "address not found: Kaiserstraße 999");
        assert!(err.is_not_found());

        let err = GeocodeError::Api {
            status: 503,
            message: "Service Unavailable".into(),
        };
        assert_eq!(err.to_string(), "geocoder error 503: Service Unavailable");
        assert!(!err.is_not_found());

        let err = GeocodeError::Json {
            message: "expected array".into(),
        };
        assert!(err.to_string().contains("expected array"));
    }
}
