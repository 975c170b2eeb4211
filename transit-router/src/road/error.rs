//! Road routing error types.

/// Errors from the street-network router.
#[derive(Debug, thiserror::Error)]
pub enum RoadError {
    /// The two points are not connected for the requested mode
    #[error("no road route between the given coordinates")]
    RouteNotFound,

    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with an error status
    #[error("road router error {status}: {message}")]
    Api { status: u16, message: String },

    /// The response body could not be understood
    #[error("road router response parse error: {message}")]
    Json { message: String },
}
