//! Error types for the mapping helpers.

use thiserror::Error;

/// Route-time lookup error.
#[derive(Debug, Error)]
pub enum RoutingError {
    /// Request is missing coordinates.
    #[error("{0}")]
    InvalidInput(String),

    /// The API answered with a non-OK top-level status.
    #[error("Google API: {0}")]
    Upstream(String),

    /// The API found no route between the points.
    #[error("Route not found: {0}")]
    RouteNotFound(String),

    /// The API answered OK but without the expected fields.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Transport, timeout, or decode failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Link expansion error.
#[derive(Debug, Error)]
pub enum ExpandError {
    /// No URL supplied.
    #[error("{0}")]
    InvalidInput(String),

    /// Transport or redirect failure while following the link.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
