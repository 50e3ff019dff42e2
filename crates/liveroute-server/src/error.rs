//! Error types for the server.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use liveroute_config::ConfigError;
use liveroute_maps::{ExpandError, RoutingError};

/// Server error type.
///
/// The display string is what clients see in the `error` field.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Bad request.
    #[error("{0}")]
    BadRequest(String),

    /// Resource not found or expired.
    #[error("{0}")]
    NotFound(String),

    /// Method not supported on this route.
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// An upstream service rejected the request.
    #[error("{0}")]
    Upstream(String),

    /// Missing or invalid configuration.
    #[error("{0}")]
    Config(String),

    /// Internal server error.
    #[error("{0}")]
    Internal(String),
}

impl From<liveroute_session::Error> for ServerError {
    fn from(e: liveroute_session::Error) -> Self {
        match e {
            liveroute_session::Error::InvalidInput(msg) => ServerError::BadRequest(msg),
            // Expired and never-written sessions look the same to clients.
            liveroute_session::Error::NotFound(_) => {
                ServerError::NotFound("Session not found".to_string())
            }
        }
    }
}

impl From<RoutingError> for ServerError {
    fn from(e: RoutingError) -> Self {
        match e {
            RoutingError::InvalidInput(msg) => ServerError::BadRequest(msg),
            RoutingError::Upstream(_)
            | RoutingError::RouteNotFound(_)
            | RoutingError::MalformedResponse(_) => ServerError::Upstream(e.to_string()),
            RoutingError::Http(err) => ServerError::Internal(err.to_string()),
        }
    }
}

impl From<ExpandError> for ServerError {
    fn from(e: ExpandError) -> Self {
        match e {
            ExpandError::InvalidInput(msg) => ServerError::BadRequest(msg),
            ExpandError::Http(err) => ServerError::Internal(err.to_string()),
        }
    }
}

impl From<ConfigError> for ServerError {
    fn from(e: ConfigError) -> Self {
        ServerError::Config(e.to_string())
    }
}

/// Result type for server operations.
pub type Result<T> = std::result::Result<T, ServerError>;

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always false.
    pub success: bool,
    /// Human-readable error message.
    pub error: String,
    /// Error code for programmatic handling.
    pub code: String,
}

impl ServerError {
    /// HTTP status and machine-readable code.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ServerError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ServerError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ServerError::MethodNotAllowed => {
                (StatusCode::METHOD_NOT_ALLOWED, "method_not_allowed")
            }
            ServerError::Upstream(_) => (StatusCode::BAD_GATEWAY, "upstream_error"),
            ServerError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            ServerError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(status = %status, code, error = %message, "Server error");
        } else {
            tracing::warn!(status = %status, code, error = %message, "Client error");
        }

        let body = ErrorResponse {
            success: false,
            error: message,
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
