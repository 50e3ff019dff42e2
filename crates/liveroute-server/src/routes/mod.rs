//! API routes.

pub mod calculate_time;
pub mod expand;
pub mod health;
pub mod sync;

pub use calculate_time::{CalculateTimeResponse, calculate_time_handler, calculate_time_routes};
pub use expand::{ExpandNotFound, ExpandQuery, expand_handler, expand_routes};
pub use health::{HealthResponse, health_routes};
pub use sync::{
    SessionIdParam, SyncAck, delete_session_handler, get_session_handler, put_session_handler,
    sync_routes,
};

use axum::http::StatusCode;

use crate::error::ServerError;

/// CORS preflight without the `Access-Control-Request-*` headers.
pub(crate) async fn preflight() -> StatusCode {
    StatusCode::OK
}

pub(crate) async fn method_not_allowed() -> ServerError {
    ServerError::MethodNotAllowed
}

pub(crate) async fn unknown_route() -> ServerError {
    ServerError::NotFound("Not found".to_string())
}
