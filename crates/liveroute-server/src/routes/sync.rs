//! Live session endpoints.
//!
//! The id is taken from the path (`/api/sync/{id}`) or the query string
//! (`/api/sync?id=`). POST and PUT both upsert.

use axum::{
    Json, Router,
    body::Bytes,
    extract::{FromRequestParts, Path, Query, State},
    http::request::Parts,
    routing::{MethodRouter, get},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use liveroute_session::{Payload, SessionRecord};

use crate::error::{Result, ServerError};
use crate::routes::{method_not_allowed, preflight};
use crate::state::AppState;

/// Session id from the path or the `id` query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdParam(pub String);

#[derive(Debug, Deserialize)]
struct IdQuery {
    id: Option<String>,
}

impl<S> FromRequestParts<S> for SessionIdParam
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self> {
        if let Ok(Path(id)) = Path::<String>::from_request_parts(parts, state).await {
            return Ok(Self(id));
        }

        let Query(query) = Query::<IdQuery>::try_from_uri(&parts.uri)
            .map_err(|e| ServerError::BadRequest(e.body_text()))?;

        query
            .id
            .filter(|id| !id.is_empty())
            .map(Self)
            .ok_or_else(|| ServerError::BadRequest("Missing id".to_string()))
    }
}

/// Acknowledgement for writes and deletes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncAck {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Parse a write body. Empty or `null` bodies mean "no payload".
fn parse_payload(body: &[u8]) -> Result<Option<Payload>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Null) => Ok(None),
        Ok(Value::Object(map)) => Ok(Some(map)),
        Ok(_) => Err(ServerError::BadRequest(
            "Body must be a JSON object".to_string(),
        )),
        Err(e) => Err(ServerError::BadRequest(format!("Invalid JSON body: {e}"))),
    }
}

/// Read a live session.
pub async fn get_session_handler(
    State(state): State<AppState>,
    SessionIdParam(id): SessionIdParam,
) -> Result<Json<SessionRecord>> {
    let record = state.store.get(&id)?;
    Ok(Json(record))
}

/// Create or replace a live session.
pub async fn put_session_handler(
    State(state): State<AppState>,
    SessionIdParam(id): SessionIdParam,
    body: Bytes,
) -> Result<Json<SyncAck>> {
    let payload = parse_payload(&body)?;
    let outcome = state.store.put(&id, payload)?;

    debug!(session_id = %outcome.id, created = outcome.created, "Session written");

    Ok(Json(SyncAck {
        ok: true,
        id: Some(outcome.id),
    }))
}

/// End a live session. Deleting an unknown id succeeds.
pub async fn delete_session_handler(
    State(state): State<AppState>,
    SessionIdParam(id): SessionIdParam,
) -> Result<Json<SyncAck>> {
    state.store.delete(&id)?;
    Ok(Json(SyncAck { ok: true, id: None }))
}

fn session_methods() -> MethodRouter<AppState> {
    get(get_session_handler)
        .post(put_session_handler)
        .put(put_session_handler)
        .delete(delete_session_handler)
        .options(preflight)
        .fallback(method_not_allowed)
}

/// Session routes.
pub fn sync_routes() -> Router<AppState> {
    Router::new()
        .route("/api/sync", session_methods())
        .route("/api/sync/{id}", session_methods())
}
