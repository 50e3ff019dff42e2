//! Map link expansion endpoint.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};

use liveroute_maps::Expansion;

use crate::error::{Result, ServerError};
use crate::routes::{method_not_allowed, preflight};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ExpandQuery {
    pub url: Option<String>,
}

/// Body returned when a link has no recognizable coordinates.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpandNotFound {
    pub success: bool,
    pub error: String,
    pub code: String,
    pub final_url: String,
}

/// Resolve a map link to `{ lat, lng }`.
pub async fn expand_handler(
    State(state): State<AppState>,
    Query(query): Query<ExpandQuery>,
) -> Result<Response> {
    let url = query
        .url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| ServerError::BadRequest("Missing url param".to_string()))?;

    match state.expander.expand(&url).await? {
        Expansion::Found(coords) => Ok(Json(coords).into_response()),
        Expansion::NotFound { final_url } => {
            tracing::warn!(%final_url, "No coordinates in link");
            let body = ExpandNotFound {
                success: false,
                error: "Coordinates not found in URL".to_string(),
                code: "not_found".to_string(),
                final_url,
            };
            Ok((StatusCode::NOT_FOUND, Json(body)).into_response())
        }
    }
}

/// Link expansion routes.
pub fn expand_routes() -> Router<AppState> {
    Router::new().route(
        "/api/expand",
        get(expand_handler)
            .options(preflight)
            .fallback(method_not_allowed),
    )
}

#[cfg(test)]
mod tests {
    use axum::http::Method;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::Server;
    use crate::routes::test_support::send;
    use crate::state::test_state;

    fn app() -> Router {
        Server::new(test_state()).router()
    }

    fn encode(url: &str) -> String {
        urlencoding::encode(url).into_owned()
    }

    #[tokio::test]
    async fn test_expand_direct_coordinates() {
        let link = "https://www.google.com/maps/@52.52,13.405,14z";
        let (status, body) = send(
            &app(),
            Method::GET,
            &format!("/api/expand?url={}", encode(link)),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"lat": 52.52, "lng": 13.405}));
    }

    #[tokio::test]
    async fn test_expand_not_found_has_final_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/plain"))
            .respond_with(ResponseTemplate::new(200).set_body_string("no coordinates"))
            .mount(&server)
            .await;

        let link = format!("{}/plain", server.uri());
        let (status, body) = send(
            &app(),
            Method::GET,
            &format!("/api/expand?url={}", encode(&link)),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], json!("Coordinates not found in URL"));
        assert_eq!(body["finalUrl"], json!(link));
    }

    #[tokio::test]
    async fn test_expand_missing_url() {
        let app = app();
        let (status, body) = send(&app, Method::GET, "/api/expand", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], json!("Missing url param"));

        let (status, _) = send(&app, Method::GET, "/api/expand?url=", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_expand_unreachable_host() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let (status, body) = send(
            &app(),
            Method::GET,
            &format!("/api/expand?url={}", encode(&format!("http://{addr}/x"))),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], json!("internal_error"));
    }

    #[tokio::test]
    async fn test_expand_methods() {
        let app = app();
        let (status, _) = send(&app, Method::POST, "/api/expand?url=x", None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

        let (status, _) = send(&app, Method::OPTIONS, "/api/expand", None).await;
        assert_eq!(status, StatusCode::OK);
    }
}
