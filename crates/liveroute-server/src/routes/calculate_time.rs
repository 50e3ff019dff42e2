//! Driving-time endpoint.

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    routing::post,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use liveroute_maps::{RouteEstimate, RouteTimeRequest};

use crate::error::{Result, ServerError};
use crate::routes::{method_not_allowed, preflight};
use crate::state::AppState;

/// Successful lookup.
#[derive(Debug, Serialize, Deserialize)]
pub struct CalculateTimeResponse {
    pub success: bool,
    #[serde(flatten)]
    pub estimate: RouteEstimate,
}

/// Estimate the driving time between two points.
pub async fn calculate_time_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<CalculateTimeResponse>> {
    let client = state.routing_client()?;

    let request: RouteTimeRequest = if body.iter().all(u8::is_ascii_whitespace) {
        RouteTimeRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ServerError::BadRequest(format!("Invalid request body: {e}")))?
    };

    let estimate = client.travel_time(&request).await?;
    debug!(
        minutes = estimate.duration.minutes,
        meters = estimate.distance.meters,
        traffic_aware = estimate.traffic_aware,
        "Travel time computed"
    );

    Ok(Json(CalculateTimeResponse {
        success: true,
        estimate,
    }))
}

/// Route-time routes.
pub fn calculate_time_routes() -> Router<AppState> {
    Router::new().route(
        "/api/calculate-time",
        post(calculate_time_handler)
            .options(preflight)
            .fallback(method_not_allowed),
    )
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use liveroute_maps::{RoutingClient, RoutingOptions};

    use crate::Server;
    use crate::routes::test_support::send;
    use crate::state::test_state;

    const BODY: &str = r#"{"originLat":52.52,"originLng":13.405,"destLat":"52.39","destLng":"13.065"}"#;

    async fn app_with_upstream(server: &MockServer) -> axum::Router {
        let options = RoutingOptions {
            base_url: format!("{}/distancematrix/json", server.uri()),
            ..Default::default()
        };
        let client = RoutingClient::new("test-key", options).unwrap();
        Server::new(test_state().with_routing(client)).router()
    }

    #[tokio::test]
    async fn test_calculate_time_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("destinations", "52.39,13.065"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "OK",
                "rows": [{"elements": [{
                    "status": "OK",
                    "duration": {"text": "38 Minuten", "value": 2261},
                    "distance": {"text": "35,2 km", "value": 35210}
                }]}]
            })))
            .mount(&server)
            .await;

        let app = app_with_upstream(&server).await;
        let (status, body) = send(&app, Method::POST, "/api/calculate-time", Some(BODY)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["duration"]["minutes"], json!(38));
        assert_eq!(body["duration"]["seconds"], json!(2261));
        assert_eq!(body["duration"]["text"], json!("38 Minuten"));
        assert_eq!(body["distance"]["meters"], json!(35210));
    }

    #[tokio::test]
    async fn test_calculate_time_upstream_denied() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"status": "OVER_QUERY_LIMIT"})),
            )
            .mount(&server)
            .await;

        let app = app_with_upstream(&server).await;
        let (status, body) = send(&app, Method::POST, "/api/calculate-time", Some(BODY)).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["error"], json!("Google API: OVER_QUERY_LIMIT"));
    }

    #[tokio::test]
    async fn test_calculate_time_route_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "OK",
                "rows": [{"elements": [{"status": "NOT_FOUND"}]}]
            })))
            .mount(&server)
            .await;

        let app = app_with_upstream(&server).await;
        let (status, body) = send(&app, Method::POST, "/api/calculate-time", Some(BODY)).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], json!("Route not found: NOT_FOUND"));
    }

    #[tokio::test]
    async fn test_calculate_time_missing_coordinates() {
        let server = MockServer::start().await;
        let app = app_with_upstream(&server).await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/calculate-time",
            Some(r#"{"originLat":52.52}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], json!("bad_request"));

        let (status, _) = send(&app, Method::POST, "/api/calculate-time", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, Method::POST, "/api/calculate-time", Some("{oops")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_calculate_time_without_api_key() {
        let app = Server::new(test_state()).router();
        let (status, body) = send(&app, Method::POST, "/api/calculate-time", Some(BODY)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], json!("config_error"));

        // Sessions keep working without a key.
        let (status, _) = send(&app, Method::POST, "/api/sync?id=a", Some("{}")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_calculate_time_methods() {
        let app = Server::new(test_state()).router();
        let (status, _) = send(&app, Method::GET, "/api/calculate-time", None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

        let (status, _) = send(&app, Method::OPTIONS, "/api/calculate-time", None).await;
        assert_eq!(status, StatusCode::OK);
    }
}
