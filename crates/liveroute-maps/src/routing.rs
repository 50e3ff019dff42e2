//! Driving-time lookup against the Google Distance Matrix API.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::Coordinates;
use crate::error::RoutingError;

/// Distance Matrix JSON endpoint.
pub const DISTANCE_MATRIX_URL: &str = "https://maps.googleapis.com/maps/api/distancematrix/json";

// ─────────────────────────────────────────────────────────────────────────────
// Request / response types
// ─────────────────────────────────────────────────────────────────────────────

/// When the trip starts, for traffic-aware estimates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DepartureTime {
    /// Unix epoch seconds.
    Epoch(i64),
    /// A keyword understood by the API, normally `"now"`.
    Keyword(String),
}

impl DepartureTime {
    fn as_param(&self) -> String {
        match self {
            Self::Epoch(secs) => secs.to_string(),
            Self::Keyword(word) => word.clone(),
        }
    }
}

/// Body of a travel-time request.
///
/// Coordinates may arrive as numbers or numeric strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteTimeRequest {
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub origin_lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub origin_lng: Option<f64>,
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub dest_lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub dest_lng: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure_time: Option<DepartureTime>,
}

impl RouteTimeRequest {
    /// Build a request between two points.
    pub fn between(origin: Coordinates, destination: Coordinates) -> Self {
        Self {
            origin_lat: Some(origin.lat),
            origin_lng: Some(origin.lng),
            dest_lat: Some(destination.lat),
            dest_lng: Some(destination.lng),
            departure_time: None,
        }
    }

    /// Ask for a traffic-aware estimate.
    pub fn departing(mut self, departure: DepartureTime) -> Self {
        self.departure_time = Some(departure);
        self
    }

    /// Origin and destination, if all four values are present and non-zero.
    pub fn endpoints(&self) -> Result<(Coordinates, Coordinates), RoutingError> {
        match (self.origin_lat, self.origin_lng, self.dest_lat, self.dest_lng) {
            (Some(a), Some(b), Some(c), Some(d))
                if [a, b, c, d].iter().all(|v| v.is_finite() && *v != 0.0) =>
            {
                Ok((Coordinates::new(a, b), Coordinates::new(c, d)))
            }
            _ => Err(RoutingError::InvalidInput(
                "originLat, originLng, destLat, destLng are required".to_string(),
            )),
        }
    }
}

fn lenient_coordinate<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(n)) => Some(n),
        Some(Raw::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}

/// Travel duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationEstimate {
    /// Localized text from the API, e.g. "1 Stunde 5 Min.".
    pub text: String,
    /// Whole minutes, rounded up.
    pub minutes: u64,
    pub seconds: u64,
}

/// Travel distance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceEstimate {
    pub text: String,
    pub meters: u64,
}

/// Result of a successful lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteEstimate {
    pub duration: DurationEstimate,
    pub distance: DistanceEstimate,
    /// True when the duration accounts for live traffic.
    pub traffic_aware: bool,
}

#[derive(Debug, Deserialize)]
struct MatrixResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    rows: Vec<MatrixRow>,
}

#[derive(Debug, Deserialize)]
struct MatrixRow {
    #[serde(default)]
    elements: Vec<MatrixElement>,
}

#[derive(Debug, Deserialize)]
struct MatrixElement {
    status: String,
    duration: Option<TextValue>,
    duration_in_traffic: Option<TextValue>,
    distance: Option<TextValue>,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    text: String,
    value: u64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Client
// ─────────────────────────────────────────────────────────────────────────────

/// Settings for [`RoutingClient`].
#[derive(Debug, Clone)]
pub struct RoutingOptions {
    /// Endpoint; defaults to [`DISTANCE_MATRIX_URL`].
    pub base_url: String,
    /// Language for the duration and distance text.
    pub language: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for RoutingOptions {
    fn default() -> Self {
        Self {
            base_url: DISTANCE_MATRIX_URL.to_string(),
            language: "de".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Distance Matrix client. Cheap to clone.
#[derive(Debug, Clone)]
pub struct RoutingClient {
    http: Client,
    base_url: Url,
    api_key: String,
    language: String,
}

impl RoutingClient {
    /// Create a client with the given API key.
    pub fn new(api_key: impl Into<String>, options: RoutingOptions) -> Result<Self, RoutingError> {
        let base_url = Url::parse(&options.base_url).map_err(|e| {
            RoutingError::InvalidInput(format!("invalid routing base URL '{}': {e}", options.base_url))
        })?;
        let http = Client::builder().timeout(options.timeout).build()?;

        Ok(Self {
            http,
            base_url,
            api_key: api_key.into(),
            language: options.language,
        })
    }

    /// Look up driving duration and distance between two points.
    pub async fn travel_time(&self, request: &RouteTimeRequest) -> Result<RouteEstimate, RoutingError> {
        let (origin, destination) = request.endpoints()?;

        let mut query = vec![
            ("origins", origin.to_string()),
            ("destinations", destination.to_string()),
            ("mode", "driving".to_string()),
            ("language", self.language.clone()),
            ("key", self.api_key.clone()),
        ];
        if let Some(ref departure) = request.departure_time {
            query.push(("departure_time", departure.as_param()));
        }

        debug!(%origin, %destination, "Requesting travel time");

        let response: MatrixResponse = self
            .http
            .get(self.base_url.clone())
            .query(&query)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if response.status != "OK" {
            warn!(
                status = %response.status,
                message = response.error_message.as_deref().unwrap_or(""),
                "Distance Matrix request rejected"
            );
            return Err(RoutingError::Upstream(response.status));
        }

        let element = response
            .rows
            .into_iter()
            .next()
            .and_then(|row| row.elements.into_iter().next())
            .ok_or_else(|| RoutingError::RouteNotFound("UNKNOWN".to_string()))?;

        if element.status != "OK" {
            debug!(status = %element.status, "No route between points");
            return Err(RoutingError::RouteNotFound(element.status));
        }

        let (duration, traffic_aware) = match (element.duration_in_traffic, element.duration) {
            (Some(d), _) => (d, true),
            (None, Some(d)) => (d, false),
            (None, None) => {
                return Err(RoutingError::MalformedResponse(
                    "element has no duration".to_string(),
                ));
            }
        };
        let distance = element.distance.ok_or_else(|| {
            RoutingError::MalformedResponse("element has no distance".to_string())
        })?;

        Ok(RouteEstimate {
            duration: DurationEstimate {
                text: duration.text,
                minutes: duration.value.div_ceil(60),
                seconds: duration.value,
            },
            distance: DistanceEstimate {
                text: distance.text,
                meters: distance.value,
            },
            traffic_aware,
        })
    }
}
