//! Stateless mapping helpers used next to the session store.
//!
//! - [`RoutingClient`] asks the Distance Matrix API how long a drive takes
//! - [`LinkExpander`] turns a (possibly shortened) map link into coordinates
//!
//! Neither keeps state between calls. Failures come back as typed errors so
//! the HTTP layer can map them to responses.

pub mod error;
pub mod expand;
pub mod routing;

pub use error::{ExpandError, RoutingError};
pub use expand::{
    ExpandOptions, Expansion, LinkExpander, coords_after_at, coords_in_body, coords_in_ll_param,
};
pub use routing::{
    DISTANCE_MATRIX_URL, DepartureTime, DistanceEstimate, DurationEstimate, RouteEstimate,
    RouteTimeRequest, RoutingClient, RoutingOptions,
};

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}
