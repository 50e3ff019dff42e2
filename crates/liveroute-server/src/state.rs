//! Application state shared across handlers.

use std::sync::Arc;

use liveroute_config::ROUTING_API_KEY_ENV;
use liveroute_maps::{ExpandOptions, LinkExpander, RoutingClient};
use liveroute_session::SessionStore;

use crate::config::ServerConfig;
use crate::error::{Result, ServerError};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Session store.
    pub store: Arc<dyn SessionStore>,

    /// Server configuration.
    pub config: Arc<ServerConfig>,

    /// Route-time client (None when no API key is configured).
    pub routing: Option<Arc<RoutingClient>>,

    /// Map link expander.
    pub expander: Arc<LinkExpander>,
}

impl AppState {
    /// Create state with a default link expander and no routing client.
    pub fn new(store: Arc<dyn SessionStore>, config: ServerConfig) -> Result<Self> {
        let expander = LinkExpander::new(ExpandOptions::default())?;
        Ok(Self {
            store,
            config: Arc::new(config),
            routing: None,
            expander: Arc::new(expander),
        })
    }

    /// Enable route-time lookups.
    pub fn with_routing(mut self, client: RoutingClient) -> Self {
        self.routing = Some(Arc::new(client));
        self
    }

    /// Replace the link expander.
    pub fn with_expander(mut self, expander: LinkExpander) -> Self {
        self.expander = Arc::new(expander);
        self
    }

    /// The routing client, or a config error when the API key is missing.
    pub fn routing_client(&self) -> Result<&RoutingClient> {
        self.routing
            .as_deref()
            .ok_or_else(|| ServerError::Config(format!("{ROUTING_API_KEY_ENV} not configured")))
    }
}

#[cfg(test)]
pub(crate) fn test_state() -> AppState {
    use liveroute_session::{MemorySessionStore, StoreConfig};

    let store = Arc::new(MemorySessionStore::new(StoreConfig::default()));
    AppState::new(store, ServerConfig::new().with_request_logging(false)).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use liveroute_maps::RoutingOptions;

    #[test]
    fn test_routing_client_missing_is_config_error() {
        let state = test_state();
        let err = state.routing_client().unwrap_err();
        assert!(matches!(err, ServerError::Config(ref msg) if msg.contains("GOOGLE_API_KEY")));
    }

    #[test]
    fn test_with_routing() {
        let client = RoutingClient::new("key", RoutingOptions::default()).unwrap();
        let state = test_state().with_routing(client);
        assert!(state.routing_client().is_ok());
    }
}
