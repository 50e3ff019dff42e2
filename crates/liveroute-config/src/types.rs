//! Configuration types mapping to the TOML schema.
//!
//! ```toml
//! [server]     # bind address, port, request logging
//! [session]    # createdAt override and sweeper
//! [routing]    # Distance Matrix lookups
//! [expand]     # short-link expansion
//! ```

use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;

use crate::{ConfigError, Result};

/// Environment variable holding the Distance Matrix API key.
pub const ROUTING_API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Default port the server listens on.
pub const DEFAULT_PORT: u16 = 3000;

/// Default bind address.
pub const DEFAULT_BIND: &str = "127.0.0.1";

// ─────────────────────────────────────────────────────────────────────────────
// Top-level Config
// ─────────────────────────────────────────────────────────────────────────────

/// Root configuration structure.
///
/// All sections are optional so that partial configs (e.g., project-local
/// overrides) can be loaded and merged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LiverouteConfig {
    /// Server configuration.
    pub server: Option<ServerConfig>,

    /// Session store configuration.
    pub session: Option<SessionConfig>,

    /// Route-time lookup configuration.
    pub routing: Option<RoutingConfig>,

    /// Link expansion configuration.
    pub expand: Option<ExpandConfig>,
}

impl LiverouteConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Merge another config on top of this one (other takes priority).
    pub fn merge(&mut self, other: LiverouteConfig) {
        if other.server.is_some() {
            self.server = other.server;
        }

        if other.session.is_some() {
            self.session = other.session;
        }

        if other.routing.is_some() {
            self.routing = other.routing;
        }

        if other.expand.is_some() {
            self.expand = other.expand;
        }
    }

    /// Server section, or defaults when absent.
    pub fn server(&self) -> ServerConfig {
        self.server.clone().unwrap_or_default()
    }

    /// Session section, or defaults when absent.
    pub fn session(&self) -> SessionConfig {
        self.session.clone().unwrap_or_default()
    }

    /// Routing section, or defaults when absent.
    pub fn routing(&self) -> RoutingConfig {
        self.routing.clone().unwrap_or_default()
    }

    /// Expand section, or defaults when absent.
    pub fn expand(&self) -> ExpandConfig {
        self.expand.clone().unwrap_or_default()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Server Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Server configuration section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Port to listen on.
    pub port: u16,
    /// Address to bind to.
    pub bind: String,
    /// Enable request logging.
    pub request_logging: bool,
    /// Maximum request body size in bytes.
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
            request_logging: true,
            max_body_size: 1024 * 1024,
        }
    }
}

impl ServerConfig {
    /// Socket address from `bind` and `port`.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.bind, self.port)
            .parse()
            .map_err(|e| ConfigError::InvalidValue {
                field: "server.bind".to_string(),
                reason: format!("{e}"),
            })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Session Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Session store configuration. The session TTL is fixed at four hours and
/// is not configurable.
///
/// ```toml
/// [session]
/// honor_payload_created_at = true
/// sweep = true
/// sweep_interval_secs = 60
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Let writers set `createdAt` through the payload.
    pub honor_payload_created_at: bool,
    /// Run the background sweep of expired sessions.
    pub sweep: bool,
    /// Interval in seconds between sweeps.
    pub sweep_interval_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            honor_payload_created_at: true,
            sweep: true,
            sweep_interval_secs: 60,
        }
    }
}

impl SessionConfig {
    /// Sweep interval.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Routing Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Distance Matrix lookup configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// API key. Prefer the `GOOGLE_API_KEY` environment variable.
    pub api_key: Option<String>,
    /// Response language for duration/distance text.
    pub language: String,
    /// Override for the Distance Matrix endpoint.
    pub base_url: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            language: "de".to_string(),
            base_url: None,
            timeout_secs: 10,
        }
    }
}

impl RoutingConfig {
    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Whether the config file itself carries a key.
    pub fn has_plaintext_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    /// Resolve the API key: environment first, then config file.
    pub fn resolve_api_key(&self) -> Result<String> {
        self.resolve_api_key_from(std::env::var(ROUTING_API_KEY_ENV).ok())
    }

    /// Resolve the API key given an explicit environment value.
    pub fn resolve_api_key_from(&self, env_value: Option<String>) -> Result<String> {
        env_value
            .filter(|k| !k.is_empty())
            .or_else(|| self.api_key.clone().filter(|k| !k.is_empty()))
            .ok_or_else(|| ConfigError::ApiKeyNotFound {
                env_var: ROUTING_API_KEY_ENV.to_string(),
            })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Expand Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Link expander configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExpandConfig {
    /// User agent sent when following links. Map hosts serve coordinates to
    /// browser-like agents only.
    pub user_agent: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Maximum redirects to follow.
    pub max_redirects: usize,
}

impl Default for ExpandConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0".to_string(),
            timeout_secs: 10,
            max_redirects: 10,
        }
    }
}

impl ExpandConfig {
    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
