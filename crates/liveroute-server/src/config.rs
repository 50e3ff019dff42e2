//! Server configuration.

use std::net::{Ipv4Addr, SocketAddr};

/// Default port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default max body size for requests (1 MB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the server to.
    pub bind_address: SocketAddr,

    /// Log one line per request with status and latency.
    pub request_logging: bool,

    /// Maximum request body size in bytes. Larger bodies get 413.
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
            request_logging: true,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }
}

impl ServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bind address.
    pub fn with_bind_address(mut self, addr: SocketAddr) -> Self {
        self.bind_address = addr;
        self
    }

    /// Enable or disable request logging.
    pub fn with_request_logging(mut self, enabled: bool) -> Self {
        self.request_logging = enabled;
        self
    }

    /// Set the maximum request body size.
    pub fn with_max_body_size(mut self, size: usize) -> Self {
        self.max_body_size = size;
        self
    }
}

impl TryFrom<&liveroute_config::ServerConfig> for ServerConfig {
    type Error = liveroute_config::ConfigError;

    fn try_from(file: &liveroute_config::ServerConfig) -> Result<Self, Self::Error> {
        Ok(Self {
            bind_address: file.socket_addr()?,
            request_logging: file.request_logging,
            max_body_size: file.max_body_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_address.port(), 3000);
        assert!(config.bind_address.ip().is_loopback());
        assert!(config.request_logging);
        assert_eq!(config.max_body_size, 1024 * 1024);
    }

    #[test]
    fn test_from_file_config() {
        let file = liveroute_config::ServerConfig {
            port: 8099,
            bind: "0.0.0.0".to_string(),
            request_logging: false,
            max_body_size: 2048,
        };
        let config = ServerConfig::try_from(&file).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:8099".parse().unwrap());
        assert!(!config.request_logging);
        assert_eq!(config.max_body_size, 2048);
    }

    #[test]
    fn test_from_file_config_rejects_bad_bind() {
        let file = liveroute_config::ServerConfig {
            bind: "not-an-ip".to_string(),
            ..Default::default()
        };
        assert!(ServerConfig::try_from(&file).is_err());
    }
}
