//! Configuration for the session store.

use std::time::Duration;

/// Time-to-live of every session, measured from its creation (4 hours).
pub const SESSION_TTL: Duration = Duration::from_secs(4 * 3600);

/// Default interval between background sweeps.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Configuration for the session store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Whether a `createdAt` carried in a write payload replaces the stored one.
    /// When false the store always owns creation time.
    pub honor_payload_created_at: bool,

    /// Whether to run the periodic sweep of expired sessions.
    /// If false, expired sessions are only removed on access.
    pub enable_sweeper: bool,

    /// Interval for the sweeper (if enabled).
    pub sweep_interval: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            honor_payload_created_at: true,
            enable_sweeper: true,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}

impl StoreConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept or ignore `createdAt` values supplied by writers.
    pub fn with_payload_created_at(mut self, honor: bool) -> Self {
        self.honor_payload_created_at = honor;
        self
    }

    /// Enable or disable the background sweeper.
    pub fn with_sweeper(mut self, enabled: bool) -> Self {
        self.enable_sweeper = enabled;
        self
    }

    /// Set the sweep interval.
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }
}
