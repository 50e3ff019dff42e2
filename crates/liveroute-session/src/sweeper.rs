//! Background sweep of expired sessions.
//!
//! Reads already treat expired sessions as absent, so the sweeper only bounds
//! memory held by sessions nobody touches again.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::config::DEFAULT_SWEEP_INTERVAL;
use crate::store::SessionStore;

/// Spawn a task that calls [`SessionStore::purge_expired`] every `interval`.
///
/// A zero interval falls back to [`DEFAULT_SWEEP_INTERVAL`]. Abort the
/// returned handle to stop sweeping.
pub fn spawn_sweeper(store: Arc<dyn SessionStore>, interval: Duration) -> JoinHandle<()> {
    let interval = if interval.is_zero() {
        DEFAULT_SWEEP_INTERVAL
    } else {
        interval
    };

    info!(interval_ms = interval.as_millis(), "Starting session sweeper");

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let purged = store.purge_expired();
            if purged > 0 {
                debug!(purged, "Sweep removed expired sessions");
            }
        }
    })
}
