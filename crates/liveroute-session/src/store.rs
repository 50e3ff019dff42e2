//! Session store contract and the in-memory implementation.

use std::collections::HashMap;
use std::time::Duration;

use chrono::DateTime;
use parking_lot::Mutex;
use tracing::field::display;
use tracing::{debug, trace};

use crate::clock::{Clock, SystemClock};
use crate::config::{SESSION_TTL, StoreConfig};
use crate::error::{Error, Result};
use crate::record::{CREATED_AT_KEY, Payload, SessionRecord, UPDATED_AT_KEY, created_at_override};
use crate::ttl::TtlPolicy;

/// Result of a successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutOutcome {
    /// The session id written.
    pub id: String,
    /// True when the write started a new session rather than refreshing one.
    pub created: bool,
}

/// Store statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    /// Sessions a `get` would return right now. Expired records awaiting a
    /// purge are not counted.
    pub live: usize,
    /// Session TTL.
    pub ttl: Duration,
}

/// Keyed, time-bounded session storage.
///
/// Expired sessions behave exactly like missing ones. Implementations must be
/// safe to share between request handlers; an external shared store can
/// stand in for [`MemorySessionStore`] behind this trait.
pub trait SessionStore: Send + Sync {
    /// Fetch the live session under `id`.
    ///
    /// Returns [`Error::NotFound`] when absent or expired. An expired record
    /// is dropped as a side effect.
    fn get(&self, id: &str) -> Result<SessionRecord>;

    /// Create or replace the session under `id`.
    ///
    /// `None` models a write that arrived without a payload and is rejected.
    fn put(&self, id: &str, payload: Option<Payload>) -> Result<PutOutcome>;

    /// Remove the session under `id`. Succeeds whether or not it existed.
    fn delete(&self, id: &str) -> Result<()>;

    /// Drop every expired record and return how many were removed.
    fn purge_expired(&self) -> usize;

    /// Get store statistics.
    fn stats(&self) -> StoreStats;
}

/// In-memory session store guarded by a single mutex.
///
/// Critical sections are plain map operations; the clock is read before the
/// lock is taken. All data is lost when the process exits.
#[derive(Debug)]
pub struct MemorySessionStore<C: Clock = SystemClock> {
    records: Mutex<HashMap<String, SessionRecord>>,
    ttl: TtlPolicy,
    honor_payload_created_at: bool,
    clock: C,
}

impl MemorySessionStore<SystemClock> {
    /// Create an empty store using the wall clock.
    pub fn new(config: StoreConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> MemorySessionStore<C> {
    /// Create an empty store with a custom time source.
    pub fn with_clock(config: StoreConfig, clock: C) -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            ttl: TtlPolicy::new(SESSION_TTL),
            honor_payload_created_at: config.honor_payload_created_at,
            clock,
        }
    }

    /// Number of records physically held.
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Check if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

fn require_id(id: &str) -> Result<&str> {
    if id.is_empty() {
        Err(Error::InvalidInput("Missing id".to_string()))
    } else {
        Ok(id)
    }
}

impl<C: Clock> SessionStore for MemorySessionStore<C> {
    fn get(&self, id: &str) -> Result<SessionRecord> {
        let id = require_id(id)?;
        let now = self.clock.now_millis();

        let mut records = self.records.lock();
        let Some(record) = records.get(id) else {
            trace!(session_id = %id, "Session not in store");
            return Err(Error::NotFound(id.to_string()));
        };

        if !self.ttl.is_expired(record.created_at, now) {
            return Ok(record.clone());
        }

        records.remove(id);
        drop(records);

        debug!(session_id = %id, "Session expired, removed on read");
        Err(Error::NotFound(id.to_string()))
    }

    fn put(&self, id: &str, payload: Option<Payload>) -> Result<PutOutcome> {
        let id = require_id(id)?;
        let mut payload =
            payload.ok_or_else(|| Error::InvalidInput("Missing body".to_string()))?;
        let now = self.clock.now_millis();

        let supplied_created_at = if self.honor_payload_created_at {
            created_at_override(&payload)
        } else {
            None
        };
        payload.remove(CREATED_AT_KEY);
        payload.remove(UPDATED_AT_KEY);

        let mut records = self.records.lock();
        let previous = records.get(id).map(|r| r.created_at);
        let live_created_at = previous.filter(|&created| !self.ttl.is_expired(created, now));
        let created_at = supplied_created_at.or(live_created_at).unwrap_or(now);

        let record = SessionRecord {
            id: id.to_string(),
            payload,
            created_at,
            updated_at: now,
        };
        let created_at_utc = record.created_at_utc();
        let updated_at_utc = record.updated_at_utc();
        records.insert(id.to_string(), record);
        let stored = records.len();
        drop(records);

        let created = live_created_at.is_none();
        if created {
            let expires_at = DateTime::from_timestamp_millis(self.ttl.expires_at(created_at));
            debug!(
                session_id = %id,
                created_at = created_at_utc.map(display),
                expires_at = expires_at.map(display),
                replaced_expired = previous.is_some(),
                stored,
                "Session created"
            );
        } else {
            trace!(
                session_id = %id,
                updated_at = updated_at_utc.map(display),
                "Session refreshed"
            );
        }

        Ok(PutOutcome {
            id: id.to_string(),
            created,
        })
    }

    fn delete(&self, id: &str) -> Result<()> {
        let id = require_id(id)?;
        if self.records.lock().remove(id).is_some() {
            debug!(session_id = %id, "Session deleted");
        }
        Ok(())
    }

    fn purge_expired(&self) -> usize {
        let now = self.clock.now_millis();
        let mut records = self.records.lock();
        let before = records.len();
        records.retain(|_, record| !self.ttl.is_expired(record.created_at, now));
        let purged = before - records.len();
        drop(records);

        if purged > 0 {
            debug!(count = purged, "Purged expired sessions");
        }
        purged
    }

    fn stats(&self) -> StoreStats {
        let now = self.clock.now_millis();
        let live = self
            .records
            .lock()
            .values()
            .filter(|record| !self.ttl.is_expired(record.created_at, now))
            .count();

        StoreStats {
            live,
            ttl: self.ttl.ttl(),
        }
    }
}
