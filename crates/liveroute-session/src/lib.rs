//! Live route session store.
//!
//! One party publishes its position or route under a session id, others
//! read it back until the session is deleted or outlives its TTL. The crate
//! provides:
//! - [`SessionStore`], the get/put/delete contract
//! - [`MemorySessionStore`], an in-process implementation behind one lock
//! - Lazy TTL expiry measured from each record's creation time
//! - An optional background sweeper that only reclaims memory
//!
//! Records live in process memory and are lost on restart.
//!
//! # Example
//!
//! ```rust,ignore
//! use liveroute_session::{MemorySessionStore, SessionStore, StoreConfig};
//!
//! let store = MemorySessionStore::new(StoreConfig::default());
//! let mut payload = serde_json::Map::new();
//! payload.insert("lat".into(), 52.52.into());
//! store.put("trip-42", Some(payload))?;
//! let record = store.get("trip-42")?;
//! ```

mod clock;
mod config;
mod error;
mod record;
mod store;
mod sweeper;
mod ttl;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{DEFAULT_SWEEP_INTERVAL, SESSION_TTL, StoreConfig};
pub use error::{Error, Result};
pub use record::{CREATED_AT_KEY, Payload, SessionRecord, UPDATED_AT_KEY, created_at_override};
pub use store::{MemorySessionStore, PutOutcome, SessionStore, StoreStats};
pub use sweeper::spawn_sweeper;
pub use ttl::TtlPolicy;
