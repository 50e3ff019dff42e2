//! Session record type and its wire form.

use chrono::{DateTime, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

/// Payload key carrying a caller-supplied creation time.
pub const CREATED_AT_KEY: &str = "createdAt";

/// Payload key the store writes its update time under.
pub const UPDATED_AT_KEY: &str = "updatedAt";

/// Caller data stored under a session. The store never inspects it beyond
/// the `createdAt` override.
pub type Payload = serde_json::Map<String, Value>;

/// A live session as held by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    /// Session id.
    pub id: String,
    /// Caller data, replaced wholesale on every write.
    pub payload: Payload,
    /// Creation time (epoch ms).
    pub created_at: i64,
    /// Last write time (epoch ms).
    pub updated_at: i64,
}

impl SessionRecord {
    /// Creation time as a UTC datetime.
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.created_at)
    }

    /// Last write time as a UTC datetime.
    pub fn updated_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.updated_at)
    }
}

/// Serializes as the payload object with `createdAt`/`updatedAt` added.
impl Serialize for SessionRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = self
            .payload
            .iter()
            .filter(|(key, _)| key.as_str() != CREATED_AT_KEY && key.as_str() != UPDATED_AT_KEY);

        let mut map = serializer.serialize_map(Some(self.payload.len() + 2))?;
        for (key, value) in fields {
            map.serialize_entry(key, value)?;
        }
        map.serialize_entry(CREATED_AT_KEY, &self.created_at)?;
        map.serialize_entry(UPDATED_AT_KEY, &self.updated_at)?;
        map.end()
    }
}

/// Read a caller-supplied creation time from a payload.
///
/// Accepts epoch milliseconds (integer, float, or numeric string such as
/// `"1.7e12"`) and RFC 3339 strings. Zero, empty, non-finite, and unparsable
/// values count as absent.
pub fn created_at_override(payload: &Payload) -> Option<i64> {
    let millis = match payload.get(CREATED_AT_KEY)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(float_millis)),
        Value::String(s) => parse_millis(s.trim()),
        _ => None,
    }?;

    (millis != 0).then_some(millis)
}

fn parse_millis(s: &str) -> Option<i64> {
    s.parse::<i64>()
        .ok()
        .or_else(|| s.parse::<f64>().ok().and_then(float_millis))
        .or_else(|| {
            DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.timestamp_millis())
        })
}

fn float_millis(f: f64) -> Option<i64> {
    f.is_finite().then(|| f as i64)
}
