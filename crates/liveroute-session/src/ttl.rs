//! TTL policy for session expiration.

use std::time::Duration;

/// Decides whether a session is still live.
///
/// A session is live while `now - created_at <= ttl`. Updates do not extend
/// the lifetime; only a new `createdAt` does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlPolicy {
    ttl: Duration,
}

impl TtlPolicy {
    /// Create a policy with the given TTL.
    pub fn new(ttl: Duration) -> Self {
        Self { ttl }
    }

    /// The configured TTL.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Check whether a session created at `created_at` has expired by `now`.
    pub fn is_expired(&self, created_at: i64, now: i64) -> bool {
        now.saturating_sub(created_at) > self.ttl_millis()
    }

    /// Last instant (epoch ms) at which the session is still live.
    pub fn expires_at(&self, created_at: i64) -> i64 {
        created_at.saturating_add(self.ttl_millis())
    }

    fn ttl_millis(&self) -> i64 {
        i64::try_from(self.ttl.as_millis()).unwrap_or(i64::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_is_still_live() {
        let policy = TtlPolicy::new(Duration::from_secs(10));
        assert!(!policy.is_expired(0, 10_000));
        assert!(policy.is_expired(0, 10_001));
    }

    #[test]
    fn test_future_created_at_is_live() {
        let policy = TtlPolicy::new(Duration::from_secs(1));
        assert!(!policy.is_expired(5_000, 0));
    }

    #[test]
    fn test_expires_at() {
        let policy = TtlPolicy::new(Duration::from_secs(4 * 3600));
        assert_eq!(policy.expires_at(1_000), 1_000 + 14_400_000);
    }

    #[test]
    fn test_huge_ttl_does_not_overflow() {
        let policy = TtlPolicy::new(Duration::MAX);
        assert!(!policy.is_expired(i64::MIN, i64::MAX));
        assert_eq!(policy.expires_at(1), i64::MAX);
    }
}
