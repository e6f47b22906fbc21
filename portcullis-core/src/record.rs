use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-identity lockout state.
///
/// A record is created on the first failed attempt for an identity, survives
/// process restarts through the snapshot file, and is deleted once its lock
/// count is forgiven down to zero. The default (zero-valued) record signals
/// an identity that has never been seen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockoutRecord {
    /// True while a lockout episode is active.
    pub locked: bool,
    /// Lockout episodes endured and not yet forgiven.
    pub locks: u32,
    /// Consecutive failures since the last reset. Wraps to 0 when it
    /// reaches the configured limit, at the same moment `locked` is set.
    pub attempts: u8,
    /// Expiry of the current lockout. `Some` only while `locked` is true.
    pub unlock_at: Option<DateTime<Utc>>,
    /// Denormalized copy of the identity's email, kept for persistence
    /// and debugging.
    pub email: String,
    /// Denormalized copy of the identity's IP address.
    pub ip: String,
}

impl LockoutRecord {
    /// Seconds until the current lockout expires.
    ///
    /// Returns `None` if the record is not locked or the lockout window has
    /// already elapsed. Useful for `Retry-After` headers.
    pub fn retry_after_seconds(&self) -> Option<i64> {
        if !self.locked {
            return None;
        }
        let until = self.unlock_at?;
        let seconds = (until - Utc::now()).num_seconds();
        if seconds > 0 { Some(seconds) } else { None }
    }

    /// Failed attempts left before the next lockout episode, given the
    /// configured limit.
    pub fn remaining_attempts(&self, limit: u8) -> u8 {
        limit.saturating_sub(self.attempts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_default_record_is_zero_valued() {
        let record = LockoutRecord::default();
        assert!(!record.locked);
        assert_eq!(record.locks, 0);
        assert_eq!(record.attempts, 0);
        assert_eq!(record.unlock_at, None);
        assert!(record.email.is_empty());
        assert!(record.ip.is_empty());
    }

    #[test]
    fn test_retry_after_seconds_for_active_lock() {
        let record = LockoutRecord {
            locked: true,
            locks: 1,
            unlock_at: Some(Utc::now() + Duration::minutes(20)),
            ..Default::default()
        };

        let retry_after = record.retry_after_seconds().unwrap();
        assert!(retry_after > 1190 && retry_after <= 1200);
    }

    #[test]
    fn test_retry_after_seconds_none_when_unlocked_or_expired() {
        assert_eq!(LockoutRecord::default().retry_after_seconds(), None);

        let expired = LockoutRecord {
            locked: true,
            locks: 1,
            unlock_at: Some(Utc::now() - Duration::minutes(1)),
            ..Default::default()
        };
        assert_eq!(expired.retry_after_seconds(), None);
    }

    #[test]
    fn test_remaining_attempts() {
        let record = LockoutRecord {
            attempts: 3,
            ..Default::default()
        };
        assert_eq!(record.remaining_attempts(7), 4);
        assert_eq!(record.remaining_attempts(3), 0);
        // Never underflows even if the limit was lowered at runtime.
        assert_eq!(record.remaining_attempts(2), 0);
    }
}
