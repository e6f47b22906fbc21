use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};

/// Configuration for the lockout engine.
///
/// Supplied once at construction and threaded through, rather than read from
/// process-wide globals. The defaults match the behavior the engine was
/// tuned for in production: seven failed attempts per lockout episode, a
/// twenty minute base window, and persistence disabled.
///
/// # Example
///
/// ```rust
/// use portcullis_core::LockoutConfig;
///
/// let config = LockoutConfig::default()
///     .with_max_failed_attempts(5)
///     .with_snapshot_path("/var/lib/myapp/lockouts.json");
/// assert_eq!(config.base_minutes, 20);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockoutConfig {
    /// Failed attempts before a lockout episode begins.
    pub max_failed_attempts: u8,
    /// Base unit, in minutes, for the escalation formula.
    pub base_minutes: u32,
    /// Where to persist the snapshot file. `None` disables persistence
    /// entirely and the engine runs purely in memory.
    pub snapshot_path: Option<PathBuf>,
}

impl Default for LockoutConfig {
    fn default() -> Self {
        Self {
            max_failed_attempts: 7,
            base_minutes: 20,
            snapshot_path: None,
        }
    }
}

impl LockoutConfig {
    /// Set the number of failed attempts before a lockout episode begins.
    pub fn with_max_failed_attempts(mut self, limit: u8) -> Self {
        self.max_failed_attempts = limit;
        self
    }

    /// Set the escalation base unit in minutes.
    pub fn with_base_minutes(mut self, minutes: u32) -> Self {
        self.base_minutes = minutes;
        self
    }

    /// Enable persistence, writing the snapshot file at the given path.
    pub fn with_snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = Some(path.into());
        self
    }

    /// Compute the expiry of the `locks`-th lockout episode, starting from
    /// `from`.
    ///
    /// The window accumulates: for each episode `i` from 1 up to `locks`,
    /// `base_minutes × i³` minutes are added on top of the previous sum, so
    /// the expiry lands at `from + base_minutes × Σ i³`. With the default
    /// base of 20 minutes the first episode lasts 20 minutes, the second
    /// 180, the third 720. The cumulative sum is the observed contract;
    /// do not collapse it to a single-term formula.
    pub fn lockout_expiry(&self, from: DateTime<Utc>, locks: u32) -> DateTime<Utc> {
        let mut expiry = from;
        for i in 1..=i64::from(locks) {
            expiry = expiry + Duration::minutes(i64::from(self.base_minutes) * i * i * i);
        }
        expiry
    }
}
