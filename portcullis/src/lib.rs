//! # Portcullis
//!
//! Portcullis protects authentication endpoints from repeated failed login
//! attempts. It tracks, per (email, IP) identity, how many consecutive
//! failures have occurred and imposes an escalating temporary lockout once
//! a configurable threshold is reached. Your authentication handler consults
//! it before and after each credential check; portcullis itself never
//! verifies credentials and never talks to the network.
//!
//! State lives in a single-writer in-memory store owned by a dedicated
//! worker task, optionally persisted to a local snapshot file so lockouts
//! survive process restarts. Each lockout episode an identity endures makes
//! the next one dramatically longer (cubic escalation), while successful
//! logins forgive past episodes one at a time.
//!
//! ## Example
//!
//! ```rust,no_run
//! use portcullis::{Identity, LockoutConfig, Portcullis};
//!
//! #[tokio::main]
//! async fn main() {
//!     let portcullis = Portcullis::new(
//!         LockoutConfig::default().with_snapshot_path("/var/lib/myapp/lockouts.json"),
//!     );
//!
//!     let identity = Identity::new("user@example.com", "203.0.113.7");
//!
//!     // Before the credential check: reject while locked out.
//!     if portcullis.is_locked(identity.clone()).await {
//!         let record = portcullis.lockout_status(identity).await;
//!         // Tell the client when to retry, e.g. via a Retry-After header.
//!         let _ = record.retry_after_seconds();
//!         return;
//!     }
//!
//!     // After the credential check:
//!     let password_ok = false; // result of your own verification
//!     if password_ok {
//!         portcullis.record_successful_login(identity).await;
//!     } else {
//!         portcullis.record_failed_attempt(identity).await;
//!     }
//! }
//! ```

use chrono::Utc;

/// Re-export core types from portcullis_core
///
/// These types are commonly used when working with the Portcullis API.
pub use portcullis_core::{
    Identity, LockoutConfig, LockoutEngine, LockoutHandle, LockoutRecord,
};

/// The client facade over the lockout engine.
///
/// Construction spawns the engine's worker task; every method translates
/// caller intent into a message to that single worker, so all operations
/// across all identities are totally ordered. The facade is cheap to clone
/// and safe to share across tasks.
///
/// All methods are infallible: persistence trouble is absorbed inside the
/// engine (logged, never surfaced), and unknown identities simply read as
/// zero-valued records.
#[derive(Debug, Clone)]
pub struct Portcullis {
    handle: LockoutHandle,
    config: LockoutConfig,
}

impl Portcullis {
    /// Spawn a lockout engine with the given configuration.
    ///
    /// Loads the snapshot file (when configured) before the first request
    /// is served. Must be called from within a tokio runtime.
    pub fn new(config: LockoutConfig) -> Self {
        let handle = LockoutEngine::spawn(config.clone());
        Self { handle, config }
    }

    /// Spawn a lockout engine with the default configuration: seven
    /// attempts per episode, a twenty minute base window, no persistence.
    pub fn with_defaults() -> Self {
        Self::new(LockoutConfig::default())
    }

    /// The configuration this engine was constructed with.
    pub fn config(&self) -> &LockoutConfig {
        &self.config
    }

    /// A raw handle to the engine, for callers that only need the four
    /// primitive operations.
    pub fn handle(&self) -> LockoutHandle {
        self.handle.clone()
    }

    /// Current record for `identity`, or the zero-valued record if the
    /// identity has never been seen.
    pub async fn lockout_status(&self, identity: Identity) -> LockoutRecord {
        self.handle.lockout_status(identity).await
    }

    /// Register one failed credential check for `identity`.
    ///
    /// Reaching the configured limit starts a new lockout episode with an
    /// escalated window. Returns once the message is accepted for
    /// processing.
    pub async fn record_failed_attempt(&self, identity: Identity) {
        self.handle.record_failed_attempt(identity).await;
    }

    /// End the current lockout episode for `identity`, keeping its endured
    /// lock count so future episodes continue to escalate.
    pub async fn clear_lockout(&self, identity: Identity) {
        self.handle.clear_lockout(identity).await;
    }

    /// Forgive one past lockout episode for `identity`. Once every episode
    /// has been forgiven the identity reverts to unknown.
    pub async fn forgive_lockout(&self, identity: Identity) {
        self.handle.forgive_lockout(identity).await;
    }

    /// Whether `identity` is currently locked out.
    ///
    /// The engine never times out locks on its own; this method performs
    /// the caller's side of that contract. When the lockout window has
    /// already elapsed it clears the lock and reports unlocked, so a
    /// handler can gate logins on this single call.
    pub async fn is_locked(&self, identity: Identity) -> bool {
        let record = self.handle.lockout_status(identity.clone()).await;
        if !record.locked {
            return false;
        }

        let elapsed = record.unlock_at.is_none_or(|until| until <= Utc::now());
        if elapsed {
            tracing::debug!(identity = %identity, "Lockout window elapsed, clearing");
            self.handle.clear_lockout(identity).await;
            return false;
        }

        true
    }

    /// Record a successful authentication for `identity`: forgive one past
    /// lockout episode and clear any active lock.
    pub async fn record_successful_login(&self, identity: Identity) {
        self.handle.forgive_lockout(identity.clone()).await;
        self.handle.clear_lockout(identity).await;
    }

    /// Failed attempts left before the next lockout episode for `identity`.
    pub async fn remaining_attempts(&self, identity: Identity) -> u8 {
        self.handle
            .lockout_status(identity)
            .await
            .remaining_attempts(self.config.max_failed_attempts)
    }
}
