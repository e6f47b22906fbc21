//! In-memory lockout state.
//!
//! [`LockoutStore`] is the single source of truth for per-identity attempt
//! and lock counters. It is a plain synchronous state machine with no
//! interior mutability: exclusive ownership and serialization of access are
//! the engine's job, which keeps every state transition unit-testable on its
//! own.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::{Identity, LockoutConfig, LockoutRecord};

/// The identity → record mapping owned by the lockout engine.
#[derive(Debug, Default)]
pub struct LockoutStore {
    records: HashMap<String, LockoutRecord>,
}

impl LockoutStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from a previously persisted mapping.
    pub fn from_records(records: HashMap<String, LockoutRecord>) -> Self {
        Self { records }
    }

    /// The full mapping, as persisted by the snapshot layer.
    pub fn records(&self) -> &HashMap<String, LockoutRecord> {
        &self.records
    }

    /// Number of identities currently tracked.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Value snapshot of the record for `identity`, or the zero-valued
    /// record if the identity has never been seen. Never mutates.
    pub fn status(&self, identity: &Identity) -> LockoutRecord {
        self.records
            .get(&identity.key())
            .cloned()
            .unwrap_or_default()
    }

    /// Register one failed credential check for `identity`.
    ///
    /// Creates the record lazily, increments `attempts`, and when the
    /// configured limit is reached starts a new lockout episode: `attempts`
    /// wraps to 0, `locks` increments, and `unlock_at` is computed from
    /// `now` by [`LockoutConfig::lockout_expiry`]. Returns a snapshot of
    /// the updated record.
    pub fn record_failure(
        &mut self,
        identity: &Identity,
        config: &LockoutConfig,
        now: DateTime<Utc>,
    ) -> LockoutRecord {
        let record = self
            .records
            .entry(identity.key())
            .or_insert_with(|| LockoutRecord {
                email: identity.email.clone(),
                ip: identity.ip.clone(),
                ..Default::default()
            });

        record.attempts = record.attempts.saturating_add(1);
        if record.attempts >= config.max_failed_attempts {
            record.attempts = 0;
            record.locks += 1;
            record.unlock_at = Some(config.lockout_expiry(now, record.locks));
            record.locked = true;
        }

        record.clone()
    }

    /// End the current lockout episode for `identity`, if any.
    ///
    /// Resets `locked`, `unlock_at`, and `attempts`; the endured `locks`
    /// count is left untouched so future episodes keep escalating. The
    /// engine does not time out locks on its own, so this is invoked by the
    /// caller once it observes the window has elapsed.
    pub fn clear_lock(&mut self, identity: &Identity) {
        if let Some(record) = self.records.get_mut(&identity.key()) {
            record.locked = false;
            record.unlock_at = None;
            record.attempts = 0;
        }
    }

    /// Forgive one past lockout episode for `identity`.
    ///
    /// Decrements `locks` if positive; when the count reaches 0 the record
    /// is deleted entirely and the identity reverts to unknown.
    pub fn forgive(&mut self, identity: &Identity) {
        let key = identity.key();
        if let Some(record) = self.records.get_mut(&key) {
            if record.locks > 0 {
                record.locks -= 1;
                if record.locks == 0 {
                    self.records.remove(&key);
                }
            }
        }
    }
}
