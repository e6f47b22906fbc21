//! Single-writer lockout actor.
//!
//! This module implements the stateful core of the library: one dedicated
//! tokio task owns the [`LockoutStore`] for the lifetime of the process, and
//! every operation reaches it as a message over a bounded channel. The store
//! is never shared and never locked; total ordering of all operations across
//! all identities falls out of the single sequential loop.
//!
//! # Operations
//!
//! - Register a failed credential check (fire-and-forget)
//! - Query the current record (request/response round trip)
//! - Clear an elapsed lockout (fire-and-forget)
//! - Forgive one past lockout episode (fire-and-forget)
//!
//! Mutating operations return to the caller once the message is accepted
//! onto the request queue, not once the mutation and its snapshot write have
//! completed. A stalled snapshot write therefore stalls the worker and,
//! transitively, every pending caller; this is a deliberate property of the
//! serialized persistence path, not an oversight.
//!
//! # Example
//!
//! ```rust,ignore
//! use portcullis_core::{Identity, LockoutConfig, LockoutEngine};
//!
//! let handle = LockoutEngine::spawn(LockoutConfig::default());
//!
//! let identity = Identity::new("user@example.com", "192.168.1.1");
//! handle.record_failed_attempt(identity.clone()).await;
//!
//! let record = handle.lockout_status(identity).await;
//! if record.locked {
//!     // Reject the login until the caller observes unlock_at passing.
//! }
//! ```

use chrono::Utc;
use tokio::sync::{mpsc, oneshot};

use crate::{Identity, LockoutConfig, LockoutRecord, LockoutStore, SnapshotFile};

/// Depth of the actor's inbound request queue. Senders await a free slot,
/// which preserves the handoff synchronization point without making them
/// wait for the mutation itself.
const REQUEST_QUEUE_DEPTH: usize = 32;

#[derive(Debug)]
enum Request {
    RecordFailure {
        identity: Identity,
    },
    Status {
        identity: Identity,
        respond_to: oneshot::Sender<LockoutRecord>,
    },
    ClearLock {
        identity: Identity,
    },
    Forgive {
        identity: Identity,
    },
}

/// The worker that owns the lockout state.
///
/// Constructed and spawned through [`LockoutEngine::spawn`]; the task runs
/// until every [`LockoutHandle`] has been dropped.
pub struct LockoutEngine {
    config: LockoutConfig,
    store: LockoutStore,
    snapshot: SnapshotFile,
    requests: mpsc::Receiver<Request>,
}

impl LockoutEngine {
    /// Load the snapshot, spawn the worker task, and return a handle to it.
    ///
    /// Must be called from within a tokio runtime. The returned handle is
    /// cheap to clone; the engine shuts down once all clones are dropped.
    pub fn spawn(config: LockoutConfig) -> LockoutHandle {
        let snapshot = SnapshotFile::new(config.snapshot_path.clone());
        let store = LockoutStore::from_records(snapshot.load());
        let (requests_tx, requests_rx) = mpsc::channel(REQUEST_QUEUE_DEPTH);

        let engine = Self {
            config,
            store,
            snapshot,
            requests: requests_rx,
        };
        tokio::spawn(engine.run());

        LockoutHandle {
            requests: requests_tx,
        }
    }

    async fn run(mut self) {
        tracing::debug!(tracked = self.store.len(), "Lockout engine started");

        while let Some(request) = self.requests.recv().await {
            self.handle(request);
        }

        tracing::debug!("Lockout engine stopped");
    }

    fn handle(&mut self, request: Request) {
        match request {
            Request::RecordFailure { identity } => {
                let record = self
                    .store
                    .record_failure(&identity, &self.config, Utc::now());
                // attempts wraps to 0 exactly when a new episode begins.
                if record.locked && record.attempts == 0 {
                    tracing::info!(
                        identity = %identity,
                        locks = record.locks,
                        unlock_at = ?record.unlock_at,
                        "Identity locked out"
                    );
                }
                self.snapshot.save(self.store.records());
            }
            Request::Status {
                identity,
                respond_to,
            } => {
                // The caller may have gone away; nothing to do then.
                let _ = respond_to.send(self.store.status(&identity));
            }
            Request::ClearLock { identity } => {
                self.store.clear_lock(&identity);
                self.snapshot.save(self.store.records());
            }
            Request::Forgive { identity } => {
                self.store.forgive(&identity);
                self.snapshot.save(self.store.records());
            }
        }
    }
}

/// Cloneable client handle to the lockout engine.
///
/// All methods are infallible from the caller's point of view: persistence
/// trouble is absorbed inside the engine, and a stopped engine degrades to
/// warnings plus zero-valued query results rather than errors.
#[derive(Debug, Clone)]
pub struct LockoutHandle {
    requests: mpsc::Sender<Request>,
}

impl LockoutHandle {
    /// Current record for `identity`, or the zero-valued record if the
    /// identity has never been seen.
    ///
    /// Blocks until the worker produces the response. Does not mutate state
    /// and does not touch the snapshot file.
    pub async fn lockout_status(&self, identity: Identity) -> LockoutRecord {
        let (respond_to, response) = oneshot::channel();
        if self
            .requests
            .send(Request::Status {
                identity,
                respond_to,
            })
            .await
            .is_err()
        {
            tracing::warn!("Lockout engine is gone, reporting zero-valued record");
            return LockoutRecord::default();
        }

        response.await.unwrap_or_else(|_| {
            tracing::warn!("Lockout engine dropped a status request, reporting zero-valued record");
            LockoutRecord::default()
        })
    }

    /// Register one failed credential check for `identity`.
    ///
    /// Returns once the message is accepted for processing.
    pub async fn record_failed_attempt(&self, identity: Identity) {
        self.send(Request::RecordFailure { identity }).await;
    }

    /// End the current lockout episode for `identity`.
    ///
    /// The engine never times out locks on its own; call this once the
    /// lockout window has been observed to elapse.
    pub async fn clear_lockout(&self, identity: Identity) {
        self.send(Request::ClearLock { identity }).await;
    }

    /// Forgive one past lockout episode for `identity`, typically after a
    /// subsequent successful authentication.
    pub async fn forgive_lockout(&self, identity: Identity) {
        self.send(Request::Forgive { identity }).await;
    }

    async fn send(&self, request: Request) {
        if self.requests.send(request).await.is_err() {
            tracing::warn!("Lockout engine is gone, dropping request");
        }
    }
}
