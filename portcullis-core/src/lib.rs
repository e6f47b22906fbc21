//! Core functionality for the portcullis login protection library
//!
//! This crate contains the stateful lockout engine: the per-identity data
//! model, the in-memory state store, the escalation algorithm, the snapshot
//! persistence layer, and the single-writer actor that serializes every
//! operation.
//!
//! It is designed to be consumed through the [`portcullis`] facade crate by
//! an authentication handler, which consults the engine before and after
//! each credential check. The engine itself never verifies credentials and
//! never rejects a request; it only tracks consecutive failures and computes
//! escalating lockout windows.
//!
//! See [`LockoutEngine`] for the actor, [`LockoutHandle`] for the client
//! surface, [`LockoutRecord`] for the per-identity state, and
//! [`LockoutConfig`] for the knobs.
//!
//! [`portcullis`]: https://docs.rs/portcullis

pub mod config;
pub mod engine;
pub mod error;
pub mod identity;
pub mod record;
pub mod snapshot;
pub mod store;

pub use config::LockoutConfig;
pub use engine::{LockoutEngine, LockoutHandle};
pub use error::{Error, SnapshotError};
pub use identity::Identity;
pub use record::LockoutRecord;
pub use snapshot::SnapshotFile;
pub use store::LockoutStore;
