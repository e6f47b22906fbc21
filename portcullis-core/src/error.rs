use thiserror::Error;

/// Errors raised internally by the lockout engine.
///
/// None of these ever reach callers of the four public operations: the
/// engine trades durability for availability and absorbs persistence
/// failures after logging them. The types exist so the snapshot layer's
/// fallible helpers can be exercised directly.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Failed to read snapshot file: {0}")]
    Read(String),

    #[error("Failed to decode snapshot: {0}")]
    Decode(String),

    #[error("Failed to encode snapshot: {0}")]
    Encode(String),

    #[error("Failed to write snapshot file: {0}")]
    Write(String),
}
