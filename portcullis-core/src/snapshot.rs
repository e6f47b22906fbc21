//! Snapshot persistence for the lockout state.
//!
//! The snapshot file is a derived, eventually-consistent copy of the
//! identity → record mapping: rewritten in full after every mutation and
//! read exactly once, at engine startup. The in-memory state stays
//! authoritative throughout; every persistence failure is absorbed after a
//! warning so the engine never refuses service over disk trouble.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::{Error, LockoutRecord, error::SnapshotError};

/// Reads and rewrites the on-disk copy of the lockout state.
///
/// Constructed with `None` the snapshot is disabled and both [`load`] and
/// [`save`] are no-ops, leaving the engine purely in-memory.
///
/// [`load`]: SnapshotFile::load
/// [`save`]: SnapshotFile::save
#[derive(Debug)]
pub struct SnapshotFile {
    path: Option<PathBuf>,
}

impl SnapshotFile {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    /// Whether persistence is configured.
    pub fn is_enabled(&self) -> bool {
        self.path.is_some()
    }

    /// The configured snapshot path, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Load the persisted mapping, absorbing all failures.
    ///
    /// A missing file is the normal first start and yields an empty mapping
    /// quietly; an unreadable or undecodable file yields an empty mapping
    /// with a warning. Never fatal.
    pub fn load(&self) -> HashMap<String, LockoutRecord> {
        let Some(path) = &self.path else {
            return HashMap::new();
        };

        if !path.exists() {
            tracing::debug!(path = %path.display(), "No snapshot file found, starting empty");
            return HashMap::new();
        }

        match self.try_load() {
            Ok(records) => {
                tracing::debug!(
                    count = records.len(),
                    path = %path.display(),
                    "Loaded lockout snapshot"
                );
                records
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    path = %path.display(),
                    "Failed to load lockout snapshot, starting empty"
                );
                HashMap::new()
            }
        }
    }

    /// Read and decode the snapshot file.
    pub fn try_load(&self) -> Result<HashMap<String, LockoutRecord>, Error> {
        let Some(path) = &self.path else {
            return Ok(HashMap::new());
        };

        let bytes = std::fs::read(path).map_err(|e| SnapshotError::Read(e.to_string()))?;
        let records =
            serde_json::from_slice(&bytes).map_err(|e| SnapshotError::Decode(e.to_string()))?;
        Ok(records)
    }

    /// Rewrite the snapshot file with the full current mapping, absorbing
    /// write failures after a warning. A no-op when persistence is
    /// disabled.
    pub fn save(&self, records: &HashMap<String, LockoutRecord>) {
        let Some(path) = &self.path else {
            return;
        };

        if let Err(e) = self.try_save(records) {
            tracing::warn!(
                error = %e,
                path = %path.display(),
                "Failed to write lockout snapshot, continuing with in-memory state"
            );
        }
    }

    /// Encode the mapping and overwrite the snapshot file.
    pub fn try_save(&self, records: &HashMap<String, LockoutRecord>) -> Result<(), Error> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let bytes = serde_json::to_vec(records).map_err(|e| SnapshotError::Encode(e.to_string()))?;
        std::fs::write(path, bytes).map_err(|e| SnapshotError::Write(e.to_string()))?;
        Ok(())
    }
}
