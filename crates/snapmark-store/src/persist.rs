//! Writing rendered snapshot documents back to disk
//!
//! Uses temp→rename so a crashed run never leaves a half-written snapshot

use std::path::{Path, PathBuf};

use crate::errors::{io_error, Result};

/// Atomically write text to a file, creating parent directories
pub async fn atomic_write(target_path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = target_path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| io_error("create_snapshot_dir", parent, e))?;
    }

    let mut temp_name = target_path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    tokio::fs::write(&temp_path, content)
        .await
        .map_err(|e| io_error("write_snapshot_temp", &temp_path, e))?;

    tokio::fs::rename(&temp_path, target_path)
        .await
        .map_err(|e| io_error("rename_snapshot_temp", target_path, e))?;

    Ok(())
}

/// What persisting did with one cached document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    /// Rendering differed from the file and was written
    Written,
    /// Rendering is identical to the file contents
    Unchanged,
    /// No entry was used this run; the file is left for the host to remove
    Obsolete,
    /// Rendering differs but frozen mode forbids writing
    Frozen,
}

/// Per-path outcomes of one persist pass, sorted by path
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersistReport {
    pub outcomes: Vec<(PathBuf, PersistOutcome)>,
}

impl PersistReport {
    pub fn paths_with(&self, outcome: PersistOutcome) -> Vec<&Path> {
        self.outcomes
            .iter()
            .filter(|(_, o)| *o == outcome)
            .map(|(p, _)| p.as_path())
            .collect()
    }

    pub fn written(&self) -> Vec<&Path> {
        self.paths_with(PersistOutcome::Written)
    }

    /// Documents that are out of date on disk but were not written
    pub fn has_drift(&self) -> bool {
        self.outcomes
            .iter()
            .any(|(_, o)| *o == PersistOutcome::Frozen)
    }
}
