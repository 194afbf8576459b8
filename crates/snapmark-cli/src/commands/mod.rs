pub mod check;
pub mod fmt;
pub mod list;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use snapmark_core::{SnapshotOptions, TracingEvents};
use snapmark_store::errors::snapshot_missing;
use snapmark_store::{SharedDocument, SnapshotStore};

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Store for one CLI invocation; instruction lines are relative to `root`
pub fn open_store(options: SnapshotOptions, root: &Path) -> SnapshotStore {
    SnapshotStore::new(options)
        .with_events(Arc::new(TracingEvents))
        .with_root(root)
}

/// Absolute form of a path given on the command line
pub fn absolute(path: &Path) -> std::io::Result<PathBuf> {
    std::path::absolute(path)
}

/// Load a snapshot file that must exist
pub async fn load_existing(
    store: &SnapshotStore,
    path: &Path,
) -> snapmark_store::Result<SharedDocument> {
    store
        .load(path)
        .await?
        .ok_or_else(|| snapshot_missing(path))
}
