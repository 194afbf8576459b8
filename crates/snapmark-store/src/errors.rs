//! Error handling for snapmark-store
//!
//! Wraps snapmark-core ExError with store-specific helpers

use std::path::Path;

use snapmark_core::errors::{ExError, ExErrorKind, SnapshotError};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create an IO error for a snapshot file
pub fn io_error(operation: &str, path: &Path, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_path(path)
        .with_message(err.to_string())
}

/// Create an error for a shared lock poisoned by a panicking holder
pub fn lock_poisoned(what: &'static str) -> ExError {
    SnapshotError::Poisoned { what }.into()
}

/// Create a missing snapshot file error
pub fn snapshot_missing(path: &Path) -> ExError {
    ExError::new(ExErrorKind::NotFound)
        .with_op("load_snapshot")
        .with_path(path)
        .with_message("Snapshot file not found")
}
