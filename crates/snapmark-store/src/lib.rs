//! snapmark store - lazy, run-scoped snapshot file cache
//!
//! Provides:
//! - `SnapshotStore`: one document per snapshot path, loaded at most once
//! - `SnapshotScope`: `get`/`set` bound to a single test source file
//! - Per-path async locks
//! - Snapshot path resolution (`<stem>.test.md` next to the test source)
//! - Atomic persistence of rendered documents

pub mod errors;
pub mod locks;
pub mod paths;
pub mod persist;
pub mod store;

// Re-export key types
pub use errors::Result;
pub use locks::PathLocks;
pub use paths::{resolve_snapshot_path, SNAPSHOT_EXTENSION};
pub use persist::{PersistOutcome, PersistReport};
pub use store::{SetEntry, SharedDocument, SnapshotScope, SnapshotStore};
