//! Host notifications.
//!
//! The store and the inline matcher report what they did through a
//! [`SnapshotEvents`] implementation supplied by the test-runner host. All
//! notifications are one-way; the host cannot veto them.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::inline::InlineSnapshotUpdate;
use crate::model::SnapshotEntry;

/// Receiver for snapshot notifications
pub trait SnapshotEvents: Send + Sync {
    /// A snapshot file was loaded and parsed for the first time in this run
    fn snapshot_discovered(&self, path: &Path);

    /// An entry was read for the first time in this run, or written
    fn snapshot_entry(&self, path: &Path, entry: &SnapshotEntry);

    /// A call site needs its inline snapshot literal rewritten
    fn inline_snapshot_update(&self, update: &InlineSnapshotUpdate);
}

/// Discards every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEvents;

impl SnapshotEvents for NoopEvents {
    fn snapshot_discovered(&self, _path: &Path) {}

    fn snapshot_entry(&self, _path: &Path, _entry: &SnapshotEntry) {}

    fn inline_snapshot_update(&self, _update: &InlineSnapshotUpdate) {}
}

/// Logs every notification at debug level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEvents;

impl SnapshotEvents for TracingEvents {
    fn snapshot_discovered(&self, path: &Path) {
        tracing::debug!(path = %path.display(), "snapshot file discovered");
    }

    fn snapshot_entry(&self, path: &Path, entry: &SnapshotEntry) {
        tracing::debug!(
            path = %path.display(),
            test_name = %entry.test_name,
            entry_name = %entry.entry_name,
            "snapshot entry used"
        );
    }

    fn inline_snapshot_update(&self, update: &InlineSnapshotUpdate) {
        tracing::debug!(
            line = update.line,
            column = update.column,
            "inline snapshot update requested"
        );
    }
}

/// A notification as recorded by [`RecordingEvents`]
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Discovered(PathBuf),
    Entry(PathBuf, SnapshotEntry),
    InlineUpdate(InlineSnapshotUpdate),
}

/// Keeps every notification in arrival order
#[derive(Debug, Default)]
pub struct RecordingEvents {
    events: Mutex<Vec<HostEvent>>,
}

impl RecordingEvents {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, event: HostEvent) {
        self.events
            .lock()
            .map(|mut events| events.push(event))
            .ok();
    }

    pub fn events(&self) -> Vec<HostEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn discoveries(&self) -> Vec<PathBuf> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                HostEvent::Discovered(path) => Some(path),
                _ => None,
            })
            .collect()
    }

    pub fn entries(&self) -> Vec<SnapshotEntry> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                HostEvent::Entry(_, entry) => Some(entry),
                _ => None,
            })
            .collect()
    }

    pub fn inline_updates(&self) -> Vec<InlineSnapshotUpdate> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                HostEvent::InlineUpdate(update) => Some(update),
                _ => None,
            })
            .collect()
    }
}

impl SnapshotEvents for RecordingEvents {
    fn snapshot_discovered(&self, path: &Path) {
        self.push(HostEvent::Discovered(path.to_path_buf()));
    }

    fn snapshot_entry(&self, path: &Path, entry: &SnapshotEntry) {
        self.push(HostEvent::Entry(path.to_path_buf(), entry.clone()));
    }

    fn inline_snapshot_update(&self, update: &InlineSnapshotUpdate) {
        self.push(HostEvent::InlineUpdate(update.clone()));
    }
}
