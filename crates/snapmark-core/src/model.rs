//! Snapshot document model.
//!
//! A [`SnapshotDocument`] is the in-memory form of one `.test.md` file: the
//! text it was loaded from plus the entries reduced out of it. Entries are
//! addressed by a composite key built with [`entry_key`].

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Separator joining test name and entry name into a composite key.
///
/// Names containing this character can collide; see [`entry_key`].
pub const KEY_SEPARATOR: char = '#';

/// Implicit entry name for a test holding a single unnamed snapshot.
pub const DEFAULT_ENTRY_NAME: &str = "0";

/// Build the composite key for `(test_name, entry_name)`.
///
/// No escaping is applied: `("a#b", "c")` and `("a", "b#c")` map to the same
/// key.
pub fn entry_key(test_name: &str, entry_name: &str) -> String {
    let mut key = String::with_capacity(test_name.len() + entry_name.len() + 1);
    key.push_str(test_name);
    key.push(KEY_SEPARATOR);
    key.push_str(entry_name);
    key
}

/// 1-based line and column inside a snapshot file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// One captured expectation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub test_name: String,
    pub entry_name: String,
    /// Code-fence info string, kept for round-trip fidelity only
    pub language: Option<String>,
    pub value: String,
    /// Read or written by a test during the current run
    pub used: bool,
}

impl SnapshotEntry {
    /// Create an entry that has not been touched in this run
    pub fn new(
        test_name: impl Into<String>,
        entry_name: impl Into<String>,
        language: Option<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            test_name: test_name.into(),
            entry_name: entry_name.into(),
            language,
            value: value.into(),
            used: false,
        }
    }

    pub fn key(&self) -> String {
        entry_key(&self.test_name, &self.entry_name)
    }
}

/// Entry mapping of a document, keyed by [`entry_key`]
pub type EntryMap = HashMap<String, SnapshotEntry>;

/// The parsed and serializable representation of one snapshot file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotDocument {
    raw: String,
    entries: EntryMap,
}

impl SnapshotDocument {
    /// A document that exists only in memory and has never been persisted
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(raw: impl Into<String>, entries: EntryMap) -> Self {
        Self {
            raw: raw.into(),
            entries,
        }
    }

    /// Original file text as loaded; empty for in-memory documents
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Record the text the document was last persisted as
    pub fn replace_raw(&mut self, raw: impl Into<String>) {
        self.raw = raw.into();
    }

    pub fn entries(&self) -> &EntryMap {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, test_name: &str, entry_name: &str) -> Option<&SnapshotEntry> {
        self.entries.get(&entry_key(test_name, entry_name))
    }

    /// Mark an entry as used and return it.
    ///
    /// The boolean is `true` only on the first touch in this run.
    pub fn touch(&mut self, test_name: &str, entry_name: &str) -> Option<(&SnapshotEntry, bool)> {
        let entry = self.entries.get_mut(&entry_key(test_name, entry_name))?;
        let first_touch = !entry.used;
        entry.used = true;
        Some((&*entry, first_touch))
    }

    /// Insert or overwrite the entry at its composite key
    pub fn insert(&mut self, entry: SnapshotEntry) {
        self.entries.insert(entry.key(), entry);
    }

    /// Mark every entry as used, as a full reformat of the file would
    pub fn mark_all_used(&mut self) {
        for entry in self.entries.values_mut() {
            entry.used = true;
        }
    }

    pub fn has_used_entries(&self) -> bool {
        self.entries.values().any(|e| e.used)
    }
}
