//! Run-scoped snapshot store
//!
//! Keeps one [`SnapshotDocument`] per absolute snapshot path. Documents are
//! loaded lazily; the first load of a path runs under that path's lock so
//! concurrent first lookups share a single parse.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use snapmark_core::{
    build_snapshot, log_op_end, log_op_error, log_op_start, parse_document, DocumentParser,
    MarkdownParser, NoopEvents, SnapshotDocument, SnapshotEntry, SnapshotEvents, SnapshotOptions,
};

use crate::errors::{io_error, lock_poisoned, Result};
use crate::locks::PathLocks;
use crate::paths::resolve_snapshot_path;
use crate::persist::{atomic_write, PersistOutcome, PersistReport};

/// A cached document shared between the store and in-flight callers
pub type SharedDocument = Arc<Mutex<SnapshotDocument>>;

fn lock_document(doc: &SharedDocument) -> Result<MutexGuard<'_, SnapshotDocument>> {
    doc.lock().map_err(|_| lock_poisoned("snapshot_document"))
}

/// A value to record for one entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetEntry {
    pub test_name: String,
    pub entry_name: String,
    pub value: String,
    pub language: Option<String>,
    /// Alternate snapshot file, relative to the test source directory
    pub filename: Option<String>,
}

impl SetEntry {
    pub fn new(
        test_name: impl Into<String>,
        entry_name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            test_name: test_name.into(),
            entry_name: entry_name.into(),
            value: value.into(),
            language: None,
            filename: None,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }
}

/// Snapshot documents of one test run
pub struct SnapshotStore {
    options: SnapshotOptions,
    parser: Arc<dyn DocumentParser>,
    events: Arc<dyn SnapshotEvents>,
    root: Option<PathBuf>,
    documents: Mutex<HashMap<PathBuf, SharedDocument>>,
    locks: PathLocks,
}

impl SnapshotStore {
    /// Store with the markdown parser and no host notifications
    pub fn new(options: SnapshotOptions) -> Self {
        Self {
            options,
            parser: Arc::new(MarkdownParser),
            events: Arc::new(NoopEvents),
            root: None,
            documents: Mutex::new(HashMap::new()),
            locks: PathLocks::new(),
        }
    }

    pub fn with_parser(mut self, parser: Arc<dyn DocumentParser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_events(mut self, events: Arc<dyn SnapshotEvents>) -> Self {
        self.events = events;
        self
    }

    /// Directory that rendered instruction lines show paths relative to
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn options(&self) -> SnapshotOptions {
        self.options
    }

    /// Handle bound to one test source file
    pub fn scope(self: &Arc<Self>, test_file: impl Into<PathBuf>) -> SnapshotScope {
        SnapshotScope {
            store: self.clone(),
            test_file: test_file.into(),
        }
    }

    fn cached(&self, path: &Path) -> Result<Option<SharedDocument>> {
        let documents = self
            .documents
            .lock()
            .map_err(|_| lock_poisoned("snapshot_documents"))?;
        Ok(documents.get(path).cloned())
    }

    /// Cached documents sorted by path
    fn cached_all(&self) -> Result<Vec<(PathBuf, SharedDocument)>> {
        let documents = self
            .documents
            .lock()
            .map_err(|_| lock_poisoned("snapshot_documents"))?;
        let mut all: Vec<_> = documents
            .iter()
            .map(|(path, doc)| (path.clone(), doc.clone()))
            .collect();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(all)
    }

    /// Return the document for `path`, reading and parsing it on first use.
    ///
    /// Returns `None` when the file does not exist and nothing has been
    /// recorded for it yet.
    ///
    /// # Errors
    ///
    /// `Io` on read failures and `ExpectedCodeBlockAfterHeading` for
    /// malformed files. A failed load caches nothing.
    pub async fn load(&self, path: &Path) -> Result<Option<SharedDocument>> {
        if let Some(doc) = self.cached(path)? {
            return Ok(Some(doc));
        }

        let exists = tokio::fs::try_exists(path)
            .await
            .map_err(|e| io_error("snapshot_exists", path, e))?;
        if !exists {
            return Ok(None);
        }

        self.locks
            .with_lock(path, async {
                // Another caller may have finished loading while we waited
                if let Some(doc) = self.cached(path)? {
                    return Ok(Some(doc));
                }
                self.load_locked(path).await.map(Some)
            })
            .await
    }

    async fn load_locked(&self, path: &Path) -> Result<SharedDocument> {
        let started = Instant::now();
        log_op_start!("load_snapshot", path = %path.display());

        let loaded = match tokio::fs::read_to_string(path).await {
            Ok(raw) => parse_document(self.parser.as_ref(), path, raw),
            Err(e) => Err(io_error("read_snapshot", path, e)),
        };
        let duration_ms = started.elapsed().as_millis() as u64;

        let document = match loaded {
            Ok(document) => document,
            Err(err) => {
                log_op_error!("load_snapshot", err.clone(), duration_ms = duration_ms);
                return Err(err);
            }
        };

        let entry_count = document.len();
        let shared = Arc::new(Mutex::new(document));
        self.documents
            .lock()
            .map_err(|_| lock_poisoned("snapshot_documents"))?
            .insert(path.to_path_buf(), shared.clone());

        self.events.snapshot_discovered(path);
        log_op_end!(
            "load_snapshot",
            duration_ms = duration_ms,
            path = %path.display(),
            entry_count = entry_count
        );
        Ok(shared)
    }

    /// Look up the stored value of one entry.
    ///
    /// Always `None` in update-all mode. The first successful lookup of an
    /// entry marks it used and notifies the host.
    ///
    /// # Errors
    ///
    /// Propagates load failures.
    pub async fn get(
        &self,
        path: &Path,
        test_name: &str,
        entry_name: &str,
    ) -> Result<Option<String>> {
        if self.options.update_snapshots {
            return Ok(None);
        }

        let Some(doc) = self.load(path).await? else {
            return Ok(None);
        };

        let touched = {
            let mut doc = lock_document(&doc)?;
            doc.touch(test_name, entry_name)
                .map(|(entry, first_touch)| (entry.clone(), first_touch))
        };

        let Some((entry, first_touch)) = touched else {
            return Ok(None);
        };
        if first_touch {
            tracing::debug!(
                path = %path.display(),
                test_name = %entry.test_name,
                entry_name = %entry.entry_name,
                "snapshot entry read"
            );
            self.events.snapshot_entry(path, &entry);
        }
        Ok(Some(entry.value))
    }

    /// Record a value for one entry, replacing whatever was stored.
    ///
    /// With no cached document, update-all mode starts an empty one (`raw`
    /// empty) without reading the file, so the next persist regenerates it.
    /// Otherwise an existing file is loaded first so its other entries stay
    /// readable; a file that fails to load is replaced by an empty document.
    ///
    /// # Errors
    ///
    /// `Concurrency` if a cache lock was poisoned.
    pub async fn set(&self, path: &Path, entry: SetEntry) -> Result<()> {
        let doc = match self.cached(path)? {
            Some(doc) => doc,
            None => self.document_for_set(path).await?,
        };

        let mut recorded = SnapshotEntry::new(
            entry.test_name,
            entry.entry_name,
            entry.language,
            entry.value,
        );
        recorded.used = true;

        lock_document(&doc)?.insert(recorded.clone());

        tracing::debug!(
            path = %path.display(),
            test_name = %recorded.test_name,
            entry_name = %recorded.entry_name,
            "snapshot entry written"
        );
        self.events.snapshot_entry(path, &recorded);
        Ok(())
    }

    async fn document_for_set(&self, path: &Path) -> Result<SharedDocument> {
        if !self.options.update_snapshots {
            match self.load(path).await {
                Ok(Some(doc)) => return Ok(doc),
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(
                        path = %path.display(),
                        err.code = err.code(),
                        "unreadable snapshot file will be regenerated"
                    );
                }
            }
        }

        let mut documents = self
            .documents
            .lock()
            .map_err(|_| lock_poisoned("snapshot_documents"))?;
        Ok(documents
            .entry(path.to_path_buf())
            .or_insert_with(|| Arc::new(Mutex::new(SnapshotDocument::empty())))
            .clone())
    }

    /// Mark every entry of a cached or loadable document as used.
    ///
    /// Returns `false` when there is no such document.
    ///
    /// # Errors
    ///
    /// Propagates load failures.
    pub async fn use_all(&self, path: &Path) -> Result<bool> {
        let Some(doc) = self.load(path).await? else {
            return Ok(false);
        };
        lock_document(&doc)?.mark_all_used();
        Ok(true)
    }

    fn relative_path(&self, path: &Path) -> String {
        self.root
            .as_deref()
            .and_then(|root| pathdiff::diff_paths(path, root))
            .or_else(|| path.file_name().map(PathBuf::from))
            .unwrap_or_else(|| path.to_path_buf())
            .to_string_lossy()
            .replace('\\', "/")
    }

    fn render(&self, path: &Path, doc: &SnapshotDocument) -> String {
        build_snapshot(path, &self.relative_path(path), doc.entries().values())
    }

    /// Canonical text of every cached document, sorted by path
    ///
    /// # Errors
    ///
    /// `Concurrency` if a cache lock was poisoned.
    pub fn render_all(&self) -> Result<Vec<(PathBuf, String)>> {
        self.cached_all()?
            .into_iter()
            .map(|(path, doc)| {
                let doc = lock_document(&doc)?;
                let text = self.render(&path, &doc);
                Ok((path, text))
            })
            .collect()
    }

    /// Write every cached document whose rendering differs from its file.
    ///
    /// Frozen mode writes nothing and reports the would-be writes as
    /// [`PersistOutcome::Frozen`]. Documents without used entries are
    /// reported as [`PersistOutcome::Obsolete`] and left untouched.
    ///
    /// # Errors
    ///
    /// `Io` on the first failed write; earlier writes are kept.
    pub async fn persist(&self) -> Result<PersistReport> {
        let started = Instant::now();
        let documents = self.cached_all()?;
        log_op_start!("persist_snapshots", document_count = documents.len());

        let mut report = PersistReport::default();
        for (path, doc) in documents {
            let (rendered, has_used, unchanged) = {
                let doc = lock_document(&doc)?;
                let rendered = self.render(&path, &doc);
                let unchanged = rendered == doc.raw();
                (rendered, doc.has_used_entries(), unchanged)
            };

            let outcome = if !has_used {
                PersistOutcome::Obsolete
            } else if unchanged {
                PersistOutcome::Unchanged
            } else if self.options.freeze_snapshots {
                PersistOutcome::Frozen
            } else {
                if let Err(err) = atomic_write(&path, &rendered).await {
                    log_op_error!(
                        "persist_snapshots",
                        err.clone(),
                        duration_ms = started.elapsed().as_millis() as u64
                    );
                    return Err(err);
                }
                lock_document(&doc)?.replace_raw(rendered);
                PersistOutcome::Written
            };
            report.outcomes.push((path, outcome));
        }

        log_op_end!(
            "persist_snapshots",
            duration_ms = started.elapsed().as_millis() as u64,
            written = report.written().len()
        );
        Ok(report)
    }
}

/// Store access for the tests of one source file
#[derive(Clone)]
pub struct SnapshotScope {
    store: Arc<SnapshotStore>,
    test_file: PathBuf,
}

impl SnapshotScope {
    pub fn test_file(&self) -> &Path {
        &self.test_file
    }

    /// Absolute snapshot path for this source file, or for `filename` next to it
    ///
    /// # Errors
    ///
    /// See [`resolve_snapshot_path`].
    pub fn snapshot_path(&self, filename: Option<&str>) -> Result<PathBuf> {
        resolve_snapshot_path(&self.test_file, filename)
    }

    /// See [`SnapshotStore::get`]
    ///
    /// # Errors
    ///
    /// Path resolution and load failures.
    pub async fn get(
        &self,
        test_name: &str,
        entry_name: &str,
        filename: Option<&str>,
    ) -> Result<Option<String>> {
        let path = self.snapshot_path(filename)?;
        self.store.get(&path, test_name, entry_name).await
    }

    /// See [`SnapshotStore::set`]
    ///
    /// # Errors
    ///
    /// Path resolution and load failures.
    pub async fn set(&self, entry: SetEntry) -> Result<()> {
        let path = self.snapshot_path(entry.filename.as_deref())?;
        self.store.set(&path, entry).await
    }
}
