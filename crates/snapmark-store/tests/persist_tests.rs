#![allow(clippy::unwrap_used, clippy::expect_used)]

// Writing reconciled documents back to disk

mod common;

use common::{Fixture, PARSER_SNAPSHOT};
use snapmark_core::SnapshotOptions;
use snapmark_store::{PersistOutcome, SetEntry};

const RENDERED_NEW: &str = "# parser.test.md

Snapshots for `parser.test.md`. Re-run the tests with `SNAPMARK_UPDATE=1` to update them.

## `renders`

### `1`

```html
<p/>
```

### `2`

```
done
```

### `10`

```
ten
```
";

async fn record_new(fixture: &Fixture, options: SnapshotOptions) -> std::sync::Arc<snapmark_store::SnapshotStore> {
    let (store, _events) = fixture.store(options);
    let scope = store.scope(&fixture.test_file);
    scope.set(SetEntry::new("renders", "10", "ten")).await.unwrap();
    scope
        .set(SetEntry::new("renders", "1", "<p/>").with_language("html"))
        .await
        .unwrap();
    scope.set(SetEntry::new("renders", "2", "done")).await.unwrap();
    store
}

#[tokio::test]
async fn test_new_document_is_written_in_canonical_form() {
    // Given: entries recorded out of natural order
    let fixture = Fixture::new();
    let store = record_new(&fixture, SnapshotOptions::default()).await;

    // When: the run ends
    let report = store.persist().await.unwrap();

    // Then: the file is written with naturally sorted entries
    assert_eq!(report.written(), vec![fixture.snapshot.as_path()]);
    assert_eq!(fixture.read_snapshot(), RENDERED_NEW);
    assert!(!report.has_drift());
}

#[tokio::test]
async fn test_second_persist_is_unchanged() {
    let fixture = Fixture::new();
    let store = record_new(&fixture, SnapshotOptions::default()).await;

    store.persist().await.unwrap();
    let report = store.persist().await.unwrap();

    assert_eq!(
        report.outcomes,
        vec![(fixture.snapshot.clone(), PersistOutcome::Unchanged)]
    );
}

#[tokio::test]
async fn test_reading_every_entry_of_canonical_file_writes_nothing() {
    // Given: a canonical file from a previous run
    let fixture = Fixture::with_snapshot(RENDERED_NEW);
    let (store, _events) = fixture.store(SnapshotOptions::default());
    let scope = store.scope(&fixture.test_file);

    // When: a later run reads every entry
    for name in ["1", "2", "10"] {
        assert!(scope.get("renders", name, None).await.unwrap().is_some());
    }
    let report = store.persist().await.unwrap();

    // Then: the file is already up to date
    assert_eq!(report.paths_with(PersistOutcome::Unchanged).len(), 1);
    assert!(report.written().is_empty());
    assert_eq!(fixture.read_snapshot(), RENDERED_NEW);
}

#[tokio::test]
async fn test_unused_entries_are_pruned() {
    // Given: a file with two tests where only one runs
    let fixture = Fixture::with_snapshot(PARSER_SNAPSHOT);
    let (store, _events) = fixture.store(SnapshotOptions::default());
    let scope = store.scope(&fixture.test_file);
    scope.get("parses empty input", "0", None).await.unwrap();

    // When: persisted
    let report = store.persist().await.unwrap();

    // Then: only the used test survives
    assert_eq!(report.written().len(), 1);
    let written = fixture.read_snapshot();
    assert!(written.contains("## `parses empty input`"));
    assert!(!written.contains("parses list"));
    assert!(!written.contains("List(a, b)"));
}

#[tokio::test]
async fn test_frozen_mode_reports_drift_without_writing() {
    // Given: frozen mode with new values recorded
    let fixture = Fixture::new();
    let store = record_new(&fixture, SnapshotOptions::new(false, true)).await;

    // When: persisted
    let report = store.persist().await.unwrap();

    // Then: nothing is written and the drift is reported
    assert_eq!(
        report.outcomes,
        vec![(fixture.snapshot.clone(), PersistOutcome::Frozen)]
    );
    assert!(report.has_drift());
    assert!(!fixture.snapshot.exists());
}

#[tokio::test]
async fn test_document_without_used_entries_is_obsolete() {
    // Given: a file whose entries no test asked for
    let fixture = Fixture::with_snapshot(PARSER_SNAPSHOT);
    let (store, _events) = fixture.store(SnapshotOptions::default());
    let scope = store.scope(&fixture.test_file);
    assert_eq!(scope.get("removed test", "0", None).await.unwrap(), None);

    // When: persisted
    let report = store.persist().await.unwrap();

    // Then: it is reported but left on disk as-is
    assert_eq!(report.paths_with(PersistOutcome::Obsolete).len(), 1);
    assert_eq!(fixture.read_snapshot(), PARSER_SNAPSHOT);
}

#[tokio::test]
async fn test_use_all_keeps_every_entry() {
    let fixture = Fixture::with_snapshot(PARSER_SNAPSHOT);
    let (store, _events) = fixture.store(SnapshotOptions::default());

    assert!(store.use_all(&fixture.snapshot).await.unwrap());
    store.persist().await.unwrap();

    let written = fixture.read_snapshot();
    assert!(written.contains("### `tokens`"));
    assert!(written.contains("### `ast`"));
    assert!(written.contains("```json\n[\"a\", \"b\"]\n```"));
    assert!(written.contains("Re-run the tests with `SNAPMARK_UPDATE=1`"));

    let missing = fixture.dir.path().join("missing.test.md");
    assert!(!store.use_all(&missing).await.unwrap());
}

#[tokio::test]
async fn test_render_all_is_sorted_by_path() {
    let fixture = Fixture::new();
    let (store, _events) = fixture.store(SnapshotOptions::default());
    let scope = store.scope(&fixture.test_file);
    scope
        .set(SetEntry::new("t", "0", "b").with_filename("zeta"))
        .await
        .unwrap();
    scope
        .set(SetEntry::new("t", "0", "a").with_filename("alpha"))
        .await
        .unwrap();

    let rendered = store.render_all().unwrap();

    let names: Vec<_> = rendered
        .iter()
        .map(|(p, _)| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["alpha.test.md", "zeta.test.md"]);
    assert!(rendered[0].1.starts_with("# alpha.test.md\n"));
}

#[tokio::test]
async fn test_written_snapshot_reloads_in_next_run() {
    let fixture = Fixture::new();
    let store = record_new(&fixture, SnapshotOptions::default()).await;
    store.persist().await.unwrap();

    let (next_run, _events) = fixture.store(SnapshotOptions::default());
    let scope = next_run.scope(&fixture.test_file);

    assert_eq!(
        scope.get("renders", "1", None).await.unwrap(),
        Some("<p/>".to_string())
    );
    assert_eq!(
        scope.get("renders", "10", None).await.unwrap(),
        Some("ten".to_string())
    );
}
