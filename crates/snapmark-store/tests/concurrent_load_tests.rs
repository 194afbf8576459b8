#![allow(clippy::unwrap_used, clippy::expect_used)]

// First-load races: every concurrent lookup must share one parse

mod common;

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use common::{Fixture, PARSER_SNAPSHOT};
use snapmark_core::{DocumentParser, MarkdownParser, Node, RecordingEvents, SnapshotOptions};
use snapmark_store::{SetEntry, SnapshotStore};

/// Markdown parser that counts how often it runs
#[derive(Default)]
struct CountingParser {
    calls: AtomicUsize,
}

impl CountingParser {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DocumentParser for CountingParser {
    fn parse(&self, path: &Path, raw: &str) -> snapmark_core::Result<Vec<Node>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        MarkdownParser.parse(path, raw)
    }
}

fn counting_store(fixture: &Fixture) -> (Arc<SnapshotStore>, Arc<CountingParser>, Arc<RecordingEvents>) {
    let parser = Arc::new(CountingParser::default());
    let events = Arc::new(RecordingEvents::new());
    let store = SnapshotStore::new(SnapshotOptions::default())
        .with_parser(parser.clone())
        .with_events(events.clone())
        .with_root(fixture.dir.path());
    (Arc::new(store), parser, events)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_first_lookups_parse_once() {
    // Given: an uncached snapshot file
    let fixture = Fixture::with_snapshot(PARSER_SNAPSHOT);
    let (store, parser, events) = counting_store(&fixture);

    // When: eight tasks look up the same entry at once
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let scope = store.scope(&fixture.test_file);
            tokio::spawn(async move { scope.get("parses list", "tokens", None).await })
        })
        .collect();
    let results = futures::future::join_all(handles).await;

    // Then: all see the value, the file was parsed and announced once
    for result in results {
        assert_eq!(
            result.unwrap().unwrap(),
            Some("[\"a\", \"b\"]".to_string())
        );
    }
    assert_eq!(parser.calls(), 1);
    assert_eq!(events.discoveries().len(), 1);
    assert_eq!(events.entries().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_loads_of_different_files_are_independent() {
    let fixture = Fixture::with_snapshot(PARSER_SNAPSHOT);
    let other = fixture.dir.path().join("other.test.md");
    fixture.write(&other, "## `t`\n\n```\nx\n```\n");
    let (store, parser, events) = counting_store(&fixture);

    let futures = (0..4).flat_map(|_| {
        let a = store.clone();
        let b = store.clone();
        let first = fixture.snapshot.clone();
        let second = other.clone();
        [
            tokio::spawn(async move { a.load(&first).await.map(|d| d.is_some()) }),
            tokio::spawn(async move { b.load(&second).await.map(|d| d.is_some()) }),
        ]
    });
    let results = futures::future::join_all(futures).await;

    assert!(results.into_iter().all(|r| r.unwrap().unwrap()));
    assert_eq!(parser.calls(), 2);
    assert_eq!(events.discoveries().len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_sets_on_new_file_share_one_document() {
    // Given: no snapshot file
    let fixture = Fixture::new();
    let (store, parser, _events) = counting_store(&fixture);

    // When: several tests record entries at once
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let scope = store.scope(&fixture.test_file);
            tokio::spawn(async move {
                scope
                    .set(SetEntry::new("t", i.to_string(), format!("v{}", i)))
                    .await
            })
        })
        .collect();
    for result in futures::future::join_all(handles).await {
        result.unwrap().unwrap();
    }

    // Then: every entry landed in the same cached document
    let doc = store.load(&fixture.snapshot).await.unwrap().unwrap();
    assert_eq!(doc.lock().unwrap().len(), 8);
    assert_eq!(parser.calls(), 0);
}
