#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{Fixture, PARSER_SNAPSHOT};
use snapmark_core::logging_facility::init_test_capture;
use snapmark_core::SnapshotOptions;
use snapmark_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_ENTRY_COUNT, FIELD_ERR_CODE, FIELD_PATH,
};

#[tokio::test]
async fn test_load_emits_start_and_end() {
    let capture = init_test_capture();

    // Given: a valid and a malformed snapshot in the same directory
    let fixture = Fixture::with_snapshot(PARSER_SNAPSHOT);
    let broken = fixture.dir.path().join("broken.test.md");
    fixture.write(&broken, "## t\n\n### e\n");
    let (store, _events) = fixture.store(SnapshotOptions::default());

    // When: both are loaded
    store.load(&fixture.snapshot).await.unwrap();
    store.load(&broken).await.unwrap_err();

    // Then: the valid load logs start/end with its entry count
    let good_path = fixture.snapshot.display().to_string();
    let events: Vec<_> = capture
        .events_for_op("load_snapshot")
        .into_iter()
        .filter(|e| e.field(FIELD_PATH) == Some(good_path.as_str()))
        .collect();
    assert!(events
        .iter()
        .any(|e| e.event.as_deref() == Some(EVENT_START)));
    let end = events
        .iter()
        .find(|e| e.event.as_deref() == Some(EVENT_END))
        .expect("load_snapshot end event");
    assert_eq!(end.field(FIELD_ENTRY_COUNT), Some("3"));

    // And: the malformed load logs an error with its stable code
    let failures = capture.count_events(|e| {
        e.op.as_deref() == Some("load_snapshot")
            && e.event.as_deref() == Some(EVENT_END_ERROR)
            && e.field(FIELD_ERR_CODE) == Some("ERR_EXPECTED_CODE_BLOCK_AFTER_HEADING")
    });
    assert!(failures >= 1);
}
