#![allow(clippy::unwrap_used, clippy::expect_used)]

use snapmark_core::errors::{ExError, ExErrorKind, SnapshotError};
use snapmark_core::logging_facility::test_capture::init_test_capture;
use snapmark_core::model::SourceLocation;
use snapmark_core::{log_op_end, log_op_error, log_op_start};
use snapmark_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_DURATION_MS, FIELD_ERR_CODE, FIELD_PATH,
};

#[test]
fn test_log_op_start_macro_records_fields() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name, path = "/tmp/a.test.md");

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event.as_deref(), Some(EVENT_START));
    assert_eq!(events[0].field(FIELD_PATH), Some("/tmp/a.test.md"));
}

#[test]
fn test_log_op_end_macro_records_duration() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1, "Should have exactly one end event");
    assert_eq!(events[0].event.as_deref(), Some(EVENT_END));
    assert_eq!(events[0].field(FIELD_DURATION_MS), Some("42"));
}

#[test]
fn test_log_op_error_includes_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = SnapshotError::ExpectedCodeBlockAfterHeading {
        path: "/tmp/a.test.md".into(),
        heading: "entry".to_string(),
        location: SourceLocation::new(5, 1),
    };
    log_op_error!(op_name, err, duration_ms = 10);

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1, "Should have exactly one error event");
    assert_eq!(events[0].event.as_deref(), Some(EVENT_END_ERROR));
    assert_eq!(
        events[0].field(FIELD_ERR_CODE),
        Some("ERR_EXPECTED_CODE_BLOCK_AFTER_HEADING")
    );
}

#[test]
fn test_log_op_error_accepts_ex_error() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_4";

    log_op_error!(op_name, ExError::new(ExErrorKind::Io), duration_ms = 1);

    capture.assert_event_exists(op_name, EVENT_END_ERROR);
}

#[test]
fn test_start_end_pairing() {
    let capture = init_test_capture();
    let op_name = "test_start_end_pairing_unique_5";

    log_op_start!(op_name);
    log_op_end!(op_name, duration_ms = 3);

    let kinds: Vec<String> = capture
        .events_for_op(op_name)
        .into_iter()
        .filter_map(|e| e.event)
        .collect();
    assert_eq!(kinds, vec![EVENT_START.to_string(), EVENT_END.to_string()]);
}
