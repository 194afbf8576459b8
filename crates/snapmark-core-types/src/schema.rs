//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Snapshot identifiers
pub const FIELD_PATH: &str = "path";
pub const FIELD_TEST_NAME: &str = "test_name";
pub const FIELD_ENTRY_NAME: &str = "entry_name";

// Collection sizes
pub const FIELD_ENTRY_COUNT: &str = "entry_count";
pub const FIELD_DOCUMENT_COUNT: &str = "document_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
