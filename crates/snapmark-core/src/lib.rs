//! snapmark core - snapshot documents and reconciliation logic
//!
//! This crate holds everything about snapshots that does not touch the
//! filesystem or an async runtime:
//! - The snapshot document model and composite entry keys
//! - A CommonMark parser adapter producing heading/code-block nodes
//! - Reduction of those nodes into named entries
//! - Deterministic rendering of documents back to text
//! - The inline snapshot matcher
//! - Run options, host notifications, error and logging facilities
//!
//! Loading, caching and persisting documents lives in `snapmark-store`.

pub mod errors;
pub mod events;
pub mod inline;
pub mod logging_facility;
pub mod model;
pub mod natural;
pub mod options;
pub mod parse;
pub mod reduce;
pub mod render;

// Re-export commonly used types
pub use errors::{ExError, ExErrorKind, Result, SnapshotError};
pub use events::{HostEvent, NoopEvents, RecordingEvents, SnapshotEvents, TracingEvents};
pub use inline::{CallSite, InlineLiteral, InlineMatch, InlineMatcher, InlineSnapshotUpdate};
pub use model::{entry_key, SnapshotDocument, SnapshotEntry, SourceLocation};
pub use options::SnapshotOptions;
pub use parse::{DocumentParser, MarkdownParser, Node};
pub use reduce::reduce_entries;
pub use render::build_snapshot;

use std::path::Path;

/// Parse and reduce snapshot text into a document.
///
/// # Errors
///
/// Propagates parser failures and `ExpectedCodeBlockAfterHeading`.
pub fn parse_document(
    parser: &dyn DocumentParser,
    path: &Path,
    raw: impl Into<String>,
) -> Result<SnapshotDocument> {
    let raw = raw.into();
    let nodes = parser.parse(path, &raw)?;
    let entries = reduce_entries(path, nodes)?;
    Ok(SnapshotDocument::new(raw, entries))
}
