//! Entry reduction: node sequence → entry mapping.
//!
//! Layout of a snapshot document:
//!
//! - `#` title, ignored
//! - `##` opens a test scope
//! - `###` names the entry whose code block follows immediately
//! - a code block with no `###` before it is the test's unnamed entry `"0"`

use std::path::Path;

use crate::errors::{Result, SnapshotError};
use crate::model::{EntryMap, SnapshotEntry, DEFAULT_ENTRY_NAME};
use crate::parse::Node;

const TEST_HEADING_LEVEL: u8 = 2;
const ENTRY_HEADING_LEVEL: u8 = 3;

/// Strip one wrapping backtick on each side, then surrounding whitespace.
pub fn clean_heading(text: &str) -> &str {
    let text = text.strip_prefix('`').unwrap_or(text);
    let text = text.strip_suffix('`').unwrap_or(text);
    text.trim()
}

/// Reduce the ordered nodes of one document into its entries.
///
/// Later entries overwrite earlier ones with the same composite key.
///
/// # Errors
///
/// `ExpectedCodeBlockAfterHeading` when an entry heading is not immediately
/// followed by a code block. The error carries the heading's location.
pub fn reduce_entries(path: &Path, nodes: Vec<Node>) -> Result<EntryMap> {
    let mut cursor = nodes.into_iter().peekable();
    let mut entries = EntryMap::new();

    while let Some(node) = cursor.next() {
        let test_name = match node {
            Node::Heading {
                level: TEST_HEADING_LEVEL,
                text,
                ..
            } => clean_heading(&text).to_string(),
            _ => continue,
        };

        // Anything that is neither an entry heading nor a code block closes
        // the scope and is left for the outer loop.
        while let Some(node) = cursor.next_if(|n| {
            matches!(
                n,
                Node::Heading {
                    level: ENTRY_HEADING_LEVEL,
                    ..
                } | Node::CodeBlock { .. }
            )
        }) {
            let entry = match node {
                Node::Heading { text, loc, .. } => {
                    let entry_name = clean_heading(&text);
                    match cursor.next() {
                        Some(Node::CodeBlock { language, text, .. }) => {
                            SnapshotEntry::new(&test_name, entry_name, language, text)
                        }
                        _ => {
                            return Err(SnapshotError::ExpectedCodeBlockAfterHeading {
                                path: path.to_path_buf(),
                                heading: entry_name.to_string(),
                                location: loc,
                            }
                            .into())
                        }
                    }
                }
                Node::CodeBlock { language, text, .. } => {
                    SnapshotEntry::new(&test_name, DEFAULT_ENTRY_NAME, language, text)
                }
            };
            entries.insert(entry.key(), entry);
        }
    }

    Ok(entries)
}
