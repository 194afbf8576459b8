//! Canonical rendering of snapshot documents.

use std::collections::BTreeMap;
use std::path::Path;

use crate::model::{SnapshotEntry, DEFAULT_ENTRY_NAME};
use crate::natural::natural_cmp;
use crate::options::UPDATE_ENV_VAR;

/// Render the used entries of a document as canonical snapshot text.
///
/// `absolute` names the snapshot file (its base name becomes the title);
/// `relative` is the path shown in the instruction line. The output does not
/// depend on the iteration order of `entries`.
pub fn build_snapshot<'a, I>(absolute: &Path, relative: &str, entries: I) -> String
where
    I: IntoIterator<Item = &'a SnapshotEntry>,
{
    let mut by_test: BTreeMap<&str, Vec<&SnapshotEntry>> = BTreeMap::new();
    for entry in entries.into_iter().filter(|e| e.used) {
        by_test.entry(&entry.test_name).or_default().push(entry);
    }

    let title = absolute
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| relative.to_string());

    let mut blocks = vec![
        format!("# {}", title),
        format!(
            "Snapshots for `{}`. Re-run the tests with `{}=1` to update them.",
            relative, UPDATE_ENV_VAR
        ),
    ];

    for (test_name, mut entries) in by_test {
        entries.sort_by(|a, b| natural_cmp(&a.entry_name, &b.entry_name));
        blocks.push(format!("## `{}`", test_name));

        let bare = entries.len() == 1 && entries[0].entry_name == DEFAULT_ENTRY_NAME;
        for entry in entries {
            if !bare {
                blocks.push(format!("### `{}`", entry.entry_name));
            }
            blocks.push(format!(
                "```{}\n{}\n```",
                entry.language.as_deref().unwrap_or(""),
                entry.value
            ));
        }
    }

    let mut out = blocks.join("\n\n");
    out.push('\n');
    out
}
