//! Snapshot path resolution
//!
//! Snapshot files live next to the test source that owns them and always
//! carry the `.test.md` extension.

use std::path::{Path, PathBuf};

use snapmark_core::errors::SnapshotError;

use crate::errors::{io_error, Result};

/// Fixed extension of every snapshot file
pub const SNAPSHOT_EXTENSION: &str = ".test.md";

/// Resolve the absolute snapshot path for a test source file.
///
/// - no `filename`: `<dir>/<stem>.test.md`
/// - `filename`: resolved against the source directory, `.test.md` appended
///   unless already present
///
/// # Errors
///
/// `InvalidSnapshotPath` for an empty filename or a source path without a
/// file stem; `Io` if the current directory cannot be read.
pub fn resolve_snapshot_path(test_file: &Path, filename: Option<&str>) -> Result<PathBuf> {
    let test_file =
        std::path::absolute(test_file).map_err(|e| io_error("resolve_snapshot_path", test_file, e))?;
    let dir = test_file.parent().unwrap_or_else(|| Path::new("/"));

    let name = match filename {
        Some(name) if name.trim().is_empty() => {
            return Err(SnapshotError::InvalidSnapshotName {
                name: name.to_string(),
            }
            .into())
        }
        Some(name) if name.ends_with(SNAPSHOT_EXTENSION) => name.to_string(),
        Some(name) => format!("{}{}", name, SNAPSHOT_EXTENSION),
        None => {
            let stem = test_file
                .file_stem()
                .ok_or_else(|| SnapshotError::MissingFileStem {
                    path: test_file.clone(),
                })?;
            format!("{}{}", stem.to_string_lossy(), SNAPSHOT_EXTENSION)
        }
    };

    Ok(dir.join(name))
}
