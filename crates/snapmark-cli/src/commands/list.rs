//! List command
//!
//! Usage: snapmark list <FILE>

use clap::Args;
use std::path::PathBuf;

use snapmark_core::natural::natural_cmp;
use snapmark_core::SnapshotOptions;

use super::{absolute, load_existing, open_store, CommandResult};

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Snapshot file to list
    pub file: PathBuf,
}

/// Execute list command
///
/// Prints one `test#entry [lang]` line per entry, sorted by test name and
/// then naturally by entry name.
pub async fn execute(args: ListArgs, options: SnapshotOptions) -> CommandResult {
    let cwd = std::env::current_dir()?;
    let store = open_store(options, &cwd);
    let path = absolute(&args.file)?;

    let doc = load_existing(&store, &path).await?;
    let mut entries: Vec<_> = doc
        .lock()
        .map_err(|_| "snapshot document lock poisoned")?
        .entries()
        .values()
        .cloned()
        .collect();
    entries.sort_by(|a, b| {
        a.test_name
            .cmp(&b.test_name)
            .then_with(|| natural_cmp(&a.entry_name, &b.entry_name))
    });

    for entry in entries {
        match entry.language.as_deref() {
            Some(lang) => println!("{} [{}]", entry.key(), lang),
            None => println!("{}", entry.key()),
        }
    }
    Ok(())
}
