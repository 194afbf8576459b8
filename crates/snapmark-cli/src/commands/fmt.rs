//! Fmt command
//!
//! Usage: snapmark fmt <FILES>... [--check] [--root <DIR>]

use clap::Args;
use std::path::PathBuf;

use snapmark_core::SnapshotOptions;
use snapmark_store::errors::snapshot_missing;
use snapmark_store::PersistOutcome;

use super::{absolute, open_store, CommandResult};

#[derive(Debug, Args)]
pub struct FmtArgs {
    /// Snapshot files to rewrite
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Report files that would change without writing them
    #[arg(long)]
    pub check: bool,

    /// Directory the instruction line paths are relative to (default: current directory)
    #[arg(long)]
    pub root: Option<PathBuf>,
}

/// Execute fmt command
pub async fn execute(args: FmtArgs, mut options: SnapshotOptions) -> CommandResult {
    if args.check {
        options.freeze_snapshots = true;
    }
    let root = match args.root {
        Some(root) => absolute(&root)?,
        None => std::env::current_dir()?,
    };
    let store = open_store(options, &root);

    for file in &args.files {
        let path = absolute(file)?;
        if !store.use_all(&path).await? {
            return Err(snapshot_missing(&path).into());
        }
    }

    let report = store.persist().await?;
    for (path, outcome) in &report.outcomes {
        match outcome {
            PersistOutcome::Written => println!("formatted {}", path.display()),
            PersistOutcome::Frozen => println!("would reformat {}", path.display()),
            PersistOutcome::Unchanged | PersistOutcome::Obsolete => {}
        }
    }

    if report.has_drift() {
        let drifted = report.paths_with(PersistOutcome::Frozen).len();
        return Err(format!("{} snapshot files are not formatted", drifted).into());
    }
    Ok(())
}
