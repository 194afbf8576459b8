//! Check command
//!
//! Usage: snapmark check <FILES>...

use clap::Args;
use std::path::PathBuf;

use snapmark_core::SnapshotOptions;

use super::{absolute, load_existing, open_store, CommandResult};

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Snapshot files to parse
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

/// Execute check command
pub async fn execute(args: CheckArgs, options: SnapshotOptions) -> CommandResult {
    let cwd = std::env::current_dir()?;
    let store = open_store(options, &cwd);

    let mut failed = 0usize;
    for file in &args.files {
        let path = absolute(file)?;
        match load_existing(&store, &path).await {
            Ok(doc) => {
                let count = doc.lock().map_err(|_| "snapshot document lock poisoned")?.len();
                println!("ok {} ({} entries)", file.display(), count);
            }
            Err(err) => {
                failed += 1;
                eprintln!("{}", err);
            }
        }
    }

    if failed > 0 {
        let total = args.files.len();
        return Err(format!("{} of {} snapshot files failed to parse", failed, total).into());
    }
    Ok(())
}
