//! snapmark CLI
//!
//! Command-line tools for Markdown snapshot files

use clap::{Parser, Subcommand};
use snapmark_core::logging_facility::{self, Profile};
use snapmark_core::SnapshotOptions;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "snapmark")]
#[command(about = "snapmark - Markdown snapshot files", long_about = None)]
struct Cli {
    /// Refuse to write snapshot files (same as SNAPMARK_FREEZE=1)
    #[arg(long, global = true)]
    frozen: bool,

    /// Human-readable debug logs on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON logs on stderr
    #[arg(long, global = true, conflicts_with = "verbose")]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Parse snapshot files and report structural errors
    Check(commands::check::CheckArgs),
    /// List the entries of a snapshot file
    List(commands::list::ListArgs),
    /// Rewrite snapshot files in canonical form
    Fmt(commands::fmt::FmtArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        logging_facility::init(Profile::Development);
    } else if cli.json_logs {
        logging_facility::init(Profile::Production);
    }

    let mut options = SnapshotOptions::from_env();
    if cli.frozen {
        options.freeze_snapshots = true;
    }

    let result = match cli.command {
        Commands::Check(args) => commands::check::execute(args, options).await,
        Commands::List(args) => commands::list::execute(args, options).await,
        Commands::Fmt(args) => commands::fmt::execute(args, options).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
