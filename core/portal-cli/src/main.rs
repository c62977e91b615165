//! portal: find the project behind an IDE window from the command line.
//!
//! A thin front end over `portal-core`, useful for scripting ("open a shell
//! in the project of the frontmost editor") and for debugging resolutions.
//!
//! ## Subcommands
//!
//! - `resolve`: run the resolution pipeline for one window snapshot
//! - `classify`: show the editor family and strategy chain for an app id
//! - `candidates`: show the path candidates and hints found in a title
//! - `root`: normalize a path to its project root
//! - `cache`: list, prune, or clear the resolution cache
//!
//! Exit status: 0 on success, 1 when `resolve` finds nothing, 2 on errors.

mod cache;
mod error;
mod inspect;
mod logging;
mod resolve;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use portal_core::StorageConfig;

use crate::cache::CacheAction;
use crate::error::CliError;
use crate::resolve::ResolveArgs;

#[derive(Parser)]
#[command(name = "portal")]
#[command(about = "Find the project directory behind an IDE window")]
#[command(version)]
struct Cli {
    /// Log debug output and print the resolution trace (same as PORTAL_DEBUG_LOG=1)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Write logs to daily files in the logs directory instead of stderr
    #[arg(long, global = true)]
    log_file: bool,

    /// Data directory (defaults to ~/.portal)
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the project for a window snapshot
    Resolve(ResolveArgs),

    /// Print the editor family and strategy chain for an application id
    Classify {
        #[arg(value_name = "APP_ID")]
        app_id: String,
    },

    /// Print path candidates and matching hints extracted from a window title
    Candidates {
        #[arg(value_name = "TITLE")]
        title: String,
    },

    /// Print the project root for a file or directory
    Root {
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },

    /// Inspect or maintain the resolution cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let storage = cli
        .data_dir
        .clone()
        .map(StorageConfig::with_root)
        .unwrap_or_default();
    let log_dir = cli.log_file.then(|| storage.logs_dir());
    let _logging_guard = logging::init(cli.verbose, log_dir.as_deref());

    match run(cli.command, &storage, cli.verbose) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            tracing::error!(error = %e, "portal failed");
            eprintln!("portal: {e}");
            process::exit(2);
        }
    }
}

/// Runs one subcommand. `Ok(false)` means "ran fine, found nothing".
fn run(command: Commands, storage: &StorageConfig, verbose: bool) -> Result<bool, CliError> {
    let lines = match command {
        Commands::Resolve(args) => return resolve::run(storage, &args, verbose),
        Commands::Classify { app_id } => inspect::classify_lines(&app_id),
        Commands::Candidates { title } => inspect::candidate_lines(&title),
        Commands::Root { path } => vec![inspect::root_line(&path)?],
        Commands::Cache { action } => cache::run(storage, &action)?,
    };

    for line in lines {
        println!("{line}");
    }
    Ok(true)
}
