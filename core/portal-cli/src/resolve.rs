//! `portal resolve`: run the pipeline for one window.
//!
//! The snapshot comes from flags, or from a `WindowSnapshot` JSON document
//! on stdin (what a native host would send). Flags override stdin fields.
//!
//! ## Usage
//!
//! ```bash
//! portal resolve --app-id com.jetbrains.intellij --title "reader-flow - Main.kt"
//! echo '{"trusted":true,"document":"file:///Users/dev/proj"}' \
//!     | portal resolve --app-id com.microsoft.VSCode --stdin --json
//! ```

use std::io::Read;

use clap::Args;
use portal_core::{format_resolution_trace, ProjectResolver, StorageConfig, WindowSnapshot};

use crate::error::CliError;

#[derive(Args, Debug, Default)]
pub struct ResolveArgs {
    /// Application bundle identifier (e.g. com.jetbrains.intellij)
    #[arg(long)]
    pub app_id: String,

    /// Human-readable application name (defaults to the identifier)
    #[arg(long)]
    pub app_name: Option<String>,

    /// Window title
    #[arg(long)]
    pub title: Option<String>,

    /// Window document attribute: a file:// URI or a path
    #[arg(long)]
    pub document: Option<String>,

    /// Which window query produced the snapshot
    #[arg(long)]
    pub source: Option<String>,

    /// Resolve as if window attributes were unreadable
    #[arg(long)]
    pub untrusted: bool,

    /// Read a WindowSnapshot JSON object from stdin (`trusted` must be set)
    #[arg(long)]
    pub stdin: bool,

    /// Print the full resolved context as JSON
    #[arg(long)]
    pub json: bool,
}

/// Returns whether a project was resolved.
pub fn run(storage: &StorageConfig, args: &ResolveArgs, verbose: bool) -> Result<bool, CliError> {
    let snapshot = build_snapshot(args, std::io::stdin().lock())?;
    let app_name = args.app_name.as_deref().unwrap_or(&args.app_id);

    let resolver = ProjectResolver::from_storage(storage);
    let context = resolver.resolve(app_name, &args.app_id, &snapshot);

    if verbose {
        eprintln!("{}", format_resolution_trace(&context));
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&context)?);
    } else if let Some(path) = &context.resolved_path {
        println!("{path}");
    } else {
        eprintln!("{}", context.summary());
    }

    Ok(context.is_resolved())
}

fn build_snapshot(args: &ResolveArgs, input: impl Read) -> Result<WindowSnapshot, CliError> {
    let mut snapshot = if args.stdin {
        serde_json::from_reader(input)?
    } else {
        WindowSnapshot::trusted()
    };

    if let Some(title) = &args.title {
        snapshot.title = Some(title.clone());
    }
    if let Some(document) = &args.document {
        snapshot.document = Some(document.clone());
    }
    if let Some(source) = &args.source {
        snapshot.source = Some(source.clone());
    }
    if args.untrusted {
        snapshot.trusted = false;
    }

    Ok(snapshot)
}
