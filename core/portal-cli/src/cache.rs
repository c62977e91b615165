//! `portal cache`: inspect and maintain `~/.portal/resolution-cache.json`.
//!
//! Loading the cache already prunes entries whose directory is gone, so
//! `list` shows only live entries and `prune` reports what loading removed.

use chrono::SecondsFormat;
use clap::Subcommand;
use portal_core::cache::LoadStats;
use portal_core::{load_config_with_storage, PortalConfig, ResolutionCache, StorageConfig};
use serde::Serialize;

use crate::error::CliError;

#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// List cached entries, most recently used first
    List {
        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove entries whose directory no longer exists
    Prune,
    /// Remove every entry
    Clear,
}

#[derive(Debug, Serialize)]
struct ListedEntry<'a> {
    key: &'a str,
    path: &'a str,
    #[serde(rename = "lastUsedAt")]
    last_used_at: String,
}

pub fn run(storage: &StorageConfig, action: &CacheAction) -> Result<Vec<String>, CliError> {
    let capacity = load_config_with_storage(storage)
        .unwrap_or_else(|err| {
            tracing::warn!(error = %err, "Ignoring unusable config, using defaults");
            PortalConfig::default()
        })
        .cache_capacity;
    let mut cache = ResolutionCache::load(&storage.cache_file(), capacity);

    match action {
        CacheAction::List { json } => list_lines(&cache, *json),
        CacheAction::Prune => {
            let pruned = cache.load_stats().pruned + cache.prune_missing()?;
            Ok(vec![prune_summary(pruned, cache.load_stats(), cache.len())])
        }
        CacheAction::Clear => {
            let removed = cache.len();
            cache.clear()?;
            Ok(vec![format!("Removed {removed} entries")])
        }
    }
}

fn list_lines(cache: &ResolutionCache, json: bool) -> Result<Vec<String>, CliError> {
    let mut entries: Vec<ListedEntry<'_>> = cache
        .entries()
        .iter()
        .map(|(key, entry)| ListedEntry {
            key,
            path: &entry.path,
            last_used_at: entry.last_used_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        })
        .collect();
    entries.sort_by(|a, b| b.last_used_at.cmp(&a.last_used_at).then_with(|| a.key.cmp(b.key)));

    if json {
        return Ok(vec![serde_json::to_string_pretty(&entries)?]);
    }
    Ok(entries
        .iter()
        .map(|e| format!("{}\t{}\t{}", e.last_used_at, e.key, e.path))
        .collect())
}

fn prune_summary(pruned: usize, stats: LoadStats, remaining: usize) -> String {
    let mut summary = format!("Pruned {pruned} entries, {remaining} remaining");
    if stats.migrated > 0 {
        summary.push_str(&format!(" (upgraded {} legacy entries)", stats.migrated));
    }
    summary
}
