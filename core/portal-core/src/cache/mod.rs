//! Persistent fallback cache of resolved project directories.
//!
//! Stored at `~/.portal/resolution-cache.json`. The cache is the last step of
//! every chain: it answers when live signals fail, e.g. a JetBrains window
//! showing only a settings dialog title.
//!
//! # File Format
//!
//! ```json
//! {
//!   "exact::com.jetbrains.intellij::reader-flow - main.kt": {
//!     "path": "/Users/dev/code/reader-flow",
//!     "lastUsedAt": "2026-03-01T10:15:00Z"
//!   },
//!   "last::com.jetbrains.intellij": { ... }
//! }
//! ```
//!
//! Older builds wrote a flat `{ key: "path" }` map; it is upgraded on load.
//!
//! # Keys
//!
//! Every record writes two keys: an exact key for (app id, window title) when
//! the title is usable, and a "last" key for the app id alone. Lookups try
//! the exact key first.
//!
//! # Persistence
//!
//! The file is read once at load and rewritten after every mutation via temp
//! file + rename. Loading is defensive: a missing, empty, or corrupt file
//! yields an empty cache, and individual malformed entries are dropped.
//! Entries whose directory is gone are pruned at load time only; lookups
//! treat them as misses but leave them in place.

pub mod actor;

pub use actor::CacheHandle;

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::config::DEFAULT_CACHE_CAPACITY;
use crate::error::{PortalError, Result};

const EXACT_PREFIX: &str = "exact::";
const LAST_PREFIX: &str = "last::";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub path: String,
    #[serde(rename = "lastUsedAt")]
    pub last_used_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredValue {
    Entry(CacheEntry),
    Legacy(String),
}

/// Key for one specific window of an app. `None` when the title is unusable.
pub fn exact_key(app_id: &str, title: Option<&str>) -> Option<String> {
    let title = title.map(str::trim).filter(|t| !t.is_empty())?;
    Some(format!(
        "{EXACT_PREFIX}{}::{}",
        app_id.trim().to_lowercase(),
        title.to_lowercase()
    ))
}

/// Key for the most recent resolution of an app, whatever the window.
pub fn last_key(app_id: &str) -> String {
    format!("{LAST_PREFIX}{}", app_id.trim().to_lowercase())
}

/// What loading did to the stored entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    /// Legacy string entries upgraded to timestamped entries.
    pub migrated: usize,
    /// Entries that could not be parsed and were dropped.
    pub malformed: usize,
    /// Entries whose directory no longer exists.
    pub pruned: usize,
    /// Entries evicted because the store exceeded its capacity.
    pub evicted: usize,
}

impl LoadStats {
    pub fn changed(&self) -> bool {
        self.migrated + self.malformed + self.pruned + self.evicted > 0
    }
}

/// In-memory cache, optionally backed by a file.
///
/// Create with [`ResolutionCache::load`] for the persisted cache or
/// [`ResolutionCache::new_in_memory`] for tests.
#[derive(Debug)]
pub struct ResolutionCache {
    entries: BTreeMap<String, CacheEntry>,
    file_path: Option<PathBuf>,
    capacity: usize,
    load_stats: LoadStats,
}

impl Default for ResolutionCache {
    fn default() -> Self {
        Self::new_in_memory(DEFAULT_CACHE_CAPACITY)
    }
}

impl ResolutionCache {
    pub fn new_in_memory(capacity: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            file_path: None,
            capacity: capacity.max(1),
            load_stats: LoadStats::default(),
        }
    }

    pub fn load(file_path: &Path, capacity: usize) -> Self {
        Self::load_at(file_path, capacity, Utc::now())
    }

    /// Loads the cache, upgrading legacy entries with `now` as their
    /// timestamp, pruning missing directories, and enforcing `capacity`.
    /// The file is rewritten if any of that changed it.
    pub fn load_at(file_path: &Path, capacity: usize, now: DateTime<Utc>) -> Self {
        let (entries, mut stats) = read_entries(file_path, now);
        let mut cache = Self {
            entries,
            file_path: Some(file_path.to_path_buf()),
            capacity: capacity.max(1),
            load_stats: LoadStats::default(),
        };

        stats.pruned = cache.drop_missing();
        stats.evicted = cache.evict_over_capacity(&[]);
        cache.load_stats = stats;

        if stats.changed() {
            debug!(
                migrated = stats.migrated,
                malformed = stats.malformed,
                pruned = stats.pruned,
                evicted = stats.evicted,
                "Cleaned resolution cache on load"
            );
            if let Err(err) = cache.save() {
                warn!(error = %err, "Failed to persist cleaned resolution cache");
            }
        }

        cache
    }

    /// Cleanup performed by the load that created this cache.
    pub fn load_stats(&self) -> LoadStats {
        self.load_stats
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &BTreeMap<String, CacheEntry> {
        &self.entries
    }

    pub fn get(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    pub fn record(&mut self, app_id: &str, title: Option<&str>, path: &Path) -> Result<()> {
        self.record_at(app_id, title, path, Utc::now())
    }

    /// Writes the exact key (when the title is usable) and the last key,
    /// evicts the least recently used entries over capacity, and persists.
    /// The keys written here are evicted only if nothing else is left.
    pub fn record_at(
        &mut self,
        app_id: &str,
        title: Option<&str>,
        path: &Path,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let entry = CacheEntry {
            path: path.to_string_lossy().to_string(),
            last_used_at: now,
        };

        let mut written = vec![last_key(app_id)];
        if let Some(exact) = exact_key(app_id, title) {
            written.push(exact);
        }
        for key in &written {
            self.entries.insert(key.clone(), entry.clone());
        }

        let evicted = self.evict_over_capacity(&written);
        if evicted > 0 {
            debug!(evicted, capacity = self.capacity, "Evicted resolution cache entries");
        }

        self.save()
    }

    /// Exact key first, then the app's last key. A hit whose directory no
    /// longer exists is a miss.
    pub fn lookup(&self, app_id: &str, title: Option<&str>) -> Option<PathBuf> {
        exact_key(app_id, title)
            .into_iter()
            .chain(std::iter::once(last_key(app_id)))
            .find_map(|key| {
                let entry = self.entries.get(&key)?;
                let path = PathBuf::from(&entry.path);
                if path.is_dir() {
                    Some(path)
                } else {
                    debug!(key = %key, path = %entry.path, "Cached path no longer exists");
                    None
                }
            })
    }

    /// Removes entries whose directory is gone. Returns how many were removed.
    pub fn prune_missing(&mut self) -> Result<usize> {
        let pruned = self.drop_missing();
        if pruned > 0 {
            self.save()?;
        }
        Ok(pruned)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        self.save()
    }

    /// Writes the whole cache atomically. A no-op for in-memory caches.
    pub fn save(&self) -> Result<()> {
        let Some(file_path) = self.file_path.as_ref() else {
            return Ok(());
        };
        let write_failed = |details: String| PortalError::CacheWriteFailed {
            path: file_path.clone(),
            details,
        };

        let content = serde_json::to_string_pretty(&self.entries).map_err(|source| {
            PortalError::Json {
                context: "serializing resolution cache".to_string(),
                source,
            }
        })?;

        let parent_dir = file_path
            .parent()
            .ok_or_else(|| write_failed("cache path has no parent directory".to_string()))?;
        fs_err::create_dir_all(parent_dir).map_err(|e| write_failed(e.to_string()))?;

        let mut temp_file =
            NamedTempFile::new_in(parent_dir).map_err(|e| write_failed(e.to_string()))?;
        temp_file
            .write_all(content.as_bytes())
            .map_err(|e| write_failed(e.to_string()))?;
        temp_file.flush().map_err(|e| write_failed(e.to_string()))?;
        temp_file
            .persist(file_path)
            .map_err(|e| write_failed(e.error.to_string()))?;

        Ok(())
    }

    fn drop_missing(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| Path::new(&entry.path).is_dir());
        before - self.entries.len()
    }

    /// Evicts oldest-first until within capacity. `protected` keys sort after
    /// every other key.
    fn evict_over_capacity(&mut self, protected: &[String]) -> usize {
        let excess = self.entries.len().saturating_sub(self.capacity);
        if excess == 0 {
            return 0;
        }

        let mut order: Vec<(bool, DateTime<Utc>, String)> = self
            .entries
            .iter()
            .map(|(key, entry)| (protected.contains(key), entry.last_used_at, key.clone()))
            .collect();
        order.sort();

        for (_, _, key) in order.into_iter().take(excess) {
            self.entries.remove(&key);
        }
        excess
    }
}

/// Reads and upgrades the stored entries, counting legacy and malformed ones.
fn read_entries(file_path: &Path, now: DateTime<Utc>) -> (BTreeMap<String, CacheEntry>, LoadStats) {
    let mut entries = BTreeMap::new();
    let mut stats = LoadStats::default();
    if !file_path.exists() {
        return (entries, stats);
    }

    let content = match fs_err::read_to_string(file_path) {
        Ok(content) => content,
        Err(err) => {
            warn!(error = %err, "Failed to read resolution cache, starting empty");
            return (entries, stats);
        }
    };

    if content.trim().is_empty() {
        warn!("Empty resolution cache file, starting empty");
        return (entries, stats);
    }

    let raw = match serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(&content) {
        Ok(raw) => raw,
        Err(err) => {
            warn!(error = %err, "Failed to parse resolution cache, starting empty");
            return (entries, stats);
        }
    };

    for (key, value) in raw {
        match serde_json::from_value::<StoredValue>(value) {
            Ok(StoredValue::Entry(entry)) => {
                entries.insert(key, entry);
            }
            Ok(StoredValue::Legacy(path)) => {
                entries.insert(
                    key,
                    CacheEntry {
                        path,
                        last_used_at: now,
                    },
                );
                stats.migrated += 1;
            }
            Err(err) => {
                debug!(key = %key, error = %err, "Dropping malformed cache entry");
                stats.malformed += 1;
            }
        }
    }

    (entries, stats)
}
