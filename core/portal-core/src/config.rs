//! User preferences loaded from `~/.portal/config.toml`.
//!
//! Every field has a default, so a missing file (or a file with only some
//! keys) is fine. The strategy order per editor family is deliberately not
//! configurable.

use crate::error::{PortalError, Result};
use crate::storage::{RecencyRoots, StorageConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default maximum number of entries kept in the resolution cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 200;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PortalConfig {
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
    /// Additional JetBrains vendor/product directories to scan.
    #[serde(default)]
    pub extra_jetbrains_roots: Vec<PathBuf>,
    /// Additional Electron editor data directories to scan.
    #[serde(default)]
    pub extra_electron_roots: Vec<PathBuf>,
}

fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            extra_jetbrains_roots: Vec::new(),
            extra_electron_roots: Vec::new(),
        }
    }
}

impl PortalConfig {
    /// Appends configured extra roots to the given defaults.
    pub fn recency_roots(&self, defaults: RecencyRoots) -> RecencyRoots {
        let mut roots = defaults;
        roots
            .jetbrains
            .extend(self.extra_jetbrains_roots.iter().map(|p| expand_tilde(p)));
        roots
            .electron
            .extend(self.extra_electron_roots.iter().map(|p| expand_tilde(p)));
        roots
    }
}

/// Loads the config file at `path`, returning defaults if it doesn't exist.
pub fn load_config(path: &Path) -> Result<PortalConfig> {
    if !path.exists() {
        return Ok(PortalConfig::default());
    }

    let content = fs_err::read_to_string(path).map_err(|source| PortalError::Io {
        context: format!("reading config {}", path.display()),
        source,
    })?;

    let config: PortalConfig =
        toml::from_str(&content).map_err(|err| PortalError::ConfigMalformed {
            path: path.to_path_buf(),
            details: err.to_string(),
        })?;

    if config.cache_capacity == 0 {
        return Err(PortalError::ConfigMalformed {
            path: path.to_path_buf(),
            details: "cache_capacity must be at least 1".to_string(),
        });
    }

    Ok(config)
}

/// Loads the config file from the storage root.
pub fn load_config_with_storage(storage: &StorageConfig) -> Result<PortalConfig> {
    load_config(&storage.config_file())
}

fn expand_tilde(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}
