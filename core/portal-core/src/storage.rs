//! Storage configuration and path management for Portal.
//!
//! Two kinds of locations live here:
//!
//! - [`StorageConfig`]: where Portal keeps its own data (`~/.portal/`).
//! - [`RecencyRoots`]: where editors keep their recently-opened-project files.
//!   Portal only ever reads from these.
//!
//! Both are plain values so tests can inject temp directories.

use std::path::{Path, PathBuf};

/// Central configuration for all Portal storage paths.
///
/// Production code uses `StorageConfig::default()` which points to `~/.portal/`.
/// Tests use `StorageConfig::with_root(temp_dir)` for isolation.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(std::env::temp_dir);
        Self {
            root: home.join(".portal"),
        }
    }
}

impl StorageConfig {
    /// Creates a StorageConfig with a custom root directory.
    pub fn with_root(root: PathBuf) -> Self {
        Self { root }
    }

    /// Returns the root directory for Portal data.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to resolution-cache.json (app/window → project directory).
    pub fn cache_file(&self) -> PathBuf {
        self.root.join("resolution-cache.json")
    }

    /// Path to config.toml (user preferences).
    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    /// Path to logs/ directory (CLI file logging).
    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Editor Recency Roots
// ─────────────────────────────────────────────────────────────────────────────

/// JetBrains vendor directories. Product folders (`IntelliJIdea2024.1`,
/// `AndroidStudio2023.3`, ...) live one level below.
const JETBRAINS_VENDOR_DIRS: &[&str] = &["JetBrains", "Google"];

/// Electron editor application-support folder names.
const ELECTRON_EDITOR_DIRS: &[&str] = &["Code", "Code - Insiders", "Cursor", "VSCodium", "Windsurf"];

/// Directories scanned for editor recency files.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecencyRoots {
    pub jetbrains: Vec<PathBuf>,
    pub electron: Vec<PathBuf>,
}

impl RecencyRoots {
    /// No roots at all. Recency strategies will report "no files".
    pub fn empty() -> Self {
        Self::default()
    }

    /// Well-known per-user locations for the current platform layout.
    ///
    /// Both the macOS (`~/Library/Application Support`) and XDG
    /// (`~/.config`) layouts are listed; missing directories cost a single
    /// failed `read_dir` each.
    pub fn for_home(home: &Path) -> Self {
        let bases = [
            home.join("Library").join("Application Support"),
            home.join(".config"),
        ];

        let jetbrains = bases
            .iter()
            .flat_map(|base| JETBRAINS_VENDOR_DIRS.iter().map(move |v| base.join(v)))
            .collect();
        let electron = bases
            .iter()
            .flat_map(|base| ELECTRON_EDITOR_DIRS.iter().map(move |e| base.join(e)))
            .collect();

        Self {
            jetbrains,
            electron,
        }
    }

    pub fn with_jetbrains_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.jetbrains.push(root.into());
        self
    }

    pub fn with_electron_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.electron.push(root.into());
        self
    }
}

impl RecencyRoots {
    /// Default roots under the user's home directory, or none without one.
    pub fn system_default() -> Self {
        dirs::home_dir()
            .map(|home| Self::for_home(&home))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_points_to_portal_dir() {
        let config = StorageConfig::default();
        assert!(config.root().ends_with(".portal"));
    }

    #[test]
    fn test_with_root_derives_file_paths() {
        let temp = TempDir::new().unwrap();
        let config = StorageConfig::with_root(temp.path().to_path_buf());

        assert_eq!(config.cache_file(), temp.path().join("resolution-cache.json"));
        assert_eq!(config.config_file(), temp.path().join("config.toml"));
        assert_eq!(config.logs_dir(), temp.path().join("logs"));
    }

    #[test]
    fn test_recency_roots_cover_both_layouts() {
        let home = PathBuf::from("/home/dev");
        let roots = RecencyRoots::for_home(&home);

        assert!(roots
            .jetbrains
            .contains(&home.join(".config").join("JetBrains")));
        assert!(roots.jetbrains.contains(
            &home
                .join("Library")
                .join("Application Support")
                .join("JetBrains")
        ));
        assert!(roots
            .electron
            .contains(&home.join(".config").join("Cursor")));
        assert_eq!(roots.electron.len(), ELECTRON_EDITOR_DIRS.len() * 2);
    }

    #[test]
    fn test_builder_appends_roots() {
        let roots = RecencyRoots::empty()
            .with_jetbrains_root("/a")
            .with_electron_root("/b");

        assert_eq!(roots.jetbrains, vec![PathBuf::from("/a")]);
        assert_eq!(roots.electron, vec![PathBuf::from("/b")]);
    }
}
