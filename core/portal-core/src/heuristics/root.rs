//! Project root detection.
//!
//! Walks up from a file or directory to the nearest directory that looks like
//! a project root: one holding a version-control marker, or one directly
//! containing an IDE workspace file. The nearest match wins, so a package
//! inside a monorepo resolves to the package when it carries its own marker.
//!
//! Xcode project bundles (`App.xcodeproj`, `App.xcworkspace`) are directories
//! but never roots; they are stepped out of before the walk starts.

use std::path::{Path, PathBuf};

/// Directory extensions of IDE project bundles.
pub const PROJECT_BUNDLE_EXTENSIONS: &[&str] = &["xcodeproj", "xcworkspace"];

/// Version-control markers. `.git` may also be a file (worktrees, submodules).
pub const VCS_MARKERS: &[&str] = &[".git", ".hg", ".svn"];

/// Extensions of workspace entries that mark their containing directory.
pub const WORKSPACE_FILE_EXTENSIONS: &[&str] = &["xcodeproj", "xcworkspace", "code-workspace"];

/// A normalized project root and what identified it.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectRoot {
    pub path: PathBuf,
    /// The marker or workspace entry that qualified `path`; `None` when the
    /// walk found nothing and the start directory was kept.
    pub marker: Option<String>,
}

/// Normalizes an existing file or directory to its project root.
///
/// Returns `None` if `path` does not exist.
pub fn normalize_to_project_root(path: &Path) -> Option<PathBuf> {
    resolve_project_root(path).map(|root| root.path)
}

/// Like [`normalize_to_project_root`], keeping the qualifying marker.
///
/// # Algorithm
/// 1. Start from the path itself if it's a directory, otherwise its parent
/// 2. Step out of project bundles
/// 3. Walk up to the filesystem root; the first directory holding a VCS
///    marker or a workspace entry wins
/// 4. Without a match, the start directory from step 2 is the answer
pub fn resolve_project_root(path: &Path) -> Option<ProjectRoot> {
    if !path.exists() {
        return None;
    }

    let mut start = if path.is_dir() {
        path.to_path_buf()
    } else {
        path.parent()?.to_path_buf()
    };

    while is_project_bundle(&start) {
        match start.parent() {
            Some(parent) => start = parent.to_path_buf(),
            None => break,
        }
    }

    let mut current = Some(start.as_path());
    while let Some(dir) = current {
        if !is_project_bundle(dir) {
            if let Some(marker) = root_marker(dir) {
                return Some(ProjectRoot {
                    path: dir.to_path_buf(),
                    marker: Some(marker),
                });
            }
        }
        current = dir.parent();
    }

    Some(ProjectRoot {
        path: start,
        marker: None,
    })
}

/// Checks if a directory is an IDE project bundle.
pub fn is_project_bundle(dir: &Path) -> bool {
    has_extension(dir, PROJECT_BUNDLE_EXTENSIONS)
}

/// Returns the marker that qualifies `dir` as a project root, if any.
fn root_marker(dir: &Path) -> Option<String> {
    if let Some(marker) = VCS_MARKERS.iter().find(|m| dir.join(m).exists()) {
        return Some(marker.to_string());
    }

    let entries = std::fs::read_dir(dir).ok()?;
    entries
        .flatten()
        .map(|entry| entry.path())
        .find(|entry| has_extension(entry, WORKSPACE_FILE_EXTENSIONS))
        .and_then(|entry| entry.file_name().map(|n| n.to_string_lossy().to_string()))
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    // ========================================
    // Helper functions for tests
    // ========================================

    fn create_test_dir() -> TempDir {
        TempDir::new().expect("Failed to create temp dir")
    }

    fn create_file(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, "").expect("Failed to create file");
        path
    }

    fn create_dir(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::create_dir_all(&path).expect("Failed to create dir");
        path
    }

    // ========================================
    // Marker detection
    // ========================================

    #[test]
    fn file_resolves_to_git_root() {
        let tmp = create_test_dir();
        create_dir(tmp.path(), ".git");
        let src = create_dir(tmp.path(), "src/deep");
        let file = create_file(&src, "main.rs");

        let root = resolve_project_root(&file).unwrap();

        assert_eq!(root.path, tmp.path());
        assert_eq!(root.marker.as_deref(), Some(".git"));
    }

    #[test]
    fn git_file_counts_as_marker() {
        let tmp = create_test_dir();
        let worktree = create_dir(tmp.path(), "wt");
        create_file(&worktree, ".git");
        let src = create_dir(&worktree, "src");

        assert_eq!(normalize_to_project_root(&src), Some(worktree));
    }

    #[test]
    fn mercurial_marker_is_recognized() {
        let tmp = create_test_dir();
        create_dir(tmp.path(), ".hg");
        let lib = create_dir(tmp.path(), "lib");

        let root = resolve_project_root(&lib).unwrap();
        assert_eq!(root.marker.as_deref(), Some(".hg"));
    }

    #[test]
    fn workspace_file_marks_directory() {
        let tmp = create_test_dir();
        let project = create_dir(tmp.path(), "proj");
        create_file(&project, "proj.code-workspace");
        let nested = create_dir(&project, "a/b");

        let root = resolve_project_root(&nested).unwrap();

        assert_eq!(root.path, project);
        assert_eq!(root.marker.as_deref(), Some("proj.code-workspace"));
    }

    #[test]
    fn nearest_marker_wins_in_monorepo() {
        let tmp = create_test_dir();
        create_dir(tmp.path(), ".git");
        let package = create_dir(tmp.path(), "packages/auth");
        create_dir(&package, ".git");
        let file = create_file(&create_dir(&package, "src"), "login.ts");

        assert_eq!(normalize_to_project_root(&file), Some(package));
    }

    #[test]
    fn no_marker_returns_start_directory() {
        let tmp = create_test_dir();
        let dir = create_dir(tmp.path(), "loose/files");
        let file = create_file(&dir, "notes.txt");

        let root = resolve_project_root(&file).unwrap();

        // The temp dir's ancestors may carry markers on some machines; only
        // assert the unmarked shape when the walk really found nothing.
        if root.marker.is_none() {
            assert_eq!(root.path, dir);
        }
    }

    #[test]
    fn nonexistent_path_yields_none() {
        assert_eq!(
            normalize_to_project_root(Path::new("/this/path/definitely/does/not/exist")),
            None
        );
    }

    // ========================================
    // Bundles
    // ========================================

    #[test]
    fn bundle_resolves_to_its_parent() {
        let tmp = create_test_dir();
        let app = create_dir(tmp.path(), "App");
        let bundle = create_dir(&app, "App.xcodeproj");
        let pbx = create_file(&bundle, "project.pbxproj");

        assert_eq!(normalize_to_project_root(&bundle), Some(app.clone()));
        assert_eq!(normalize_to_project_root(&pbx), Some(app));
    }

    #[test]
    fn nested_bundle_content_resolves_past_the_bundle() {
        let tmp = create_test_dir();
        let app = create_dir(tmp.path(), "App");
        let bundle = create_dir(&app, "App.xcodeproj");
        let inner = create_dir(&bundle, "project.xcworkspace");
        let schemes = create_dir(&bundle, "xcshareddata/xcschemes");
        let scheme = create_file(&schemes, "App.xcscheme");

        assert_eq!(normalize_to_project_root(&inner), Some(app.clone()));
        assert_eq!(normalize_to_project_root(&scheme), Some(app));
    }

    #[test]
    fn bundle_extension_is_case_insensitive() {
        assert!(is_project_bundle(Path::new("/x/App.XcodeProj")));
        assert!(!is_project_bundle(Path::new("/x/App.swift")));
    }

    // ========================================
    // Fixed point
    // ========================================

    #[test]
    fn normalization_is_idempotent() {
        let tmp = create_test_dir();
        create_dir(tmp.path(), ".git");
        let app = create_dir(tmp.path(), "ios/App");
        let bundle = create_dir(&app, "App.xcworkspace");
        let file = create_file(&create_dir(tmp.path(), "src"), "a.rs");

        for input in [tmp.path().to_path_buf(), app, bundle, file] {
            let once = normalize_to_project_root(&input).unwrap();
            let twice = normalize_to_project_root(&once).unwrap();
            assert_eq!(once, twice, "not a fixed point for {}", input.display());
        }
    }
}
