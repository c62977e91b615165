//! Editor recency-file resolvers.
//!
//! Editors record recently opened projects in their own files. Both resolvers
//! here share one shape:
//!
//! 1. Find recency files under a fixed set of roots
//! 2. Read them newest-modified first; unreadable files are skipped
//! 3. Keep candidate directories that exist right now
//! 4. Rank them against hints taken from the live window title
//!
//! Recency files are only flushed when a project opens or closes, so they can
//! lag the window by a few seconds. That is why they sit behind the live
//! signals in most chains.

pub mod electron;
pub mod jetbrains;

pub use electron::ElectronRecents;
pub use jetbrains::{JetBrainsRecents, MatchTier, RankedCandidate, RecentProjectCandidate};

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use walkdir::WalkDir;

use crate::types::ResolverAttempt;

/// Deep enough for `<vendor>/<product>/options/recentProjects.xml` and
/// `<editor>/User/globalStorage/storage.json`.
pub const RECENCY_SCAN_DEPTH: usize = 3;

/// A recency file found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecencyFile {
    pub path: PathBuf,
    pub modified: SystemTime,
}

/// Finds files named one of `file_names` under `roots`, newest first.
///
/// Missing roots are skipped silently. Ties on modification time fall back
/// to path order so the result is deterministic.
pub fn discover_recency_files(roots: &[PathBuf], file_names: &[&str]) -> Vec<RecencyFile> {
    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut files: Vec<RecencyFile> = roots
        .iter()
        .filter(|root| root.is_dir())
        .flat_map(|root| {
            WalkDir::new(root)
                .min_depth(1)
                .max_depth(RECENCY_SCAN_DEPTH)
                .into_iter()
                .filter_map(Result::ok)
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| file_names.contains(&name))
        })
        .filter_map(|entry| {
            let modified = entry.metadata().ok()?.modified().ok()?;
            Some(RecencyFile {
                path: entry.into_path(),
                modified,
            })
        })
        .filter(|file| seen.insert(file.path.clone()))
        .collect();

    files.sort_by(|a, b| {
        b.modified
            .cmp(&a.modified)
            .then_with(|| a.path.cmp(&b.path))
    });
    files
}

/// What a recency resolver concluded.
#[derive(Debug, Clone, PartialEq)]
pub enum RecentsOutcome {
    Resolved { path: PathBuf, detail: String },
    NoFiles,
    NoCandidates { files: usize },
    /// Several candidates and no title hint to choose between them.
    Ambiguous { candidates: usize },
    NoMatch { candidates: usize },
}

impl RecentsOutcome {
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Resolved { path, .. } => Some(path),
            _ => None,
        }
    }

    pub fn into_attempt(self, strategy: &str) -> ResolverAttempt {
        match self {
            Self::Resolved { path, detail } => ResolverAttempt::success(strategy, &path, detail),
            Self::NoFiles => ResolverAttempt::failure(strategy, "no recency files found"),
            Self::NoCandidates { files } => ResolverAttempt::failure(
                strategy,
                format!("no existing project directories in {files} recency file(s)"),
            ),
            Self::Ambiguous { candidates } => ResolverAttempt::failure(
                strategy,
                format!("{candidates} candidate projects and no title hint to choose between them"),
            ),
            Self::NoMatch { candidates } => ResolverAttempt::failure(
                strategy,
                format!("none of {candidates} candidate projects matched the window title"),
            ),
        }
    }
}

/// The directory a recency entry stands for: itself if a directory, its
/// parent if a file (workspace files), nothing if it is gone.
pub(crate) fn existing_project_dir(path: &Path) -> Option<PathBuf> {
    if path.is_dir() {
        Some(path.to_path_buf())
    } else if path.is_file() {
        path.parent().filter(|p| p.is_dir()).map(Path::to_path_buf)
    } else {
        None
    }
}
