//! Electron editor `storage.json` resolver (VS Code, Cursor, VSCodium, ...).
//!
//! The recent-workspace list has moved around between releases, and some
//! forks write files that are not quite valid JSON. Candidates therefore come
//! from two passes whose results are concatenated: a structured walk of the
//! parsed document, then a regex sweep of the raw text. Title-hint ranking
//! downstream is what filters the noise the sweep lets in.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use super::{discover_recency_files, existing_project_dir, RecentsOutcome};
use crate::heuristics::title::{hints_from_optional_title, name_matches_hint, name_overlaps_hint};
use crate::heuristics::{path_from_uri_or_literal, unescape_slashes};
use crate::patterns::{RE_FILE_URI, RE_QUOTED_ABS_PATH};

pub const ELECTRON_RECENT_FILES: &[&str] = &["storage.json"];

/// Key fragments (lowercase) naming the recently-opened list.
const RECENT_LIST_KEYS: &[&str] = &["recentlyopenedpathslist", "openedpathslist"];

/// Entry keys holding a URI, probed before [`PATH_KEYS`].
const URI_KEYS: &[&str] = &[
    "folderUri",
    "fileUri",
    "workspaceUri",
    "configURIPath",
    "folder",
    "uri",
    "workspace",
];

/// Entry keys holding a plain path.
const PATH_KEYS: &[&str] = &["folderPath", "fsPath", "configPath", "path"];

/// Fields read when a probe key holds an object rather than a string.
const NESTED_PATH_FIELDS: &[&str] = &["fsPath", "path", "configPath"];

// ─────────────────────────────────────────────────────────────────────────────
// Extraction
// ─────────────────────────────────────────────────────────────────────────────

/// Raw path or URI tokens from one file: structured results first, then the
/// regex sweep. Tokens are unescaped but not yet decoded or deduplicated.
pub fn extract_tokens(content: &str) -> Vec<String> {
    let mut tokens = match serde_json::from_str::<Value>(content) {
        Ok(doc) => structured_tokens(&doc),
        Err(err) => {
            debug!(error = %err, "storage.json is not valid JSON; using text scan only");
            Vec::new()
        }
    };
    tokens.extend(regex_tokens(content));
    tokens.iter().map(|t| unescape_slashes(t)).collect()
}

fn structured_tokens(doc: &Value) -> Vec<String> {
    let entries = find_recent_entries(doc).or_else(|| {
        doc.get("entries")
            .and_then(Value::as_array)
            .map(|entries| entries.to_vec())
    });

    match entries {
        Some(entries) => entries.iter().filter_map(probe_entry).collect(),
        None => {
            let mut found = Vec::new();
            scan_for_entries(doc, &mut found);
            found
        }
    }
}

/// Depth-first search for a recently-opened list owning an `entries` array.
/// The list may also be stored as a JSON string holding the object.
fn find_recent_entries(value: &Value) -> Option<Vec<Value>> {
    match value {
        Value::Object(map) => {
            let listed = map.iter().find_map(|(key, child)| {
                let key = key.to_lowercase();
                if !RECENT_LIST_KEYS.iter().any(|k| key.contains(k)) {
                    return None;
                }
                match child {
                    Value::String(embedded) => serde_json::from_str::<Value>(embedded)
                        .ok()
                        .and_then(|inner| entries_of(&inner)),
                    other => entries_of(other),
                }
            });
            listed.or_else(|| map.values().find_map(find_recent_entries))
        }
        Value::Array(items) => items.iter().find_map(find_recent_entries),
        _ => None,
    }
}

fn entries_of(value: &Value) -> Option<Vec<Value>> {
    value.get("entries").and_then(Value::as_array).cloned()
}

/// Collects every object that answers a probe, without descending into it.
fn scan_for_entries(value: &Value, found: &mut Vec<String>) {
    match value {
        Value::Object(map) => match probe_entry(value) {
            Some(token) => found.push(token),
            None => map.values().for_each(|child| scan_for_entries(child, found)),
        },
        Value::Array(items) => items.iter().for_each(|child| scan_for_entries(child, found)),
        _ => {}
    }
}

/// First URI key, then first path key; the first hit wins.
fn probe_entry(entry: &Value) -> Option<String> {
    URI_KEYS
        .iter()
        .chain(PATH_KEYS)
        .find_map(|key| entry.get(*key).and_then(probe_value))
}

fn probe_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Object(_) => NESTED_PATH_FIELDS
            .iter()
            .find_map(|field| value.get(*field).and_then(Value::as_str))
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string),
        _ => None,
    }
}

fn regex_tokens(content: &str) -> impl Iterator<Item = String> + '_ {
    let uris = RE_FILE_URI.find_iter(content).map(|m| m.as_str().to_string());
    let paths = RE_QUOTED_ABS_PATH
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string());
    uris.chain(paths)
}

// ─────────────────────────────────────────────────────────────────────────────
// Resolver
// ─────────────────────────────────────────────────────────────────────────────

/// Existing project directories found in one recency file, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct FileCandidates {
    pub file: PathBuf,
    pub dirs: Vec<PathBuf>,
}

/// Reads Electron `storage.json` files under a set of roots.
#[derive(Debug, Clone)]
pub struct ElectronRecents {
    roots: Vec<PathBuf>,
    home: Option<PathBuf>,
}

impl ElectronRecents {
    pub fn new(roots: Vec<PathBuf>, home: Option<PathBuf>) -> Self {
        Self { roots, home }
    }

    /// Candidates per file, newest file first. A directory is kept only the
    /// first time it is seen across all files.
    pub fn candidates(&self) -> (usize, Vec<FileCandidates>) {
        let files = discover_recency_files(&self.roots, ELECTRON_RECENT_FILES);
        let file_count = files.len();
        let mut seen: HashSet<PathBuf> = HashSet::new();
        let mut per_file = Vec::new();

        for file in files {
            let content = match fs_err::read_to_string(&file.path) {
                Ok(content) => content,
                Err(err) => {
                    debug!(error = %err, "Skipping unreadable storage.json");
                    continue;
                }
            };

            let dirs: Vec<PathBuf> = extract_tokens(&content)
                .iter()
                .filter_map(|token| path_from_uri_or_literal(token, self.home.as_deref()))
                .filter_map(|path| existing_project_dir(&path))
                .filter(|dir| seen.insert(dir.clone()))
                .collect();

            debug!(
                file = %file.path.display(),
                candidates = dirs.len(),
                "Parsed Electron recency file"
            );
            per_file.push(FileCandidates {
                file: file.path,
                dirs,
            });
        }

        (file_count, per_file)
    }

    pub fn resolve(&self, live_title: Option<&str>) -> RecentsOutcome {
        let (file_count, per_file) = self.candidates();
        if file_count == 0 {
            return RecentsOutcome::NoFiles;
        }
        select_directory(&per_file, live_title).unwrap_or(RecentsOutcome::NoCandidates {
            files: file_count,
        })
    }
}

/// Picks a directory: exact name match, then mutual-substring match, then the
/// newest file's first candidate. `None` when no file produced a candidate.
pub fn select_directory(per_file: &[FileCandidates], live_title: Option<&str>) -> Option<RecentsOutcome> {
    let all: Vec<&Path> = per_file
        .iter()
        .flat_map(|f| f.dirs.iter().map(PathBuf::as_path))
        .collect();
    if all.is_empty() {
        return None;
    }

    let hints = hints_from_optional_title(live_title);
    if !hints.is_empty() {
        if let Some(dir) = all.iter().find(|dir| name_matches_hint(dir, &hints)) {
            return Some(resolved(dir, "directory name matches title"));
        }
        if let Some(dir) = all.iter().find(|dir| name_overlaps_hint(dir, &hints)) {
            return Some(resolved(dir, "directory name overlaps title"));
        }
    }

    let newest = per_file.iter().find_map(|f| f.dirs.first())?;
    let detail = if hints.is_empty() {
        "most recent entry (no title hints)"
    } else {
        "most recent entry (no title match)"
    };
    Some(resolved(newest, detail))
}

fn resolved(dir: &Path, detail: &str) -> RecentsOutcome {
    RecentsOutcome::Resolved {
        path: dir.to_path_buf(),
        detail: detail.to_string(),
    }
}
