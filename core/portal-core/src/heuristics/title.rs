//! Window-title parsing.
//!
//! Editors compose titles from the project name, the active file and the app
//! name, joined by dash-like separators, sometimes with a full path in
//! brackets (`proj [~/code/proj] – Main.kt`). Two products come out of a
//! title:
//!
//! - path candidates: absolute paths to probe on disk
//! - hints: lowercase name tokens, only ever compared against directory names

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use super::{dir_name_lower, expand_tilde, normalize_path};
use crate::patterns::RE_TITLE_PATH;

/// Dash-like separators between title parts. A plain hyphen only counts when
/// padded with spaces so `reader-flow` stays one segment.
pub const TITLE_SEPARATORS: &[&str] = &[" - ", "\u{2014}", "\u{2013}"];

const TOKEN_TRIM_CHARS: &[char] = &[
    '"', '\'', '`', '(', ')', '[', ']', '{', '}', '<', '>', ',', ';', ':',
];

/// A token still holding one of these after trimming is mixed text, not a path.
const TOKEN_REJECT_CHARS: &[char] = &['"', '`', '(', ')', '[', ']', '{', '}', '<', '>', '|'];

/// Splits a title on every separator in [`TITLE_SEPARATORS`].
pub fn split_title(title: &str) -> Vec<&str> {
    let mut segments = vec![title];
    for separator in TITLE_SEPARATORS {
        segments = segments
            .into_iter()
            .flat_map(|segment| segment.split(separator))
            .collect();
    }
    segments
}

// ─────────────────────────────────────────────────────────────────────────────
// Path Candidates
// ─────────────────────────────────────────────────────────────────────────────

/// Path-like tokens found in a window title, in discovery order.
///
/// Iteration is lazy and restartable: every call to [`PathCandidates::iter`]
/// walks the title again and yields the same sequence.
#[derive(Debug, Clone, Copy)]
pub struct PathCandidates<'a> {
    title: &'a str,
}

impl<'a> PathCandidates<'a> {
    pub fn iter(&self) -> impl Iterator<Item = PathBuf> + 'a {
        let title = self.title;
        let home = dirs::home_dir();
        let mut seen: HashSet<String> = HashSet::new();

        let segments = split_title(title).into_iter();
        let words = title
            .split_whitespace()
            .filter(|word| word.starts_with('/') || word.starts_with('~'));
        let embedded = RE_TITLE_PATH
            .captures_iter(title)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str());

        segments
            .chain(words)
            .chain(embedded)
            .filter_map(move |raw| clean_token(raw, home.as_deref()))
            .filter(move |path| seen.insert(path.to_string_lossy().to_string()))
    }

    pub fn to_vec(&self) -> Vec<PathBuf> {
        self.iter().collect()
    }
}

/// Extracts absolute path candidates from a window title.
pub fn extract_path_candidates(title: &str) -> PathCandidates<'_> {
    PathCandidates { title }
}

/// Trims punctuation, expands `~`, and keeps only absolute paths. `/` and the
/// bare home directory are too broad to name a project and are dropped.
/// Segments that still mix a path with bracketed text are left to the
/// embedded-path scan.
fn clean_token(raw: &str, home: Option<&Path>) -> Option<PathBuf> {
    let trimmed = raw
        .trim()
        .trim_matches(|c: char| TOKEN_TRIM_CHARS.contains(&c))
        .trim_end_matches('.');
    if trimmed.is_empty() || trimmed.contains(TOKEN_REJECT_CHARS) {
        return None;
    }

    let expanded = expand_tilde(trimmed, home);
    if !expanded.starts_with('/') {
        return None;
    }

    let normalized = normalize_path(&expanded);
    if normalized == "/" || home.is_some_and(|h| Path::new(&normalized) == h) {
        return None;
    }

    Some(PathBuf::from(normalized))
}

// ─────────────────────────────────────────────────────────────────────────────
// Title Hints
// ─────────────────────────────────────────────────────────────────────────────

/// Lowercase title segments used to match candidate directory names.
pub type TitleHints = BTreeSet<String>;

/// Derives matching hints from a title. Segments that are empty, contain a
/// path separator, or are a single character are dropped.
pub fn hints_from_title(title: &str) -> TitleHints {
    split_title(title)
        .into_iter()
        .map(|segment| segment.trim().to_lowercase())
        .filter(|segment| !segment.is_empty())
        .filter(|segment| !segment.contains('/'))
        .filter(|segment| segment.chars().count() > 1)
        .collect()
}

/// Hints for an optional title; no title means no hints.
pub fn hints_from_optional_title(title: Option<&str>) -> TitleHints {
    title.map(hints_from_title).unwrap_or_default()
}

/// Letters and digits only, lowercased: `My-Project` → `myproject`.
pub fn canonical_name(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// The directory's name equals a hint, literally or canonically.
pub fn name_matches_hint(dir: &Path, hints: &TitleHints) -> bool {
    let name = dir_name_lower(dir);
    if name.is_empty() {
        return false;
    }
    let canonical = canonical_name(&name);
    hints
        .iter()
        .any(|hint| *hint == name || (!canonical.is_empty() && canonical_name(hint) == canonical))
}

/// The directory's name and a hint contain one another.
pub fn name_overlaps_hint(dir: &Path, hints: &TitleHints) -> bool {
    let name = dir_name_lower(dir);
    if name.is_empty() {
        return false;
    }
    hints
        .iter()
        .any(|hint| hint.contains(name.as_str()) || name.contains(hint.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hints(items: &[&str]) -> TitleHints {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn split_title_uses_all_separators() {
        assert_eq!(
            split_title("proj – Main.kt — Editor - x"),
            vec!["proj ", " Main.kt ", " Editor", "x"]
        );
    }

    #[test]
    fn split_title_keeps_hyphenated_names() {
        assert_eq!(split_title("reader-flow - Main.kt"), vec!["reader-flow", "Main.kt"]);
    }

    #[test]
    fn candidates_from_bracketed_path() {
        let home = dirs::home_dir().unwrap();
        let found = extract_path_candidates("proj [~/code/proj] – Main.kt").to_vec();
        assert_eq!(found, vec![home.join("code/proj")]);
    }

    #[test]
    fn candidates_from_segment_and_whitespace() {
        let found = extract_path_candidates("/srv/app/main.rs - /srv/other").to_vec();
        assert_eq!(
            found,
            vec![PathBuf::from("/srv/app/main.rs"), PathBuf::from("/srv/other")]
        );
    }

    #[test]
    fn candidates_are_deduplicated_by_normalized_path() {
        let found = extract_path_candidates("/srv/app/ — /srv/app \"/srv/app\"").to_vec();
        assert_eq!(found, vec![PathBuf::from("/srv/app")]);
    }

    #[test]
    fn candidates_skip_relative_and_broad_tokens() {
        assert!(extract_path_candidates("src/main.rs - proj").to_vec().is_empty());
        assert!(extract_path_candidates("~ - /").to_vec().is_empty());
    }

    #[test]
    fn candidates_iteration_is_restartable() {
        let candidates = extract_path_candidates("a - /x/y (/z/w)");
        let first: Vec<_> = candidates.iter().collect();
        let second: Vec<_> = candidates.iter().collect();
        assert_eq!(first, second);
        assert_eq!(first, vec![PathBuf::from("/x/y"), PathBuf::from("/z/w")]);
    }

    #[test]
    fn trailing_period_is_trimmed() {
        let found = extract_path_candidates("Saved to /srv/app.").to_vec();
        assert_eq!(found, vec![PathBuf::from("/srv/app")]);
    }

    #[test]
    fn hints_drop_short_and_path_segments() {
        assert_eq!(
            hints_from_title("Reader-Flow - Main.kt – x — ~/code/reader-flow"),
            hints(&["reader-flow", "main.kt"])
        );
    }

    #[test]
    fn hints_from_missing_title_are_empty() {
        assert!(hints_from_optional_title(None).is_empty());
        assert!(hints_from_title("   ").is_empty());
    }

    #[test]
    fn canonical_name_keeps_letters_and_digits() {
        assert_eq!(canonical_name("My-Project_2"), "myproject2");
    }

    #[test]
    fn name_match_is_literal_or_canonical() {
        let h = hints(&["myproject"]);
        assert!(name_matches_hint(Path::new("/x/my-project"), &h));
        assert!(name_matches_hint(Path::new("/x/MyProject"), &h));
        assert!(!name_matches_hint(Path::new("/x/myproject-2"), &h));
    }

    #[test]
    fn name_overlap_is_mutual_substring() {
        let h = hints(&["foo-2"]);
        assert!(name_overlaps_hint(Path::new("/x/foo"), &h));
        assert!(name_overlaps_hint(Path::new("/x/foo-2-old"), &h));
        assert!(!name_overlaps_hint(Path::new("/x/bar"), &h));
    }
}
