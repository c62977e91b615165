//! Stateless path heuristics shared by the resolution strategies.
//!
//! - [`title`]: pull path-like tokens and matching hints out of window titles
//! - [`root`]: walk from any file or directory up to its project root

pub mod root;
pub mod title;

pub use root::{normalize_to_project_root, resolve_project_root, ProjectRoot};
pub use title::{extract_path_candidates, hints_from_title, PathCandidates, TitleHints};

use std::path::{Path, PathBuf};

use url::Url;

/// Normalizes a path string for comparison.
/// - Removes trailing slashes (except for root "/")
/// - Does NOT resolve symlinks or check filesystem
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Expands a leading `~` or `~/` against `home`. Other inputs are returned as-is.
pub fn expand_tilde(path: &str, home: Option<&Path>) -> String {
    let Some(home) = home else {
        return path.to_string();
    };

    if path == "~" {
        home.to_string_lossy().to_string()
    } else if let Some(rest) = path.strip_prefix("~/") {
        home.join(rest).to_string_lossy().to_string()
    } else {
        path.to_string()
    }
}

/// Abbreviates a path under `home` as `~/...`, the way JetBrains frame titles
/// print project locations.
pub fn abbreviate_home(path: &Path, home: Option<&Path>) -> Option<String> {
    let rest = path.strip_prefix(home?).ok()?;
    if rest.as_os_str().is_empty() {
        return Some("~".to_string());
    }
    Some(format!("~/{}", rest.to_string_lossy()))
}

/// Number of normal components in a path; used as a tie-breaker.
pub fn path_depth(path: &Path) -> usize {
    path.components()
        .filter(|c| matches!(c, std::path::Component::Normal(_)))
        .count()
}

/// Last path component, lowercased. Empty for `/`.
pub fn dir_name_lower(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Undoes JSON slash escaping: `\\/` and `\/` both become `/`.
pub fn unescape_slashes(raw: &str) -> String {
    raw.replace("\\\\/", "/").replace("\\/", "/")
}

/// Decodes a `file:` URI into a path. Other schemes yield `None`.
pub fn decode_file_uri(uri: &str) -> Option<PathBuf> {
    match Url::parse(uri) {
        Ok(parsed) if parsed.scheme() == "file" => parsed
            .to_file_path()
            .ok()
            .map(|p| normalized_path_buf(&p.to_string_lossy())),
        Ok(_) => None,
        // Not a valid URL (stray spaces, bad escapes); take the path part as-is.
        Err(_) => uri
            .strip_prefix("file://")
            .filter(|rest| rest.starts_with('/'))
            .map(normalized_path_buf),
    }
}

/// Interprets `value` as a `file:` URI when it has that prefix and as a
/// literal path otherwise. Only absolute results are returned.
pub fn path_from_uri_or_literal(value: &str, home: Option<&Path>) -> Option<PathBuf> {
    let value = value.trim();
    if value.get(..5).is_some_and(|scheme| scheme.eq_ignore_ascii_case("file:")) {
        return decode_file_uri(value);
    }
    if value.contains("://") {
        return None;
    }
    let expanded = expand_tilde(value, home);
    expanded
        .starts_with('/')
        .then(|| normalized_path_buf(&expanded))
}

/// Builds a `PathBuf` from a normalized string form.
pub(crate) fn normalized_path_buf(path: &str) -> PathBuf {
    PathBuf::from(normalize_path(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_path_removes_trailing_slashes() {
        assert_eq!(normalize_path("/Users/dev/proj///"), "/Users/dev/proj");
    }

    #[test]
    fn normalize_path_preserves_root() {
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path("///"), "/");
    }

    #[test]
    fn expand_tilde_handles_bare_and_prefixed() {
        let home = Path::new("/home/dev");
        assert_eq!(expand_tilde("~", Some(home)), "/home/dev");
        assert_eq!(expand_tilde("~/code/x", Some(home)), "/home/dev/code/x");
        assert_eq!(expand_tilde("~other/x", Some(home)), "~other/x");
        assert_eq!(expand_tilde("~/code", None), "~/code");
    }

    #[test]
    fn abbreviate_home_only_under_home() {
        let home = Path::new("/home/dev");
        assert_eq!(
            abbreviate_home(Path::new("/home/dev/code/x"), Some(home)).as_deref(),
            Some("~/code/x")
        );
        assert_eq!(abbreviate_home(Path::new("/opt/x"), Some(home)), None);
    }

    #[test]
    fn path_depth_counts_normal_components() {
        assert_eq!(path_depth(Path::new("/")), 0);
        assert_eq!(path_depth(Path::new("/a/b/c")), 3);
    }

    #[test]
    fn unescape_handles_both_variants() {
        assert_eq!(unescape_slashes(r"file:\/\/\/Users\/dev"), "file:///Users/dev");
        assert_eq!(unescape_slashes(r"\\/srv\\/app"), "/srv/app");
    }

    #[test]
    fn file_uri_is_percent_decoded() {
        assert_eq!(
            decode_file_uri("file:///Users/dev/my%20proj/"),
            Some(PathBuf::from("/Users/dev/my proj"))
        );
        assert_eq!(decode_file_uri("vscode-remote://ssh-remote+box/srv"), None);
    }

    #[test]
    fn uri_or_literal_accepts_both_forms() {
        let home = Path::new("/home/dev");
        assert_eq!(
            path_from_uri_or_literal("FILE:///srv/app", None),
            Some(PathBuf::from("/srv/app"))
        );
        assert_eq!(
            path_from_uri_or_literal(" /srv/app/ ", None),
            Some(PathBuf::from("/srv/app"))
        );
        assert_eq!(
            path_from_uri_or_literal("~/code", Some(home)),
            Some(PathBuf::from("/home/dev/code"))
        );
        assert_eq!(path_from_uri_or_literal("relative/x", None), None);
        assert_eq!(path_from_uri_or_literal("https://example.com/x", None), None);
    }

    #[test]
    fn uri_or_literal_handles_non_ascii() {
        assert_eq!(
            path_from_uri_or_literal("/abcé/x", None),
            Some(PathBuf::from("/abcé/x"))
        );
        assert_eq!(path_from_uri_or_literal("éé", None), None);
        assert_eq!(
            path_from_uri_or_literal("file:///srv/abcé/x", None),
            Some(PathBuf::from("/srv/abcé/x"))
        );
        assert_eq!(
            path_from_uri_or_literal("file:///srv/abc%C3%A9", None),
            Some(PathBuf::from("/srv/abcé"))
        );
    }

    #[test]
    fn dir_name_is_lowercased() {
        assert_eq!(dir_name_lower(Path::new("/x/Reader-Flow")), "reader-flow");
        assert_eq!(dir_name_lower(Path::new("/")), "");
    }
}
