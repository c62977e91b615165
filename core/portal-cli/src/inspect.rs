//! Read-only helpers for checking what the heuristics see.

use std::path::Path;

use portal_core::heuristics::resolve_project_root;
use portal_core::{chain_for, classify, extract_path_candidates, hints_from_title};

use crate::error::CliError;

/// `portal classify ID`: family label plus the strategy order it gets.
pub fn classify_lines(app_id: &str) -> Vec<String> {
    let family = classify(app_id);
    let order: Vec<&str> = chain_for(family).iter().map(|k| k.name()).collect();
    vec![family.to_string(), format!("chain: {}", order.join(" -> "))]
}

/// `portal candidates TITLE`: path candidates then hints, tab-separated.
pub fn candidate_lines(title: &str) -> Vec<String> {
    let paths = extract_path_candidates(title)
        .to_vec()
        .into_iter()
        .map(|path| format!("path\t{}", path.display()));
    let hints = hints_from_title(title)
        .into_iter()
        .map(|hint| format!("hint\t{hint}"));
    paths.chain(hints).collect()
}

/// `portal root PATH`: the project root and the marker that identified it.
pub fn root_line(path: &Path) -> Result<String, CliError> {
    let root = resolve_project_root(path)
        .ok_or_else(|| CliError::MissingPath(path.display().to_string()))?;
    Ok(match root.marker {
        Some(marker) => format!("{}\t{marker}", root.path.display()),
        None => root.path.display().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn classify_prints_family_and_chain() {
        assert_eq!(
            classify_lines("com.apple.dt.Xcode"),
            vec!["xcode", "chain: document -> title-tokens -> cache"]
        );
    }

    #[test]
    fn candidates_list_paths_before_hints() {
        let lines = candidate_lines("main.rs - /srv/app");
        assert_eq!(lines, vec!["path\t/srv/app", "hint\tmain.rs"]);
    }

    #[test]
    fn root_reports_marker() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("proj/.git")).unwrap();
        fs::create_dir_all(tmp.path().join("proj/src")).unwrap();

        let line = root_line(&tmp.path().join("proj/src")).unwrap();

        assert_eq!(line, format!("{}\t.git", tmp.path().join("proj").display()));
    }

    #[test]
    fn root_of_missing_path_is_an_error() {
        let err = root_line(Path::new("/this/path/definitely/does/not/exist")).unwrap_err();
        assert!(matches!(err, CliError::MissingPath(_)));
    }
}
