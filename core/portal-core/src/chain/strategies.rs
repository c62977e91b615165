//! The live resolution strategies.
//!
//! Each one turns the snapshot (and, for the recents strategies, editor
//! recency files) into a single [`ResolverAttempt`]. None of them return
//! errors; every failure is a failed attempt with a readable detail.

use std::path::Path;

use super::{StrategyContext, StrategyKind};
use crate::heuristics::{extract_path_candidates, path_from_uri_or_literal, resolve_project_root, ProjectRoot};
use crate::recents::{ElectronRecents, JetBrainsRecents};
use crate::types::ResolverAttempt;

/// Document attribute: a `file://` URI or plain path, normalized to its root.
pub fn document(ctx: &StrategyContext<'_>) -> ResolverAttempt {
    let name = StrategyKind::Document.name();
    let Some(raw) = ctx.snapshot.usable_document() else {
        return ResolverAttempt::failure(name, "window has no document attribute");
    };
    let Some(path) = path_from_uri_or_literal(raw, ctx.home) else {
        return ResolverAttempt::failure(name, format!("document is not a local path: {raw}"));
    };

    match resolve_project_root(&path) {
        Some(root) => ResolverAttempt::success(name, &root.path, root_detail(&root, &path)),
        None => ResolverAttempt::failure(
            name,
            format!("document path does not exist: {}", path.display()),
        ),
    }
}

/// Path-like tokens in the title; the first one that exists wins.
pub fn title_tokens(ctx: &StrategyContext<'_>) -> ResolverAttempt {
    let name = StrategyKind::TitleTokens.name();
    let Some(title) = ctx.snapshot.usable_title() else {
        return ResolverAttempt::failure(name, "window has no title");
    };

    let mut tried = 0usize;
    for candidate in extract_path_candidates(title).iter() {
        tried += 1;
        if let Some(root) = resolve_project_root(&candidate) {
            return ResolverAttempt::success(name, &root.path, root_detail(&root, &candidate));
        }
    }

    if tried == 0 {
        ResolverAttempt::failure(name, "no path-like tokens in title")
    } else {
        ResolverAttempt::failure(name, format!("none of {tried} title token(s) exist on disk"))
    }
}

pub fn jetbrains_recents(ctx: &StrategyContext<'_>) -> ResolverAttempt {
    JetBrainsRecents::new(ctx.roots.jetbrains.clone(), ctx.home.map(Path::to_path_buf))
        .resolve(ctx.snapshot.usable_title())
        .into_attempt(StrategyKind::JetBrainsRecents.name())
}

pub fn electron_recents(ctx: &StrategyContext<'_>) -> ResolverAttempt {
    ElectronRecents::new(ctx.roots.electron.clone(), ctx.home.map(Path::to_path_buf))
        .resolve(ctx.snapshot.usable_title())
        .into_attempt(StrategyKind::ElectronRecents.name())
}

fn root_detail(root: &ProjectRoot, from: &Path) -> String {
    match &root.marker {
        Some(marker) => format!("{} (root marked by {marker})", from.display()),
        None => format!("{} (no root marker)", from.display()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::RecencyRoots;
    use crate::types::{EditorFamily, WindowSnapshot};
    use std::fs;
    use tempfile::TempDir;

    fn ctx<'a>(snapshot: &'a WindowSnapshot, roots: &'a RecencyRoots) -> StrategyContext<'a> {
        StrategyContext {
            snapshot,
            family: EditorFamily::Unknown,
            roots,
            home: None,
        }
    }

    fn git_project(tmp: &TempDir, name: &str) -> std::path::PathBuf {
        let project = tmp.path().join(name);
        fs::create_dir_all(project.join(".git")).unwrap();
        fs::create_dir_all(project.join("src")).unwrap();
        fs::write(project.join("src/main.rs"), "").unwrap();
        project
    }

    #[test]
    fn document_uri_resolves_to_root() {
        let tmp = TempDir::new().unwrap();
        let project = git_project(&tmp, "proj");
        let uri = format!("file://{}", project.join("src/main.rs").display());
        let snapshot = WindowSnapshot::trusted().with_document(uri);
        let roots = RecencyRoots::empty();

        let attempt = document(&ctx(&snapshot, &roots));

        assert!(attempt.succeeded, "{}", attempt.detail);
        assert_eq!(attempt.candidate_path, Some(project.to_string_lossy().to_string()));
        assert!(attempt.detail.contains(".git"));
    }

    #[test]
    fn document_literal_path_is_accepted() {
        let tmp = TempDir::new().unwrap();
        let project = git_project(&tmp, "proj");
        let snapshot = WindowSnapshot::trusted()
            .with_document(project.join("src/main.rs").to_string_lossy().to_string());
        let roots = RecencyRoots::empty();

        let attempt = document(&ctx(&snapshot, &roots));

        assert_eq!(attempt.candidate_path, Some(project.to_string_lossy().to_string()));
    }

    #[test]
    fn document_failures_are_described() {
        let roots = RecencyRoots::empty();

        let blank = WindowSnapshot::trusted().with_document("   ");
        assert_eq!(document(&ctx(&blank, &roots)).detail, "window has no document attribute");

        let gone = WindowSnapshot::trusted().with_document("/this/path/definitely/does/not/exist");
        let attempt = document(&ctx(&gone, &roots));
        assert!(!attempt.succeeded);
        assert!(attempt.detail.contains("does not exist"));

        let remote = WindowSnapshot::trusted().with_document("vscode-remote://box/srv");
        assert!(document(&ctx(&remote, &roots)).detail.contains("not a local path"));
    }

    #[test]
    fn title_tokens_take_first_existing_candidate() {
        let tmp = TempDir::new().unwrap();
        let project = git_project(&tmp, "proj");
        let title = format!(
            "main.rs - /this/path/definitely/does/not/exist - {}",
            project.join("src").display()
        );
        let snapshot = WindowSnapshot::trusted().with_title(title);
        let roots = RecencyRoots::empty();

        let attempt = title_tokens(&ctx(&snapshot, &roots));

        assert_eq!(attempt.candidate_path, Some(project.to_string_lossy().to_string()));
    }

    #[test]
    fn title_tokens_failures_are_described() {
        let roots = RecencyRoots::empty();

        let missing = WindowSnapshot::trusted();
        assert_eq!(title_tokens(&ctx(&missing, &roots)).detail, "window has no title");

        let plain = WindowSnapshot::trusted().with_title("proj - Main.kt");
        assert_eq!(
            title_tokens(&ctx(&plain, &roots)).detail,
            "no path-like tokens in title"
        );

        let stale = WindowSnapshot::trusted().with_title("/this/path/definitely/does/not/exist");
        assert!(title_tokens(&ctx(&stale, &roots)).detail.starts_with("none of 1"));
    }

    #[test]
    fn recents_without_roots_report_no_files() {
        let roots = RecencyRoots::empty();
        let snapshot = WindowSnapshot::trusted().with_title("proj - Main.kt");

        let jb = jetbrains_recents(&ctx(&snapshot, &roots));
        let el = electron_recents(&ctx(&snapshot, &roots));

        assert_eq!(jb.strategy, "jetbrains-recents");
        assert_eq!(el.strategy, "electron-recents");
        assert_eq!(jb.detail, "no recency files found");
        assert!(!el.succeeded);
    }
}
