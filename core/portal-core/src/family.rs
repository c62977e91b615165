//! Maps an application identifier (bundle id) to an editor family.

use crate::types::EditorFamily;

/// Prefixes of JetBrains-platform IDEs (Android Studio included).
const JETBRAINS_PREFIXES: &[&str] = &["com.jetbrains.", "com.google.android.studio"];

/// Electron editors with a known bundle id.
const VSCODE_IDS: &[&str] = &[
    "com.microsoft.vscode",
    "com.microsoft.vscodeinsiders",
    "com.vscodium",
    "com.todesktop.230313mzl4w4u92", // Cursor
    "com.exafunction.windsurf",
];

const VSCODE_SUBSTRING: &str = "vscode";

const XCODE_ID: &str = "com.apple.dt.xcode";

/// Classifies an application identifier. Case-insensitive and total.
pub fn classify(app_id: &str) -> EditorFamily {
    let normalized = app_id.trim().to_lowercase();

    if JETBRAINS_PREFIXES
        .iter()
        .any(|prefix| normalized.starts_with(prefix))
    {
        return EditorFamily::JetBrains;
    }

    if VSCODE_IDS.contains(&normalized.as_str()) || normalized.contains(VSCODE_SUBSTRING) {
        return EditorFamily::VsCodeLike;
    }

    if normalized == XCODE_ID {
        return EditorFamily::XcodeLike;
    }

    EditorFamily::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jetbrains_products_share_a_family() {
        for id in [
            "com.jetbrains.intellij",
            "com.jetbrains.pycharm.ce",
            "com.jetbrains.rider",
            "com.google.android.studio",
        ] {
            assert_eq!(classify(id), EditorFamily::JetBrains, "{id}");
        }
    }

    #[test]
    fn electron_editors_are_vscode_like() {
        assert_eq!(classify("com.microsoft.VSCode"), EditorFamily::VsCodeLike);
        assert_eq!(
            classify("com.todesktop.230313mzl4w4u92"),
            EditorFamily::VsCodeLike
        );
        assert_eq!(classify("com.vscodium"), EditorFamily::VsCodeLike);
    }

    #[test]
    fn vscode_substring_catches_forks() {
        assert_eq!(classify("org.example.vscode-fork"), EditorFamily::VsCodeLike);
    }

    #[test]
    fn xcode_is_exact_match_only() {
        assert_eq!(classify("com.apple.dt.Xcode"), EditorFamily::XcodeLike);
        assert_eq!(classify("com.apple.dt.XcodeHelper"), EditorFamily::Unknown);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(classify("COM.JETBRAINS.GOLAND"), EditorFamily::JetBrains);
        assert_eq!(classify("  Com.Microsoft.VSCodeInsiders "), EditorFamily::VsCodeLike);
    }

    #[test]
    fn unmatched_ids_are_unknown() {
        assert_eq!(classify(""), EditorFamily::Unknown);
        assert_eq!(classify("dev.zed.Zed"), EditorFamily::Unknown);
        assert_eq!(classify("com.sublimetext.4"), EditorFamily::Unknown);
    }
}
