//! Core types shared by the resolver pipeline and its clients.
//!
//! These are the records that cross the FFI boundary: the native host hands
//! Portal a [`WindowSnapshot`] and gets a [`ResolvedContext`] back. Paths are
//! carried as strings here; the pipeline works with `PathBuf` internally.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

// ═══════════════════════════════════════════════════════════════════════════════
// Editor Families
// ═══════════════════════════════════════════════════════════════════════════════

/// Editors that behave alike for resolution purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, uniffi::Enum)]
pub enum EditorFamily {
    #[serde(rename = "jetbrains")]
    JetBrains,
    #[serde(rename = "vscode")]
    VsCodeLike,
    #[serde(rename = "xcode")]
    XcodeLike,
    #[serde(rename = "unknown")]
    Unknown,
}

impl EditorFamily {
    pub fn label(self) -> &'static str {
        match self {
            Self::JetBrains => "jetbrains",
            Self::VsCodeLike => "vscode",
            Self::XcodeLike => "xcode",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for EditorFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Window Snapshot (input)
// ═══════════════════════════════════════════════════════════════════════════════

/// Attributes of the foreground window, captured by the host once per
/// resolution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, uniffi::Record)]
pub struct WindowSnapshot {
    /// Whether the host holds the accessibility permission needed to read
    /// window attributes. Nothing else in the snapshot is meaningful without it.
    #[serde(default)]
    pub trusted: bool,
    #[serde(default)]
    pub title: Option<String>,
    /// The window's document attribute: a `file://` URI or a plain path.
    #[serde(default)]
    pub document: Option<String>,
    /// Which window query matched (focused window, main window, ...).
    #[serde(default)]
    pub source: Option<String>,
}

impl WindowSnapshot {
    pub fn trusted() -> Self {
        Self {
            trusted: true,
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_document(mut self, document: impl Into<String>) -> Self {
        self.document = Some(document.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// The title, if present and not blank.
    pub fn usable_title(&self) -> Option<&str> {
        non_blank(self.title.as_deref())
    }

    /// The document attribute, if present and not blank.
    pub fn usable_document(&self) -> Option<&str> {
        non_blank(self.document.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// ═══════════════════════════════════════════════════════════════════════════════
// Attempts and Results (output)
// ═══════════════════════════════════════════════════════════════════════════════

/// One strategy invocation and its outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, uniffi::Record)]
pub struct ResolverAttempt {
    pub strategy: String,
    pub succeeded: bool,
    pub detail: String,
    pub candidate_path: Option<String>,
}

impl ResolverAttempt {
    pub fn success(strategy: &str, path: &std::path::Path, detail: impl Into<String>) -> Self {
        Self {
            strategy: strategy.to_string(),
            succeeded: true,
            detail: detail.into(),
            candidate_path: Some(path.to_string_lossy().to_string()),
        }
    }

    pub fn failure(strategy: &str, detail: impl Into<String>) -> Self {
        Self {
            strategy: strategy.to_string(),
            succeeded: false,
            detail: detail.into(),
            candidate_path: None,
        }
    }
}

/// The outcome of one resolution call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, uniffi::Record)]
pub struct ResolvedContext {
    pub app_name: String,
    pub app_id: String,
    pub family: EditorFamily,
    /// Always an existing directory at resolution time when present.
    pub resolved_path: Option<String>,
    /// Name of the strategy that produced `resolved_path`, or `none`.
    pub winning_strategy: String,
    pub detail: String,
    pub attempts: Vec<ResolverAttempt>,
    pub raw_title: Option<String>,
    pub raw_document: Option<String>,
    pub window_source: Option<String>,
}

impl ResolvedContext {
    pub fn is_resolved(&self) -> bool {
        self.resolved_path.is_some()
    }

    pub fn resolved_dir(&self) -> Option<PathBuf> {
        self.resolved_path.as_ref().map(PathBuf::from)
    }
}
