//! Compiled regex patterns for window titles and editor recency files.
//!
//! These patterns are compiled once on first use and reused across
//! resolutions. Update these when editor file formats change.

use once_cell::sync::Lazy;
use regex::Regex;

// ═══════════════════════════════════════════════════════════════════════════════
// Window Title Regexes
// ═══════════════════════════════════════════════════════════════════════════════

/// A `~` or `/` token at the start of the title or after whitespace, a bracket,
/// a quote, `=` or `:`. Catches paths embedded as `proj [~/code/proj]`.
pub static RE_TITLE_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:^|[\s\[\(\{<"'=:])((?:~|/)[^\s\[\]\(\)\{\}<>"'`,;|]+)"#).unwrap()
});

// ═══════════════════════════════════════════════════════════════════════════════
// JetBrains recentProjects.xml Regexes
// ═══════════════════════════════════════════════════════════════════════════════

pub static RE_JB_ENTRY: Lazy<Regex> = Lazy::new(|| Regex::new(r#"<entry\s+key="([^"]*)""#).unwrap());
pub static RE_JB_FRAME_TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\bframeTitle="([^"]*)""#).unwrap());
pub static RE_JB_OPENED: Lazy<Regex> = Lazy::new(|| Regex::new(r#"\bopened="true""#).unwrap());
pub static RE_JB_ACTIVATION_TS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"name="activationTimestamp"\s+value="(-?\d+)""#).unwrap()
});
pub static RE_JB_PROJECT_OPEN_TS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"name="projectOpenTimestamp"\s+value="(-?\d+)""#).unwrap()
});
pub static RE_JB_LAST_OPENED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"name="lastOpenedProject"\s+value="([^"]*)""#).unwrap());
/// Legacy `<option name="recentPaths"><list>...</list></option>` block.
pub static RE_JB_RECENT_PATHS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?s)<option\s+name="recentPaths"\s*>(.*?)</option>"#).unwrap());
pub static RE_JB_LIST_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<option\s+value="([^"]*)""#).unwrap());

// ═══════════════════════════════════════════════════════════════════════════════
// Electron storage.json Fallback Regexes
// ═══════════════════════════════════════════════════════════════════════════════

/// `file:///...` URIs, including JSON-escaped slashes (`file:\/\/\/...`).
pub static RE_FILE_URI: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"file:(?:\\{0,2}/){2}[^"\s,\]\}]+"#).unwrap());
/// Quoted strings that look like absolute paths.
pub static RE_QUOTED_ABS_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""(\\{0,2}/[^"]+)""#).unwrap());
