//! JetBrains `recentProjects.xml` resolver.
//!
//! The IDE keeps one `<entry key="PATH">` per recent project (Rider's
//! `recentSolutions.xml` keys entries by the `.sln` file instead), usually with a
//! `RecentProjectMetaInfo` block carrying the last frame title, whether the
//! project is currently open, and activation/open timestamps. Paths under the
//! home directory are stored with a `$USER_HOME$` placeholder.
//!
//! Several projects are often open at once, so picking the right one is a
//! ranking problem. Each candidate gets the single strongest [`MatchTier`] it
//! qualifies for; within a tier, metadata breaks ties (see [`rank_order`]).

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{discover_recency_files, existing_project_dir, RecentsOutcome};
use crate::heuristics::title::{
    hints_from_optional_title, name_matches_hint, name_overlaps_hint, TitleHints,
};
use crate::heuristics::{abbreviate_home, normalize_path, path_depth};
use crate::patterns::{
    RE_JB_ACTIVATION_TS, RE_JB_ENTRY, RE_JB_FRAME_TITLE, RE_JB_LAST_OPENED, RE_JB_LIST_VALUE,
    RE_JB_OPENED, RE_JB_PROJECT_OPEN_TS, RE_JB_RECENT_PATHS,
};

/// File names JetBrains IDEs use for their recent-project lists
/// (`recentSolutions.xml` is Rider's).
pub const JETBRAINS_RECENT_FILES: &[&str] = &["recentProjects.xml", "recentSolutions.xml"];

pub const USER_HOME_PLACEHOLDER: &str = "$USER_HOME$";

// ═══════════════════════════════════════════════════════════════════════════════
// Candidates
// ═══════════════════════════════════════════════════════════════════════════════

/// One project entry read from a recency file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentProjectCandidate {
    pub path: PathBuf,
    pub frame_title: Option<String>,
    pub is_last_opened: bool,
    pub is_opened: bool,
    pub activation_timestamp: i64,
    pub project_open_timestamp: i64,
    /// Higher for newer recency files.
    pub source_file_rank: i32,
}

impl RecentProjectCandidate {
    /// A candidate with no metadata.
    pub fn bare(path: impl Into<PathBuf>, source_file_rank: i32) -> Self {
        Self {
            path: path.into(),
            frame_title: None,
            is_last_opened: false,
            is_opened: false,
            activation_timestamp: 0,
            project_open_timestamp: 0,
            source_file_rank,
        }
    }

    pub fn depth(&self) -> usize {
        path_depth(&self.path)
    }

    fn dedup_key(&self) -> (String, Option<String>, bool, i32) {
        (
            normalize_path(&self.path.to_string_lossy()),
            self.frame_title.clone(),
            self.is_last_opened,
            self.source_file_rank,
        )
    }

    /// The stored frame title mentions this candidate's path, spelled out in
    /// full or abbreviated under `~`.
    fn frame_title_contains_path(&self, home: Option<&Path>) -> bool {
        let Some(frame_title) = self.frame_title.as_deref() else {
            return false;
        };
        let full = self.path.to_string_lossy();
        if frame_title.contains(full.as_ref()) {
            return true;
        }
        abbreviate_home(&self.path, home).is_some_and(|short| frame_title.contains(&short))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tiers
// ═══════════════════════════════════════════════════════════════════════════════

/// Confidence bucket for a candidate. Lower rank is stronger evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MatchTier {
    /// Stored frame title equals the live title and names the path.
    ExactFrameTitle,
    /// Directory name equals a title hint.
    NameMatchesHint,
    /// Stored frame title names the path (possibly stale).
    FrameTitleContainsPath,
    /// Directory name and a title hint contain one another.
    NameOverlapsHint,
}

impl MatchTier {
    pub fn rank(self) -> u8 {
        match self {
            Self::ExactFrameTitle => 0,
            Self::NameMatchesHint => 1,
            Self::FrameTitleContainsPath => 2,
            Self::NameOverlapsHint => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::ExactFrameTitle => "exact frame title",
            Self::NameMatchesHint => "name matches title",
            Self::FrameTitleContainsPath => "frame title names path",
            Self::NameOverlapsHint => "name overlaps title",
        }
    }
}

/// The strongest tier `candidate` qualifies for, if any.
pub fn tier_for(
    candidate: &RecentProjectCandidate,
    live_title: Option<&str>,
    hints: &TitleHints,
    home: Option<&Path>,
) -> Option<MatchTier> {
    let names_path = candidate.frame_title_contains_path(home);

    let exact_title = match (candidate.frame_title.as_deref(), live_title) {
        (Some(frame), Some(live)) => frame.to_lowercase() == live.to_lowercase(),
        _ => false,
    };
    if exact_title && names_path {
        return Some(MatchTier::ExactFrameTitle);
    }
    if name_matches_hint(&candidate.path, hints) {
        return Some(MatchTier::NameMatchesHint);
    }
    if names_path {
        return Some(MatchTier::FrameTitleContainsPath);
    }
    if name_overlaps_hint(&candidate.path, hints) {
        return Some(MatchTier::NameOverlapsHint);
    }
    None
}

/// A candidate with its assigned tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedCandidate {
    pub tier: MatchTier,
    pub candidate: RecentProjectCandidate,
}

/// Total order over ranked candidates; `Less` means `a` ranks ahead of `b`.
///
/// Stronger tier first, then: open projects, the last-opened project, newer
/// activation, newer project open, newer recency file, deeper path, and
/// finally the lexicographically greater path.
pub fn rank_order(a: &RankedCandidate, b: &RankedCandidate) -> Ordering {
    let (ca, cb) = (&a.candidate, &b.candidate);
    a.tier
        .rank()
        .cmp(&b.tier.rank())
        .then_with(|| cb.is_opened.cmp(&ca.is_opened))
        .then_with(|| cb.is_last_opened.cmp(&ca.is_last_opened))
        .then_with(|| cb.activation_timestamp.cmp(&ca.activation_timestamp))
        .then_with(|| cb.project_open_timestamp.cmp(&ca.project_open_timestamp))
        .then_with(|| cb.source_file_rank.cmp(&ca.source_file_rank))
        .then_with(|| cb.depth().cmp(&ca.depth()))
        .then_with(|| cb.path.cmp(&ca.path))
}

/// Picks the best candidate for the live window title.
///
/// Without hints there is nothing to rank by, so this only succeeds when all
/// candidates agree on a single path.
pub fn select_candidate(
    candidates: Vec<RecentProjectCandidate>,
    live_title: Option<&str>,
    home: Option<&Path>,
) -> RecentsOutcome {
    if candidates.is_empty() {
        return RecentsOutcome::NoCandidates { files: 0 };
    }

    let hints = hints_from_optional_title(live_title);
    if hints.is_empty() {
        let distinct: BTreeSet<&PathBuf> = candidates.iter().map(|c| &c.path).collect();
        return match distinct.into_iter().collect::<Vec<_>>().as_slice() {
            [only] => RecentsOutcome::Resolved {
                path: (*only).clone(),
                detail: "only recent project on record".to_string(),
            },
            many => RecentsOutcome::Ambiguous {
                candidates: many.len(),
            },
        };
    }

    let total = candidates.len();
    let mut ranked: Vec<RankedCandidate> = candidates
        .into_iter()
        .filter_map(|candidate| {
            tier_for(&candidate, live_title, &hints, home)
                .map(|tier| RankedCandidate { tier, candidate })
        })
        .collect();
    ranked.sort_by(rank_order);

    for entry in &ranked {
        debug!(
            path = %entry.candidate.path.display(),
            tier = entry.tier.rank(),
            opened = entry.candidate.is_opened,
            last_opened = entry.candidate.is_last_opened,
            activation = entry.candidate.activation_timestamp,
            "JetBrains candidate"
        );
    }

    match ranked.into_iter().next() {
        Some(best) => RecentsOutcome::Resolved {
            detail: format!(
                "tier {} ({}) among {} candidate(s)",
                best.tier.rank(),
                best.tier.label(),
                total
            ),
            path: best.candidate.path,
        },
        None => RecentsOutcome::NoMatch { candidates: total },
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Parsing
// ═══════════════════════════════════════════════════════════════════════════════

/// Parses one recency file into candidates. Existence is not checked here.
pub fn parse_recent_projects(
    content: &str,
    home: Option<&Path>,
    source_file_rank: i32,
) -> Vec<RecentProjectCandidate> {
    let last_opened = RE_JB_LAST_OPENED
        .captures(content)
        .and_then(|caps| caps.get(1))
        .and_then(|m| expand_stored_path(m.as_str(), home));

    let mut candidates = Vec::new();
    let entries: Vec<_> = RE_JB_ENTRY.captures_iter(content).collect();

    for (index, caps) in entries.iter().enumerate() {
        let (Some(whole), Some(key)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let Some(path) = expand_stored_path(key.as_str(), home) else {
            continue;
        };

        let block_end = entries
            .get(index + 1)
            .and_then(|next| next.get(0))
            .map_or(content.len(), |next| next.start());
        let block = &content[whole.end()..block_end];
        let block = block.find("</entry>").map_or(block, |end| &block[..end]);

        candidates.push(RecentProjectCandidate {
            frame_title: RE_JB_FRAME_TITLE
                .captures(block)
                .and_then(|c| c.get(1))
                .map(|m| unescape_xml(m.as_str()))
                .filter(|t| !t.is_empty()),
            is_last_opened: last_opened.as_ref() == Some(&path),
            is_opened: RE_JB_OPENED.is_match(block),
            activation_timestamp: capture_i64(&RE_JB_ACTIVATION_TS, block),
            project_open_timestamp: capture_i64(&RE_JB_PROJECT_OPEN_TS, block),
            source_file_rank,
            path,
        });
    }

    // Older builds keep a flat list with no metadata.
    for block in RE_JB_RECENT_PATHS.captures_iter(content) {
        let Some(list) = block.get(1) else {
            continue;
        };
        for value in RE_JB_LIST_VALUE.captures_iter(list.as_str()) {
            if let Some(path) = value
                .get(1)
                .and_then(|m| expand_stored_path(m.as_str(), home))
            {
                let mut candidate = RecentProjectCandidate::bare(path, source_file_rank);
                candidate.is_last_opened = last_opened.as_ref() == Some(&candidate.path);
                candidates.push(candidate);
            }
        }
    }

    candidates
}

/// Unescapes XML, substitutes the home placeholder, and keeps absolute paths.
fn expand_stored_path(raw: &str, home: Option<&Path>) -> Option<PathBuf> {
    let unescaped = unescape_xml(raw);
    let expanded = match home {
        Some(home) => unescaped.replace(USER_HOME_PLACEHOLDER, &home.to_string_lossy()),
        None => unescaped,
    };
    if !expanded.starts_with('/') {
        return None;
    }
    Some(PathBuf::from(normalize_path(&expanded)))
}

fn unescape_xml(value: &str) -> String {
    value
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

fn capture_i64(re: &regex::Regex, text: &str) -> i64 {
    re.captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Resolver
// ═══════════════════════════════════════════════════════════════════════════════

/// Reads JetBrains recency files under a set of roots.
#[derive(Debug, Clone)]
pub struct JetBrainsRecents {
    roots: Vec<PathBuf>,
    home: Option<PathBuf>,
}

impl JetBrainsRecents {
    pub fn new(roots: Vec<PathBuf>, home: Option<PathBuf>) -> Self {
        Self { roots, home }
    }

    /// Collects existing, de-duplicated candidates from every recency file.
    /// Entries naming a file (Rider solutions) stand for its directory.
    pub fn candidates(&self) -> (usize, Vec<RecentProjectCandidate>) {
        let files = discover_recency_files(&self.roots, JETBRAINS_RECENT_FILES);
        let file_count = files.len();
        let mut seen = HashSet::new();
        let mut candidates = Vec::new();

        for (index, file) in files.iter().enumerate() {
            let content = match fs_err::read_to_string(&file.path) {
                Ok(content) => content,
                Err(err) => {
                    debug!(error = %err, "Skipping unreadable JetBrains recency file");
                    continue;
                }
            };
            let rank = i32::try_from(file_count - index).unwrap_or(i32::MAX);

            for mut candidate in parse_recent_projects(&content, self.home.as_deref(), rank) {
                let Some(dir) = existing_project_dir(&candidate.path) else {
                    continue;
                };
                candidate.path = dir;
                if seen.insert(candidate.dedup_key()) {
                    candidates.push(candidate);
                }
            }
        }

        (file_count, candidates)
    }

    pub fn resolve(&self, live_title: Option<&str>) -> RecentsOutcome {
        let (file_count, candidates) = self.candidates();
        if file_count == 0 {
            return RecentsOutcome::NoFiles;
        }
        if candidates.is_empty() {
            return RecentsOutcome::NoCandidates { files: file_count };
        }
        select_candidate(candidates, live_title, self.home.as_deref())
    }
}
