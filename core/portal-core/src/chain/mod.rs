//! Per-family strategy chains.
//!
//! A chain is data: an ordered list of [`StrategyKind`]s per
//! [`EditorFamily`]. Live strategies are plain functions of a
//! [`StrategyContext`]; [`run_chain`] folds over them and stops at the first
//! success. The cache step is not a function here. It needs the cache actor,
//! so the engine handles it after the live chain is exhausted.

pub mod strategies;
pub mod trace;

pub use trace::format_resolution_trace;

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::storage::RecencyRoots;
use crate::types::{EditorFamily, ResolverAttempt, WindowSnapshot};

/// Strategy name recorded when the snapshot lacks the window-reading permission.
pub const PERMISSION_STRATEGY: &str = "permission";

/// `winning_strategy` of an unresolved context.
pub const NO_STRATEGY: &str = "none";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    TitleTokens,
    Document,
    JetBrainsRecents,
    ElectronRecents,
    Cache,
}

impl StrategyKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::TitleTokens => "title-tokens",
            Self::Document => "document",
            Self::JetBrainsRecents => "jetbrains-recents",
            Self::ElectronRecents => "electron-recents",
            Self::Cache => "cache",
        }
    }

    /// The function that runs this strategy; `None` for the cache step.
    pub fn live_fn(self) -> Option<StrategyFn> {
        match self {
            Self::TitleTokens => Some(strategies::title_tokens),
            Self::Document => Some(strategies::document),
            Self::JetBrainsRecents => Some(strategies::jetbrains_recents),
            Self::ElectronRecents => Some(strategies::electron_recents),
            Self::Cache => None,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Order Table
// ═══════════════════════════════════════════════════════════════════════════════

use StrategyKind::{Cache, Document, ElectronRecents, JetBrainsRecents, TitleTokens};

const JETBRAINS_CHAIN: &[StrategyKind] = &[TitleTokens, JetBrainsRecents, Document, Cache];
const VSCODE_CHAIN: &[StrategyKind] = &[Document, TitleTokens, ElectronRecents, Cache];
const XCODE_CHAIN: &[StrategyKind] = &[Document, TitleTokens, Cache];
const UNKNOWN_CHAIN: &[StrategyKind] = &[Document, TitleTokens, Cache];

/// The fixed strategy order for a family, cache step included.
pub fn chain_for(family: EditorFamily) -> &'static [StrategyKind] {
    match family {
        EditorFamily::JetBrains => JETBRAINS_CHAIN,
        EditorFamily::VsCodeLike => VSCODE_CHAIN,
        EditorFamily::XcodeLike => XCODE_CHAIN,
        EditorFamily::Unknown => UNKNOWN_CHAIN,
    }
}

pub fn uses_cache(family: EditorFamily) -> bool {
    chain_for(family).contains(&Cache)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Execution
// ═══════════════════════════════════════════════════════════════════════════════

/// Everything a live strategy may look at.
#[derive(Debug, Clone, Copy)]
pub struct StrategyContext<'a> {
    pub snapshot: &'a WindowSnapshot,
    pub family: EditorFamily,
    pub roots: &'a RecencyRoots,
    pub home: Option<&'a Path>,
}

/// A live strategy. A successful attempt must carry an existing directory.
pub type StrategyFn = fn(&StrategyContext<'_>) -> ResolverAttempt;

#[derive(Debug, Clone, Copy)]
pub struct StrategyDescriptor {
    pub kind: StrategyKind,
    pub run: StrategyFn,
}

/// Descriptors for the family's live strategies, in chain order.
pub fn live_chain(family: EditorFamily) -> Vec<StrategyDescriptor> {
    chain_for(family)
        .iter()
        .filter_map(|&kind| kind.live_fn().map(|run| StrategyDescriptor { kind, run }))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChainOutcome {
    pub attempts: Vec<ResolverAttempt>,
    pub winner: Option<PathBuf>,
}

/// Runs `descriptors` in order until one succeeds. Strategies after the
/// winner never run.
pub fn run_chain(descriptors: &[StrategyDescriptor], ctx: &StrategyContext<'_>) -> ChainOutcome {
    let mut attempts = Vec::with_capacity(descriptors.len());

    let winner = descriptors.iter().find_map(|descriptor| {
        let attempt = (descriptor.run)(ctx);
        debug!(
            strategy = descriptor.kind.name(),
            family = %ctx.family,
            succeeded = attempt.succeeded,
            detail = %attempt.detail,
            "Strategy finished"
        );

        let path = attempt
            .candidate_path
            .as_deref()
            .filter(|_| attempt.succeeded)
            .map(PathBuf::from);
        attempts.push(attempt);
        path
    });

    ChainOutcome { attempts, winner }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(family: EditorFamily) -> Vec<&'static str> {
        chain_for(family).iter().map(|k| k.name()).collect()
    }

    #[test]
    fn order_table_per_family() {
        assert_eq!(
            names(EditorFamily::JetBrains),
            ["title-tokens", "jetbrains-recents", "document", "cache"]
        );
        assert_eq!(
            names(EditorFamily::VsCodeLike),
            ["document", "title-tokens", "electron-recents", "cache"]
        );
        assert_eq!(names(EditorFamily::XcodeLike), ["document", "title-tokens", "cache"]);
        assert_eq!(names(EditorFamily::Unknown), ["document", "title-tokens", "cache"]);
    }

    #[test]
    fn every_family_ends_with_cache() {
        for family in [
            EditorFamily::JetBrains,
            EditorFamily::VsCodeLike,
            EditorFamily::XcodeLike,
            EditorFamily::Unknown,
        ] {
            assert!(uses_cache(family));
            assert_eq!(chain_for(family).last(), Some(&Cache));
            assert!(live_chain(family).iter().all(|d| d.kind != Cache));
        }
    }

    fn fail(_: &StrategyContext<'_>) -> ResolverAttempt {
        ResolverAttempt::failure("fail", "nope")
    }

    fn succeed(_: &StrategyContext<'_>) -> ResolverAttempt {
        ResolverAttempt::success("succeed", Path::new("/tmp"), "yes")
    }

    fn unreachable_strategy(_: &StrategyContext<'_>) -> ResolverAttempt {
        panic!("strategy after the winner must not run");
    }

    #[test]
    fn first_success_short_circuits() {
        let snapshot = WindowSnapshot::trusted();
        let roots = RecencyRoots::empty();
        let ctx = StrategyContext {
            snapshot: &snapshot,
            family: EditorFamily::Unknown,
            roots: &roots,
            home: None,
        };
        let chain = [
            StrategyDescriptor { kind: Document, run: fail },
            StrategyDescriptor { kind: TitleTokens, run: succeed },
            StrategyDescriptor { kind: Document, run: unreachable_strategy },
        ];

        let outcome = run_chain(&chain, &ctx);

        assert_eq!(outcome.attempts.len(), 2);
        assert_eq!(outcome.winner, Some(PathBuf::from("/tmp")));
        assert_eq!(outcome.attempts[1].strategy, "succeed");
    }

    #[test]
    fn exhausted_chain_records_every_attempt() {
        let snapshot = WindowSnapshot::trusted();
        let roots = RecencyRoots::empty();
        let ctx = StrategyContext {
            snapshot: &snapshot,
            family: EditorFamily::Unknown,
            roots: &roots,
            home: None,
        };
        let chain = [
            StrategyDescriptor { kind: Document, run: fail },
            StrategyDescriptor { kind: TitleTokens, run: fail },
        ];

        let outcome = run_chain(&chain, &ctx);

        assert_eq!(outcome.attempts.len(), 2);
        assert!(outcome.winner.is_none());
        assert!(outcome.attempts.iter().all(|a| !a.succeeded));
    }
}
