//! The resolution pipeline.
//!
//! [`ProjectResolver`] ties the pieces together for one call:
//!
//! ```text
//! classify ─▶ permission check ─▶ live chain ─▶ cache fallback ─▶ ResolvedContext
//! ```
//!
//! Work happens off the caller's thread. Each resolution runs on its own
//! `portal-chain` worker; cache reads and writes are handed to the cache
//! actor (see [`crate::cache::actor`]). [`ProjectResolver::resolve`] blocks
//! until the worker is done; [`ProjectResolver::spawn_resolve`] hands back a
//! [`PendingResolution`] instead, so a UI thread never has to wait.
//!
//! Nothing here returns an error. Every failure, including a worker that
//! dies mid-chain, ends up as a failed attempt in the returned context.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use tracing::{debug, info, warn};

use crate::cache::{CacheHandle, ResolutionCache};
use crate::chain::{
    live_chain, run_chain, uses_cache, ChainOutcome, StrategyContext, StrategyKind, NO_STRATEGY,
    PERMISSION_STRATEGY,
};
use crate::config::{load_config_with_storage, PortalConfig};
use crate::family::classify;
use crate::storage::{RecencyRoots, StorageConfig};
use crate::types::{EditorFamily, ResolvedContext, ResolverAttempt, WindowSnapshot};

const WORKER_FAILED_STRATEGY: &str = "worker";

#[derive(Debug, Clone)]
pub struct ProjectResolver {
    roots: RecencyRoots,
    home: Option<PathBuf>,
    cache: CacheHandle,
}

impl ProjectResolver {
    pub fn new(roots: RecencyRoots, cache: CacheHandle) -> Self {
        Self {
            roots,
            home: dirs::home_dir(),
            cache,
        }
    }

    /// Overrides the home directory used for `~` and `$USER_HOME$` expansion.
    pub fn with_home(mut self, home: Option<PathBuf>) -> Self {
        self.home = home;
        self
    }

    /// Builds a resolver from `config.toml` under `storage`, falling back to
    /// defaults when the file is malformed.
    pub fn from_storage(storage: &StorageConfig) -> Self {
        let config = load_config_with_storage(storage).unwrap_or_else(|err| {
            warn!(error = %err, "Ignoring unusable config, using defaults");
            PortalConfig::default()
        });
        Self::from_config(storage, &config)
    }

    pub fn from_config(storage: &StorageConfig, config: &PortalConfig) -> Self {
        let roots = config.recency_roots(RecencyRoots::system_default());
        let cache = ResolutionCache::load(&storage.cache_file(), config.cache_capacity);
        Self::new(roots, CacheHandle::spawn(cache))
    }

    pub fn roots(&self) -> &RecencyRoots {
        &self.roots
    }

    pub fn cache(&self) -> &CacheHandle {
        &self.cache
    }

    /// Resolves the project behind a window, blocking until done.
    pub fn resolve(&self, app_name: &str, app_id: &str, snapshot: &WindowSnapshot) -> ResolvedContext {
        self.spawn_resolve(app_name.to_string(), app_id.to_string(), snapshot.clone())
            .wait()
    }

    /// Starts a resolution on a `portal-chain` worker thread.
    pub fn spawn_resolve(
        &self,
        app_name: String,
        app_id: String,
        snapshot: WindowSnapshot,
    ) -> PendingResolution {
        let (tx, rx) = mpsc::channel();
        let fallback = worker_failed(&app_name, &app_id, &snapshot);

        if !snapshot.trusted {
            let _ = tx.send(self.execute(&app_name, &app_id, &snapshot));
            return PendingResolution { rx, fallback };
        }

        let worker_tx = tx.clone();
        let resolver = self.clone();
        let request = (app_name.clone(), app_id.clone(), snapshot.clone());
        let spawned = thread::Builder::new()
            .name("portal-chain".to_string())
            .spawn(move || {
                let (app_name, app_id, snapshot) = request;
                let _ = worker_tx.send(resolver.execute(&app_name, &app_id, &snapshot));
            });

        if let Err(err) = spawned {
            warn!(error = %err, "Failed to start chain worker, resolving inline");
            let _ = tx.send(self.execute(&app_name, &app_id, &snapshot));
        }

        PendingResolution { rx, fallback }
    }

    /// The pipeline itself, on the current thread.
    fn execute(&self, app_name: &str, app_id: &str, snapshot: &WindowSnapshot) -> ResolvedContext {
        let family = classify(app_id);
        let base = ContextParts {
            app_name,
            app_id,
            family,
            snapshot,
        };

        if !snapshot.trusted {
            info!(app_id, family = %family, "Window attributes unavailable without permission");
            let attempt = ResolverAttempt::failure(
                PERMISSION_STRATEGY,
                "accessibility permission not granted; window attributes are unavailable",
            );
            return base.unresolved(vec![attempt]);
        }

        let ctx = StrategyContext {
            snapshot,
            family,
            roots: &self.roots,
            home: self.home.as_deref(),
        };
        let ChainOutcome {
            mut attempts,
            winner,
        } = run_chain(&live_chain(family), &ctx);
        let title = snapshot.usable_title();

        let winner = match winner {
            Some(path) => Some(path),
            None if uses_cache(family) => {
                let cached = self.cache.lookup(app_id, title);
                attempts.push(match &cached {
                    Some(path) => ResolverAttempt::success(
                        StrategyKind::Cache.name(),
                        path,
                        "remembered from an earlier resolution",
                    ),
                    None => ResolverAttempt::failure(
                        StrategyKind::Cache.name(),
                        "no usable cached project for this app",
                    ),
                });
                cached
            }
            None => None,
        };

        let Some(path) = winner else {
            info!(app_id, family = %family, attempts = attempts.len(), "No project resolved");
            return base.unresolved(attempts);
        };

        self.remember(app_id, title, &path);

        let (strategy, detail) = attempts
            .last()
            .map(|a| (a.strategy.clone(), a.detail.clone()))
            .unwrap_or_default();
        info!(
            app_id,
            family = %family,
            strategy = %strategy,
            path = %path.display(),
            attempts = attempts.len(),
            "Resolved project"
        );
        base.resolved(&path, strategy, detail, attempts)
    }

    fn remember(&self, app_id: &str, title: Option<&str>, path: &Path) {
        match self.cache.record(app_id, title, path) {
            Ok(()) => debug!(app_id, path = %path.display(), "Cached resolution"),
            Err(err) => warn!(error = %err, "Failed to cache resolution"),
        }
    }
}

struct ContextParts<'a> {
    app_name: &'a str,
    app_id: &'a str,
    family: EditorFamily,
    snapshot: &'a WindowSnapshot,
}

impl ContextParts<'_> {
    fn resolved(
        &self,
        path: &Path,
        winning_strategy: String,
        detail: String,
        attempts: Vec<ResolverAttempt>,
    ) -> ResolvedContext {
        ResolvedContext {
            resolved_path: Some(path.to_string_lossy().to_string()),
            winning_strategy,
            detail,
            ..self.unresolved(attempts)
        }
    }

    fn unresolved(&self, attempts: Vec<ResolverAttempt>) -> ResolvedContext {
        let detail = attempts
            .last()
            .filter(|_| attempts.len() == 1)
            .map(|a| a.detail.clone())
            .unwrap_or_else(|| "no strategy resolved a project".to_string());
        ResolvedContext {
            app_name: self.app_name.to_string(),
            app_id: self.app_id.to_string(),
            family: self.family,
            resolved_path: None,
            winning_strategy: NO_STRATEGY.to_string(),
            detail,
            attempts,
            raw_title: self.snapshot.title.clone(),
            raw_document: self.snapshot.document.clone(),
            window_source: self.snapshot.source.clone(),
        }
    }
}

fn worker_failed(app_name: &str, app_id: &str, snapshot: &WindowSnapshot) -> ResolvedContext {
    ContextParts {
        app_name,
        app_id,
        family: classify(app_id),
        snapshot,
    }
    .unresolved(vec![ResolverAttempt::failure(
        WORKER_FAILED_STRATEGY,
        "resolution worker stopped before finishing",
    )])
}

/// A resolution running on a worker thread.
#[derive(Debug)]
pub struct PendingResolution {
    rx: Receiver<ResolvedContext>,
    fallback: ResolvedContext,
}

impl PendingResolution {
    /// Blocks until the result is ready.
    pub fn wait(self) -> ResolvedContext {
        self.rx.recv().unwrap_or(self.fallback)
    }

    /// The result if it is ready; `None` while the worker is still busy.
    pub fn try_take(&mut self) -> Option<ResolvedContext> {
        match self.rx.try_recv() {
            Ok(context) => Some(context),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(self.fallback.clone()),
        }
    }
}
