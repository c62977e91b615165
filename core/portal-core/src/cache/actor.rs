//! Single-owner access to the resolution cache.
//!
//! One thread (`portal-cache`) owns the [`ResolutionCache`]; everything else
//! talks to it through a cloneable [`CacheHandle`]. Each request carries its
//! own reply channel and the caller blocks on it, so two resolutions can never
//! interleave a read-modify-write of the cache file.
//!
//! The actor exits when the last handle is dropped. If it is gone (never
//! started, or panicked), lookups miss and mutations report
//! [`PortalError::CacheUnavailable`].

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use tracing::{debug, warn};

use super::{CacheEntry, ResolutionCache};
use crate::error::{PortalError, Result};

enum CacheCommand {
    Record {
        app_id: String,
        title: Option<String>,
        path: PathBuf,
        reply: Sender<Result<()>>,
    },
    Lookup {
        app_id: String,
        title: Option<String>,
        reply: Sender<Option<PathBuf>>,
    },
    Entries {
        reply: Sender<Vec<(String, CacheEntry)>>,
    },
    Prune {
        reply: Sender<Result<usize>>,
    },
    Clear {
        reply: Sender<Result<()>>,
    },
}

#[derive(Debug, Clone)]
pub struct CacheHandle {
    tx: Sender<CacheCommand>,
}

impl CacheHandle {
    /// Moves `cache` onto a new actor thread.
    pub fn spawn(cache: ResolutionCache) -> Self {
        let (tx, rx) = mpsc::channel();
        let spawned = thread::Builder::new()
            .name("portal-cache".to_string())
            .spawn(move || serve(cache, rx));

        if let Err(err) = spawned {
            warn!(error = %err, "Failed to start cache thread; cache disabled");
        }
        Self { tx }
    }

    pub fn record(&self, app_id: &str, title: Option<&str>, path: &Path) -> Result<()> {
        self.request(|reply| CacheCommand::Record {
            app_id: app_id.to_string(),
            title: title.map(str::to_string),
            path: path.to_path_buf(),
            reply,
        })?
    }

    pub fn lookup(&self, app_id: &str, title: Option<&str>) -> Option<PathBuf> {
        self.request(|reply| CacheCommand::Lookup {
            app_id: app_id.to_string(),
            title: title.map(str::to_string),
            reply,
        })
        .unwrap_or_else(|err| {
            debug!(error = %err, "Cache lookup skipped");
            None
        })
    }

    /// Snapshot of all entries, sorted by key.
    pub fn entries(&self) -> Vec<(String, CacheEntry)> {
        self.request(|reply| CacheCommand::Entries { reply })
            .unwrap_or_default()
    }

    pub fn prune(&self) -> Result<usize> {
        self.request(|reply| CacheCommand::Prune { reply })?
    }

    pub fn clear(&self) -> Result<()> {
        self.request(|reply| CacheCommand::Clear { reply })?
    }

    fn request<T>(&self, build: impl FnOnce(Sender<T>) -> CacheCommand) -> Result<T> {
        let (reply_tx, reply_rx) = mpsc::channel();
        self.tx
            .send(build(reply_tx))
            .map_err(|_| PortalError::CacheUnavailable)?;
        reply_rx.recv().map_err(|_| PortalError::CacheUnavailable)
    }
}

fn serve(mut cache: ResolutionCache, rx: Receiver<CacheCommand>) {
    debug!(entries = cache.len(), "Cache thread started");

    // A dropped reply receiver just means the caller stopped waiting.
    for command in rx {
        match command {
            CacheCommand::Record {
                app_id,
                title,
                path,
                reply,
            } => {
                let _ = reply.send(cache.record(&app_id, title.as_deref(), &path));
            }
            CacheCommand::Lookup {
                app_id,
                title,
                reply,
            } => {
                let _ = reply.send(cache.lookup(&app_id, title.as_deref()));
            }
            CacheCommand::Entries { reply } => {
                let entries = cache
                    .entries()
                    .iter()
                    .map(|(key, entry)| (key.clone(), entry.clone()))
                    .collect();
                let _ = reply.send(entries);
            }
            CacheCommand::Prune { reply } => {
                let _ = reply.send(cache.prune_missing());
            }
            CacheCommand::Clear { reply } => {
                let _ = reply.send(cache.clear());
            }
        }
    }

    debug!("Cache thread stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn handle_round_trips_through_actor() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("proj");
        fs::create_dir_all(&dir).unwrap();
        let handle = CacheHandle::spawn(ResolutionCache::new_in_memory(10));

        handle.record("com.foo", Some("proj - x"), &dir).unwrap();

        assert_eq!(handle.lookup("com.foo", Some("proj - x")), Some(dir.clone()));
        assert_eq!(handle.entries().len(), 2);

        fs::remove_dir(&dir).unwrap();
        assert_eq!(handle.prune().unwrap(), 2);

        handle.clear().unwrap();
        assert!(handle.entries().is_empty());
    }

    #[test]
    fn clones_share_one_cache() {
        let tmp = TempDir::new().unwrap();
        let handle = CacheHandle::spawn(ResolutionCache::new_in_memory(100));

        let workers: Vec<_> = (0..4)
            .map(|i| {
                let handle = handle.clone();
                let dir = tmp.path().join(format!("p{i}"));
                fs::create_dir_all(&dir).unwrap();
                thread::spawn(move || handle.record(&format!("app{i}"), None, &dir).unwrap())
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(handle.entries().len(), 4);
    }

    #[test]
    fn dead_actor_misses_and_reports_unavailable() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let handle = CacheHandle { tx };

        assert_eq!(handle.lookup("com.foo", None), None);
        assert!(handle.entries().is_empty());
        assert!(matches!(
            handle.record("com.foo", None, Path::new("/tmp")),
            Err(PortalError::CacheUnavailable)
        ));
    }
}
