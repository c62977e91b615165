//! # portal-core
//!
//! Finds the project directory behind an arbitrary, uninstrumented IDE
//! window, using only what can be observed from outside: window attributes,
//! editor recency files, and window titles.
//!
//! ## Design Principles
//!
//! - **Best effort, fully explained**: resolution never fails outright. It
//!   returns a [`ResolvedContext`] whose `attempts` say what every strategy saw.
//! - **Chains as data**: each [`EditorFamily`] has a fixed strategy order;
//!   the first success wins and the rest never run.
//! - **Live signals first**: the persistent cache only answers when every
//!   live strategy came up empty.
//! - **Off the caller's thread**: strategies run on a worker; the cache is
//!   owned by a single actor thread.
//! - **FFI-ready**: UniFFI annotations enable Swift, Kotlin, Python bindings.
//!   Prefer additive public API changes; removing or renaming breaks FFI clients.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use portal_core::{ProjectResolver, StorageConfig, WindowSnapshot};
//!
//! let resolver = ProjectResolver::from_storage(&StorageConfig::default());
//! let snapshot = WindowSnapshot::trusted().with_title("reader-flow - Main.kt");
//! let context = resolver.resolve("IntelliJ IDEA", "com.jetbrains.intellij", &snapshot);
//! println!("{}", context.summary());
//! ```

// UniFFI scaffolding for Swift/Kotlin/Python bindings
uniffi::setup_scaffolding!();

// Public modules
pub mod cache;
pub mod chain;
pub mod config;
pub mod engine;
pub mod error;
pub mod family;
pub mod heuristics;
pub mod patterns;
pub mod recents;
pub mod resolver;
pub mod storage;
pub mod types;

// Re-export commonly used items at crate root
pub use cache::{CacheEntry, CacheHandle, ResolutionCache};
pub use chain::{chain_for, format_resolution_trace, StrategyKind};
pub use config::{load_config, load_config_with_storage, PortalConfig};
pub use engine::{classify_app, ResolverEngine};
pub use error::{PortalError, PortalFfiError, Result};
pub use family::classify;
pub use heuristics::{extract_path_candidates, hints_from_title, normalize_to_project_root};
pub use resolver::{PendingResolution, ProjectResolver};
pub use storage::{RecencyRoots, StorageConfig};
pub use types::{EditorFamily, ResolvedContext, ResolverAttempt, WindowSnapshot};
