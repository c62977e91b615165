//! ResolverEngine - the FFI entry point for native hosts.
//!
//! The host (a menu-bar app, a hotkey daemon) captures a [`WindowSnapshot`]
//! for the frontmost window and asks the engine where that window's project
//! lives. The engine is a thin, stable wrapper over [`ProjectResolver`]:
//! prefer additive API changes here to avoid breaking FFI clients.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use portal_core::{ResolverEngine, WindowSnapshot};
//!
//! let engine = ResolverEngine::new()?;
//! let snapshot = WindowSnapshot::trusted().with_title("reader-flow - Main.kt");
//! let context = engine.resolve("IntelliJ IDEA".into(), "com.jetbrains.intellij".into(), snapshot);
//! ```

use crate::chain::format_resolution_trace;
use crate::error::{PortalError, PortalFfiError};
use crate::family;
use crate::resolver::ProjectResolver;
use crate::storage::StorageConfig;
use crate::types::{EditorFamily, ResolvedContext, WindowSnapshot};

#[derive(uniffi::Object)]
pub struct ResolverEngine {
    storage: StorageConfig,
    resolver: ProjectResolver,
}

impl ResolverEngine {
    /// Creates an engine over a custom storage root.
    ///
    /// Used for testing with temp directories.
    /// Not exposed to FFI - use `new()` for external clients.
    pub fn with_storage(storage: StorageConfig) -> Self {
        let resolver = ProjectResolver::from_storage(&storage);
        Self { storage, resolver }
    }

    pub fn storage(&self) -> &StorageConfig {
        &self.storage
    }

    pub fn resolver(&self) -> &ProjectResolver {
        &self.resolver
    }
}

#[uniffi::export]
impl ResolverEngine {
    /// Creates an engine with data under `~/.portal/`.
    #[uniffi::constructor]
    pub fn new() -> Result<Self, PortalFfiError> {
        let home = dirs::home_dir().ok_or(PortalError::HomeDirNotFound)?;
        Ok(Self::with_storage(StorageConfig::with_root(
            home.join(".portal"),
        )))
    }

    /// Resolves the project behind a window. Never fails; check
    /// `resolved_path` and `attempts` on the result.
    pub fn resolve(
        &self,
        app_name: String,
        app_id: String,
        snapshot: WindowSnapshot,
    ) -> ResolvedContext {
        self.resolver.resolve(&app_name, &app_id, &snapshot)
    }

    pub fn classify(&self, app_id: String) -> EditorFamily {
        family::classify(&app_id)
    }

    /// Multi-line diagnostic rendering of a resolution.
    pub fn trace(&self, context: ResolvedContext) -> String {
        format_resolution_trace(&context)
    }

    /// Drops every remembered resolution.
    pub fn forget_cache(&self) -> Result<(), PortalFfiError> {
        self.resolver.cache().clear().map_err(PortalFfiError::from)
    }

    /// Path to the Portal data directory as a string.
    pub fn portal_dir(&self) -> String {
        self.storage.root().to_string_lossy().to_string()
    }
}

/// Classifies an application identifier without creating an engine.
#[uniffi::export]
pub fn classify_app(app_id: String) -> EditorFamily {
    family::classify(&app_id)
}
