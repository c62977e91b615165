//! Error types for portal-core operations.
//! Keep PortalFfiError minimal and stable to avoid breaking FFI clients.
//!
//! The resolution pipeline itself never returns these: every failure there is
//! captured as a failed `ResolverAttempt`. They surface from configuration
//! loading and cache persistence, which callers treat as best-effort.

use std::path::PathBuf;

// ═══════════════════════════════════════════════════════════════════════════════
// FFI-Compatible Error (for Swift/Kotlin/Python)
// ═══════════════════════════════════════════════════════════════════════════════

/// FFI-safe error type for use across language boundaries.
#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum PortalFfiError {
    #[error("{message}")]
    General { message: String },
}

impl From<String> for PortalFfiError {
    fn from(message: String) -> Self {
        PortalFfiError::General { message }
    }
}

impl From<&str> for PortalFfiError {
    fn from(message: &str) -> Self {
        PortalFfiError::General {
            message: message.to_string(),
        }
    }
}

impl From<PortalError> for PortalFfiError {
    fn from(err: PortalError) -> Self {
        PortalFfiError::General {
            message: err.to_string(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Internal Error (for Rust-only use)
// ═══════════════════════════════════════════════════════════════════════════════

/// All errors that can occur in portal-core operations.
#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    // ─────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Home directory not found")]
    HomeDirNotFound,

    #[error("Configuration file malformed: {path}: {details}")]
    ConfigMalformed { path: PathBuf, details: String },

    // ─────────────────────────────────────────────────────────────────────
    // Cache Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Cache service is not running")]
    CacheUnavailable,

    #[error("Cache write failed: {path}: {details}")]
    CacheWriteFailed { path: PathBuf, details: String },

    // ─────────────────────────────────────────────────────────────────────
    // I/O Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parsing error: {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results using PortalError.
pub type Result<T> = std::result::Result<T, PortalError>;

impl From<PortalError> for String {
    fn from(err: PortalError) -> String {
        err.to_string()
    }
}
