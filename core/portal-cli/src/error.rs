use portal_core::PortalError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Portal(#[from] PortalError),

    #[error("Path does not exist: {0}")]
    MissingPath(String),
}
