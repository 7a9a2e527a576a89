//! Error types for modsync

use std::path::PathBuf;
use thiserror::Error;

/// Error types for modsync operations
#[derive(Debug, Error)]
pub enum SyncError {
    /// Standard IO error (automatically converted via #[from])
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation error (logic checks)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Source mods root does not exist - fatal precondition for a sync run
    #[error("Source mods directory does not exist: {path}")]
    SourceMissing { path: PathBuf },

    /// Permission denied for specific path
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Server process could not be launched
    #[error("Server launch failed: {0}")]
    Launch(String),
}

impl SyncError {
    /// Check if this error is a fatal sync precondition failure
    pub fn is_precondition(&self) -> bool {
        matches!(self, SyncError::SourceMissing { .. })
    }

    /// Check if this error is a validation error
    pub fn is_validation_error(&self) -> bool {
        matches!(self, SyncError::Validation(_) | SyncError::Config(_))
    }

    /// Check if this error is related to permissions
    pub fn is_permission_error(&self) -> bool {
        matches!(self, SyncError::PermissionDenied { .. })
    }
}
