// Error types for Workspace module
#![allow(dead_code)]

use std::path::PathBuf;
use thiserror::Error;

/// Workspace error types
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("Path '{0}' resolves outside the workspace")]
    OutOfBounds(String),

    #[error("Workspace root '{0}' is not a directory")]
    NotADirectory(PathBuf),

    #[error("Failed to change working directory to '{0}': {1}")]
    ChangeDir(PathBuf, std::io::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, WorkspaceError>;
