// Error types for Executor module
#![allow(dead_code)]

use crate::executor::types::FailureKind;
use crate::runtime::RuntimeError;
use crate::workspace::WorkspaceError;
use std::time::Duration;
use thiserror::Error;

/// Executor error types
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid input for tool '{0}': {1}")]
    InvalidInput(String, String),

    #[error("Invalid file type. Only .py files are allowed.")]
    InvalidFileType(String),

    #[error("File '{0}' does not exist.")]
    FileNotFound(String),

    #[error("Failed to spawn process for '{0}': {1}")]
    SpawnFailed(String, String),

    #[error("Execution timeout for '{0}' after {1:?}")]
    Timeout(String, Duration),

    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl ExecutorError {
    /// Category reported to callers of the executors
    pub fn kind(&self) -> FailureKind {
        match self {
            ExecutorError::InvalidFileType(_) => FailureKind::InvalidFileType,
            ExecutorError::FileNotFound(_) => FailureKind::FileNotFound,
            ExecutorError::SpawnFailed(..) => FailureKind::Spawn,
            ExecutorError::Timeout(..) => FailureKind::Timeout,
            ExecutorError::Workspace(WorkspaceError::OutOfBounds(_)) => FailureKind::OutOfBounds,
            ExecutorError::Workspace(WorkspaceError::ChangeDir(..))
            | ExecutorError::Workspace(WorkspaceError::NotADirectory(_)) => {
                FailureKind::FileNotFound
            }
            ExecutorError::Runtime(RuntimeError::Unavailable(_)) => {
                FailureKind::RuntimeUnavailable
            }
            ExecutorError::Runtime(RuntimeError::PullFailed { .. }) => FailureKind::PullFailed,
            ExecutorError::Runtime(_) => FailureKind::Container,
            ExecutorError::UnknownTool(_)
            | ExecutorError::InvalidInput(..)
            | ExecutorError::Json(_)
            | ExecutorError::TomlParse(_) => FailureKind::InvalidRequest,
            ExecutorError::Workspace(WorkspaceError::Io(_)) | ExecutorError::Io(_) => {
                FailureKind::Internal
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ExecutorError>;
