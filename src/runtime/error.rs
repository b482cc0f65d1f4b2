// Error types for Runtime module
#![allow(dead_code)]

use thiserror::Error;

/// Container runtime error types
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Container runtime unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to pull image '{image}': {detail}")]
    PullFailed { image: String, detail: String },

    #[error("Failed to start container from '{image}': {detail}")]
    RunFailed { image: String, detail: String },

    #[error("Container {op} failed for {id}: {detail}")]
    Operation {
        op: &'static str,
        id: String,
        detail: String,
    },
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
