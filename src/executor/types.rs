// Data types for Executor module
#![allow(dead_code)]

use crate::executor::error::ExecutorError;
use crate::executor::format;
use serde::{Deserialize, Serialize};

/// Tool definition handed to the agent loop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

/// Output from a tool execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutput {
    /// Rendered text of the execution result
    pub content: String,
    /// Whether the execution failed or exited non-zero
    #[serde(default)]
    pub is_error: bool,
}

impl From<&ExecutionResult> for ToolOutput {
    fn from(result: &ExecutionResult) -> Self {
        Self {
            content: result.text(),
            is_error: !result.succeeded(),
        }
    }
}

/// One unit of work requested by the agent loop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExecutionRequest {
    PythonFile {
        relative_path: String,
    },
    ShellCommand {
        command_line: String,
        #[serde(default)]
        cwd: Option<String>,
    },
    PythonTests {
        relative_path: String,
    },
}

/// Why an execution did not produce output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    InvalidFileType,
    FileNotFound,
    OutOfBounds,
    RuntimeUnavailable,
    PullFailed,
    Container,
    Timeout,
    Spawn,
    InvalidRequest,
    Internal,
}

/// Outcome of one executor call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExecutionResult {
    /// A container ran to completion; `output` is its combined log
    Completed { output: String, exit_code: i64 },
    /// A host shell command ran to completion
    Shell {
        stdout: String,
        stderr: String,
        exit_code: Option<i32>,
    },
    /// The execution was rejected or broke down before completing
    Failed { kind: FailureKind, detail: String },
}

impl ExecutionResult {
    pub fn failed(kind: FailureKind, detail: impl Into<String>) -> Self {
        Self::Failed {
            kind,
            detail: detail.into(),
        }
    }

    /// Completed with a zero exit status
    pub fn succeeded(&self) -> bool {
        match self {
            Self::Completed { exit_code, .. } => *exit_code == 0,
            Self::Shell { exit_code, .. } => *exit_code == Some(0),
            Self::Failed { .. } => false,
        }
    }

    pub fn exit_code(&self) -> Option<i64> {
        match self {
            Self::Completed { exit_code, .. } => Some(*exit_code),
            Self::Shell { exit_code, .. } => exit_code.map(i64::from),
            Self::Failed { .. } => None,
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Failed { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Text handed back to the agent loop
    pub fn text(&self) -> String {
        format::render(self)
    }
}

impl From<ExecutorError> for ExecutionResult {
    fn from(err: ExecutorError) -> Self {
        Self::failed(err.kind(), err.to_string())
    }
}
