// Executor module - sandboxed execution of agent commands
#![allow(unused_imports)]

pub mod config;
pub mod error;
pub mod format;
pub mod progress;
pub mod pytest;
pub mod python;
pub mod runner;
pub mod shell;
pub mod tool;
pub mod types;

pub use config::SandboxConfig;
pub use error::{ExecutorError, Result};
pub use progress::{ProgressSink, TracingProgress};
pub use pytest::PythonTestExecutor;
pub use python::PythonFileExecutor;
pub use runner::Executor;
pub use shell::ShellCommandExecutor;
pub use tool::ToolImpl;
pub use types::{
    ExecutionRequest, ExecutionResult, FailureKind, ToolDefinition, ToolOutput,
};
