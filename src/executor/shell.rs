// Shell command execution confined to the workspace

use crate::executor::config::SandboxConfig;
use crate::executor::error::{ExecutorError, Result};
use crate::executor::format;
use crate::executor::tool::{ToolImpl, parse_input};
use crate::executor::types::{ExecutionResult, ToolDefinition, ToolOutput};
use crate::workspace::{WorkdirGuard, WorkspaceGuard};
use async_trait::async_trait;
use serde::Deserialize;
use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::{debug, info, warn};

const TOOL_NAME: &str = "execute_shell";

/// Runs shell commands with the working directory moved into the workspace
pub struct ShellCommandExecutor {
    workspace: WorkspaceGuard,
    shell: String,
    timeout: Option<Duration>,
}

impl ShellCommandExecutor {
    pub fn new(workspace: WorkspaceGuard, config: &SandboxConfig) -> Self {
        Self {
            workspace,
            shell: config.shell.clone(),
            timeout: config.timeout(),
        }
    }

    /// Override the execution deadline
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn workspace(&self) -> &WorkspaceGuard {
        &self.workspace
    }

    /// Run `command_line` from the workspace root, or from the current
    /// directory if the process already sits inside the workspace.
    pub async fn execute(&self, command_line: &str) -> ExecutionResult {
        self.run(command_line, None).await
    }

    /// Run `command_line` from `dir`, a directory relative to the workspace
    pub async fn execute_in(&self, command_line: &str, dir: &str) -> ExecutionResult {
        self.run(command_line, Some(dir)).await
    }

    async fn run(&self, command_line: &str, dir: Option<&str>) -> ExecutionResult {
        let start = Instant::now();

        let result = match self.try_run(command_line, dir).await {
            Ok(result) => result,
            Err(e) => {
                warn!(command = %preview(command_line), error = %e, "shell command failed");
                ExecutionResult::from(e)
            }
        };

        info!(
            command = %preview(command_line),
            duration_ms = start.elapsed().as_millis() as u64,
            is_error = !result.succeeded(),
            outcome = %format::summary(&result),
            "shell command executed"
        );
        result
    }

    async fn try_run(&self, command_line: &str, dir: Option<&str>) -> Result<ExecutionResult> {
        let target = dir.map(|d| self.workspace.resolve(d)).transpose()?;

        // Held until return; dropping it restores the previous directory.
        let cwd_guard = match &target {
            Some(dir) => WorkdirGuard::enter_dir(dir).await?,
            None => WorkdirGuard::enter(&self.workspace).await?,
        };

        let cwd = std::env::current_dir()?;
        info!(
            command = %preview(command_line),
            cwd = %cwd.display(),
            prior = %cwd_guard.prior().display(),
            "executing command in working directory"
        );

        let child = Command::new(&self.shell)
            .arg("-c")
            .arg(command_line)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output();

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, child)
                .await
                .map_err(|_| ExecutorError::Timeout(TOOL_NAME.to_string(), limit))?,
            None => child.await,
        }
        .map_err(|e| ExecutorError::SpawnFailed(TOOL_NAME.to_string(), e.to_string()))?;

        debug!(
            stdout_bytes = output.stdout.len(),
            stderr_bytes = output.stderr.len(),
            "captured command output"
        );

        Ok(ExecutionResult::Shell {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
        })
    }
}

fn preview(command_line: &str) -> String {
    command_line.chars().take(100).collect()
}

/// Tool input parameters
#[derive(Debug, Deserialize)]
struct ShellInput {
    command_line: String,
    #[serde(default)]
    cwd: Option<String>,
}

/// `execute_shell` tool
pub struct ShellTool {
    executor: Arc<ShellCommandExecutor>,
    description: String,
}

impl ShellTool {
    pub fn new(executor: Arc<ShellCommandExecutor>, description: impl Into<String>) -> Self {
        Self {
            executor,
            description: description.into(),
        }
    }
}

#[async_trait]
impl ToolImpl for ShellTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: TOOL_NAME.to_string(),
            description: self.description.clone(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "command_line": {
                        "type": "string",
                        "description": "The shell command to execute"
                    },
                    "cwd": {
                        "type": "string",
                        "description": "Directory to run in, relative to the workspace"
                    }
                },
                "required": ["command_line"]
            }),
        }
    }

    async fn run(&self, input: serde_json::Value) -> Result<ToolOutput> {
        let ShellInput { command_line, cwd } = parse_input(TOOL_NAME, input)?;
        let result = match cwd {
            Some(dir) => self.executor.execute_in(&command_line, &dir).await,
            None => self.executor.execute(&command_line).await,
        };
        Ok(ToolOutput::from(&result))
    }
}

/// Default execute_shell tool description
pub fn default_shell_description() -> String {
    r#"Execute a shell command via /bin/sh -c from inside the workspace directory.
Stdout and stderr are captured and returned in separate sections."#
        .to_string()
}
