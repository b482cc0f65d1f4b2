// Python file execution inside a container

use crate::executor::config::SandboxConfig;
use crate::executor::error::{ExecutorError, Result};
use crate::executor::format;
use crate::executor::progress::{ProgressSink, TracingProgress};
use crate::executor::tool::{ToolImpl, parse_input};
use crate::executor::types::{ExecutionResult, ToolDefinition, ToolOutput};
use crate::runtime::{
    ContainerCleanup, ContainerHandle, ContainerRuntime, ImageRef, Mount, RunSpec,
};
use crate::workspace::WorkspaceGuard;
use async_trait::async_trait;
use futures::StreamExt;
use serde::Deserialize;
use std::path::Component;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const TOOL_NAME: &str = "execute_python_file";

/// Runs workspace Python files in a throwaway container
pub struct PythonFileExecutor {
    workspace: WorkspaceGuard,
    runtime: Arc<dyn ContainerRuntime>,
    progress: Arc<dyn ProgressSink>,
    image: ImageRef,
    mount_point: String,
    python_command: String,
    timeout: Option<Duration>,
}

impl PythonFileExecutor {
    pub fn new(
        workspace: WorkspaceGuard,
        config: &SandboxConfig,
        runtime: Arc<dyn ContainerRuntime>,
    ) -> Self {
        Self {
            workspace,
            runtime,
            progress: Arc::new(TracingProgress),
            image: config.image.clone(),
            mount_point: config.mount_point.clone(),
            python_command: config.python_command.clone(),
            timeout: config.timeout(),
        }
    }

    /// Replace the sink that receives image pull progress
    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    /// Override the execution deadline
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Execute `file` (relative to the workspace) and return its output.
    ///
    /// Never fails: every error becomes [`ExecutionResult::Failed`].
    pub async fn execute(&self, file: &str) -> ExecutionResult {
        let start = Instant::now();
        info!(
            file = %file,
            workspace = %self.workspace.root().display(),
            "executing python file"
        );

        let result = match self.try_execute(file).await {
            Ok(result) => result,
            Err(e) => {
                warn!(file = %file, error = %e, "python file execution failed");
                ExecutionResult::from(e)
            }
        };

        info!(
            file = %file,
            duration_ms = start.elapsed().as_millis() as u64,
            succeeded = result.succeeded(),
            outcome = %format::summary(&result),
            "python file executed"
        );
        result
    }

    async fn try_execute(&self, file: &str) -> Result<ExecutionResult> {
        if !file.ends_with(".py") {
            return Err(ExecutorError::InvalidFileType(file.to_string()));
        }

        let path = self.workspace.resolve(file)?;
        if !path.is_file() {
            return Err(ExecutorError::FileNotFound(file.to_string()));
        }

        let script = self
            .workspace
            .relative(&path)
            .map(|rel| {
                rel.components()
                    .filter_map(|c| match c {
                        Component::Normal(part) => Some(part.to_string_lossy()),
                        _ => None,
                    })
                    .collect::<Vec<_>>()
                    .join("/")
            })
            .ok_or_else(|| ExecutorError::FileNotFound(file.to_string()))?;

        self.ensure_image().await?;

        let spec = RunSpec {
            image: self.image.clone(),
            command: vec![self.python_command.clone(), script],
            mounts: vec![Mount::read_only(self.workspace.root(), &self.mount_point)],
            working_dir: self.mount_point.clone(),
        };

        let handle = self.runtime.run(&spec).await?;
        debug!(container = %handle, "container running");
        let cleanup = ContainerCleanup::new(self.runtime.clone(), &handle);

        let collected = self.collect(&handle).await;
        let removed = self.runtime.remove(handle).await;
        cleanup.disarm();

        let (exit_code, output) = match (collected, removed) {
            (Ok(done), Ok(())) => done,
            (Ok(_), Err(e)) => return Err(e.into()),
            (Err(e), removed) => {
                if let Err(remove_err) = removed {
                    warn!(error = %remove_err, "container removal failed after execution error");
                }
                return Err(e);
            }
        };

        Ok(ExecutionResult::Completed { output, exit_code })
    }

    /// Make sure the image is cached locally, pulling it if needed
    async fn ensure_image(&self) -> Result<()> {
        if self.runtime.image_present(&self.image).await? {
            info!(image = %self.image, "image found locally");
            return Ok(());
        }

        info!(image = %self.image, "image not found locally, pulling");
        let mut events = self.runtime.pull_image(&self.image).await?;
        while let Some(event) = events.next().await {
            self.progress.on_progress(&self.image, &event?);
        }
        info!(image = %self.image, "image pulled");
        Ok(())
    }

    /// Wait for the container to exit, then read its logs.
    /// On deadline expiry the container is killed; removal is left to the caller.
    async fn collect(&self, handle: &ContainerHandle) -> Result<(i64, String)> {
        let exit_code = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, self.runtime.wait(handle)).await {
                Ok(waited) => waited?,
                Err(_) => {
                    warn!(container = %handle, timeout = ?limit, "container exceeded deadline, killing");
                    if let Err(e) = self.runtime.kill(handle).await {
                        warn!(container = %handle, error = %e, "failed to kill container");
                    }
                    return Err(ExecutorError::Timeout(TOOL_NAME.to_string(), limit));
                }
            },
            None => self.runtime.wait(handle).await?,
        };

        let logs = self.runtime.logs(handle).await?;
        debug!(container = %handle, exit_code, log_bytes = logs.len(), "container finished");
        Ok((exit_code, logs))
    }
}

/// Tool input parameters
#[derive(Debug, Deserialize)]
struct PythonFileInput {
    file: String,
}

/// `execute_python_file` tool
pub struct PythonFileTool {
    executor: Arc<PythonFileExecutor>,
    description: String,
}

impl PythonFileTool {
    pub fn new(executor: Arc<PythonFileExecutor>, description: impl Into<String>) -> Self {
        Self {
            executor,
            description: description.into(),
        }
    }
}

#[async_trait]
impl ToolImpl for PythonFileTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: TOOL_NAME.to_string(),
            description: self.description.clone(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "file": {
                        "type": "string",
                        "description": "Path of the .py file, relative to the workspace"
                    }
                },
                "required": ["file"]
            }),
        }
    }

    async fn run(&self, input: serde_json::Value) -> Result<ToolOutput> {
        let PythonFileInput { file } = parse_input(TOOL_NAME, input)?;
        let result = self.executor.execute(&file).await;
        Ok(ToolOutput::from(&result))
    }
}

/// Default execute_python_file tool description
pub fn default_python_description() -> String {
    r#"Execute a Python file from the workspace inside an isolated container.
The workspace is mounted read-only; the file runs with its directory layout intact.
Returns the combined stdout and stderr of the run."#
        .to_string()
}
