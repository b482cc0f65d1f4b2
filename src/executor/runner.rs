// Tool registry exposed to the agent loop

use crate::executor::config::SandboxConfig;
use crate::executor::error::{ExecutorError, Result};
use crate::executor::pytest::{PythonTestExecutor, PythonTestTool, default_pytest_description};
use crate::executor::python::{PythonFileExecutor, PythonFileTool, default_python_description};
use crate::executor::shell::{ShellCommandExecutor, ShellTool, default_shell_description};
use crate::executor::tool::ToolImpl;
use crate::executor::types::{ExecutionRequest, ExecutionResult, ToolDefinition, ToolOutput};
use crate::runtime::{ContainerRuntime, DockerCli};
use crate::workspace::WorkspaceGuard;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Main executor: owns the sandboxed executors and the tools wrapping them
pub struct Executor {
    python: Arc<PythonFileExecutor>,
    shell: Arc<ShellCommandExecutor>,
    tests: Arc<PythonTestExecutor>,
    tools: BTreeMap<String, Arc<dyn ToolImpl>>,
}

impl Executor {
    /// Create an executor backed by the local Docker runtime
    pub fn new(config: SandboxConfig) -> Result<Self> {
        Self::init(config, Arc::new(DockerCli::new()))
    }

    /// Initialize with an explicit container runtime
    pub fn init(config: SandboxConfig, runtime: Arc<dyn ContainerRuntime>) -> Result<Self> {
        debug!(
            workspace = %config.workspace_root.display(),
            image = %config.image,
            timeout_secs = config.timeout_secs,
            shell = %config.shell,
            "initializing executor"
        );

        let workspace = WorkspaceGuard::open(&config.workspace_root)?;

        let python = Arc::new(PythonFileExecutor::new(workspace.clone(), &config, runtime));
        let shell = Arc::new(ShellCommandExecutor::new(workspace, &config));
        let tests = Arc::new(PythonTestExecutor::new(shell.clone(), &config));

        // Load tool descriptions from config file
        let descriptions = crate::executor::tool::load_tool_descriptions(&config.tools_toml_path)
            .unwrap_or_default();
        let description = |name: &str, default: fn() -> String| {
            descriptions.get(name).cloned().unwrap_or_else(default)
        };

        let registered: Vec<Arc<dyn ToolImpl>> = vec![
            Arc::new(PythonFileTool::new(
                python.clone(),
                description("execute_python_file", default_python_description),
            )) as Arc<dyn ToolImpl>,
            Arc::new(ShellTool::new(
                shell.clone(),
                description("execute_shell", default_shell_description),
            )) as Arc<dyn ToolImpl>,
            Arc::new(PythonTestTool::new(
                tests.clone(),
                description("run_python_tests", default_pytest_description),
            )) as Arc<dyn ToolImpl>,
        ];

        let tools: BTreeMap<_, _> = registered
            .into_iter()
            .map(|tool| (tool.name(), tool))
            .collect();

        info!(tool_count = tools.len(), "executor initialized with tools");

        Ok(Self {
            python,
            shell,
            tests,
            tools,
        })
    }

    /// Get all tool definitions for the agent loop
    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.definition()).collect()
    }

    /// Execute a tool by name with JSON input
    pub async fn execute(&self, tool_name: &str, input: serde_json::Value) -> Result<ToolOutput> {
        debug!(tool_name = %tool_name, "looking up tool");

        let tool = self
            .tools
            .get(tool_name)
            .ok_or_else(|| ExecutorError::UnknownTool(tool_name.to_string()))?;

        info!(tool_name = %tool_name, "executing tool");
        tool.run(input).await
    }

    /// Dispatch a typed request straight to its executor
    pub async fn dispatch(&self, request: &ExecutionRequest) -> ExecutionResult {
        match request {
            ExecutionRequest::PythonFile { relative_path } => {
                self.python.execute(relative_path).await
            }
            ExecutionRequest::ShellCommand {
                command_line,
                cwd: Some(dir),
            } => self.shell.execute_in(command_line, dir).await,
            ExecutionRequest::ShellCommand { command_line, .. } => {
                self.shell.execute(command_line).await
            }
            ExecutionRequest::PythonTests { relative_path } => {
                self.tests.execute(relative_path).await
            }
        }
    }
}
