// Host-side test runner for workspace files

use crate::executor::config::SandboxConfig;
use crate::executor::error::{ExecutorError, Result};
use crate::executor::shell::ShellCommandExecutor;
use crate::executor::tool::{ToolImpl, parse_input};
use crate::executor::types::{ExecutionResult, ToolDefinition, ToolOutput};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

const TOOL_NAME: &str = "run_python_tests";

/// Runs the configured test runner against a workspace file, through the
/// shell executor so the same directory confinement applies.
pub struct PythonTestExecutor {
    shell: Arc<ShellCommandExecutor>,
    executable: String,
}

impl PythonTestExecutor {
    pub fn new(shell: Arc<ShellCommandExecutor>, config: &SandboxConfig) -> Self {
        Self {
            shell,
            executable: config.pytest_executable.clone(),
        }
    }

    pub async fn execute(&self, file: &str) -> ExecutionResult {
        let command_line = match self.command_for(file) {
            Ok(command_line) => command_line,
            Err(e) => {
                warn!(file = %file, error = %e, "test run rejected");
                return ExecutionResult::from(e);
            }
        };

        info!(file = %file, runner = %self.executable, "running python tests");
        self.shell.execute(&command_line).await
    }

    fn command_for(&self, file: &str) -> Result<String> {
        let path = self.shell.workspace().resolve(file)?;
        if !path.exists() {
            return Err(ExecutorError::FileNotFound(file.to_string()));
        }
        Ok(format!(
            "{} {}",
            self.executable,
            shell_quote(&path.to_string_lossy())
        ))
    }
}

/// Single-quote `arg` for `sh -c`
fn shell_quote(arg: &str) -> String {
    format!("'{}'", arg.replace('\'', r"'\''"))
}

/// Tool input parameters
#[derive(Debug, Deserialize)]
struct PythonTestInput {
    file: String,
}

/// `run_python_tests` tool
pub struct PythonTestTool {
    executor: Arc<PythonTestExecutor>,
    description: String,
}

impl PythonTestTool {
    pub fn new(executor: Arc<PythonTestExecutor>, description: impl Into<String>) -> Self {
        Self {
            executor,
            description: description.into(),
        }
    }
}

#[async_trait]
impl ToolImpl for PythonTestTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: TOOL_NAME.to_string(),
            description: self.description.clone(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "file": {
                        "type": "string",
                        "description": "Test file or directory, relative to the workspace"
                    }
                },
                "required": ["file"]
            }),
        }
    }

    async fn run(&self, input: serde_json::Value) -> Result<ToolOutput> {
        let PythonTestInput { file } = parse_input(TOOL_NAME, input)?;
        let result = self.executor.execute(&file).await;
        Ok(ToolOutput::from(&result))
    }
}

/// Default run_python_tests tool description
pub fn default_pytest_description() -> String {
    r#"Run the Python test runner against a file or directory in the workspace.
Output is returned in STDOUT/STDERR sections."#
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_quote() {
        assert_eq!(shell_quote("/ws/test_a.py"), "'/ws/test_a.py'");
        assert_eq!(shell_quote("it's.py"), r"'it'\''s.py'");
    }
}
