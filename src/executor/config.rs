// Executor configuration
#![allow(dead_code)]

use crate::runtime::ImageRef;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// Configuration shared by the sandboxed executors
#[derive(Debug, Clone)]
pub struct SandboxConfig {
    /// Directory every file and command is confined to
    pub workspace_root: PathBuf,
    /// Interpreter image used for Python files
    pub image: ImageRef,
    /// Where the workspace appears inside the container
    pub mount_point: String,
    /// Interpreter invoked inside the container
    pub python_command: String,
    /// Shell path for command execution
    pub shell: String,
    /// Test runner invoked on the host for `run_python_tests`
    pub pytest_executable: String,
    /// Upper bound for a single execution in seconds (0 = unbounded)
    pub timeout_secs: u64,
    /// Path to tools.toml configuration file
    pub tools_toml_path: PathBuf,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            workspace_root: PathBuf::from("auto_gpt_workspace"),
            image: ImageRef::default(),
            mount_point: String::from("/workspace"),
            python_command: String::from("python"),
            shell: String::from("/bin/sh"),
            pytest_executable: String::from("pytest"),
            timeout_secs: 300,
            tools_toml_path: PathBuf::from("tools.toml"),
        }
    }
}

/// Parse an environment variable, logging a warning if the value is present but invalid.
fn parse_env_var<T: std::str::FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(v) => match v.parse() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!(var = name, value = %v, "Invalid env var value, using default");
                default
            }
        },
        Err(_) => default,
    }
}

impl SandboxConfig {
    /// Load from environment variables (and `.env` if present)
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = SandboxConfig::default();

        config.workspace_root = parse_env_var("WORKSPACE_DIR", config.workspace_root);
        if let Ok(image) = std::env::var("SANDBOX_IMAGE") {
            config.image = ImageRef::parse(&image);
        }
        config.mount_point = parse_env_var("SANDBOX_MOUNT_POINT", config.mount_point);
        config.python_command = parse_env_var("SANDBOX_PYTHON", config.python_command);
        config.shell = parse_env_var("SANDBOX_SHELL", config.shell);
        config.pytest_executable = parse_env_var("PYTEST_EXECUTABLE", config.pytest_executable);
        config.timeout_secs = parse_env_var("EXECUTION_TIMEOUT_SECS", config.timeout_secs);
        config.tools_toml_path = parse_env_var("TOOLS_TOML_PATH", config.tools_toml_path);

        config
    }

    /// Deadline for one execution, if any
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}
