//! Shellbox CLI
//!
//! Runs agent commands through the sandboxed executors: Python files inside a
//! container, shell commands confined to the workspace directory.

mod executor;
mod runtime;
mod workspace;

use clap::{Parser, Subcommand};
use executor::{ExecutionRequest, Executor, SandboxConfig, ToolOutput};
use std::path::PathBuf;
use std::process;
use tracing::{Level, debug, error, info};
use tracing_subscriber::fmt;

/// CLI arguments
#[derive(Debug, Parser)]
#[command(name = "shellbox")]
#[command(about = "Sandboxed execution of agent commands")]
struct Args {
    /// Workspace directory (overrides WORKSPACE_DIR)
    #[arg(short, long)]
    workspace: Option<PathBuf>,

    /// Execution timeout in seconds, 0 disables (overrides EXECUTION_TIMEOUT_SECS)
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Execute a Python file from the workspace in a container
    Python { file: String },
    /// Execute a shell command inside the workspace
    Shell {
        /// Directory relative to the workspace
        #[arg(long)]
        cwd: Option<String>,
        #[arg(required = true, trailing_var_arg = true)]
        command_line: Vec<String>,
    },
    /// Run the Python test runner on a workspace file
    Test { file: String },
    /// Print the tool definitions as JSON
    Tools,
    /// Invoke a tool by name with a JSON input object
    Call { tool: String, input: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_target(true)
        .with_thread_ids(true)
        .with_file(args.verbose)
        .with_line_number(args.verbose)
        .with_writer(std::io::stderr)
        .init();

    let mut config = SandboxConfig::from_env();
    if let Some(workspace) = args.workspace {
        config.workspace_root = workspace;
    }
    if let Some(timeout) = args.timeout {
        config.timeout_secs = timeout;
    }

    info!(
        workspace = %config.workspace_root.display(),
        image = %config.image,
        "Configuration loaded"
    );

    let executor = Executor::new(config)?;
    debug!(tools = executor.tool_definitions().len(), "Executor initialized");

    let output = match args.command {
        Cmd::Python { file } => ToolOutput::from(
            &executor
                .dispatch(&ExecutionRequest::PythonFile {
                    relative_path: file,
                })
                .await,
        ),
        Cmd::Shell { cwd, command_line } => ToolOutput::from(
            &executor
                .dispatch(&ExecutionRequest::ShellCommand {
                    command_line: command_line.join(" "),
                    cwd,
                })
                .await,
        ),
        Cmd::Test { file } => ToolOutput::from(
            &executor
                .dispatch(&ExecutionRequest::PythonTests {
                    relative_path: file,
                })
                .await,
        ),
        Cmd::Tools => {
            let defs = executor.tool_definitions();
            println!("{}", serde_json::to_string_pretty(&defs)?);
            return Ok(());
        }
        Cmd::Call { tool, input } => {
            let input: serde_json::Value = serde_json::from_str(&input)?;
            match executor.execute(&tool, input).await {
                Ok(output) => output,
                Err(e) => {
                    error!(tool = %tool, error = %e, "Tool call failed");
                    process::exit(2);
                }
            }
        }
    };

    print!("{}", output.content);
    if output.is_error {
        process::exit(1);
    }
    Ok(())
}
