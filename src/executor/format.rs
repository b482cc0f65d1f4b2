// Rendering of execution results as plain text

use crate::executor::types::ExecutionResult;

/// Render a result the way the agent loop consumes it.
///
/// Failures start with `Error:` and shell runs carry `STDOUT:`/`STDERR:`
/// sections; callers without the structured result rely on those markers.
pub fn render(result: &ExecutionResult) -> String {
    match result {
        ExecutionResult::Completed { output, .. } => output.clone(),
        ExecutionResult::Shell { stdout, stderr, .. } => {
            format!("STDOUT:\n{}\nSTDERR:\n{}\n", stdout, stderr)
        }
        ExecutionResult::Failed { detail, .. } => format!("Error: {}", detail),
    }
}

/// Single-line description for logs
pub fn summary(result: &ExecutionResult) -> String {
    match result {
        ExecutionResult::Completed { output, exit_code } => {
            format!("exit {} ({} bytes of output)", exit_code, output.len())
        }
        ExecutionResult::Shell {
            stdout,
            stderr,
            exit_code,
        } => {
            let code = exit_code.map_or_else(|| "signal".to_string(), |c| c.to_string());
            format!(
                "exit {} ({} bytes stdout, {} bytes stderr)",
                code,
                stdout.len(),
                stderr.len()
            )
        }
        ExecutionResult::Failed { kind, detail } => format!("{:?}: {}", kind, detail),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::types::FailureKind;

    #[test]
    fn test_render_completed_is_raw_output() {
        let result = ExecutionResult::Completed {
            output: "4\n".to_string(),
            exit_code: 0,
        };
        assert_eq!(render(&result), "4\n");
    }

    #[test]
    fn test_render_shell_sections() {
        let result = ExecutionResult::Shell {
            stdout: "hi\n".to_string(),
            stderr: String::new(),
            exit_code: Some(0),
        };
        assert_eq!(render(&result), "STDOUT:\nhi\n\nSTDERR:\n\n");
    }

    #[test]
    fn test_render_failure_prefix() {
        let result = ExecutionResult::failed(FailureKind::FileNotFound, "File 'x.py' does not exist.");
        assert_eq!(render(&result), "Error: File 'x.py' does not exist.");
    }

    #[test]
    fn test_summary_mentions_exit_code() {
        let result = ExecutionResult::Shell {
            stdout: String::new(),
            stderr: "boom".to_string(),
            exit_code: Some(2),
        };
        assert!(summary(&result).starts_with("exit 2"));
    }
}
