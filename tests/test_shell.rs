// Integration tests for the shell and test-runner executors
// This file should be run with cargo test --test test_shell

#[path = "../src/executor/mod.rs"]
mod executor;

#[path = "../src/runtime/mod.rs"]
mod runtime;

#[path = "../src/workspace/mod.rs"]
mod workspace;

mod support;

use executor::{ExecutionResult, FailureKind, PythonTestExecutor, ShellCommandExecutor};
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use support::{init_tracing, write_file};
use tokio::sync::Mutex;

/// These tests read the process working directory; run them one at a time.
static SERIAL: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

fn shell() -> (tempfile::TempDir, ShellCommandExecutor) {
    let (dir, guard, config) = support::workspace();
    (dir, ShellCommandExecutor::new(guard, &config))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// echo hi renders with both sections
    #[tokio::test]
    async fn test_echo_hi() {
        init_tracing();
        let _serial = SERIAL.lock().await;
        let (_dir, shell) = shell();

        let result = shell.execute("echo hi").await;
        assert_eq!(result.text(), "STDOUT:\nhi\n\nSTDERR:\n\n");
        assert_eq!(result.exit_code(), Some(0));
        assert!(result.succeeded());
    }

    /// Commands run from the workspace root
    #[tokio::test]
    async fn test_runs_in_workspace_root() {
        init_tracing();
        let _serial = SERIAL.lock().await;
        let (_dir, shell) = shell();

        let result = shell.execute("pwd -P").await;
        let ExecutionResult::Shell { stdout, .. } = &result else {
            panic!("unexpected result: {:?}", result);
        };
        assert_eq!(stdout.trim(), shell.workspace().root().to_str().unwrap());
    }

    /// Working directory is restored after success
    #[tokio::test]
    async fn test_cwd_restored_after_success() {
        init_tracing();
        let _serial = SERIAL.lock().await;
        let (_dir, shell) = shell();

        let before = std::env::current_dir().unwrap();
        shell.execute("echo hi").await;
        assert_eq!(std::env::current_dir().unwrap(), before);
    }

    /// Working directory is restored after a failing command
    #[tokio::test]
    async fn test_cwd_restored_after_failure() {
        init_tracing();
        let _serial = SERIAL.lock().await;
        let (_dir, shell) = shell();

        let before = std::env::current_dir().unwrap();
        let result = shell.execute("echo oops 1>&2; exit 3").await;
        assert_eq!(std::env::current_dir().unwrap(), before);

        assert_eq!(result.text(), "STDOUT:\n\nSTDERR:\noops\n\n");
        assert_eq!(result.exit_code(), Some(3));
        assert!(!result.succeeded());
        assert_eq!(result.failure_kind(), None);
    }

    /// Working directory is restored when the shell cannot be spawned
    #[tokio::test]
    async fn test_cwd_restored_after_spawn_failure() {
        init_tracing();
        let _serial = SERIAL.lock().await;
        let (_dir, guard, mut config) = support::workspace();
        config.shell = "/nonexistent/shell".to_string();
        let shell = ShellCommandExecutor::new(guard, &config);

        let before = std::env::current_dir().unwrap();
        let result = shell.execute("echo hi").await;
        assert_eq!(std::env::current_dir().unwrap(), before);
        assert_eq!(result.failure_kind(), Some(FailureKind::Spawn));
        assert!(result.text().starts_with("Error: "));
    }

    /// Runaway commands are killed at the deadline and the directory restored
    #[tokio::test]
    async fn test_deadline() {
        init_tracing();
        let _serial = SERIAL.lock().await;
        let (_dir, shell) = shell();
        let shell = shell.with_timeout(Some(Duration::from_millis(100)));

        let before = std::env::current_dir().unwrap();
        let result = shell.execute("sleep 5").await;
        assert_eq!(std::env::current_dir().unwrap(), before);
        assert_eq!(result.failure_kind(), Some(FailureKind::Timeout));
    }

    /// Explicit subdirectory inside the workspace
    #[tokio::test]
    async fn test_execute_in_subdir() {
        init_tracing();
        let _serial = SERIAL.lock().await;
        let (_dir, shell) = shell();
        std::fs::create_dir(shell.workspace().root().join("sub")).unwrap();

        let before = std::env::current_dir().unwrap();
        let result = shell.execute_in("pwd -P", "sub").await;
        assert_eq!(std::env::current_dir().unwrap(), before);

        let ExecutionResult::Shell { stdout, .. } = &result else {
            panic!("unexpected result: {:?}", result);
        };
        let expected = shell.workspace().root().join("sub");
        assert_eq!(stdout.trim(), expected.to_str().unwrap());
    }

    /// Directories outside the workspace are rejected up front
    #[tokio::test]
    async fn test_execute_in_out_of_bounds() {
        init_tracing();
        let _serial = SERIAL.lock().await;
        let (_dir, shell) = shell();

        let before = std::env::current_dir().unwrap();
        let marker = shell.workspace().root().join("marker");
        let result = shell.execute_in("touch marker", "..").await;
        assert_eq!(std::env::current_dir().unwrap(), before);
        assert_eq!(result.failure_kind(), Some(FailureKind::OutOfBounds));
        assert!(!marker.exists());
    }

    /// Missing subdirectory is a failure, not a crash
    #[tokio::test]
    async fn test_execute_in_missing_dir() {
        init_tracing();
        let _serial = SERIAL.lock().await;
        let (_dir, shell) = shell();

        let before = std::env::current_dir().unwrap();
        let result = shell.execute_in("echo hi", "nope").await;
        assert_eq!(std::env::current_dir().unwrap(), before);
        assert_eq!(result.failure_kind(), Some(FailureKind::FileNotFound));
    }

    /// Already inside the workspace: stay in the current subdirectory
    #[tokio::test]
    async fn test_stays_put_inside_workspace() {
        init_tracing();
        let _serial = SERIAL.lock().await;
        let (_dir, shell) = shell();
        let sub = shell.workspace().root().join("inner");
        std::fs::create_dir(&sub).unwrap();

        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(&sub).unwrap();

        let result = shell.execute("pwd -P").await;
        let after = std::env::current_dir().unwrap();
        std::env::set_current_dir(&original).unwrap();

        assert_eq!(after, sub);
        let ExecutionResult::Shell { stdout, .. } = &result else {
            panic!("unexpected result: {:?}", result);
        };
        assert_eq!(stdout.trim(), sub.to_str().unwrap());
    }

    /// Test runner receives the absolute path of the workspace file
    #[tokio::test]
    async fn test_python_tests_invocation() {
        init_tracing();
        let _serial = SERIAL.lock().await;
        let (_dir, guard, mut config) = support::workspace();
        config.pytest_executable = "echo".to_string();
        write_file(guard.root(), "test_math.py", "def test_add(): assert 1 + 1 == 2\n");
        let shell = Arc::new(ShellCommandExecutor::new(guard.clone(), &config));
        let tests = PythonTestExecutor::new(shell, &config);

        let result = tests.execute("test_math.py").await;
        let expected = guard.root().join("test_math.py");
        assert_eq!(
            result.text(),
            format!("STDOUT:\n{}\n\nSTDERR:\n\n", expected.display())
        );
    }

    /// Test runner rejects missing and escaping paths
    #[tokio::test]
    async fn test_python_tests_rejections() {
        init_tracing();
        let _serial = SERIAL.lock().await;
        let (_dir, guard, config) = support::workspace();
        let shell = Arc::new(ShellCommandExecutor::new(guard, &config));
        let tests = PythonTestExecutor::new(shell, &config);

        let missing = tests.execute("test_missing.py").await;
        assert_eq!(missing.failure_kind(), Some(FailureKind::FileNotFound));

        let escaping = tests.execute("../test_x.py").await;
        assert_eq!(escaping.failure_kind(), Some(FailureKind::OutOfBounds));
    }
}
