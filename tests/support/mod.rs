// Shared test helpers: a recording container runtime and temp workspaces
#![allow(dead_code)]

use crate::executor::{ProgressSink, SandboxConfig};
use crate::runtime::{
    ContainerHandle, ContainerRuntime, ImageRef, ProgressEvent, ProgressStream, RunSpec,
    RuntimeError,
};
use crate::workspace::WorkspaceGuard;
use async_trait::async_trait;
use futures::StreamExt;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

pub fn init_tracing() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    });
}

/// Temp workspace plus a config pointing at it
pub fn workspace() -> (tempfile::TempDir, WorkspaceGuard, SandboxConfig) {
    let dir = tempfile::tempdir().unwrap();
    let guard = WorkspaceGuard::open(dir.path()).unwrap();
    let config = SandboxConfig {
        workspace_root: guard.root().to_path_buf(),
        tools_toml_path: guard.root().join("tools.toml"),
        ..Default::default()
    };
    (dir, guard, config)
}

pub fn write_file(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

/// How the mock runtime answers each call
#[derive(Debug, Clone, Default)]
pub struct Behavior {
    pub image_present: bool,
    pub unavailable: bool,
    pub pull_events: Vec<ProgressEvent>,
    pub pull_fails: bool,
    pub run_fails: bool,
    pub wait_fails: bool,
    pub wait_delay: Option<Duration>,
    pub logs_fails: bool,
    pub remove_fails: bool,
    pub exit_code: i64,
    pub logs: String,
}

impl Behavior {
    /// Image cached, container prints `logs` and exits 0
    pub fn printing(logs: &str) -> Self {
        Self {
            image_present: true,
            logs: logs.to_string(),
            ..Default::default()
        }
    }
}

/// Container runtime that records every call instead of talking to Docker
#[derive(Debug, Default)]
pub struct MockRuntime {
    behavior: Behavior,
    calls: Mutex<Vec<&'static str>>,
    specs: Mutex<Vec<RunSpec>>,
}

impl MockRuntime {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            ..Default::default()
        }
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| **c == call).count()
    }

    pub fn last_spec(&self) -> Option<RunSpec> {
        self.specs.lock().unwrap().last().cloned()
    }
}

fn op_error(op: &'static str, handle: &ContainerHandle) -> RuntimeError {
    RuntimeError::Operation {
        op,
        id: handle.to_string(),
        detail: format!("mock {} failure", op),
    }
}

#[async_trait]
impl ContainerRuntime for MockRuntime {
    async fn image_present(&self, _image: &ImageRef) -> Result<bool, RuntimeError> {
        self.record("image_present");
        if self.behavior.unavailable {
            return Err(RuntimeError::Unavailable("mock daemon is down".to_string()));
        }
        Ok(self.behavior.image_present)
    }

    async fn pull_image(&self, image: &ImageRef) -> Result<ProgressStream, RuntimeError> {
        self.record("pull");
        let mut items: Vec<Result<ProgressEvent, RuntimeError>> =
            self.behavior.pull_events.iter().cloned().map(Ok).collect();
        if self.behavior.pull_fails {
            items.push(Err(RuntimeError::PullFailed {
                image: image.reference(),
                detail: "manifest unknown".to_string(),
            }));
        }
        Ok(futures::stream::iter(items).boxed())
    }

    async fn run(&self, spec: &RunSpec) -> Result<ContainerHandle, RuntimeError> {
        self.record("run");
        if self.behavior.run_fails {
            return Err(RuntimeError::RunFailed {
                image: spec.image.reference(),
                detail: "mock run failure".to_string(),
            });
        }
        self.specs.lock().unwrap().push(spec.clone());
        Ok(ContainerHandle::new("f00dfeedcafe0123456789"))
    }

    async fn wait(&self, handle: &ContainerHandle) -> Result<i64, RuntimeError> {
        self.record("wait");
        if let Some(delay) = self.behavior.wait_delay {
            tokio::time::sleep(delay).await;
        }
        if self.behavior.wait_fails {
            return Err(op_error("wait", handle));
        }
        Ok(self.behavior.exit_code)
    }

    async fn logs(&self, handle: &ContainerHandle) -> Result<String, RuntimeError> {
        self.record("logs");
        if self.behavior.logs_fails {
            return Err(op_error("logs", handle));
        }
        Ok(self.behavior.logs.clone())
    }

    async fn kill(&self, _handle: &ContainerHandle) -> Result<(), RuntimeError> {
        self.record("kill");
        Ok(())
    }

    async fn remove(&self, handle: ContainerHandle) -> Result<(), RuntimeError> {
        self.record("remove");
        if self.behavior.remove_fails {
            return Err(op_error("remove", &handle));
        }
        Ok(())
    }
}

/// Progress sink that keeps every event it sees
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl ProgressSink for RecordingSink {
    fn on_progress(&self, _image: &ImageRef, event: &ProgressEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
