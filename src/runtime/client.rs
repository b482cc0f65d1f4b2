// Container runtime trait

use crate::runtime::error::Result;
use crate::runtime::types::{ContainerHandle, ImageRef, ProgressEvent, RunSpec};
use async_trait::async_trait;
use futures::stream::BoxStream;

/// One-shot stream of pull progress; ends when the pull finishes
pub type ProgressStream = BoxStream<'static, Result<ProgressEvent>>;

/// Handle to a local container runtime
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// Whether the image is in the local cache. A missing image is `Ok(false)`.
    async fn image_present(&self, image: &ImageRef) -> Result<bool>;

    /// Start pulling an image
    async fn pull_image(&self, image: &ImageRef) -> Result<ProgressStream>;

    /// Create and start a detached container
    async fn run(&self, spec: &RunSpec) -> Result<ContainerHandle>;

    /// Block until the container exits and return its exit status
    async fn wait(&self, handle: &ContainerHandle) -> Result<i64>;

    /// Combined stdout and stderr of a finished container, in emission order
    async fn logs(&self, handle: &ContainerHandle) -> Result<String>;

    /// Force-stop a running container
    async fn kill(&self, handle: &ContainerHandle) -> Result<()>;

    /// Delete the container. Removing one that is already gone succeeds.
    async fn remove(&self, handle: ContainerHandle) -> Result<()>;
}
