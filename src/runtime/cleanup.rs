// Background removal of containers whose owner went away

use crate::runtime::client::ContainerRuntime;
use crate::runtime::types::ContainerHandle;
use std::sync::Arc;
use tracing::{debug, warn};

/// Armed while a started container has not been removed yet.
///
/// The owner removes the container itself and then calls [`disarm`]. If the
/// guard is dropped while still armed (the owning future was cancelled mid
/// wait or mid logs), a background task kills and removes the container.
///
/// [`disarm`]: ContainerCleanup::disarm
pub struct ContainerCleanup {
    runtime: Arc<dyn ContainerRuntime>,
    id: Option<String>,
}

impl ContainerCleanup {
    pub fn new(runtime: Arc<dyn ContainerRuntime>, handle: &ContainerHandle) -> Self {
        Self {
            runtime,
            id: Some(handle.id().to_string()),
        }
    }

    /// The container has been removed; nothing left to do on drop
    pub fn disarm(mut self) {
        self.id = None;
    }
}

impl Drop for ContainerCleanup {
    fn drop(&mut self) {
        let Some(id) = self.id.take() else {
            return;
        };

        let handle = ContainerHandle::new(id);
        let Ok(rt) = tokio::runtime::Handle::try_current() else {
            warn!(container = %handle, "no async runtime left, container not removed");
            return;
        };

        warn!(container = %handle, "execution abandoned, removing container in background");
        let runtime = self.runtime.clone();
        rt.spawn(async move {
            if let Err(e) = runtime.kill(&handle).await {
                debug!(container = %handle, error = %e, "kill before removal failed");
            }
            let label = handle.to_string();
            match runtime.remove(handle).await {
                Ok(()) => debug!(container = %label, "abandoned container removed"),
                Err(e) => warn!(container = %label, error = %e, "failed to remove abandoned container"),
            }
        });
    }
}
