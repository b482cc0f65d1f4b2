// Image pull progress reporting

use crate::runtime::{ImageRef, ProgressEvent};
use tracing::info;

/// Receives pull progress as it streams in
pub trait ProgressSink: Send + Sync {
    fn on_progress(&self, image: &ImageRef, event: &ProgressEvent);
}

/// Default sink: one log line per event
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn on_progress(&self, image: &ImageRef, event: &ProgressEvent) {
        info!(
            image = %image,
            layer = event.id.as_deref().unwrap_or("-"),
            status = %event.status,
            progress = event.progress.as_deref().unwrap_or(""),
            "pull progress"
        );
    }
}
