// Data types for Runtime module
#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Image used when nothing else is configured
pub const DEFAULT_IMAGE: &str = "python:3.10";

/// Reference to a container image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub name: String,
    pub tag: String,
}

impl ImageRef {
    pub fn new(name: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tag: tag.into(),
        }
    }

    /// Parse `name[:tag]`. A colon that belongs to a registry port
    /// (`host:5000/image`) is not a tag separator.
    pub fn parse(reference: &str) -> Self {
        match reference.rsplit_once(':') {
            Some((name, tag)) if !tag.contains('/') && !name.is_empty() => Self::new(name, tag),
            _ => Self::new(reference, "latest"),
        }
    }

    /// Full `name:tag` reference
    pub fn reference(&self) -> String {
        format!("{}:{}", self.name, self.tag)
    }
}

impl Default for ImageRef {
    fn default() -> Self {
        Self::parse(DEFAULT_IMAGE)
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.tag)
    }
}

/// Identity of one container created by the runtime.
///
/// Not `Clone`: the call that created it owns it, and removal consumes it.
#[derive(Debug, PartialEq, Eq)]
pub struct ContainerHandle {
    id: String,
}

impl ContainerHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for ContainerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let short = self.id.get(..12).unwrap_or(&self.id);
        f.write_str(short)
    }
}

/// One status update emitted while an image is pulled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// Layer the update refers to, if any
    pub id: Option<String>,
    pub status: String,
    pub progress: Option<String>,
}

impl ProgressEvent {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            id: None,
            status: status.into(),
            progress: None,
        }
    }

    pub fn with_progress(mut self, progress: impl Into<String>) -> Self {
        self.progress = Some(progress.into());
        self
    }

    /// Parse one line of `docker pull` output.
    ///
    /// Layer lines look like `<id>: <status>`; anything else is a bare status.
    /// A trailing progress bar or `<done>/<total>` byte count is split off
    /// into `progress`. Without a terminal the CLI usually omits both, so
    /// `progress` is often `None`.
    pub fn parse_line(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        match line.split_once(": ") {
            Some((id, status))
                if !id.is_empty() && id.chars().all(|c| c.is_ascii_hexdigit()) =>
            {
                let (status, progress) = split_progress(status.trim());
                Some(Self {
                    id: Some(id.to_string()),
                    status: status.to_string(),
                    progress: progress.map(str::to_string),
                })
            }
            _ => Some(Self::new(line)),
        }
    }
}

/// `Downloading [==>   ]  1.2MB/3MB` -> (`Downloading`, `[==>   ]  1.2MB/3MB`)
fn split_progress(status: &str) -> (&str, Option<&str>) {
    if let Some(idx) = status.find('[') {
        return (status[..idx].trim_end(), Some(&status[idx..]));
    }
    match status.rsplit_once(' ') {
        Some((head, tail))
            if tail.contains('/') && tail.starts_with(|c: char| c.is_ascii_digit()) =>
        {
            (head.trim_end(), Some(tail))
        }
        _ => (status, None),
    }
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(id) = &self.id {
            write!(f, "{}: ", id)?;
        }
        match &self.progress {
            Some(progress) => write!(f, "{}: {}", self.status, progress),
            None => f.write_str(&self.status),
        }
    }
}

/// Bind mount from the host into a container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mount {
    pub source: PathBuf,
    pub target: String,
    pub read_only: bool,
}

impl Mount {
    pub fn read_only(source: impl Into<PathBuf>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            read_only: true,
        }
    }

    /// `-v` argument for the docker CLI
    pub fn to_volume_arg(&self) -> String {
        let mode = if self.read_only { "ro" } else { "rw" };
        format!("{}:{}:{}", self.source.display(), self.target, mode)
    }
}

/// Everything needed to start one container
#[derive(Debug, Clone)]
pub struct RunSpec {
    pub image: ImageRef,
    pub command: Vec<String>,
    pub mounts: Vec<Mount>,
    pub working_dir: String,
}
